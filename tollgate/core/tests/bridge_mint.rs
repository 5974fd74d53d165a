// Copyright (c) 2024 The Botho Foundation
//
//! Integration tests for bridge minting.

mod common;

use common::*;
use tollgate_core::{Address, ErrorKind, TokenError, TokenEvent, TransferKind};

#[test]
fn unset_minter_rejects_everyone() {
    let mut token = launched();

    for caller in [OWNER, MINTER, Address::ZERO] {
        assert_eq!(
            token.bridge_mint(caller, ALICE, 1).unwrap_err().kind(),
            ErrorKind::UnauthorizedBridgeCaller
        );
    }
    assert_eq!(token.total_supply(), SUPPLY);
}

#[test]
fn non_minter_rejected_regardless_of_amount() {
    let mut token = with_minter();

    for amount in [0, 1, SUPPLY, u128::MAX] {
        assert_eq!(
            token.bridge_mint(ALICE, ALICE, amount),
            Err(TokenError::UnauthorizedBridgeCaller { caller: ALICE })
        );
    }
    // The owner is not implicitly a minter
    assert_eq!(
        token.bridge_mint(OWNER, OWNER, 1),
        Err(TokenError::UnauthorizedBridgeCaller { caller: OWNER })
    );
    assert!(token.events().is_empty());
}

#[test]
fn minter_increases_supply_exactly() {
    let mut token = with_minter();

    token.bridge_mint(MINTER, BOB, 12_345).unwrap();

    assert_eq!(token.total_supply(), SUPPLY + 12_345);
    assert_eq!(token.balance_of(&BOB), USER_FUNDING + 12_345);

    let events = token.drain_events();
    let mints: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, TokenEvent::BridgeMint { .. }))
        .collect();
    assert_eq!(
        mints,
        [&TokenEvent::BridgeMint {
            to: BOB,
            amount: 12_345
        }]
    );
}

#[test]
fn mint_disabled_off_canonical_chain() {
    let mut token = with_minter();
    token.chain_mut().set_chain_id(8453);

    assert_eq!(
        token.bridge_mint(MINTER, BOB, 1),
        Err(TokenError::BridgeMintDisabled {
            chain_id: 8453,
            canonical_chain_id: CANONICAL_CHAIN,
        })
    );
    assert_eq!(token.total_supply(), SUPPLY);

    token.chain_mut().set_chain_id(CANONICAL_CHAIN);
    token.bridge_mint(MINTER, BOB, 1).unwrap();
}

#[test]
fn mint_bypasses_transfer_pipeline() {
    let mut token = with_minter();
    token.set_trading(OWNER, false).unwrap();

    // Neither the trading window nor the fee applies to a pool recipient
    token.bridge_mint(MINTER, POOL, 50_000).unwrap();
    assert_eq!(token.balance_of(&POOL), POOL_FUNDING + 50_000);
    assert_eq!(token.balance_of(&FEE_RECEIVER), 0);
}

#[test]
fn sells_still_capped_at_maximum_supply() {
    let mut token = with_minter();
    token.bridge_mint(MINTER, OWNER, u128::MAX - SUPPLY).unwrap();
    assert_eq!(token.total_supply(), u128::MAX);

    let cap = token.get_max_sell_amount().unwrap();
    assert_eq!(cap, u128::MAX / 10_000 * 200 + 1_455 * 200 / 10_000);

    let receipt = token.transfer(ALICE, POOL, 1).unwrap();
    assert_eq!(receipt.kind, TransferKind::Sell);
    let receipt = token.transfer(ALICE, POOL, USER_FUNDING - 1).unwrap();
    assert_eq!(receipt.kind, TransferKind::Sell);
    assert_eq!(receipt.fee, (USER_FUNDING - 1) * 500 / 10_000);
    assert_eq!(token.balance_of(&ALICE), 0);
}

#[test]
fn mint_to_null_rejected() {
    let mut token = with_minter();
    assert_eq!(
        token.bridge_mint(MINTER, Address::ZERO, 1),
        Err(TokenError::InvalidAddress)
    );
}

#[test]
fn replacing_minter_revokes_previous() {
    let mut token = with_minter();
    let next = Address::repeat_byte(0xb2);
    token.set_bridge_minter(OWNER, next).unwrap();

    assert_eq!(
        token.bridge_mint(MINTER, BOB, 1),
        Err(TokenError::UnauthorizedBridgeCaller { caller: MINTER })
    );
    token.bridge_mint(next, BOB, 1).unwrap();
    assert_eq!(
        token.drain_events()[0],
        TokenEvent::BridgeMinterUpdated { minter: next }
    );
}
