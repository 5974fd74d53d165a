// Copyright (c) 2024 The Botho Foundation
//
//! Common fixtures for token integration tests.
//!
//! The fixture token uses zero decimals and a supply of one million so that
//! fee and sell-limit arithmetic can be read straight off the assertions:
//! the default 2% sell cap is 20_000, a 3% buy fee on 10_000 is 300.

#![allow(dead_code)]

use tollgate_core::config::{AccountSettings, TokenSettings};
use tollgate_core::{Address, Balance, PolicyToken, SimulatedChain, TokenConfig};

pub const OWNER: Address = Address::repeat_byte(0x11);
pub const FEE_RECEIVER: Address = Address::repeat_byte(0xfe);
pub const TOKEN: Address = Address::repeat_byte(0x70);
pub const POOL: Address = Address::repeat_byte(0x50);
pub const MULTISIG: Address = Address::repeat_byte(0x5a);
pub const MINTER: Address = Address::repeat_byte(0xb1);
pub const ALICE: Address = Address::repeat_byte(0xa1);
pub const BOB: Address = Address::repeat_byte(0xb0);

pub const SUPPLY: Balance = 1_000_000;
pub const MAX_SELL: Balance = 20_000;
pub const USER_FUNDING: Balance = 100_000;
pub const POOL_FUNDING: Balance = 200_000;

pub const CANONICAL_CHAIN: u64 = 1;

pub fn config() -> TokenConfig {
    TokenConfig {
        token: TokenSettings {
            name: "Tollgate Test".to_string(),
            symbol: "TTT".to_string(),
            decimals: 0,
            initial_supply: SUPPLY as u64,
            address: TOKEN,
        },
        accounts: AccountSettings {
            owner: OWNER,
            fee_receiver: FEE_RECEIVER,
        },
        ..TokenConfig::default()
    }
}

/// A token before launch: a pool contract is deployed, Alice and Bob each
/// hold [`USER_FUNDING`], trading is closed and no events are pending.
pub fn pre_launch() -> PolicyToken {
    let mut chain = SimulatedChain::new(CANONICAL_CHAIN);
    chain.deploy_code(POOL);

    let mut token = PolicyToken::from_config(&config(), chain).unwrap();
    token.transfer(OWNER, ALICE, USER_FUNDING).unwrap();
    token.transfer(OWNER, BOB, USER_FUNDING).unwrap();
    token.drain_events();
    token
}

/// A launched token: as [`pre_launch`], with trading open and the pool
/// seeded with [`POOL_FUNDING`] by the owner.
pub fn launched() -> PolicyToken {
    let mut token = pre_launch();
    token.set_trading(OWNER, true).unwrap();
    token.transfer(OWNER, POOL, POOL_FUNDING).unwrap();
    token.drain_events();
    token
}

/// A launched token with a bridge minter configured.
pub fn with_minter() -> PolicyToken {
    let mut token = launched();
    token.set_bridge_minter(OWNER, MINTER).unwrap();
    token.drain_events();
    token
}
