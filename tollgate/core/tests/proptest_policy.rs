// Copyright (c) 2024 The Botho Foundation
//
//! Property-based tests for fee arithmetic and membership rules.

mod common;

use common::*;
use proptest::prelude::*;
use tollgate_core::fees::{BPS_DENOMINATOR, MAX_FEE_BPS, MIN_FEE_BPS};
use tollgate_core::{calculate_fee, Address, TransferKind};

fn fee_rate() -> impl Strategy<Value = u16> {
    MIN_FEE_BPS..=MAX_FEE_BPS
}

// ============================================================================
// Fee arithmetic
// ============================================================================

proptest! {
    /// Property: the fee split never loses or creates value, and the fee is
    /// the floor of `amount * rate / 10_000`.
    #[test]
    fn prop_fee_split_is_exact(
        amount in 0u128..=(u128::MAX / BPS_DENOMINATOR),
        rate in 0u16..=10_000,
    ) {
        let split = calculate_fee(amount, rate).unwrap();
        prop_assert_eq!(split.fee + split.net, amount);
        prop_assert_eq!(split.fee, amount * rate as u128 / BPS_DENOMINATOR);
    }

    /// Property: splitting never overflows for any amount at a rate of at
    /// most 100%.
    #[test]
    fn prop_fee_split_total_for_any_amount(
        amount in any::<u128>(),
        rate in 0u16..=10_000,
    ) {
        let split = calculate_fee(amount, rate).unwrap();
        prop_assert_eq!(split.gross(), amount);
        prop_assert!(split.fee <= amount);
    }

    /// Property: quoting a buy or sell uses the currently configured rate.
    #[test]
    fn prop_quotes_follow_configured_rates(
        buy in fee_rate(),
        sell in fee_rate(),
        amount in 0u128..1_000_000_000_000,
    ) {
        let mut token = launched();
        token.set_fees(OWNER, buy, sell).unwrap();

        let buy_split = token.calculate_fee(amount, true).unwrap();
        let sell_split = token.calculate_fee(amount, false).unwrap();
        prop_assert_eq!(buy_split, calculate_fee(amount, buy).unwrap());
        prop_assert_eq!(sell_split, calculate_fee(amount, sell).unwrap());
    }
}

// ============================================================================
// Whitelist exemption
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: a transfer with a whitelisted party is never taxed, for
    /// any value and any fee configuration.
    #[test]
    fn prop_whitelisted_pair_untaxed(
        buy in fee_rate(),
        sell in fee_rate(),
        value in 0u128..=USER_FUNDING,
        into_pool in any::<bool>(),
    ) {
        let mut token = launched();
        token.set_fees(OWNER, buy, sell).unwrap();
        token.add_to_whitelist(OWNER, ALICE).unwrap();

        let to = if into_pool { POOL } else { BOB };
        let receipt = token.transfer(ALICE, to, value).unwrap();

        prop_assert_eq!(receipt.kind, TransferKind::Exempt);
        prop_assert_eq!(receipt.fee, 0);
        prop_assert_eq!(receipt.net, value);
    }

    /// Property: a taxed sell moves exactly `value` out of the seller and
    /// conserves total supply.
    #[test]
    fn prop_taxed_sell_conserves_supply(
        sell in fee_rate(),
        value in 0u128..=MAX_SELL,
    ) {
        let mut token = launched();
        token.set_fees(OWNER, MIN_FEE_BPS, sell).unwrap();

        let receipt = token.transfer(ALICE, POOL, value).unwrap();

        prop_assert_eq!(token.balance_of(&ALICE), USER_FUNDING - value);
        prop_assert_eq!(token.balance_of(&FEE_RECEIVER), receipt.fee);
        prop_assert_eq!(token.balance_of(&POOL), POOL_FUNDING + receipt.net);
        prop_assert_eq!(token.total_supply(), SUPPLY);
    }
}

// ============================================================================
// Membership
// ============================================================================

proptest! {
    /// Property: whitelisting twice leaves the same membership state as
    /// whitelisting once, whatever the account's prior flags.
    #[test]
    fn prop_whitelist_idempotent(
        byte in 1u8..=255,
        blacklisted in any::<bool>(),
    ) {
        let account = Address::repeat_byte(byte);
        let mut token = launched();
        token.set_blacklist(OWNER, account, blacklisted).unwrap();

        token.add_to_whitelist(OWNER, account).unwrap();
        let once = token.membership().clone();
        token.add_to_whitelist(OWNER, account).unwrap();

        prop_assert_eq!(token.membership(), &once);
        prop_assert!(token.is_whitelisted(&account));
        prop_assert!(!token.is_blacklisted(&account));
    }
}
