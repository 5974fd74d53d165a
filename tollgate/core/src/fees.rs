// Copyright (c) 2024 The Botho Foundation

//! Fee arithmetic and policy bounds.
//!
//! All rates are in basis points over [`BPS_DENOMINATOR`]. Division floors,
//! so the fee never exceeds the exact share and `fee + net == amount` always
//! holds.

use serde::Serialize;

use crate::error::TokenError;
use crate::units::{balance_serde, Balance, FeeRateBps};

/// Basis point denominator: 10_000 bps = 100.00%
pub const BPS_DENOMINATOR: Balance = 10_000;

/// Lowest buy or sell fee an owner may configure (1%).
pub const MIN_FEE_BPS: FeeRateBps = 100;
/// Highest buy or sell fee an owner may configure (10%).
pub const MAX_FEE_BPS: FeeRateBps = 1_000;

/// Lowest max-sell share of total supply (0.5%).
pub const MIN_MAX_SELL_BPS: FeeRateBps = 50;
/// Highest max-sell share of total supply (10%).
pub const MAX_MAX_SELL_BPS: FeeRateBps = 1_000;

pub const DEFAULT_BUY_FEE_BPS: FeeRateBps = 300;
pub const DEFAULT_SELL_FEE_BPS: FeeRateBps = 500;
pub const DEFAULT_MAX_SELL_BPS: FeeRateBps = 200;

/// Result of splitting a transfer amount into fee and net legs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FeeSplit {
    /// Amount diverted to the fee receiver
    #[serde(with = "balance_serde")]
    pub fee: Balance,

    /// Amount delivered to the recipient
    #[serde(with = "balance_serde")]
    pub net: Balance,
}

impl FeeSplit {
    /// A split with no fee taken.
    pub const fn untaxed(amount: Balance) -> Self {
        Self {
            fee: 0,
            net: amount,
        }
    }

    /// The gross amount (`fee + net`).
    pub fn gross(&self) -> Balance {
        self.fee + self.net
    }
}

// floor(a*b / d) without forming a*b: (a/d)*b + (a%d)*b/d.
// Only overflows when the result itself does not fit, or when (a%d)*b does.
#[inline]
pub fn mul_div(a: Balance, b: Balance, d: Balance) -> Result<Balance, TokenError> {
    let (whole, rem) = a
        .checked_div(d)
        .zip(a.checked_rem(d))
        .ok_or(TokenError::ArithmeticOverflow)?;
    let high = whole.checked_mul(b);
    let low = rem.checked_mul(b).map(|p| p / d);
    high.zip(low)
        .and_then(|(high, low)| high.checked_add(low))
        .ok_or(TokenError::ArithmeticOverflow)
}

/// `amount * bps / 10_000`, floored.
#[inline]
pub fn bps_of(amount: Balance, bps: FeeRateBps) -> Result<Balance, TokenError> {
    mul_div(amount, bps as Balance, BPS_DENOMINATOR)
}

/// Split `amount` at `rate_bps`.
pub fn calculate_fee(amount: Balance, rate_bps: FeeRateBps) -> Result<FeeSplit, TokenError> {
    let fee = bps_of(amount, rate_bps)?;
    // fee <= amount whenever rate_bps <= 10_000
    let net = amount
        .checked_sub(fee)
        .ok_or(TokenError::ArithmeticOverflow)?;
    Ok(FeeSplit { fee, net })
}

pub fn fee_in_bounds(bps: FeeRateBps) -> bool {
    (MIN_FEE_BPS..=MAX_FEE_BPS).contains(&bps)
}

pub fn max_sell_in_bounds(bps: FeeRateBps) -> bool {
    (MIN_MAX_SELL_BPS..=MAX_MAX_SELL_BPS).contains(&bps)
}
