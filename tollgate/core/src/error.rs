// Copyright (c) 2024 The Botho Foundation

//! Error taxonomy for token operations.
//!
//! Every failure is terminal for the call that produced it: the token facade
//! stages all effects and only commits them once the whole operation has
//! succeeded.

use displaydoc::Display;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::address::Address;
use crate::units::{Balance, FeeRateBps};

/// Errors that can occur in token operations.
#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Caller {caller} is not the owner
    Unauthorized { caller: Address },

    /// The null address is not allowed here
    InvalidAddress,

    /// Fees out of bounds: buy {buy} bps, sell {sell} bps
    FeeOutOfBounds { buy: FeeRateBps, sell: FeeRateBps },

    /// Max sell percent out of bounds: {value} bps
    PercentOutOfBounds { value: FeeRateBps },

    /// Sender {0} is blacklisted
    SenderBlacklisted(Address),

    /// Recipient {0} is blacklisted
    RecipientBlacklisted(Address),

    /// Trading is not enabled: {from} -> {to} touches a liquidity pool
    TradingNotEnabled { from: Address, to: Address },

    /// Sell amount {value} exceeds limit {limit}
    SellAmountExceedsLimit { value: Balance, limit: Balance },

    /// Caller {caller} is not the bridge minter
    UnauthorizedBridgeCaller { caller: Address },

    /// Bridge mint disabled on chain {chain_id}, canonical chain is {canonical_chain_id}
    BridgeMintDisabled {
        chain_id: u64,
        canonical_chain_id: u64,
    },

    /// Insufficient balance for {account}: have {available}, need {requested}
    InsufficientBalance {
        account: Address,
        available: Balance,
        requested: Balance,
    },

    /// Arithmetic overflow
    ArithmeticOverflow,
}

/// Fieldless discriminant of [`TokenError`], for matching on the cause of a
/// failure without caring about the offending values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Unauthorized,
    InvalidAddress,
    FeeOutOfBounds,
    PercentOutOfBounds,
    SenderBlacklisted,
    RecipientBlacklisted,
    TradingNotEnabled,
    SellAmountExceedsLimit,
    UnauthorizedBridgeCaller,
    BridgeMintDisabled,
    InsufficientBalance,
    ArithmeticOverflow,
}

/// Broad class of a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Authorization,
    Validation,
    Policy,
    Bridge,
    Ledger,
}

impl TokenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TokenError::Unauthorized { .. } => ErrorKind::Unauthorized,
            TokenError::InvalidAddress => ErrorKind::InvalidAddress,
            TokenError::FeeOutOfBounds { .. } => ErrorKind::FeeOutOfBounds,
            TokenError::PercentOutOfBounds { .. } => ErrorKind::PercentOutOfBounds,
            TokenError::SenderBlacklisted(_) => ErrorKind::SenderBlacklisted,
            TokenError::RecipientBlacklisted(_) => ErrorKind::RecipientBlacklisted,
            TokenError::TradingNotEnabled { .. } => ErrorKind::TradingNotEnabled,
            TokenError::SellAmountExceedsLimit { .. } => ErrorKind::SellAmountExceedsLimit,
            TokenError::UnauthorizedBridgeCaller { .. } => ErrorKind::UnauthorizedBridgeCaller,
            TokenError::BridgeMintDisabled { .. } => ErrorKind::BridgeMintDisabled,
            TokenError::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            TokenError::ArithmeticOverflow => ErrorKind::ArithmeticOverflow,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind().category()
    }
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::Unauthorized => ErrorCategory::Authorization,
            ErrorKind::InvalidAddress
            | ErrorKind::FeeOutOfBounds
            | ErrorKind::PercentOutOfBounds => ErrorCategory::Validation,
            ErrorKind::SenderBlacklisted
            | ErrorKind::RecipientBlacklisted
            | ErrorKind::TradingNotEnabled
            | ErrorKind::SellAmountExceedsLimit => ErrorCategory::Policy,
            ErrorKind::UnauthorizedBridgeCaller | ErrorKind::BridgeMintDisabled => {
                ErrorCategory::Bridge
            }
            ErrorKind::InsufficientBalance | ErrorKind::ArithmeticOverflow => {
                ErrorCategory::Ledger
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
