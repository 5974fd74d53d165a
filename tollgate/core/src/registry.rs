// Copyright (c) 2024 The Botho Foundation

//! Policy registry: the owner-tunable knobs of the transfer pipeline.
//!
//! The registry only validates and stores. Owner gating and notifications
//! live on [`crate::PolicyToken`], which is the single writer.

use serde::Serialize;

use crate::address::Address;
use crate::config::PolicySettings;
use crate::error::TokenError;
use crate::fees::{
    bps_of, calculate_fee, fee_in_bounds, max_sell_in_bounds, FeeSplit, DEFAULT_BUY_FEE_BPS,
    DEFAULT_MAX_SELL_BPS, DEFAULT_SELL_FEE_BPS,
};
use crate::units::{Balance, FeeRateBps};

/// Current policy configuration.
///
/// Invariant: every stored rate is within its declared bounds and
/// `fee_receiver` is never the null address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PolicyRegistry {
    buy_fee_bps: FeeRateBps,
    sell_fee_bps: FeeRateBps,
    max_sell_percent_bps: FeeRateBps,
    trading_enabled: bool,
    fee_receiver: Address,
    bridge_minter: Option<Address>,
}

impl PolicyRegistry {
    /// Create a registry with default rates and trading disabled.
    pub fn new(fee_receiver: Address) -> Result<Self, TokenError> {
        if fee_receiver.is_zero() {
            return Err(TokenError::InvalidAddress);
        }
        Ok(Self {
            buy_fee_bps: DEFAULT_BUY_FEE_BPS,
            sell_fee_bps: DEFAULT_SELL_FEE_BPS,
            max_sell_percent_bps: DEFAULT_MAX_SELL_BPS,
            trading_enabled: false,
            fee_receiver,
            bridge_minter: None,
        })
    }

    /// Create a registry from configured settings, applying the same
    /// validation as the owner setters.
    pub fn from_settings(
        settings: &PolicySettings,
        fee_receiver: Address,
        bridge_minter: Option<Address>,
    ) -> Result<Self, TokenError> {
        let mut registry = Self::new(fee_receiver)?;
        registry.set_fees(settings.buy_fee_bps, settings.sell_fee_bps)?;
        registry.set_max_sell_percent(settings.max_sell_percent_bps)?;
        registry.set_trading(settings.trading_enabled);
        if let Some(minter) = bridge_minter {
            registry.set_bridge_minter(minter)?;
        }
        Ok(registry)
    }

    pub fn buy_fee_bps(&self) -> FeeRateBps {
        self.buy_fee_bps
    }

    pub fn sell_fee_bps(&self) -> FeeRateBps {
        self.sell_fee_bps
    }

    pub fn max_sell_percent_bps(&self) -> FeeRateBps {
        self.max_sell_percent_bps
    }

    pub fn trading_enabled(&self) -> bool {
        self.trading_enabled
    }

    pub fn fee_receiver(&self) -> Address {
        self.fee_receiver
    }

    pub fn bridge_minter(&self) -> Option<Address> {
        self.bridge_minter
    }

    /// Set both fees. Nothing is stored unless both are in bounds.
    pub fn set_fees(&mut self, buy: FeeRateBps, sell: FeeRateBps) -> Result<(), TokenError> {
        if !fee_in_bounds(buy) || !fee_in_bounds(sell) {
            return Err(TokenError::FeeOutOfBounds { buy, sell });
        }
        self.buy_fee_bps = buy;
        self.sell_fee_bps = sell;
        Ok(())
    }

    pub fn set_max_sell_percent(&mut self, pct: FeeRateBps) -> Result<(), TokenError> {
        if !max_sell_in_bounds(pct) {
            return Err(TokenError::PercentOutOfBounds { value: pct });
        }
        self.max_sell_percent_bps = pct;
        Ok(())
    }

    pub fn set_trading(&mut self, enabled: bool) {
        self.trading_enabled = enabled;
    }

    pub fn set_fee_receiver(&mut self, receiver: Address) -> Result<(), TokenError> {
        if receiver.is_zero() {
            return Err(TokenError::InvalidAddress);
        }
        self.fee_receiver = receiver;
        Ok(())
    }

    pub fn set_bridge_minter(&mut self, minter: Address) -> Result<(), TokenError> {
        if minter.is_zero() {
            return Err(TokenError::InvalidAddress);
        }
        self.bridge_minter = Some(minter);
        Ok(())
    }

    /// The rate that applies to a buy (`true`) or a sell (`false`).
    pub fn fee_rate(&self, is_buy: bool) -> FeeRateBps {
        if is_buy {
            self.buy_fee_bps
        } else {
            self.sell_fee_bps
        }
    }

    /// Quote the fee split for a buy or sell of `amount`.
    pub fn calculate_fee(&self, amount: Balance, is_buy: bool) -> Result<FeeSplit, TokenError> {
        calculate_fee(amount, self.fee_rate(is_buy))
    }

    /// Largest single sell allowed against `total_supply`.
    pub fn max_sell_amount(&self, total_supply: Balance) -> Result<Balance, TokenError> {
        bps_of(total_supply, self.max_sell_percent_bps)
    }
}
