// Copyright (c) 2024 The Botho Foundation

//! The transfer pipeline.
//!
//! Every balance change goes through [`TransferInterceptor::execute`]:
//!
//! 1. Blacklist check on both parties
//! 2. Trading window: pools are closed until trading is enabled
//! 3. Sell limit: a single sell into a pool may not exceed the cap
//! 4. Fee split: buy rate when a pool sends, sell rate when a pool receives
//! 5. Ledger mutation: fee leg to the fee receiver, then net leg
//!
//! Stages 1-4 are pure ([`TransferInterceptor::plan`]). Stage 5 is atomic:
//! if the net leg fails after the fee leg was applied, the fee leg is
//! reversed before the error is returned.
//!
//! Mints (null `from`) and burns (null `to`) pass through the same pipeline
//! but are never gated by the trading window and never taxed.

use serde::Serialize;
use tracing::{debug, warn};

use crate::address::Address;
use crate::chain::ChainEnv;
use crate::classifier::AddressClassifier;
use crate::error::TokenError;
use crate::events::{EventBuffer, TokenEvent};
use crate::fees::{calculate_fee, FeeSplit};
use crate::ledger::Ledger;
use crate::membership::MembershipLists;
use crate::registry::PolicyRegistry;
use crate::units::{balance_serde, Balance, FeeRateBps};

/// How a transfer was classified for fee purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferKind {
    /// New supply; `from` is null
    Mint,
    /// Destroyed supply; `to` is null
    Burn,
    /// A whitelisted party is involved
    Exempt,
    /// A liquidity pool is sending
    Buy,
    /// A liquidity pool is receiving
    Sell,
    /// Neither side is a pool
    PeerToPeer,
}

impl std::fmt::Display for TransferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferKind::Mint => write!(f, "mint"),
            TransferKind::Burn => write!(f, "burn"),
            TransferKind::Exempt => write!(f, "exempt"),
            TransferKind::Buy => write!(f, "buy"),
            TransferKind::Sell => write!(f, "sell"),
            TransferKind::PeerToPeer => write!(f, "peer_to_peer"),
        }
    }
}

/// Outcome of a transfer that passed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TransferReceipt {
    pub from: Address,
    pub to: Address,
    pub kind: TransferKind,
    pub fee_rate_bps: FeeRateBps,
    #[serde(with = "balance_serde")]
    pub fee: Balance,
    #[serde(with = "balance_serde")]
    pub net: Balance,
}

impl TransferReceipt {
    pub fn value(&self) -> Balance {
        self.split().gross()
    }

    pub fn split(&self) -> FeeSplit {
        FeeSplit {
            fee: self.fee,
            net: self.net,
        }
    }
}

/// Read-only view over the policy state that validates and executes
/// transfers.
pub struct TransferInterceptor<'a, C: ChainEnv + ?Sized> {
    policy: &'a PolicyRegistry,
    classifier: AddressClassifier<'a, C>,
}

impl<'a, C: ChainEnv + ?Sized> TransferInterceptor<'a, C> {
    pub fn new(
        policy: &'a PolicyRegistry,
        membership: &'a MembershipLists,
        chain: &'a C,
        token_address: Address,
    ) -> Self {
        Self {
            policy,
            classifier: AddressClassifier::new(chain, membership, token_address),
        }
    }

    /// Validate a transfer and compute its fee split without touching any
    /// state.
    pub fn plan(
        &self,
        from: Address,
        to: Address,
        value: Balance,
        total_supply: Balance,
    ) -> Result<TransferReceipt, TokenError> {
        self.check_blacklist(&from, &to)?;
        self.check_trading_window(&from, &to)?;
        self.check_sell_limit(&from, &to, value, total_supply)?;
        self.split_fee(from, to, value)
    }

    /// Validate a transfer and apply it to `ledger`.
    ///
    /// On success the `Transfer` notifications for each applied leg are
    /// pushed to `events`. On failure the ledger is unchanged.
    pub fn execute<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        from: Address,
        to: Address,
        value: Balance,
        events: &mut EventBuffer,
    ) -> Result<TransferReceipt, TokenError> {
        let receipt = self
            .plan(from, to, value, ledger.total_supply())
            .inspect_err(|err| warn!(%from, %to, value, "Transfer rejected: {}", err))?;

        debug!(
            %from,
            %to,
            kind = %receipt.kind,
            fee = receipt.fee,
            net = receipt.net,
            "Applying transfer"
        );
        self.apply(ledger, &receipt, events)?;
        Ok(receipt)
    }

    fn check_blacklist(&self, from: &Address, to: &Address) -> Result<(), TokenError> {
        if !from.is_zero() && self.classifier.is_blacklisted(from) {
            return Err(TokenError::SenderBlacklisted(*from));
        }
        if !to.is_zero() && self.classifier.is_blacklisted(to) {
            return Err(TokenError::RecipientBlacklisted(*to));
        }
        Ok(())
    }

    fn check_trading_window(&self, from: &Address, to: &Address) -> Result<(), TokenError> {
        if self.policy.trading_enabled() || from.is_zero() || to.is_zero() {
            return Ok(());
        }
        if self.classifier.is_liquidity_pool(to) || self.classifier.is_liquidity_pool(from) {
            return Err(TokenError::TradingNotEnabled {
                from: *from,
                to: *to,
            });
        }
        Ok(())
    }

    fn check_sell_limit(
        &self,
        from: &Address,
        to: &Address,
        value: Balance,
        total_supply: Balance,
    ) -> Result<(), TokenError> {
        if from.is_zero()
            || !self.classifier.is_liquidity_pool(to)
            || self.classifier.is_whitelisted(from)
        {
            return Ok(());
        }
        let limit = self.policy.max_sell_amount(total_supply)?;
        if value > limit {
            return Err(TokenError::SellAmountExceedsLimit { value, limit });
        }
        Ok(())
    }

    fn split_fee(
        &self,
        from: Address,
        to: Address,
        value: Balance,
    ) -> Result<TransferReceipt, TokenError> {
        let receipt = |kind, fee_rate_bps, split: FeeSplit| TransferReceipt {
            from,
            to,
            kind,
            fee_rate_bps,
            fee: split.fee,
            net: split.net,
        };
        let untaxed = |kind| receipt(kind, 0, FeeSplit::untaxed(value));

        if from.is_zero() {
            return Ok(untaxed(TransferKind::Mint));
        }
        if to.is_zero() {
            return Ok(untaxed(TransferKind::Burn));
        }
        if self.classifier.is_whitelisted(&from) || self.classifier.is_whitelisted(&to) {
            return Ok(untaxed(TransferKind::Exempt));
        }

        let (kind, rate) = if self.classifier.is_liquidity_pool(&from) {
            (TransferKind::Buy, self.policy.buy_fee_bps())
        } else if self.classifier.is_liquidity_pool(&to) {
            (TransferKind::Sell, self.policy.sell_fee_bps())
        } else {
            (TransferKind::PeerToPeer, 0)
        };

        Ok(receipt(kind, rate, calculate_fee(value, rate)?))
    }

    fn apply<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        receipt: &TransferReceipt,
        events: &mut EventBuffer,
    ) -> Result<(), TokenError> {
        let TransferReceipt {
            from, to, fee, net, ..
        } = *receipt;
        let fee_receiver = self.policy.fee_receiver();

        // A fee is only ever charged between two non-null parties
        if fee > 0 {
            ledger.move_balance(&from, &fee_receiver, fee)?;
        }

        let net_leg = if from.is_zero() {
            ledger.mint(&to, net)
        } else if to.is_zero() {
            ledger.burn(&from, net)
        } else {
            ledger.move_balance(&from, &to, net)
        };

        if let Err(err) = net_leg {
            if fee > 0 {
                warn!(%from, fee, "Net leg failed, reversing fee leg: {}", err);
                // The net leg error is what the caller sees either way
                if let Err(reversal) = ledger.move_balance(&fee_receiver, &from, fee) {
                    warn!(%fee_receiver, %from, fee, "Fee leg reversal failed: {}", reversal);
                }
            }
            return Err(err);
        }

        if fee > 0 {
            events.push(TokenEvent::Transfer {
                from,
                to: fee_receiver,
                value: fee,
            });
        }
        events.push(TokenEvent::Transfer {
            from,
            to,
            value: net,
        });
        Ok(())
    }
}
