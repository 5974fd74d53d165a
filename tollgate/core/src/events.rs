// Copyright (c) 2024 The Botho Foundation

//! Notifications emitted by token operations.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::units::{balance_serde, Balance, FeeRateBps};

/// A notification for external observers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TokenEvent {
    /// Balance moved. `from` is null for mints, `to` is null for burns.
    Transfer {
        from: Address,
        to: Address,
        #[serde(with = "balance_serde")]
        value: Balance,
    },

    FeeUpdated {
        buy_fee_bps: FeeRateBps,
        sell_fee_bps: FeeRateBps,
    },

    WhitelistUpdated {
        account: Address,
        whitelisted: bool,
    },

    BlacklistUpdated {
        account: Address,
        blacklisted: bool,
    },

    TradingUpdated {
        enabled: bool,
    },

    MaxSellPercentUpdated {
        max_sell_percent_bps: FeeRateBps,
    },

    BridgeMinterUpdated {
        minter: Address,
    },

    BridgeMint {
        to: Address,
        #[serde(with = "balance_serde")]
        amount: Balance,
    },

    OwnershipTransferred {
        previous_owner: Option<Address>,
        new_owner: Option<Address>,
    },
}

impl TokenEvent {
    /// Short snake_case name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            TokenEvent::Transfer { .. } => "transfer",
            TokenEvent::FeeUpdated { .. } => "fee_updated",
            TokenEvent::WhitelistUpdated { .. } => "whitelist_updated",
            TokenEvent::BlacklistUpdated { .. } => "blacklist_updated",
            TokenEvent::TradingUpdated { .. } => "trading_updated",
            TokenEvent::MaxSellPercentUpdated { .. } => "max_sell_percent_updated",
            TokenEvent::BridgeMinterUpdated { .. } => "bridge_minter_updated",
            TokenEvent::BridgeMint { .. } => "bridge_mint",
            TokenEvent::OwnershipTransferred { .. } => "ownership_transferred",
        }
    }
}

/// Events staged by a single operation.
///
/// An operation pushes into its own buffer and hands it to the token only
/// after every step succeeded; a failed operation drops the buffer, so
/// observers never see notifications for effects that were rolled back.
#[derive(Debug, Default)]
pub struct EventBuffer {
    staged: Vec<TokenEvent>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: TokenEvent) {
        self.staged.push(event);
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenEvent> {
        self.staged.iter()
    }

    pub fn into_events(self) -> Vec<TokenEvent> {
        self.staged
    }
}
