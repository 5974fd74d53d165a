// Copyright (c) 2024 The Botho Foundation

//! Core types and logic for the Tollgate policy token.
//!
//! Tollgate is a single fungible token whose transfers pass through a fixed
//! policy pipeline before any balance moves:
//!
//! - Blacklist enforcement on both sides of a transfer
//! - A trading window that keeps liquidity pools closed until launch
//! - A maximum sell size, expressed as a share of total supply
//! - Per-direction (buy / sell) fees siphoned to a single fee receiver
//!
//! A privileged bridge minter may additionally mint new supply, but only on
//! the canonical chain.
//!
//! ## Layout
//!
//! | Module          | Responsibility                                       |
//! |-----------------|------------------------------------------------------|
//! | `registry`      | Owner-tunable policy knobs with validated bounds     |
//! | `membership`    | Whitelist and blacklist flags                        |
//! | `classifier`    | Derived "is this a liquidity pool" classification    |
//! | `interceptor`   | The transfer pipeline and its atomic two-leg commit  |
//! | `bridge`        | Bridge minter gate                                   |
//! | `ledger`, `authorization`, `chain` | Collaborator traits and in-memory implementations |
//! | `token`         | The facade that owns all state                       |
//!
//! Every public operation on [`PolicyToken`] takes `&mut self` and either
//! completes or fails with no side effects, including on the event stream.

pub mod address;
pub mod authorization;
pub mod bridge;
pub mod chain;
pub mod classifier;
pub mod config;
pub mod error;
pub mod events;
pub mod fees;
pub mod interceptor;
pub mod ledger;
pub mod membership;
pub mod registry;
pub mod token;
pub mod units;

pub use address::{Address, AddressParseError};
pub use authorization::{Authorization, SingleOwner};
pub use bridge::BridgeMintGate;
pub use chain::{ChainEnv, SimulatedChain, ETHEREUM_MAINNET_CHAIN_ID};
pub use classifier::AddressClassifier;
pub use config::{ConfigError, TokenConfig};
pub use error::{ErrorCategory, ErrorKind, TokenError};
pub use events::{EventBuffer, TokenEvent};
pub use fees::{calculate_fee, FeeSplit};
pub use interceptor::{TransferInterceptor, TransferKind, TransferReceipt};
pub use ledger::{InMemoryLedger, Ledger};
pub use membership::{AccountFlags, MembershipLists};
pub use registry::PolicyRegistry;
pub use token::{PolicyToken, TokenMetadata};
pub use units::{Balance, FeeRateBps};
