// Copyright (c) 2024 The Botho Foundation

//! Token configuration types.

use displaydoc::Display;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::address::Address;
use crate::chain::ETHEREUM_MAINNET_CHAIN_ID;
use crate::error::TokenError;
use crate::fees::{DEFAULT_BUY_FEE_BPS, DEFAULT_MAX_SELL_BPS, DEFAULT_SELL_FEE_BPS};
use crate::registry::PolicyRegistry;
use crate::units::{Balance, FeeRateBps};

/// Genesis configuration of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Token metadata and supply
    pub token: TokenSettings,

    /// Privileged accounts
    pub accounts: AccountSettings,

    /// Initial transfer policy
    #[serde(default)]
    pub policy: PolicySettings,

    /// Bridge minting settings
    #[serde(default)]
    pub bridge: BridgeSettings,
}

/// Token metadata and supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSettings {
    /// Display name
    pub name: String,

    /// Ticker symbol
    pub symbol: String,

    /// Number of decimals in one whole token
    #[serde(default = "default_decimals")]
    pub decimals: u8,

    /// Initial supply in whole tokens, minted to the owner
    #[serde(default = "default_initial_supply")]
    pub initial_supply: u64,

    /// The token's own address
    pub address: Address,
}

/// Privileged accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSettings {
    /// Owner; receives the initial supply
    pub owner: Address,

    /// Receives every buy and sell fee
    pub fee_receiver: Address,
}

/// Initial transfer policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySettings {
    /// Fee on buys from a liquidity pool, in basis points (100 = 1%)
    #[serde(default = "default_buy_fee_bps")]
    pub buy_fee_bps: FeeRateBps,

    /// Fee on sells into a liquidity pool, in basis points
    #[serde(default = "default_sell_fee_bps")]
    pub sell_fee_bps: FeeRateBps,

    /// Largest single sell as a share of total supply, in basis points
    #[serde(default = "default_max_sell_bps")]
    pub max_sell_percent_bps: FeeRateBps,

    /// Open liquidity pools from genesis
    #[serde(default)]
    pub trading_enabled: bool,
}

/// Bridge minting settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeSettings {
    /// The only chain on which bridge minting is allowed
    #[serde(default = "default_canonical_chain_id")]
    pub canonical_chain_id: u64,

    /// Bridge minter, if known at genesis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minter: Option<Address>,
}

fn default_decimals() -> u8 {
    18
}

fn default_initial_supply() -> u64 {
    1_000_000_000 // 1B tokens
}

fn default_buy_fee_bps() -> FeeRateBps {
    DEFAULT_BUY_FEE_BPS
}

fn default_sell_fee_bps() -> FeeRateBps {
    DEFAULT_SELL_FEE_BPS
}

fn default_max_sell_bps() -> FeeRateBps {
    DEFAULT_MAX_SELL_BPS
}

fn default_canonical_chain_id() -> u64 {
    ETHEREUM_MAINNET_CHAIN_ID
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            buy_fee_bps: default_buy_fee_bps(),
            sell_fee_bps: default_sell_fee_bps(),
            max_sell_percent_bps: default_max_sell_bps(),
            trading_enabled: false,
        }
    }
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            canonical_chain_id: default_canonical_chain_id(),
            minter: None,
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            token: TokenSettings {
                name: "Tollgate".to_string(),
                symbol: "TOLL".to_string(),
                decimals: default_decimals(),
                initial_supply: default_initial_supply(),
                address: Address::repeat_byte(0x70),
            },
            accounts: AccountSettings {
                owner: Address::repeat_byte(0x11),
                fee_receiver: Address::repeat_byte(0xfe),
            },
            policy: PolicySettings::default(),
            bridge: BridgeSettings::default(),
        }
    }
}

/// Errors loading or validating a configuration.
#[derive(Debug, Display, Error)]
pub enum ConfigError {
    /// Failed to read config {path}: {source}
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse config: {0}
    Parse(#[from] toml::de::Error),

    /// Invalid config: {0}
    Invalid(#[from] TokenError),
}

impl TokenConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: TokenConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration against the same rules the owner setters
    /// enforce at runtime.
    pub fn validate(&self) -> Result<(), TokenError> {
        if self.token.address.is_zero() || self.accounts.owner.is_zero() {
            return Err(TokenError::InvalidAddress);
        }
        PolicyRegistry::from_settings(&self.policy, self.accounts.fee_receiver, self.bridge.minter)?;
        self.initial_supply_base_units()?;
        Ok(())
    }

    /// Initial supply scaled to base units.
    pub fn initial_supply_base_units(&self) -> Result<Balance, TokenError> {
        (10 as Balance)
            .checked_pow(self.token.decimals as u32)
            .and_then(|unit| unit.checked_mul(self.token.initial_supply as Balance))
            .ok_or(TokenError::ArithmeticOverflow)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    const MINIMAL: &str = r#"
        [token]
        name = "Tollgate"
        symbol = "TOLL"
        address = "0x7070707070707070707070707070707070707070"

        [accounts]
        owner = "0x1111111111111111111111111111111111111111"
        fee_receiver = "0xfefefefefefefefefefefefefefefefefefefefe"
    "#;

    #[test]
    fn test_default_config() {
        let config = TokenConfig::default();
        assert_eq!(config.policy.buy_fee_bps, 300);
        assert_eq!(config.policy.sell_fee_bps, 500);
        assert_eq!(config.policy.max_sell_percent_bps, 200);
        assert!(!config.policy.trading_enabled);
        assert_eq!(config.bridge.canonical_chain_id, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_file_uses_defaults() {
        let config = TokenConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.token.decimals, 18);
        assert_eq!(config.policy, PolicySettings::default());
        assert_eq!(config.bridge, BridgeSettings::default());
        assert_eq!(
            config.initial_supply_base_units().unwrap(),
            1_000_000_000 * 10u128.pow(18)
        );
    }

    #[test]
    fn test_out_of_bounds_policy_rejected() {
        let content = format!("{MINIMAL}\n[policy]\nsell_fee_bps = 1001\n");
        assert_matches!(
            TokenConfig::from_toml_str(&content),
            Err(ConfigError::Invalid(TokenError::FeeOutOfBounds { sell: 1_001, .. }))
        );
    }

    #[test]
    fn test_null_accounts_rejected() {
        let mut config = TokenConfig::default();
        config.accounts.fee_receiver = Address::ZERO;
        assert_eq!(config.validate(), Err(TokenError::InvalidAddress));

        let mut config = TokenConfig::default();
        config.accounts.owner = Address::ZERO;
        assert_eq!(config.validate(), Err(TokenError::InvalidAddress));
    }

    #[test]
    fn test_supply_overflow_rejected() {
        let mut config = TokenConfig::default();
        config.token.decimals = 40;
        assert_eq!(config.validate(), Err(TokenError::ArithmeticOverflow));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = TokenConfig::from_file(file.path()).unwrap();
        assert_eq!(config.token.symbol, "TOLL");

        assert_matches!(
            TokenConfig::from_file("/nonexistent/tollgate.toml"),
            Err(ConfigError::Io { .. })
        );
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = TokenConfig {
            bridge: BridgeSettings {
                canonical_chain_id: 8453,
                minter: Some(Address::repeat_byte(0xb1)),
            },
            ..TokenConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(TokenConfig::from_toml_str(&text).unwrap(), config);
    }
}
