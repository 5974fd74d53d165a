// Copyright (c) 2024 The Botho Foundation

//! Amount and rate units.

/// Token amount in base units.
pub type Balance = u128;

/// A rate in basis points (10_000 bps = 100%).
pub type FeeRateBps = u16;

/// Serde for balances.
///
/// Balances are written as decimal strings so they survive formats without
/// 128-bit integers (TOML, JSON consumers in other languages). Reading also
/// accepts plain integers, and underscores as digit separators.
pub mod balance_serde {
    use super::Balance;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(value: &Balance, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Balance, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(BalanceVisitor)
    }

    struct BalanceVisitor;

    impl<'de> Visitor<'de> for BalanceVisitor {
        type Value = Balance;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a non-negative integer or a decimal string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Balance, E> {
            Ok(v as Balance)
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<Balance, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Balance, E> {
            u64::try_from(v)
                .map(|v| v as Balance)
                .map_err(|_| E::custom(format!("balance cannot be negative: {v}")))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Balance, E> {
            super::parse_balance(v).ok_or_else(|| E::custom(format!("invalid balance: {v:?}")))
        }
    }
}

/// Parse a decimal balance, allowing `_` separators.
pub fn parse_balance(s: &str) -> Option<Balance> {
    let digits: String = s.trim().chars().filter(|c| *c != '_').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
