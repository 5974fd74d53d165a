// Copyright (c) 2024 The Botho Foundation

//! Balance bookkeeping.
//!
//! The policy layer never touches balances directly; it drives a [`Ledger`].
//! [`InMemoryLedger`] is the reference implementation used by the simulator
//! and tests.

use std::collections::HashMap;

use crate::address::Address;
use crate::error::TokenError;
use crate::units::Balance;

/// The balance-keeping primitives the token relies on.
///
/// Each method either applies completely or fails without effect.
pub trait Ledger {
    fn total_supply(&self) -> Balance;

    fn balance_of(&self, account: &Address) -> Balance;

    /// Create `amount` new units at `to`.
    fn mint(&mut self, to: &Address, amount: Balance) -> Result<(), TokenError>;

    /// Destroy `amount` units held by `from`.
    fn burn(&mut self, from: &Address, amount: Balance) -> Result<(), TokenError>;

    /// Move `amount` from `from` to `to`.
    ///
    /// Must not fail on the credit side: a null party or a short `from`
    /// balance are the only errors. The interceptor relies on this to
    /// reverse a fee leg back into the payer.
    fn move_balance(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Balance,
    ) -> Result<(), TokenError>;
}

/// Hash-map backed ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InMemoryLedger {
    balances: HashMap<Address, Balance>,
    total_supply: Balance,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accounts with a non-zero balance.
    #[cfg(test)]
    fn holders(&self) -> usize {
        self.balances.len()
    }

    fn set_balance(&mut self, account: Address, balance: Balance) {
        if balance == 0 {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, balance);
        }
    }

    fn debit(&self, account: &Address, amount: Balance) -> Result<Balance, TokenError> {
        let available = self.balance_of(account);
        available
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                account: *account,
                available,
                requested: amount,
            })
    }
}

impl Ledger for InMemoryLedger {
    fn total_supply(&self) -> Balance {
        self.total_supply
    }

    fn balance_of(&self, account: &Address) -> Balance {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn mint(&mut self, to: &Address, amount: Balance) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::InvalidAddress);
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::ArithmeticOverflow)?;
        // Bounded by supply, so this cannot overflow
        let balance = self.balance_of(to) + amount;

        self.total_supply = supply;
        self.set_balance(*to, balance);
        Ok(())
    }

    fn burn(&mut self, from: &Address, amount: Balance) -> Result<(), TokenError> {
        if from.is_zero() {
            return Err(TokenError::InvalidAddress);
        }
        let remaining = self.debit(from, amount)?;

        self.total_supply -= amount;
        self.set_balance(*from, remaining);
        Ok(())
    }

    fn move_balance(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Balance,
    ) -> Result<(), TokenError> {
        if from.is_zero() || to.is_zero() {
            return Err(TokenError::InvalidAddress);
        }
        let remaining = self.debit(from, amount)?;
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::ArithmeticOverflow)?;

        self.set_balance(*from, remaining);
        self.set_balance(*to, credited);
        Ok(())
    }
}
