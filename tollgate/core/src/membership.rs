// Copyright (c) 2024 The Botho Foundation

//! Whitelist and blacklist membership.

use serde::Serialize;
use std::collections::HashMap;

use crate::address::Address;
use crate::error::TokenError;

/// Membership flags of a single account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AccountFlags {
    pub whitelisted: bool,
    pub blacklisted: bool,
}

impl AccountFlags {
    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Whitelist and blacklist sets.
///
/// Whitelisting clears the blacklist flag. Blacklisting does not clear the
/// whitelist flag, so an account can end up carrying both; the transfer
/// pipeline checks the blacklist first, so such an account is still blocked.
///
/// Accounts exist implicitly: an address never referenced reads as all
/// flags false. Only accounts with a raised flag are stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MembershipLists {
    accounts: HashMap<Address, AccountFlags>,
}

impl MembershipLists {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(&self, account: &Address) -> AccountFlags {
        self.accounts.get(account).copied().unwrap_or_default()
    }

    pub fn is_whitelisted(&self, account: &Address) -> bool {
        self.flags(account).whitelisted
    }

    pub fn is_blacklisted(&self, account: &Address) -> bool {
        self.flags(account).blacklisted
    }

    pub fn add_to_whitelist(&mut self, account: Address) {
        self.update(account, |flags| {
            flags.whitelisted = true;
            flags.blacklisted = false;
        });
    }

    pub fn remove_from_whitelist(&mut self, account: Address) {
        self.update(account, |flags| flags.whitelisted = false);
    }

    pub fn set_blacklist(&mut self, account: Address, blacklisted: bool) -> Result<(), TokenError> {
        if account.is_zero() {
            return Err(TokenError::InvalidAddress);
        }
        self.update(account, |flags| flags.blacklisted = blacklisted);
        Ok(())
    }

    /// Whitelisted accounts, sorted.
    pub fn whitelisted(&self) -> Vec<Address> {
        self.collect(|flags| flags.whitelisted)
    }

    /// Blacklisted accounts, sorted.
    pub fn blacklisted(&self) -> Vec<Address> {
        self.collect(|flags| flags.blacklisted)
    }

    fn update(&mut self, account: Address, f: impl FnOnce(&mut AccountFlags)) {
        let mut flags = self.flags(&account);
        f(&mut flags);
        if flags.is_default() {
            self.accounts.remove(&account);
        } else {
            self.accounts.insert(account, flags);
        }
    }

    fn collect(&self, pred: impl Fn(&AccountFlags) -> bool) -> Vec<Address> {
        let mut out: Vec<Address> = self
            .accounts
            .iter()
            .filter(|(_, flags)| pred(flags))
            .map(|(addr, _)| *addr)
            .collect();
        out.sort();
        out
    }
}
