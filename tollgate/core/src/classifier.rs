// Copyright (c) 2024 The Botho Foundation

//! Liquidity-pool classification.
//!
//! There is no pool registry. An address counts as a liquidity pool when it
//! hosts code, is not the token itself, and is not whitelisted. Any other
//! contract (a multisig, a vesting wallet) that is not whitelisted is
//! therefore treated as a pool and taxed and capped accordingly.
//!
//! Classification is recomputed on every query from the current chain and
//! membership state; it is never stored.

use crate::address::Address;
use crate::chain::ChainEnv;
use crate::membership::MembershipLists;

/// Read-only view used to classify counterparties.
pub struct AddressClassifier<'a, C: ChainEnv + ?Sized> {
    chain: &'a C,
    membership: &'a MembershipLists,
    token_address: Address,
}

impl<'a, C: ChainEnv + ?Sized> AddressClassifier<'a, C> {
    pub fn new(chain: &'a C, membership: &'a MembershipLists, token_address: Address) -> Self {
        Self {
            chain,
            membership,
            token_address,
        }
    }

    pub fn is_contract(&self, address: &Address) -> bool {
        self.chain.has_code(address)
    }

    pub fn is_liquidity_pool(&self, address: &Address) -> bool {
        self.is_contract(address)
            && *address != self.token_address
            && !self.membership.is_whitelisted(address)
    }

    pub fn is_whitelisted(&self, address: &Address) -> bool {
        self.membership.is_whitelisted(address)
    }

    pub fn is_blacklisted(&self, address: &Address) -> bool {
        self.membership.is_blacklisted(address)
    }
}
