// Copyright (c) 2024 The Botho Foundation

//! Execution environment facts the policy depends on.

use std::collections::HashSet;

use crate::address::Address;

/// Chain ID of Ethereum mainnet.
pub const ETHEREUM_MAINNET_CHAIN_ID: u64 = 1;

/// The two facts the token needs from its host chain.
pub trait ChainEnv {
    /// Identity of the network the token is currently executing on.
    fn chain_id(&self) -> u64;

    /// Whether `address` currently hosts executable code.
    fn has_code(&self, address: &Address) -> bool;
}

/// An in-memory chain: a chain id plus a set of addresses with code.
///
/// Code can be deployed and removed at any time, which is what makes
/// liquidity-pool classification a derived property.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimulatedChain {
    chain_id: u64,
    code: HashSet<Address>,
}

impl SimulatedChain {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            code: HashSet::new(),
        }
    }

    pub fn set_chain_id(&mut self, chain_id: u64) {
        self.chain_id = chain_id;
    }

    pub fn deploy_code(&mut self, address: Address) {
        self.code.insert(address);
    }

    pub fn remove_code(&mut self, address: &Address) {
        self.code.remove(address);
    }
}

impl ChainEnv for SimulatedChain {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn has_code(&self, address: &Address) -> bool {
        self.code.contains(address)
    }
}
