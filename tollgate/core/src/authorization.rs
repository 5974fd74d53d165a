// Copyright (c) 2024 The Botho Foundation

//! Owner access control.

use crate::address::Address;
use crate::error::TokenError;

/// Single-owner authorization.
pub trait Authorization {
    /// The current owner, or `None` once ownership has been renounced.
    fn current_owner(&self) -> Option<Address>;

    /// Fail with [`TokenError::Unauthorized`] unless `caller` is the owner.
    fn require_owner(&self, caller: &Address) -> Result<(), TokenError> {
        match self.current_owner() {
            Some(owner) if owner == *caller => Ok(()),
            _ => Err(TokenError::Unauthorized { caller: *caller }),
        }
    }

    /// Hand ownership to `new_owner`. Returns the previous owner.
    fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<Option<Address>, TokenError>;

    /// Give up ownership. Every owner-gated call fails afterwards.
    fn renounce_ownership(&mut self, caller: &Address) -> Result<Option<Address>, TokenError>;
}

/// The reference [`Authorization`]: one owner slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleOwner {
    owner: Option<Address>,
}

impl SingleOwner {
    pub fn new(owner: Address) -> Self {
        Self {
            owner: owner.non_zero(),
        }
    }
}

impl Authorization for SingleOwner {
    fn current_owner(&self) -> Option<Address> {
        self.owner
    }

    fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<Option<Address>, TokenError> {
        self.require_owner(caller)?;
        if new_owner.is_zero() {
            return Err(TokenError::InvalidAddress);
        }
        Ok(self.owner.replace(new_owner))
    }

    fn renounce_ownership(&mut self, caller: &Address) -> Result<Option<Address>, TokenError> {
        self.require_owner(caller)?;
        Ok(self.owner.take())
    }
}
