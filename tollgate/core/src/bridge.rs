// Copyright (c) 2024 The Botho Foundation

//! Bridge minting.
//!
//! A single designated minter may create new supply to back tokens locked
//! on another chain. Minting is only possible on the canonical chain, so a
//! copy of the token deployed elsewhere cannot inflate supply even if the
//! minter key is shared.

use tracing::info;

use crate::address::Address;
use crate::error::TokenError;
use crate::events::{EventBuffer, TokenEvent};
use crate::ledger::Ledger;
use crate::units::Balance;

/// Gate in front of the ledger's mint primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BridgeMintGate {
    canonical_chain_id: u64,
}

impl BridgeMintGate {
    pub fn new(canonical_chain_id: u64) -> Self {
        Self { canonical_chain_id }
    }

    pub fn canonical_chain_id(&self) -> u64 {
        self.canonical_chain_id
    }

    /// Check that `caller` is the configured minter and that the token is
    /// running on the canonical chain.
    pub fn authorize(
        &self,
        caller: &Address,
        minter: Option<Address>,
        chain_id: u64,
    ) -> Result<(), TokenError> {
        if minter != Some(*caller) {
            return Err(TokenError::UnauthorizedBridgeCaller { caller: *caller });
        }
        if chain_id != self.canonical_chain_id {
            return Err(TokenError::BridgeMintDisabled {
                chain_id,
                canonical_chain_id: self.canonical_chain_id,
            });
        }
        Ok(())
    }

    /// Authorize and mint `amount` to `to`.
    ///
    /// Minting does not pass through the transfer pipeline.
    #[allow(clippy::too_many_arguments)]
    pub fn mint<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        caller: &Address,
        minter: Option<Address>,
        chain_id: u64,
        to: Address,
        amount: Balance,
        events: &mut EventBuffer,
    ) -> Result<(), TokenError> {
        self.authorize(caller, minter, chain_id)?;
        ledger.mint(&to, amount)?;

        info!(%to, amount, "Bridge minted");
        events.push(TokenEvent::Transfer {
            from: Address::ZERO,
            to,
            value: amount,
        });
        events.push(TokenEvent::BridgeMint { to, amount });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;

    const MINTER: Address = Address::repeat_byte(0xb1);
    const USER: Address = Address::repeat_byte(0xa1);

    #[test]
    fn test_unset_minter_rejects_everyone() {
        let gate = BridgeMintGate::new(1);
        assert_eq!(
            gate.authorize(&MINTER, None, 1),
            Err(TokenError::UnauthorizedBridgeCaller { caller: MINTER })
        );
        assert_eq!(
            gate.authorize(&Address::ZERO, None, 1),
            Err(TokenError::UnauthorizedBridgeCaller {
                caller: Address::ZERO
            })
        );
    }

    #[test]
    fn test_identity_checked_before_chain() {
        let gate = BridgeMintGate::new(1);
        assert_eq!(
            gate.authorize(&USER, Some(MINTER), 5),
            Err(TokenError::UnauthorizedBridgeCaller { caller: USER })
        );
        assert_eq!(
            gate.authorize(&MINTER, Some(MINTER), 5),
            Err(TokenError::BridgeMintDisabled {
                chain_id: 5,
                canonical_chain_id: 1
            })
        );
        assert!(gate.authorize(&MINTER, Some(MINTER), 1).is_ok());
    }

    #[test]
    fn test_mint_increases_supply() {
        let gate = BridgeMintGate::new(1);
        let mut ledger = InMemoryLedger::new();
        let mut events = EventBuffer::new();

        gate.mint(&mut ledger, &MINTER, Some(MINTER), 1, USER, 777, &mut events)
            .unwrap();

        assert_eq!(ledger.total_supply(), 777);
        assert_eq!(ledger.balance_of(&USER), 777);
        let mints = events
            .iter()
            .filter(|e| matches!(e, TokenEvent::BridgeMint { .. }))
            .count();
        assert_eq!(mints, 1);
    }
}
