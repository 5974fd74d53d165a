// Copyright (c) 2024 The Botho Foundation

//! The token facade.
//!
//! [`PolicyToken`] owns the policy registry, membership lists and bridge
//! gate, and drives the external collaborators (ledger, authorization,
//! chain). It is the only place where owner checks happen and where
//! notifications become visible.

use serde::Serialize;
use tracing::{info, warn};

use crate::address::Address;
use crate::authorization::{Authorization, SingleOwner};
use crate::bridge::BridgeMintGate;
use crate::chain::{ChainEnv, SimulatedChain};
use crate::classifier::AddressClassifier;
use crate::config::TokenConfig;
use crate::error::TokenError;
use crate::events::{EventBuffer, TokenEvent};
use crate::fees::FeeSplit;
use crate::interceptor::{TransferInterceptor, TransferReceipt};
use crate::ledger::{InMemoryLedger, Ledger};
use crate::membership::{AccountFlags, MembershipLists};
use crate::registry::PolicyRegistry;
use crate::units::{Balance, FeeRateBps};

/// Read-only token metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// A policy-enforced token.
pub struct PolicyToken<L = InMemoryLedger, A = SingleOwner, C = SimulatedChain> {
    metadata: TokenMetadata,
    address: Address,
    ledger: L,
    auth: A,
    chain: C,
    policy: PolicyRegistry,
    membership: MembershipLists,
    bridge: BridgeMintGate,
    events: Vec<TokenEvent>,
}

impl PolicyToken {
    /// Create a token backed by in-memory collaborators, owned by the
    /// configured owner.
    pub fn from_config(config: &TokenConfig, chain: SimulatedChain) -> Result<Self, TokenError> {
        Self::new(
            config,
            InMemoryLedger::new(),
            SingleOwner::new(config.accounts.owner),
            chain,
        )
    }
}

impl<L: Ledger, A: Authorization, C: ChainEnv> PolicyToken<L, A, C> {
    /// Create a token.
    ///
    /// The owner is whoever `auth` reports. The owner, the fee receiver and
    /// the token's own address start whitelisted, and the whole initial
    /// supply is minted to the owner.
    pub fn new(config: &TokenConfig, mut ledger: L, auth: A, chain: C) -> Result<Self, TokenError> {
        config.validate()?;
        let owner = auth.current_owner().ok_or(TokenError::InvalidAddress)?;
        let address = config.token.address;

        let policy = PolicyRegistry::from_settings(
            &config.policy,
            config.accounts.fee_receiver,
            config.bridge.minter,
        )?;
        let mut membership = MembershipLists::new();
        membership.add_to_whitelist(policy.fee_receiver());
        membership.add_to_whitelist(owner);
        membership.add_to_whitelist(address);

        let supply = config.initial_supply_base_units()?;
        let mut staged = EventBuffer::new();
        TransferInterceptor::new(&policy, &membership, &chain, address).execute(
            &mut ledger,
            Address::ZERO,
            owner,
            supply,
            &mut staged,
        )?;

        info!(
            %address,
            %owner,
            symbol = %config.token.symbol,
            supply,
            "Token created"
        );

        Ok(Self {
            metadata: TokenMetadata {
                name: config.token.name.clone(),
                symbol: config.token.symbol.clone(),
                decimals: config.token.decimals,
            },
            address,
            ledger,
            auth,
            chain,
            policy,
            membership,
            bridge: BridgeMintGate::new(config.bridge.canonical_chain_id),
            events: staged.into_events(),
        })
    }

    // === Transfers ===

    /// Transfer `value` from `caller` to `to`.
    pub fn transfer(
        &mut self,
        caller: Address,
        to: Address,
        value: Balance,
    ) -> Result<TransferReceipt, TokenError> {
        if caller.is_zero() || to.is_zero() {
            return Err(TokenError::InvalidAddress);
        }
        self.intercept(caller, to, value)
    }

    /// Destroy `value` of the caller's tokens.
    pub fn burn(&mut self, caller: Address, value: Balance) -> Result<TransferReceipt, TokenError> {
        if caller.is_zero() {
            return Err(TokenError::InvalidAddress);
        }
        self.intercept(caller, Address::ZERO, value)
    }

    /// Run the policy checks for a transfer without applying it.
    pub fn preview_transfer(
        &self,
        from: Address,
        to: Address,
        value: Balance,
    ) -> Result<TransferReceipt, TokenError> {
        self.interceptor()
            .plan(from, to, value, self.ledger.total_supply())
    }

    fn intercept(
        &mut self,
        from: Address,
        to: Address,
        value: Balance,
    ) -> Result<TransferReceipt, TokenError> {
        let mut staged = EventBuffer::new();
        let receipt = TransferInterceptor::new(
            &self.policy,
            &self.membership,
            &self.chain,
            self.address,
        )
        .execute(&mut self.ledger, from, to, value, &mut staged)?;
        self.commit(staged);
        Ok(receipt)
    }

    // === Bridge ===

    /// Mint `amount` to `to` on behalf of the bridge.
    pub fn bridge_mint(
        &mut self,
        caller: Address,
        to: Address,
        amount: Balance,
    ) -> Result<(), TokenError> {
        let mut staged = EventBuffer::new();
        self.bridge
            .mint(
                &mut self.ledger,
                &caller,
                self.policy.bridge_minter(),
                self.chain.chain_id(),
                to,
                amount,
                &mut staged,
            )
            .inspect_err(|err| warn!(%caller, %to, amount, "Bridge mint rejected: {}", err))?;
        self.commit(staged);
        Ok(())
    }

    // === Owner: policy ===

    pub fn set_fees(
        &mut self,
        caller: Address,
        buy: FeeRateBps,
        sell: FeeRateBps,
    ) -> Result<(), TokenError> {
        self.auth.require_owner(&caller)?;
        self.policy.set_fees(buy, sell)?;

        info!(buy, sell, "Fees updated");
        self.emit(TokenEvent::FeeUpdated {
            buy_fee_bps: buy,
            sell_fee_bps: sell,
        });
        Ok(())
    }

    pub fn set_max_sell_percent(&mut self, caller: Address, pct: FeeRateBps) -> Result<(), TokenError> {
        self.auth.require_owner(&caller)?;
        self.policy.set_max_sell_percent(pct)?;

        info!(pct, "Max sell percent updated");
        self.emit(TokenEvent::MaxSellPercentUpdated {
            max_sell_percent_bps: pct,
        });
        Ok(())
    }

    pub fn set_trading(&mut self, caller: Address, enabled: bool) -> Result<(), TokenError> {
        self.auth.require_owner(&caller)?;
        self.policy.set_trading(enabled);

        info!(enabled, "Trading updated");
        self.emit(TokenEvent::TradingUpdated { enabled });
        Ok(())
    }

    /// Route fees to `receiver`, which is whitelisted so that it is never
    /// taxed when forwarding what it collects.
    pub fn set_fee_receiver(&mut self, caller: Address, receiver: Address) -> Result<(), TokenError> {
        self.auth.require_owner(&caller)?;
        self.policy.set_fee_receiver(receiver)?;
        self.membership.add_to_whitelist(receiver);

        info!(%receiver, "Fee receiver updated");
        self.emit(TokenEvent::WhitelistUpdated {
            account: receiver,
            whitelisted: true,
        });
        Ok(())
    }

    pub fn set_bridge_minter(&mut self, caller: Address, minter: Address) -> Result<(), TokenError> {
        self.auth.require_owner(&caller)?;
        self.policy.set_bridge_minter(minter)?;

        info!(%minter, "Bridge minter updated");
        self.emit(TokenEvent::BridgeMinterUpdated { minter });
        Ok(())
    }

    // === Owner: membership ===

    pub fn add_to_whitelist(&mut self, caller: Address, account: Address) -> Result<(), TokenError> {
        self.auth.require_owner(&caller)?;
        self.membership.add_to_whitelist(account);

        info!(%account, "Whitelisted");
        self.emit(TokenEvent::WhitelistUpdated {
            account,
            whitelisted: true,
        });
        Ok(())
    }

    pub fn remove_from_whitelist(
        &mut self,
        caller: Address,
        account: Address,
    ) -> Result<(), TokenError> {
        self.auth.require_owner(&caller)?;
        self.membership.remove_from_whitelist(account);

        info!(%account, "Removed from whitelist");
        self.emit(TokenEvent::WhitelistUpdated {
            account,
            whitelisted: false,
        });
        Ok(())
    }

    pub fn set_blacklist(
        &mut self,
        caller: Address,
        account: Address,
        blacklisted: bool,
    ) -> Result<(), TokenError> {
        self.auth.require_owner(&caller)?;
        self.membership.set_blacklist(account, blacklisted)?;

        info!(%account, blacklisted, "Blacklist updated");
        self.emit(TokenEvent::BlacklistUpdated {
            account,
            blacklisted,
        });
        Ok(())
    }

    // === Owner: ownership ===

    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<(), TokenError> {
        let previous_owner = self.auth.transfer_ownership(&caller, new_owner)?;

        info!(%new_owner, "Ownership transferred");
        self.emit(TokenEvent::OwnershipTransferred {
            previous_owner,
            new_owner: Some(new_owner),
        });
        Ok(())
    }

    pub fn renounce_ownership(&mut self, caller: Address) -> Result<(), TokenError> {
        let previous_owner = self.auth.renounce_ownership(&caller)?;

        warn!(%caller, "Ownership renounced");
        self.emit(TokenEvent::OwnershipTransferred {
            previous_owner,
            new_owner: None,
        });
        Ok(())
    }

    // === Reads ===

    pub fn is_liquidity_pool(&self, account: &Address) -> bool {
        self.classifier().is_liquidity_pool(account)
    }

    pub fn is_contract(&self, account: &Address) -> bool {
        self.classifier().is_contract(account)
    }

    /// Largest single sell into a liquidity pool at the current supply.
    pub fn get_max_sell_amount(&self) -> Result<Balance, TokenError> {
        self.policy.max_sell_amount(self.ledger.total_supply())
    }

    /// Quote the buy or sell fee on `amount` at the current rates.
    pub fn calculate_fee(&self, amount: Balance, is_buy: bool) -> Result<FeeSplit, TokenError> {
        self.policy.calculate_fee(amount, is_buy)
    }

    pub fn balance_of(&self, account: &Address) -> Balance {
        self.ledger.balance_of(account)
    }

    pub fn total_supply(&self) -> Balance {
        self.ledger.total_supply()
    }

    pub fn owner(&self) -> Option<Address> {
        self.auth.current_owner()
    }

    pub fn account_flags(&self, account: &Address) -> AccountFlags {
        self.membership.flags(account)
    }

    pub fn is_whitelisted(&self, account: &Address) -> bool {
        self.membership.is_whitelisted(account)
    }

    pub fn is_blacklisted(&self, account: &Address) -> bool {
        self.membership.is_blacklisted(account)
    }

    pub fn policy(&self) -> &PolicyRegistry {
        &self.policy
    }

    pub fn membership(&self) -> &MembershipLists {
        &self.membership
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn canonical_chain_id(&self) -> u64 {
        self.bridge.canonical_chain_id()
    }

    /// Mutable access to the host chain, for deploying or removing code.
    pub fn chain_mut(&mut self) -> &mut C {
        &mut self.chain
    }

    // === Notifications ===

    /// Notifications published so far and not yet drained.
    pub fn events(&self) -> &[TokenEvent] {
        &self.events
    }

    /// Take every published notification, oldest first.
    pub fn drain_events(&mut self) -> Vec<TokenEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: TokenEvent) {
        self.events.push(event);
    }

    fn commit(&mut self, staged: EventBuffer) {
        self.events.extend(staged.into_events());
    }

    fn classifier(&self) -> AddressClassifier<'_, C> {
        AddressClassifier::new(&self.chain, &self.membership, self.address)
    }

    fn interceptor(&self) -> TransferInterceptor<'_, C> {
        TransferInterceptor::new(&self.policy, &self.membership, &self.chain, self.address)
    }
}
