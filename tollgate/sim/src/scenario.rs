// Copyright (c) 2024 The Botho Foundation

//! Scripted scenarios.
//!
//! A scenario is a TOML file with an optional `[chain]` table and a list of
//! `[[step]]` tables. Each step names an operation with `op`, may name the
//! `caller` (the current owner by default) and may declare the error kind
//! it is `expect`ed to fail with:
//!
//! ```toml
//! [chain]
//! contracts = ["0x5050505050505050505050505050505050505050"]
//!
//! [[step]]
//! label = "Pool is closed before launch"
//! op = "transfer"
//! to = "0x5050505050505050505050505050505050505050"
//! value = 1000
//! expect = "TradingNotEnabled"
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

use tollgate_core::units::balance_serde;
use tollgate_core::{
    Address, Balance, ErrorKind, FeeRateBps, PolicyToken, TokenError, TokenEvent,
    TransferReceipt,
};

/// A parsed scenario file.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Scenario {
    /// Chain state before the first step
    #[serde(default)]
    pub chain: ChainSetup,

    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

/// Initial chain state.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ChainSetup {
    /// Chain the token runs on; the canonical chain when omitted
    pub chain_id: Option<u64>,

    /// Addresses that host code from the start
    #[serde(default)]
    pub contracts: Vec<Address>,
}

/// One scripted call.
#[derive(Clone, Debug, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub label: Option<String>,

    /// Caller of the operation; the current owner when omitted
    #[serde(default)]
    pub caller: Option<Address>,

    /// Error kind the step must fail with; success is expected when omitted
    #[serde(default)]
    pub expect: Option<ErrorKind>,

    #[serde(flatten)]
    pub action: Action,
}

/// Operations a step can perform.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
    Transfer {
        to: Address,
        #[serde(with = "balance_serde")]
        value: Balance,
    },
    Burn {
        #[serde(with = "balance_serde")]
        value: Balance,
    },
    BridgeMint {
        to: Address,
        #[serde(with = "balance_serde")]
        amount: Balance,
    },
    SetFees {
        buy: FeeRateBps,
        sell: FeeRateBps,
    },
    SetMaxSellPercent {
        bps: FeeRateBps,
    },
    SetTrading {
        enabled: bool,
    },
    SetFeeReceiver {
        receiver: Address,
    },
    SetBridgeMinter {
        minter: Address,
    },
    AddToWhitelist {
        account: Address,
    },
    RemoveFromWhitelist {
        account: Address,
    },
    SetBlacklist {
        account: Address,
        blacklisted: bool,
    },
    TransferOwnership {
        new_owner: Address,
    },
    RenounceOwnership,
    DeployCode {
        address: Address,
    },
    RemoveCode {
        address: Address,
    },
    SetChainId {
        chain_id: u64,
    },
    AssertBalance {
        account: Address,
        #[serde(with = "balance_serde")]
        balance: Balance,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Transfer { .. } => "transfer",
            Action::Burn { .. } => "burn",
            Action::BridgeMint { .. } => "bridge_mint",
            Action::SetFees { .. } => "set_fees",
            Action::SetMaxSellPercent { .. } => "set_max_sell_percent",
            Action::SetTrading { .. } => "set_trading",
            Action::SetFeeReceiver { .. } => "set_fee_receiver",
            Action::SetBridgeMinter { .. } => "set_bridge_minter",
            Action::AddToWhitelist { .. } => "add_to_whitelist",
            Action::RemoveFromWhitelist { .. } => "remove_from_whitelist",
            Action::SetBlacklist { .. } => "set_blacklist",
            Action::TransferOwnership { .. } => "transfer_ownership",
            Action::RenounceOwnership => "renounce_ownership",
            Action::DeployCode { .. } => "deploy_code",
            Action::RemoveCode { .. } => "remove_code",
            Action::SetChainId { .. } => "set_chain_id",
            Action::AssertBalance { .. } => "assert_balance",
        }
    }
}

impl Scenario {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse scenario")
    }
}

/// What a step actually did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Ok,
    Failed { kind: ErrorKind, message: String },
    AssertionFailed { message: String },
}

/// Result of replaying one step.
#[derive(Clone, Debug, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub label: Option<String>,
    pub op: &'static str,
    pub caller: Address,
    pub expected: Option<ErrorKind>,
    pub outcome: Outcome,
    /// Whether the outcome matched `expected`
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<TransferReceipt>,
    pub events: Vec<TokenEvent>,
}

/// Result of replaying a whole scenario.
#[derive(Clone, Debug, Serialize)]
pub struct ScenarioReport {
    pub steps: Vec<StepReport>,
    #[serde(with = "balance_serde")]
    pub total_supply: Balance,
    pub owner: Option<Address>,
}

impl ScenarioReport {
    pub fn mismatches(&self) -> usize {
        self.steps.iter().filter(|step| !step.matched).count()
    }

    pub fn is_success(&self) -> bool {
        self.mismatches() == 0
    }
}

/// Apply the scenario's chain setup to `token`.
pub fn prepare(token: &mut PolicyToken, setup: &ChainSetup) {
    if let Some(chain_id) = setup.chain_id {
        token.chain_mut().set_chain_id(chain_id);
    }
    for address in &setup.contracts {
        token.chain_mut().deploy_code(*address);
    }
}

/// Replay every step against `token`.
///
/// A failing step does not stop the run; every step is reported.
pub fn run(token: &mut PolicyToken, scenario: &Scenario) -> ScenarioReport {
    prepare(token, &scenario.chain);
    // Genesis notifications are not part of any step
    token.drain_events();

    let steps = scenario
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| run_step(token, i + 1, step))
        .collect();

    ScenarioReport {
        steps,
        total_supply: token.total_supply(),
        owner: token.owner(),
    }
}

fn run_step(token: &mut PolicyToken, index: usize, step: &Step) -> StepReport {
    let caller = step
        .caller
        .or_else(|| token.owner())
        .unwrap_or(Address::ZERO);
    let op = step.action.name();
    debug!(index, op, %caller, "Running step");

    let (outcome, receipt) = match apply(token, caller, &step.action) {
        Ok(receipt) => (Outcome::Ok, receipt),
        Err(StepError::Token(err)) => (
            Outcome::Failed {
                kind: err.kind(),
                message: err.to_string(),
            },
            None,
        ),
        Err(StepError::Assertion(message)) => (Outcome::AssertionFailed { message }, None),
    };

    let matched = match (&outcome, step.expect) {
        (Outcome::Ok, None) => true,
        (Outcome::Failed { kind, .. }, Some(expected)) => *kind == expected,
        _ => false,
    };
    if matched {
        info!(index, op, "Step ok");
    } else {
        warn!(index, op, ?outcome, expected = ?step.expect, "Step did not match");
    }

    StepReport {
        index,
        label: step.label.clone(),
        op,
        caller,
        expected: step.expect,
        outcome,
        matched,
        receipt,
        events: token.drain_events(),
    }
}

enum StepError {
    Token(TokenError),
    Assertion(String),
}

impl From<TokenError> for StepError {
    fn from(err: TokenError) -> Self {
        StepError::Token(err)
    }
}

fn apply(
    token: &mut PolicyToken,
    caller: Address,
    action: &Action,
) -> Result<Option<TransferReceipt>, StepError> {
    match action {
        Action::Transfer { to, value } => return Ok(Some(token.transfer(caller, *to, *value)?)),
        Action::Burn { value } => return Ok(Some(token.burn(caller, *value)?)),
        Action::BridgeMint { to, amount } => token.bridge_mint(caller, *to, *amount)?,
        Action::SetFees { buy, sell } => token.set_fees(caller, *buy, *sell)?,
        Action::SetMaxSellPercent { bps } => token.set_max_sell_percent(caller, *bps)?,
        Action::SetTrading { enabled } => token.set_trading(caller, *enabled)?,
        Action::SetFeeReceiver { receiver } => token.set_fee_receiver(caller, *receiver)?,
        Action::SetBridgeMinter { minter } => token.set_bridge_minter(caller, *minter)?,
        Action::AddToWhitelist { account } => token.add_to_whitelist(caller, *account)?,
        Action::RemoveFromWhitelist { account } => {
            token.remove_from_whitelist(caller, *account)?
        }
        Action::SetBlacklist {
            account,
            blacklisted,
        } => token.set_blacklist(caller, *account, *blacklisted)?,
        Action::TransferOwnership { new_owner } => token.transfer_ownership(caller, *new_owner)?,
        Action::RenounceOwnership => token.renounce_ownership(caller)?,
        Action::DeployCode { address } => token.chain_mut().deploy_code(*address),
        Action::RemoveCode { address } => token.chain_mut().remove_code(address),
        Action::SetChainId { chain_id } => token.chain_mut().set_chain_id(*chain_id),
        Action::AssertBalance { account, balance } => {
            let actual = token.balance_of(account);
            if actual != *balance {
                return Err(StepError::Assertion(format!(
                    "balance of {account} is {actual}, expected {balance}"
                )));
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tollgate_core::{SimulatedChain, TokenConfig};

    const POOL: &str = "0x5050505050505050505050505050505050505050";
    const ALICE: &str = "0xa1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1";

    fn token() -> PolicyToken {
        let config = TokenConfig::default();
        PolicyToken::from_config(&config, SimulatedChain::new(config.bridge.canonical_chain_id))
            .unwrap()
    }

    #[test]
    fn test_parse_steps() {
        let scenario = Scenario::from_toml_str(&format!(
            r#"
            [chain]
            contracts = ["{POOL}"]

            [[step]]
            op = "transfer"
            to = "{POOL}"
            value = "1_000"
            expect = "TradingNotEnabled"

            [[step]]
            op = "set_fees"
            buy = 100
            sell = 1000

            [[step]]
            op = "renounce_ownership"
            "#
        ))
        .unwrap();

        assert_eq!(scenario.chain.contracts.len(), 1);
        assert_eq!(scenario.steps.len(), 3);
        assert_eq!(scenario.steps[0].expect, Some(ErrorKind::TradingNotEnabled));
        assert!(matches!(
            scenario.steps[0].action,
            Action::Transfer { value: 1_000, .. }
        ));
        assert!(matches!(
            scenario.steps[1].action,
            Action::SetFees {
                buy: 100,
                sell: 1_000
            }
        ));
        assert_eq!(scenario.steps[2].action.name(), "renounce_ownership");
    }

    #[test]
    fn test_unknown_op_rejected() {
        assert!(Scenario::from_toml_str("[[step]]\nop = \"rug_pull\"\n").is_err());
    }

    #[test]
    fn test_expected_failure_matches() {
        let scenario = Scenario::from_toml_str(&format!(
            r#"
            [chain]
            contracts = ["{POOL}"]

            [[step]]
            op = "transfer"
            to = "{POOL}"
            value = 10
            expect = "TradingNotEnabled"

            [[step]]
            op = "set_trading"
            enabled = true

            [[step]]
            op = "transfer"
            to = "{POOL}"
            value = 10
            "#
        ))
        .unwrap();

        let mut token = token();
        let report = run(&mut token, &scenario);

        assert!(report.is_success());
        assert!(matches!(
            report.steps[0].outcome,
            Outcome::Failed {
                kind: ErrorKind::TradingNotEnabled,
                ..
            }
        ));
        assert!(report.steps[0].events.is_empty());
        assert_eq!(
            report.steps[1].events,
            vec![TokenEvent::TradingUpdated { enabled: true }]
        );
        assert!(report.steps[2].receipt.is_some());
    }

    #[test]
    fn test_mismatches_counted() {
        let scenario = Scenario::from_toml_str(&format!(
            r#"
            [[step]]
            label = "Non-owner cannot open trading"
            caller = "{ALICE}"
            op = "set_trading"
            enabled = true

            [[step]]
            op = "set_fees"
            buy = 300
            sell = 500
            expect = "FeeOutOfBounds"

            [[step]]
            op = "assert_balance"
            account = "{ALICE}"
            balance = 1
            "#
        ))
        .unwrap();

        let mut token = token();
        let report = run(&mut token, &scenario);

        assert_eq!(report.mismatches(), 3);
        assert!(matches!(
            report.steps[0].outcome,
            Outcome::Failed {
                kind: ErrorKind::Unauthorized,
                ..
            }
        ));
        assert_eq!(report.steps[1].outcome, Outcome::Ok);
        assert!(matches!(
            report.steps[2].outcome,
            Outcome::AssertionFailed { .. }
        ));
    }

    #[test]
    fn test_caller_defaults_to_current_owner() {
        let scenario = Scenario::from_toml_str(&format!(
            r#"
            [[step]]
            op = "transfer_ownership"
            new_owner = "{ALICE}"

            [[step]]
            op = "set_trading"
            enabled = true
            "#
        ))
        .unwrap();

        let mut token = token();
        let report = run(&mut token, &scenario);

        assert!(report.is_success());
        assert_eq!(report.steps[1].caller, ALICE.parse().unwrap());
        assert_eq!(report.owner, Some(ALICE.parse().unwrap()));
    }
}
