// Copyright (c) 2024 The Botho Foundation

//! Tollgate simulator
//!
//! Builds a policy token from a genesis config and replays scripted
//! scenarios against it, or quotes fees under the configured policy.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod scenario;

use scenario::{Outcome, Scenario, ScenarioReport};
use tollgate_core::registry::PolicyRegistry;
use tollgate_core::units::parse_balance;
use tollgate_core::{PolicyToken, SimulatedChain, TokenConfig};

/// Tollgate - policy token simulator
#[derive(Parser, Debug)]
#[command(name = "tollgate")]
#[command(about = "Simulate a policy-enforced token: fees, sell caps, lists and bridge mints")]
struct Cli {
    /// Path to genesis configuration file
    #[arg(short, long, global = true, default_value = "tollgate.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a scenario file against a fresh token
    Run {
        /// Path to scenario file
        #[arg(short, long)]
        scenario: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Quote the fee split for an amount
    Fee {
        /// Amount in base units (underscores allowed)
        #[arg(short, long)]
        amount: String,

        /// Quote a sell instead of a buy
        #[arg(long)]
        sell: bool,
    },

    /// Print the effective configuration
    ShowConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so reports on stdout stay machine-readable
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&cli.config)?;

    match cli.command {
        Command::Run { scenario, json } => run(&config, &scenario, json),
        Command::Fee { amount, sell } => fee(&config, &amount, sell),
        Command::ShowConfig => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn load_config(path: &Path) -> Result<TokenConfig> {
    if path.exists() {
        info!("Loading configuration from {}", path.display());
        Ok(TokenConfig::from_file(path)?)
    } else {
        info!("Using default configuration");
        Ok(TokenConfig::default())
    }
}

fn run(config: &TokenConfig, path: &Path, json: bool) -> Result<()> {
    let scenario = Scenario::from_file(path)?;
    let chain = SimulatedChain::new(config.bridge.canonical_chain_id);
    let mut token = PolicyToken::from_config(config, chain).context("Failed to create token")?;

    info!(
        "Replaying {} steps against {} ({})",
        scenario.steps.len(),
        token.metadata().symbol,
        token.address()
    );
    let report = scenario::run(&mut token, &scenario);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    let mismatches = report.mismatches();
    if mismatches > 0 {
        bail!("{} of {} steps did not match", mismatches, report.steps.len());
    }
    Ok(())
}

fn print_report(report: &ScenarioReport) {
    for step in &report.steps {
        let status = if step.matched { "ok" } else { "MISMATCH" };
        let label = step.label.as_deref().unwrap_or("");
        println!("[{:>3}] {:<8} {:<22} {}", step.index, status, step.op, label);

        match &step.outcome {
            Outcome::Ok => {}
            Outcome::Failed { kind, message } => println!("      failed: {kind}: {message}"),
            Outcome::AssertionFailed { message } => println!("      assertion: {message}"),
        }
        if let Some(expected) = step.expected {
            if !step.matched {
                println!("      expected: {expected}");
            }
        }
        if let Some(receipt) = &step.receipt {
            println!(
                "      {} fee={} ({} bps) net={}",
                receipt.kind, receipt.fee, receipt.fee_rate_bps, receipt.net
            );
        }
        for event in &step.events {
            println!("      event {}: {:?}", event.name(), event);
        }
    }

    println!();
    println!("Total supply: {}", report.total_supply);
    match report.owner {
        Some(owner) => println!("Owner: {owner}"),
        None => println!("Owner: renounced"),
    }
    println!(
        "{} steps, {} mismatched",
        report.steps.len(),
        report.mismatches()
    );
}

fn fee(config: &TokenConfig, amount: &str, sell: bool) -> Result<()> {
    let Some(amount) = parse_balance(amount) else {
        bail!("Invalid amount: {amount:?}");
    };
    let policy = PolicyRegistry::from_settings(
        &config.policy,
        config.accounts.fee_receiver,
        config.bridge.minter,
    )?;
    let is_buy = !sell;
    let split = policy.calculate_fee(amount, is_buy)?;

    println!("Direction: {}", if is_buy { "buy" } else { "sell" });
    println!("Rate:      {} bps", policy.fee_rate(is_buy));
    println!("Amount:    {}", amount);
    println!("Fee:       {}", split.fee);
    println!("Net:       {}", split.net);
    Ok(())
}
