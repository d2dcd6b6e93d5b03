//! cvi-oracle: replay feed histories through the sanitizing oracle.
//!
//! Loads the oracle configuration and a feed history file, then prints
//! sanitized readings as JSON lines on stdout. Rejected reads are printed
//! with their error instead of a value.
//!
//! Usage:
//!   cvi-oracle --history feeds.toml latest
//!   cvi-oracle --config oracle.toml --history feeds.toml round 3
//!   cvi-oracle --history feeds.toml rounds

mod config;
mod history;
mod replay;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cvi_oracle::{CviOracle, OwnerAuthority};
use cvi_types::RoundId;
use tracing::info;

use crate::config::OracleFileConfig;
use crate::history::FeedHistory;

#[derive(Parser, Debug)]
#[command(name = "cvi-oracle")]
#[command(about = "Sanitize CVI feed readings against a ceiling and a sanity feed")]
struct Args {
    /// Path to the TOML configuration file (falls back to $CVI_ORACLE_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the TOML feed history file, required by every command but `config`
    #[arg(long)]
    history: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sanitize the latest primary round
    Latest,
    /// Sanitize one primary round
    Round {
        /// Round id as published by the primary feed
        id: u64,
    },
    /// Sanitize every primary round in the history
    Rounds,
    /// Print the effective configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = OracleFileConfig::load(args.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("cvi={}", config.logging.level).parse()?),
        )
        .init();

    if let Command::Config = args.command {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let history = args
        .history
        .as_deref()
        .context("--history is required for this command")?;
    let (primary, sanity) = FeedHistory::load(history)?.into_feeds()?;
    let oracle = CviOracle::with_config(
        primary,
        sanity,
        config.ceiling()?,
        OwnerAuthority::new(config.owner()?),
        config.deviation,
    )
    .context("building oracle")?;

    info!(
        ceiling = oracle.max_truncated_value(),
        deviation_check = oracle.deviation_check_enabled(),
        max_deviation_bps = oracle.max_deviation_bps(),
        "oracle ready"
    );

    let lines = match args.command {
        Command::Latest => vec![replay::render(None, oracle.latest())?],
        Command::Round { id } => {
            vec![replay::render(Some(RoundId(id)), oracle.at_round(RoundId(id)))?]
        }
        Command::Rounds => replay::replay_rounds(&oracle)?,
        Command::Config => Vec::new(),
    };
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_command_needs_no_history() {
        let args = Args::try_parse_from(["cvi-oracle", "config"]).expect("parse");
        assert!(args.history.is_none());
        assert!(args.config.is_none());
        assert!(matches!(args.command, Command::Config));
    }

    #[test]
    fn test_feed_commands_take_history() {
        let args = Args::try_parse_from([
            "cvi-oracle",
            "--config",
            "oracle.toml",
            "--history",
            "feeds.toml",
            "round",
            "3",
        ])
        .expect("parse");
        assert_eq!(args.config, Some(PathBuf::from("oracle.toml")));
        assert_eq!(args.history, Some(PathBuf::from("feeds.toml")));
        assert!(matches!(args.command, Command::Round { id: 3 }));
    }
}
