// ABOUTME: Raceday CLI - scores candidate event dates from the command line
// ABOUTME: Scores a month or year, lists the best days, and summarizes months
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors
//!
//! Usage:
//! ```bash
//! # Score every day of June 2027 near Munich
//! raceday-cli score --year 2027 --month 6 --lat 48.137 --lng 11.575
//!
//! # Top ten days of 2027 for a relaxed experience event, as JSON
//! raceday-cli --json best --year 2027 --top 10 --lat 48.137 --lng 11.575 --persona experience
//!
//! # Per-month traffic-light counts without contacting the weather archive
//! raceday-cli summary --year 2027 --lat 48.137 --lng 11.575 --offline
//! ```

mod commands;
mod helpers;

use clap::{Parser, Subcommand};
use raceday_planner::config::PlannerConfig;
use raceday_planner::errors::AppResult;
use raceday_planner::logging::LoggingConfig;
use tracing::info;

use helpers::PlanArgs;

type Result<T> = AppResult<T>;

#[derive(Parser)]
#[command(
    name = "raceday-cli",
    about = "Raceday Planner date scoring CLI",
    long_about = "Scores calendar days for an outdoor endurance event against historical weather, daylight, holidays and training lead time."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Score every day of a month, or of a whole year when no month is given
    Score {
        /// Year to score
        #[arg(long)]
        year: i32,

        /// Month to score (1-12)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        #[command(flatten)]
        plan: PlanArgs,
    },

    /// List the best days of a year
    Best {
        /// Year to search
        #[arg(long)]
        year: i32,

        /// Number of days to list
        #[arg(long, default_value = "5")]
        top: usize,

        #[command(flatten)]
        plan: PlanArgs,
    },

    /// Per-month status counts for a year
    Summary {
        /// Year to summarize
        #[arg(long)]
        year: i32,

        #[command(flatten)]
        plan: PlanArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging = logging.with_level("debug");
    }
    logging.init()?;

    let config = PlannerConfig::from_env()?;
    info!("Raceday Planner CLI: {}", config.summary());

    match cli.command {
        Command::Score { year, month, plan } => {
            commands::score::run(&config, &plan, year, month, cli.json).await?;
        }
        Command::Best { year, top, plan } => {
            commands::best::run(&config, &plan, year, top, cli.json).await?;
        }
        Command::Summary { year, plan } => {
            commands::summary::run(&config, &plan, year, cli.json).await?;
        }
    }

    Ok(())
}
