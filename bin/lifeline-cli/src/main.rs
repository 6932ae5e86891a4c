// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # lifeline
//!
//! Command-line harness for the lifeline monitoring engine.
//!
//! ## Usage
//! ```bash
//! # Ten simulated minutes of a user who stops moving, with a draining battery
//! lifeline simulate --seconds 600 --still --battery-drain 2
//!
//! # Same, with the MMS channel failing so alerts fall back to SMS
//! lifeline -v simulate --seconds 600 --still --fail-mms
//!
//! # Print the default configuration, or validate a file
//! lifeline config
//! lifeline config --validate ./lifeline.toml
//! ```
//!
//! The simulator runs on a paused Tokio clock: simulated time advances as
//! fast as the engine can process it.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "lifeline",
    about = "Personal-safety monitoring engine: simulator and configuration tool",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the engine against scripted providers and print the timeline.
    Simulate {
        /// Simulated duration in seconds.
        #[arg(short, long, default_value_t = 300)]
        seconds: u64,

        /// The simulated user never moves.
        #[arg(long)]
        still: bool,

        /// Battery percentage lost per power sample.
        #[arg(long, default_value_t = 0.0)]
        battery_drain: f64,

        /// Make the secondary (MMS) channel fail every send.
        #[arg(long)]
        fail_mms: bool,
    },

    /// Print the default configuration or validate a configuration file.
    Config {
        /// Configuration file to validate.
        #[arg(long)]
        validate: Option<std::path::PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Simulate {
            seconds,
            still,
            battery_drain,
            fail_mms,
        } => {
            let scenario = commands::simulate::Scenario {
                seconds,
                still,
                battery_drain,
                fail_mms,
            };
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .start_paused(true)
                .build()?;
            runtime.block_on(commands::simulate::execute(cli.config, scenario))
        }
        Commands::Config { validate } => commands::config::execute(cli.config, validate),
    }
}
