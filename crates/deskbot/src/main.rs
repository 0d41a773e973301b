// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deskbot - a helpdesk ticketing bridge between Telegram and a live
//! dashboard.
//!
//! This is the binary entry point for the Deskbot server.

mod serve;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

/// Deskbot - a helpdesk ticketing bridge.
#[derive(Parser, Debug)]
#[command(name = "deskbot", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Deskbot server (Telegram bot + dashboard gateway).
    Serve,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match deskbot_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            deskbot_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(error) = serve::run_serve(config).await {
                eprintln!("deskbot serve failed: {error}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            print_config(config);
        }
        None => {
            println!("deskbot: use --help for available commands");
        }
    }
}

/// Prints the resolved configuration as TOML, with the bot token redacted.
fn print_config(mut config: deskbot_config::model::DeskbotConfig) {
    if config.telegram.bot_token.is_some() {
        config.telegram.bot_token = Some("<redacted>".to_string());
    }
    match toml::to_string_pretty(&config) {
        Ok(rendered) => print!("{rendered}"),
        Err(error) => {
            eprintln!("failed to render configuration: {error}");
            std::process::exit(1);
        }
    }
}
