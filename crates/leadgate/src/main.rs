// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Leadgate - lead capture and digital product delivery backend.
//!
//! Binary entry point: loads configuration, sets up tracing, and dispatches
//! to the subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use leadgate_config::LeadgateConfig;

mod doctor;
mod product;
mod serve;

/// Leadgate - lead capture and digital product delivery backend.
#[derive(Parser, Debug)]
#[command(name = "leadgate", version, about, long_about = None)]
struct Cli {
    /// Path to a config file (defaults to the XDG hierarchy).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway.
    Serve,
    /// Manage the product catalog.
    Product {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Run diagnostic checks against the environment.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ProductCommands {
    /// Register a deliverable product.
    Add(product::AddArgs),
    /// List registered products.
    List,
}

fn load_config(path: Option<&PathBuf>) -> LeadgateConfig {
    let loaded = match path {
        Some(path) => leadgate_config::load_and_validate_path(path),
        None => leadgate_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            leadgate_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref());
    init_tracing(&config.server.log_level);

    let result = match cli.command {
        Commands::Serve => serve::run_serve(&config).await,
        Commands::Product { command } => match command {
            ProductCommands::Add(args) => product::run_add(&config, args).await,
            ProductCommands::List => product::run_list(&config).await,
        },
        Commands::Doctor { plain } => doctor::run_doctor(&config, plain).await,
    };

    if let Err(e) = result {
        eprintln!("leadgate: {e}");
        std::process::exit(1);
    }
}
