//! Warden command-line tooling
//!
//! Exports the permission catalog of a handler registry manifest, lists the
//! effective access requirement of every handler, and prints the permission
//! identity of a single handler.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;

mod commands;

use commands::{access, catalog, common, identity};

#[derive(Parser)]
#[command(name = "warden")]
#[command(about = "Warden - handler access control and permission catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the permission catalog of a registry manifest as JSON
    Catalog {
        /// Registry manifest (TOML)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Node order: identity or discovery
        #[arg(short, long)]
        order: Option<String>,

        /// Single-line JSON output
        #[arg(long)]
        compact: bool,
    },

    /// List the effective access requirement of every handler
    Access {
        /// Registry manifest (TOML)
        #[arg(short, long)]
        manifest: PathBuf,
    },

    /// Print the permission identity of one handler
    Identity {
        /// Owner type name, e.g. UserController
        type_name: String,

        /// Handler method name, e.g. getList
        method: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(io::stderr)
        .init();

    let config = common::load_config(cli.config.as_deref())?;
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Catalog {
            manifest,
            order,
            compact,
        } => {
            catalog::run(&config, &manifest, order.as_deref(), compact, &mut stdout)?;
        }

        Commands::Access { manifest } => {
            access::run(&config, &manifest, &mut stdout)?;
        }

        Commands::Identity { type_name, method } => {
            identity::run(&config, &type_name, &method, &mut stdout)?;
        }
    }

    Ok(())
}
