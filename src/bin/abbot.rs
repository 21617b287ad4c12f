//! abbot - network device driver host
//!
//! Builds the network device drivers listed in a configuration file through
//! the driver registry.
//!
//! # Usage
//!
//! ```bash
//! # List compiled-in drivers
//! abbot drivers
//!
//! # Print the default configuration of a driver
//! abbot config bridge --os linux
//!
//! # Build every driver from a config file
//! abbot --config /etc/abbot/abbot.toml ensure
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use libabbot::{host, AbbotConfig, DriverRegistry};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Network device driver host
#[derive(Parser, Debug)]
#[command(name = "abbot")]
#[command(author = "abbot contributors")]
#[command(version)]
#[command(about = "Network device driver host for container networking", long_about = None)]
struct Args {
    /// Configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Provider to construct drivers for (overrides the config file)
    #[arg(short, long, global = true)]
    provider: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered drivers
    Drivers,
    /// Build every driver listed in the configuration file
    Ensure,
    /// Print the default configuration of a driver as TOML
    Config {
        /// Driver name
        name: String,
        /// Target operating system
        #[arg(long, default_value = std::env::consts::OS)]
        os: String,
    },
    /// Print version information
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(&args);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let argv: Vec<String> = std::env::args().collect();
            eprintln!("failed to run abbot {:?}: {:#}", argv, e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut registry = DriverRegistry::new();
    libabbot::register_builtin(&mut registry);
    debug!("Registered {} drivers", registry.len());

    match args.command {
        Commands::Drivers => {
            for key in registry.drivers() {
                println!("{}\t{}", key.name, key.os);
            }
        }
        Commands::Config { name, os } => {
            print!("{}", host::config_template(&registry, &name, &os)?);
        }
        Commands::Ensure => {
            let path = args.config.context("ensure requires --config")?;
            let mut config = AbbotConfig::load(&path)?;
            if let Some(provider) = args.provider {
                config.provider = provider;
            }

            let ctx = CancellationToken::new();
            let shutdown = ctx.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Interrupted, cancelling driver construction");
                    shutdown.cancel();
                }
            });

            let drivers = host::build_all(&registry, &ctx, &config).await?;
            let summary = drivers
                .iter()
                .map(host::describe)
                .collect::<Result<Vec<_>, _>>()?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Version => {
            println!("abbot {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// Initialize logging on stderr, stdout carries command output
fn init_logging(args: &Args) {
    let log_level = if args.verbose {
        "debug"
    } else {
        &args.log_level
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            EnvFilter::new(format!("abbot={},libabbot={}", log_level, log_level))
        });

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .init();
}
