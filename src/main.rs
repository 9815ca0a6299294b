//! stemcheck - FIPS stemcell compliance verifier.
//!
//! Checks a built stemcell, live or mounted, for:
//! - the FIPS kernel and no generic kernel
//! - sshd restricted to approved MACs and RSA/ECDSA host keys
//! - a grub entry booting the FIPS kernel
//! - exactly the expected package set for its platform

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use stemcheck::commands;
use stemcheck::config::Config;
use stemcheck::platform::Platform;

#[derive(Parser)]
#[command(name = "stemcheck")]
#[command(about = "FIPS stemcell compliance verifier")]
#[command(
    after_help = "QUICK START:\n  stemcheck preflight --platform aws       Check prerequisites\n  stemcheck run --platform aws             Verify the running host\n  stemcheck run --platform google --root /mnt/image\n                                           Verify a mounted image"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Platform the stemcell was built for (overrides STEMCELL_PLATFORM)
    #[arg(long, global = true)]
    platform: Option<Platform>,

    /// Root directory of the image under test (overrides STEMCELL_ROOT)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Directory of reference package lists (overrides STEMCELL_ASSETS_DIR)
    #[arg(long, global = true)]
    assets: Option<PathBuf>,

    /// OS image name used in package list names (overrides STEMCELL_OS)
    #[arg(long, global = true)]
    os: Option<String>,

    /// Log filter, e.g. "debug" or "stemcheck=trace" (RUST_LOG wins if set)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the suite against the image
    Run {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowTarget,
    },

    /// Check prerequisites before running the suite
    Preflight {
        /// Fail if any checks fail (exit code 1)
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show current configuration
    Config,
    /// Show which platforms use which package lists
    Scenarios,
    /// Show the expected package set for the platform
    Expected,
    /// List available package lists
    Assets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let base_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    // Load .env if present
    dotenvy::dotenv().ok();
    let mut config = Config::load(&base_dir)?;
    if let Some(platform) = cli.platform {
        config.platform = Some(platform);
    }
    if let Some(root) = cli.root {
        config.root = root;
    }
    if let Some(assets) = cli.assets {
        config.assets_dir = assets;
    }
    if let Some(os) = cli.os {
        config.os = os;
    }

    match cli.command {
        Commands::Run { json } => {
            commands::cmd_run(&config, json)?;
        }

        Commands::Show { what } => {
            let show_target = match what {
                ShowTarget::Config => commands::show::ShowTarget::Config,
                ShowTarget::Scenarios => commands::show::ShowTarget::Scenarios,
                ShowTarget::Expected => commands::show::ShowTarget::Expected,
                ShowTarget::Assets => commands::show::ShowTarget::Assets,
            };
            commands::cmd_show(&config, show_target)?;
        }

        Commands::Preflight { strict } => {
            commands::cmd_preflight(&config, strict)?;
        }
    }

    Ok(())
}
