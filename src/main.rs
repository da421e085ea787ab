//! openclawd - OpenClaw gateway bootstrapper for Android.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use openclawd::config::Config;

#[derive(Parser)]
#[command(name = "openclawd")]
#[command(version, about = "AI Gateway for Android - rootfs bootstrapper")]
#[command(
    after_help = "EXAMPLES:\n  openclawd setup --archive ubuntu.tar.gz  First-time setup\n  openclawd start                          Start the gateway\n  openclawd status                         Check if everything is installed"
)]
struct Cli {
    /// Base directory of the environment (overrides OPENCLAWD_HOME)
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full installation and configuration
    #[command(alias = "install")]
    Setup {
        /// Rootfs archive (.tar.gz) to extract if the rootfs is missing
        #[arg(long)]
        archive: Option<PathBuf>,
        /// Also install the OpenClaw gateway with npm
        #[arg(long)]
        install_gateway: bool,
    },

    /// Check installation status
    Status {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Install/update Bionic Bypass only
    Bypass,

    /// Start OpenClaw gateway
    #[command(alias = "run")]
    Start {
        /// Return immediately and leave the gateway running
        #[arg(long)]
        detach: bool,
    },

    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = Config::load();
    if let Some(base_dir) = cli.base_dir {
        config.base_dir = base_dir;
    }

    match cli.command {
        Commands::Setup {
            archive,
            install_gateway,
        } => commands::cmd_setup(&config, archive, install_gateway)?,
        Commands::Status { json } => commands::cmd_status(&config, json)?,
        Commands::Bypass => commands::cmd_bypass(&config)?,
        Commands::Start { detach } => {
            let code = commands::cmd_start(&config, detach)?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Config => config.print(),
    }

    Ok(())
}
