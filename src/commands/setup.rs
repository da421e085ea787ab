//! Setup command - full provisioning.

use anyhow::Result;
use std::path::PathBuf;

use openclawd::bootstrap::SetupOptions;
use openclawd::config::Config;

use super::bootstrap_for;

/// Execute the setup command.
pub fn cmd_setup(config: &Config, archive: Option<PathBuf>, install_gateway: bool) -> Result<()> {
    let bootstrap = bootstrap_for(config);
    let options = SetupOptions {
        archive: archive.or_else(|| config.rootfs_archive.clone()),
        install_gateway,
    };

    println!("Starting OpenClawd setup...\n");
    let outcome = bootstrap.setup(&options)?;

    if outcome.extracted {
        println!("  Rootfs extracted to {}", outcome.report.rootfs_path().display());
    } else {
        println!("  Rootfs already present");
    }
    println!("  Bionic Bypass installed at: {}", outcome.shim_path.display());
    if outcome.activated.is_empty() {
        println!("  Shell profiles already activated");
    } else {
        for path in &outcome.activated {
            println!("  Updated {}", path.display());
        }
    }
    match outcome.gateway_installed {
        Some(true) => println!("  OpenClaw is installed ✓"),
        Some(false) => println!(
            "  OpenClaw installation failed. Install with: npm install -g {}",
            config.gateway
        ),
        None if outcome.report.gateway_binary_present() => {
            println!("  OpenClaw is already installed ✓")
        }
        None => println!("  OpenClaw not found. Install with: openclawd setup --install-gateway"),
    }
    println!();

    if outcome.report.complete() {
        println!("Setup complete!");
        println!();
        println!("Next steps:");
        println!("  1. Restart your terminal (or run: source ~/.bashrc)");
        println!("  2. Run: openclaw onboarding");
        println!("  3. Start gateway: openclawd start");
        println!();
        println!("Dashboard will be at: http://127.0.0.1:18789");
    } else {
        println!(
            "Setup finished, but the environment is not complete ({}).",
            outcome.report.stage()
        );
        println!("Run: openclawd status");
    }
    Ok(())
}
