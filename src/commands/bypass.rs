//! Bypass command - (re)install the Bionic Bypass only.

use anyhow::Result;

use openclawd::config::Config;

use super::bootstrap_for;

/// Execute the bypass command.
pub fn cmd_bypass(config: &Config) -> Result<()> {
    println!("Installing Bionic Bypass...");
    let outcome = bootstrap_for(config).bypass()?;
    println!("Installed at: {}", outcome.shim_path.display());
    for path in &outcome.activated {
        println!("Updated {}", path.display());
    }
    println!("Restart your terminal to apply changes.");
    Ok(())
}
