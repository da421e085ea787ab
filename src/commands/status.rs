//! Status command - read-only readiness report.

use anyhow::Result;

use openclawd::config::Config;

use super::bootstrap_for;

/// Execute the status command.
pub fn cmd_status(config: &Config, json: bool) -> Result<()> {
    let report = bootstrap_for(config).status();
    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("Installation Status:\n");
        report.print();
    }
    Ok(())
}
