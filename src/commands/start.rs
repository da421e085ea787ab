//! Start command - launch the gateway.

use anyhow::Result;

use openclawd::config::Config;
use openclawd::gateway::{GatewayOutcome, LaunchMode};
use openclawd::patch::PRELOAD_VAR;

use super::bootstrap_for;

/// Execute the start command. Returns the process exit code.
pub fn cmd_start(config: &Config, detach: bool) -> Result<i32> {
    let mode = if detach {
        LaunchMode::Background
    } else {
        LaunchMode::Foreground
    };

    println!("Starting OpenClaw gateway...\n");
    let existing = std::env::var(PRELOAD_VAR).ok();
    match bootstrap_for(config).start_gateway(mode, existing)? {
        GatewayOutcome::Exited(code) => Ok(code),
        GatewayOutcome::Detached(pid) => {
            println!("Gateway running in the background (pid {})", pid);
            Ok(0)
        }
        GatewayOutcome::LaunchFailed(msg) => {
            eprintln!("Failed to start gateway: {}", msg);
            Ok(0)
        }
    }
}
