//! Locating, installing and launching the OpenClaw gateway.

use log::{error, info};

use crate::patch::ShimActivation;
use crate::process::Cmd;
use crate::runner::SandboxRunner;

/// Default gateway executable name.
pub const DEFAULT_GATEWAY: &str = "openclaw";

/// Which gateway to run and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySpec {
    pub name: String,
    pub args: Vec<String>,
}

impl GatewaySpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: vec!["gateway".to_string(), "--verbose".to_string()],
        }
    }

    /// Shell line starting the gateway.
    pub fn launch_script(&self) -> String {
        let mut script = self.name.clone();
        for arg in &self.args {
            script.push(' ');
            script.push_str(arg);
        }
        script
    }

    /// Shell line installing the gateway through npm.
    pub fn install_script(&self) -> String {
        format!("npm install -g {}", self.name)
    }
}

impl Default for GatewaySpec {
    fn default() -> Self {
        Self::new(DEFAULT_GATEWAY)
    }
}

/// Whether `start` waits for the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Block until the gateway exits.
    Foreground,
    /// Start it and return right away.
    Background,
}

/// How a launch went.
#[derive(Debug, PartialEq, Eq)]
pub enum GatewayOutcome {
    /// Foreground gateway exited with this code (-1 when killed by a signal).
    Exited(i32),
    /// Background gateway is running with this pid.
    Detached(u32),
    /// The gateway process could not be started at all.
    LaunchFailed(String),
}

/// Build the launch command with the preload variable applied.
///
/// `existing` is the caller's current value of the variable; when set it is
/// passed through untouched so a user override wins.
pub fn launch_command<R: SandboxRunner>(
    runner: &R,
    spec: &GatewaySpec,
    activation: &ShimActivation,
    existing: Option<String>,
) -> Cmd {
    runner
        .command(&spec.launch_script())
        .env(activation.var, activation.resolve(existing))
}

/// Start the gateway with inherited stdio.
pub fn launch(cmd: &Cmd, mode: LaunchMode) -> GatewayOutcome {
    info!("Starting {}...", cmd.program());
    match mode {
        LaunchMode::Foreground => match cmd.status_inherited() {
            Ok(status) => GatewayOutcome::Exited(status.code().unwrap_or(-1)),
            Err(e) => {
                error!("Failed to start gateway: {}", e);
                GatewayOutcome::LaunchFailed(e.to_string())
            }
        },
        LaunchMode::Background => match cmd.spawn() {
            Ok(child) => GatewayOutcome::Detached(child.id()),
            Err(e) => {
                error!("Failed to start gateway: {}", e);
                GatewayOutcome::LaunchFailed(e.to_string())
            }
        },
    }
}

/// Install the gateway inside the environment. Returns false on failure.
///
/// npm output goes straight to the terminal; installs take minutes.
pub fn install<R: SandboxRunner>(runner: &R, spec: &GatewaySpec) -> bool {
    info!("Installing {}...", spec.name);
    let result = runner.command(&spec.install_script()).status_inherited();
    match result {
        Ok(status) if status.success() => true,
        Ok(status) => {
            error!(
                "Failed to install {} (exit code {}). Install it manually: {}",
                spec.name,
                status.code().unwrap_or(-1),
                spec.install_script()
            );
            false
        }
        Err(e) => {
            error!("Failed to install {}: {}", spec.name, e);
            false
        }
    }
}
