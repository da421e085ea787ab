//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `setup` - Provision the environment
//! - `status` - Report readiness
//! - `bypass` - Install the Bionic Bypass only
//! - `start` - Launch the gateway

mod bypass;
mod setup;
mod start;
mod status;

pub use bypass::cmd_bypass;
pub use setup::cmd_setup;
pub use start::cmd_start;
pub use status::cmd_status;

use openclawd::bootstrap::Bootstrap;
use openclawd::config::{Config, RunnerKind};
use openclawd::gateway::GatewaySpec;
use openclawd::runner::{HostRunner, ProotRunner, SandboxRunner};

/// Orchestrator wired up from configuration.
pub(crate) fn bootstrap_for(config: &Config) -> Bootstrap<Box<dyn SandboxRunner>> {
    let layout = config.layout();
    let runner: Box<dyn SandboxRunner> = match config.runner {
        RunnerKind::Proot => Box::new(ProotRunner::new(&config.proot, &layout)),
        RunnerKind::Host => Box::new(HostRunner),
    };
    Bootstrap::new(layout, runner)
        .with_archive_tool(config.archive_tool.clone())
        .with_gateway(GatewaySpec::new(&config.gateway))
}
