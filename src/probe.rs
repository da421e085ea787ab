//! Environment probes.
//!
//! Each probe is independent, has no side effects and caches nothing, so a
//! status query can re-run all of them. Subprocess failures are absorbed
//! here: a probe that cannot be evaluated answers "absent".

use log::debug;
use std::path::Path;

use crate::runner::SandboxRunner;

/// Command whose output identifies the JavaScript runtime.
pub const RUNTIME_PROBE: &str = "node --version";

pub fn file_exists(path: &Path) -> bool {
    path.exists()
}

/// Version strings look like `v20.11.0`.
pub fn runtime_reported(output: &str) -> bool {
    output.trim().starts_with('v')
}

/// `command -v` prints the resolved path, or nothing.
pub fn path_resolved(output: &str) -> bool {
    !output.trim().is_empty()
}

/// Shell snippet resolving `name` on PATH.
pub fn resolve_command(name: &str) -> String {
    format!("command -v {}", name)
}

/// Is the JavaScript runtime installed inside the environment?
pub fn probe_runtime<R: SandboxRunner>(runner: &R) -> bool {
    match runner.run_sync(RUNTIME_PROBE) {
        Ok(output) => runtime_reported(&output),
        Err(e) => {
            debug!("runtime probe failed: {}", e);
            false
        }
    }
}

/// Does `name` resolve to an executable inside the environment?
pub fn probe_command<R: SandboxRunner>(runner: &R, name: &str) -> bool {
    match runner.run_sync(&resolve_command(name)) {
        Ok(output) => path_resolved(&output),
        Err(e) => {
            debug!("probe for '{}' failed: {}", name, e);
            false
        }
    }
}
