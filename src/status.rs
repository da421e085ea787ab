//! Readiness report and host tooling checks.
//!
//! The report is recomputed on every query from the filesystem and the
//! sandbox; nothing here is persisted. The serialized field names are a
//! stable interface for other tooling.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::layout::Layout;
use crate::patch::PatchInstaller;
use crate::probe;
use crate::process;
use crate::runner::SandboxRunner;

/// Point-in-time readiness of one target environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessReport {
    rootfs_present: bool,
    shell_binary_present: bool,
    runtime_present: bool,
    gateway_binary_present: bool,
    compatibility_shim_present: bool,
    profile_activated: bool,
    rootfs_path: PathBuf,
    complete: bool,
}

impl ReadinessReport {
    /// Build a report. `complete` is derived, never supplied.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rootfs_present: bool,
        shell_binary_present: bool,
        runtime_present: bool,
        gateway_binary_present: bool,
        compatibility_shim_present: bool,
        profile_activated: bool,
        rootfs_path: PathBuf,
    ) -> Self {
        Self {
            rootfs_present,
            shell_binary_present,
            runtime_present,
            gateway_binary_present,
            compatibility_shim_present,
            profile_activated,
            rootfs_path,
            complete: is_complete(
                rootfs_present,
                shell_binary_present,
                compatibility_shim_present,
            ),
        }
    }

    pub fn rootfs_present(&self) -> bool {
        self.rootfs_present
    }

    pub fn shell_binary_present(&self) -> bool {
        self.shell_binary_present
    }

    pub fn runtime_present(&self) -> bool {
        self.runtime_present
    }

    pub fn gateway_binary_present(&self) -> bool {
        self.gateway_binary_present
    }

    pub fn compatibility_shim_present(&self) -> bool {
        self.compatibility_shim_present
    }

    pub fn profile_activated(&self) -> bool {
        self.profile_activated
    }

    pub fn rootfs_path(&self) -> &Path {
        &self.rootfs_path
    }

    pub fn complete(&self) -> bool {
        self.complete
    }

    /// Does the rootfs need to be (re-)extracted?
    pub fn needs_rootfs(&self) -> bool {
        !(self.rootfs_present && self.shell_binary_present)
    }

    pub fn stage(&self) -> Stage {
        if self.needs_rootfs() {
            Stage::Unprovisioned
        } else if !self.compatibility_shim_present {
            Stage::RootfsOnly
        } else if !self.profile_activated {
            Stage::RootfsPatched
        } else {
            Stage::Complete
        }
    }
}

/// Provisioning completeness.
///
/// Runtime and gateway presence are deliberately not part of it: they are
/// software the user installs separately.
pub fn is_complete(rootfs: bool, shell_binary: bool, shim: bool) -> bool {
    rootfs && shell_binary && shim
}

/// Node of the provisioning state machine, derived from a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Unprovisioned,
    RootfsOnly,
    RootfsPatched,
    Complete,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Unprovisioned => "unprovisioned",
            Stage::RootfsOnly => "rootfs extracted, shim missing",
            Stage::RootfsPatched => "shim installed, profiles not activated",
            Stage::Complete => "complete",
        };
        f.write_str(s)
    }
}

/// Run every probe and assemble the report. Never fails.
pub fn compute_readiness<R: SandboxRunner>(
    layout: &Layout,
    runner: &R,
    gateway: &str,
) -> ReadinessReport {
    let rootfs_present = probe::file_exists(&layout.rootfs_dir());
    let shell_binary_present = probe::file_exists(&layout.shell_binary());
    let shim_present = probe::file_exists(&layout.shim_path());

    ReadinessReport::new(
        rootfs_present,
        shell_binary_present,
        probe::probe_runtime(runner),
        probe::probe_command(runner, gateway),
        shim_present,
        PatchInstaller::new(layout).profiles_activated(),
        layout.rootfs_dir(),
    )
}

/// Host-side tools the command-line variant relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostTooling {
    pub node: bool,
    pub package_manager: bool,
    pub git: bool,
    pub proot: bool,
}

impl HostTooling {
    pub fn probe() -> Self {
        Self {
            node: process::exists("node"),
            package_manager: process::exists("npm"),
            git: process::exists("git"),
            proot: process::exists("proot") || process::exists("proot-distro"),
        }
    }
}

/// Everything `status` reports.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    #[serde(flatten)]
    pub readiness: ReadinessReport,
    pub stage: Stage,
    pub tooling: HostTooling,
}

impl StatusReport {
    pub fn new(readiness: ReadinessReport, tooling: HostTooling) -> Self {
        Self {
            stage: readiness.stage(),
            readiness,
            tooling,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Print the report to stdout.
    pub fn print(&self) {
        fn line(label: &str, ok: bool, yes: &str, no: &str) {
            let (icon, text) = if ok { ("✓", yes) } else { ("✗", no) };
            println!("  {:<16}{} {}", label, icon, text);
        }

        let r = &self.readiness;
        let t = &self.tooling;

        println!("Dependencies:");
        line("Node.js:", t.node, "installed", "missing");
        line("npm:", t.package_manager, "installed", "missing");
        line("git:", t.git, "installed", "missing");
        line("proot:", t.proot, "installed", "missing");
        println!();

        println!("Environment ({}):", r.rootfs_path.display());
        line("Rootfs:", r.rootfs_present, "present", "missing");
        line("bash:", r.shell_binary_present, "present", "missing");
        line("Bionic Bypass:", r.compatibility_shim_present, "installed", "not installed");
        line("Profiles:", r.profile_activated, "activated", "not activated");
        line("Node (rootfs):", r.runtime_present, "installed", "not installed");
        line("OpenClaw:", r.gateway_binary_present, "installed", "not installed");
        println!();

        if r.complete {
            println!("Status: Ready ({})", self.stage);
            if r.gateway_binary_present {
                println!("Start with: openclawd start");
            } else {
                println!("Install the gateway: openclawd setup --install-gateway");
            }
        } else {
            println!("Status: Setup incomplete ({})", self.stage);
            println!("Run: openclawd setup");
        }
    }
}
