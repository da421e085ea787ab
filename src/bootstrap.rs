//! Bootstrap orchestration.
//!
//! There is no stored state: the current stage is always re-derived from a
//! fresh [`ReadinessReport`], and every step is idempotent. A `setup` killed
//! halfway is resumed by running `setup` again.

use log::{info, warn};
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::errors::{BootstrapError, PreconditionError};
use crate::gateway::{self, GatewayOutcome, GatewaySpec, LaunchMode};
use crate::layout::Layout;
use crate::patch::PatchInstaller;
use crate::probe;
use crate::provision::{ArchiveProvisioner, ArchiveTool};
use crate::runner::SandboxRunner;
use crate::status::{compute_readiness, HostTooling, ReadinessReport, StatusReport};

/// Inputs to [`Bootstrap::setup`].
#[derive(Debug, Clone, Default)]
pub struct SetupOptions {
    /// Rootfs archive to extract when the rootfs is missing.
    pub archive: Option<PathBuf>,
    /// Also try to install the gateway inside the environment.
    pub install_gateway: bool,
}

/// What `setup` did.
#[derive(Debug, Clone)]
pub struct SetupOutcome {
    pub initial: ReadinessReport,
    pub extracted: bool,
    pub shim_path: PathBuf,
    pub activated: BTreeSet<PathBuf>,
    /// `None` when installation was not requested.
    pub gateway_installed: Option<bool>,
    pub report: ReadinessReport,
}

/// What `bypass` did.
#[derive(Debug, Clone)]
pub struct BypassOutcome {
    pub shim_path: PathBuf,
    pub activated: BTreeSet<PathBuf>,
}

/// Drives one target environment from unprovisioned to ready.
pub struct Bootstrap<R: SandboxRunner> {
    layout: Layout,
    runner: R,
    archive_tool: ArchiveTool,
    verify_archive_paths: bool,
    gateway: GatewaySpec,
}

impl<R: SandboxRunner> Bootstrap<R> {
    pub fn new(layout: Layout, runner: R) -> Self {
        Self {
            layout,
            runner,
            archive_tool: ArchiveTool::default(),
            verify_archive_paths: true,
            gateway: GatewaySpec::default(),
        }
    }

    pub fn with_archive_tool(mut self, tool: ArchiveTool) -> Self {
        self.archive_tool = tool;
        self
    }

    pub fn with_archive_path_check(mut self, verify: bool) -> Self {
        self.verify_archive_paths = verify;
        self
    }

    pub fn with_gateway(mut self, gateway: GatewaySpec) -> Self {
        self.gateway = gateway;
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn readiness(&self) -> ReadinessReport {
        compute_readiness(&self.layout, &self.runner, &self.gateway.name)
    }

    /// Bring the environment to readiness, doing only what is missing.
    pub fn setup(&self, options: &SetupOptions) -> Result<SetupOutcome, BootstrapError> {
        let initial = self.readiness();
        info!("Current stage: {}", initial.stage());

        let mut extracted = false;
        if initial.needs_rootfs() {
            let archive = options
                .archive
                .as_ref()
                .ok_or_else(|| PreconditionError::ArchiveRequired {
                    rootfs: self.layout.rootfs_dir(),
                })?;
            ArchiveProvisioner::new(self.layout.rootfs_dir(), self.archive_tool.clone())
                .verify_paths(self.verify_archive_paths)
                .extract_rootfs(archive)?;
            extracted = true;
        } else if let Some(archive) = &options.archive {
            info!(
                "Rootfs already present, not extracting {}",
                archive.display()
            );
        }

        self.layout.ensure_directories()?;
        self.layout.write_resolv_conf()?;
        self.layout.write_wakelock_script()?;

        let BypassOutcome {
            shim_path,
            activated,
        } = self.bypass()?;

        let gateway_installed = if options.install_gateway {
            if probe::probe_command(&self.runner, &self.gateway.name) {
                info!("{} is already installed", self.gateway.name);
            } else {
                gateway::install(&self.runner, &self.gateway);
            }
            Some(probe::probe_command(&self.runner, &self.gateway.name))
        } else {
            None
        };

        let report = self.readiness();
        info!("Final stage: {}", report.stage());

        Ok(SetupOutcome {
            initial,
            extracted,
            shim_path,
            activated,
            gateway_installed,
            report,
        })
    }

    /// Read-only status of the environment and the host.
    pub fn status(&self) -> StatusReport {
        StatusReport::new(self.readiness(), HostTooling::probe())
    }

    /// Install the shim and activate it in existing profiles.
    pub fn bypass(&self) -> Result<BypassOutcome, BootstrapError> {
        let installer = self.patch_installer();
        let shim_path = installer.install_compatibility_shim()?;
        let activated = installer.activate_shim()?;
        Ok(BypassOutcome {
            shim_path,
            activated,
        })
    }

    /// Start the gateway, installing the shim first if needed.
    ///
    /// `existing_preload` is the caller's current value of the preload
    /// variable, kept when set.
    pub fn start_gateway(
        &self,
        mode: LaunchMode,
        existing_preload: Option<String>,
    ) -> Result<GatewayOutcome, BootstrapError> {
        if !probe::file_exists(&self.layout.shim_path()) {
            warn!("Bionic Bypass not installed, installing it first");
            self.bypass()?;
        }

        if !probe::probe_command(&self.runner, &self.gateway.name) {
            return Err(PreconditionError::GatewayNotFound {
                name: self.gateway.name.clone(),
            }
            .into());
        }

        let activation = self.patch_installer().shim_activation();
        let cmd = gateway::launch_command(
            &self.runner,
            &self.gateway,
            &activation,
            existing_preload,
        );
        Ok(gateway::launch(&cmd, mode))
    }

    /// Installer referencing the shim the way this runner sees it.
    fn patch_installer(&self) -> PatchInstaller<'_> {
        PatchInstaller::new(&self.layout).with_shim_reference(self.runner.shim_path(&self.layout))
    }
}
