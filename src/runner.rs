//! Sandboxed command runners.
//!
//! The orchestrator only needs "build a command that runs this shell snippet
//! inside the target environment". The Android app runs the rootfs under
//! proot; the Termux command-line tool runs directly on the host.

use log::debug;
use std::path::PathBuf;

use crate::errors::ProbeError;
use crate::layout::{Layout, SHIM_GUEST_PATH};
use crate::process::{self, Cmd};

/// PATH used inside the rootfs.
const GUEST_PATH: &str = "/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin";

/// Executes shell commands inside a target environment.
pub trait SandboxRunner {
    /// Build the command that runs `script` inside the environment.
    fn command(&self, script: &str) -> Cmd;

    /// Path of the installed shim as processes in this environment see it.
    fn shim_path(&self, layout: &Layout) -> PathBuf;

    /// Run `script` to completion and return its stdout.
    ///
    /// A non-zero exit or a runner that cannot be started is a [`ProbeError`].
    fn run_sync(&self, script: &str) -> Result<String, ProbeError> {
        debug!("sandbox: {}", script);
        let result = self
            .command(script)
            .output()
            .map_err(|source| ProbeError::Spawn {
                command: script.to_string(),
                source,
            })?;

        if !result.success() {
            return Err(ProbeError::Failed {
                command: script.to_string(),
                exit_code: result.code(),
                output: result.merged_output(),
            });
        }
        Ok(result.stdout)
    }
}

impl<R: SandboxRunner + ?Sized> SandboxRunner for &R {
    fn command(&self, script: &str) -> Cmd {
        (**self).command(script)
    }

    fn shim_path(&self, layout: &Layout) -> PathBuf {
        (**self).shim_path(layout)
    }

    fn run_sync(&self, script: &str) -> Result<String, ProbeError> {
        (**self).run_sync(script)
    }
}

impl<R: SandboxRunner + ?Sized> SandboxRunner for Box<R> {
    fn command(&self, script: &str) -> Cmd {
        (**self).command(script)
    }

    fn shim_path(&self, layout: &Layout) -> PathBuf {
        (**self).shim_path(layout)
    }

    fn run_sync(&self, script: &str) -> Result<String, ProbeError> {
        (**self).run_sync(script)
    }
}

/// Runs commands inside the rootfs through proot.
#[derive(Debug, Clone)]
pub struct ProotRunner {
    proot: PathBuf,
    rootfs: PathBuf,
    tmp: PathBuf,
    resolv_conf: PathBuf,
}

impl ProotRunner {
    /// `proot` is looked up on the host PATH unless it already is a path.
    pub fn new(proot: &str, layout: &Layout) -> Self {
        let resolved = process::which(proot).unwrap_or_else(|| PathBuf::from(proot));
        debug!("proot resolved to {}", resolved.display());
        Self {
            proot: resolved,
            rootfs: layout.rootfs_dir(),
            tmp: layout.tmp_dir(),
            resolv_conf: layout.resolv_conf(),
        }
    }
}

impl SandboxRunner for ProotRunner {
    fn command(&self, script: &str) -> Cmd {
        Cmd::new(self.proot.to_string_lossy())
            .args(["--link2symlink", "--kill-on-exit", "-0"])
            .arg(format!("--rootfs={}", self.rootfs.display()))
            .args(["-b", "/dev", "-b", "/proc", "-b", "/sys"])
            .arg("-b")
            .arg(format!("{}:/tmp", self.tmp.display()))
            .arg("-b")
            .arg(format!("{}:/etc/resolv.conf", self.resolv_conf.display()))
            // guest environment; proot itself keeps the host PATH
            .args(["-w", "/root", "/usr/bin/env"])
            .arg("HOME=/root")
            .arg(format!("PATH={}", GUEST_PATH))
            .arg("TERM=xterm-256color")
            .args(["/bin/sh", "-c", script])
            // proot refuses to start when its own tmp dir is not writable
            .env("PROOT_TMP_DIR", self.tmp.to_string_lossy())
    }

    fn shim_path(&self, _layout: &Layout) -> PathBuf {
        PathBuf::from(SHIM_GUEST_PATH)
    }
}

/// Runs commands directly on the host with `sh -c`.
#[derive(Debug, Clone, Default)]
pub struct HostRunner;

impl SandboxRunner for HostRunner {
    fn command(&self, script: &str) -> Cmd {
        Cmd::new("sh").args(["-c", script])
    }

    fn shim_path(&self, layout: &Layout) -> PathBuf {
        let path = layout.shim_path();
        if path.is_relative() {
            if let Ok(cwd) = std::env::current_dir() {
                return cwd.join(path);
            }
        }
        path
    }
}
