//! Target environment layout.
//!
//! Everything openclawd touches lives under one base directory:
//!
//! ```text
//! B/rootfs/<distro>/                           extracted root filesystem
//! B/rootfs/<distro>/bin/bash                   shell binary probe target
//! B/rootfs/<distro>/root/.openclawd/<shim>     compatibility shim
//! B/rootfs/<distro>/root/.bashrc, .zshrc       patched shell profiles
//! B/tmp/, B/home/, B/config/                   auxiliary directories
//! B/config/resolv.conf                         DNS resolver config
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::common::{write_file_mode, write_file_with_dirs};
use crate::errors::BootstrapError;

/// Distribution name used when none is configured.
pub const DEFAULT_DISTRO: &str = "ubuntu";

/// Per-tool directory name inside a home directory.
pub const STATE_DIR_NAME: &str = ".openclawd";

/// File name of the compatibility shim.
pub const SHIM_FILE_NAME: &str = "bionic-bypass.js";

/// Where the shim appears from inside the rootfs.
pub const SHIM_GUEST_PATH: &str = "/root/.openclawd/bionic-bypass.js";

/// Shell profiles that get the activation block, relative to the guest home.
pub const PROFILE_FILES: &[&str] = &[".bashrc", ".zshrc"];

/// Resolver config handed to the sandbox.
pub const RESOLV_CONF: &str = "nameserver 8.8.8.8\nnameserver 8.8.4.4\n";

const WAKELOCK_SCRIPT: &str = r#"#!/bin/bash
# Keep Termux awake while OpenClaw runs
termux-wake-lock
trap "termux-wake-unlock" EXIT
exec "$@"
"#;

/// Fixed directory structure of one target environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    base: PathBuf,
    distro: String,
}

impl Layout {
    pub fn new(base: impl Into<PathBuf>, distro: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            distro: distro.into(),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn distro(&self) -> &str {
        &self.distro
    }

    pub fn rootfs_dir(&self) -> PathBuf {
        self.base.join("rootfs").join(&self.distro)
    }

    pub fn tmp_dir(&self) -> PathBuf {
        self.base.join("tmp")
    }

    pub fn home_dir(&self) -> PathBuf {
        self.base.join("home")
    }

    pub fn config_dir(&self) -> PathBuf {
        self.base.join("config")
    }

    /// Tool state in the host-side home directory.
    pub fn state_dir(&self) -> PathBuf {
        self.home_dir().join(STATE_DIR_NAME)
    }

    pub fn shell_binary(&self) -> PathBuf {
        self.rootfs_dir().join("bin/bash")
    }

    /// Home directory of the root user inside the rootfs.
    pub fn guest_home(&self) -> PathBuf {
        self.rootfs_dir().join("root")
    }

    /// Host path of the compatibility shim.
    pub fn shim_path(&self) -> PathBuf {
        self.guest_home().join(STATE_DIR_NAME).join(SHIM_FILE_NAME)
    }

    /// Candidate shell profiles, whether or not they exist.
    pub fn profile_candidates(&self) -> Vec<PathBuf> {
        let home = self.guest_home();
        PROFILE_FILES.iter().map(|name| home.join(name)).collect()
    }

    pub fn resolv_conf(&self) -> PathBuf {
        self.config_dir().join("resolv.conf")
    }

    pub fn wakelock_script(&self) -> PathBuf {
        self.state_dir().join("wakelock.sh")
    }

    /// All directories that must exist before anything else runs.
    pub fn directories(&self) -> [PathBuf; 5] {
        [
            self.rootfs_dir(),
            self.tmp_dir(),
            self.home_dir(),
            self.config_dir(),
            self.state_dir(),
        ]
    }

    /// Create every directory of the layout. Safe to call any number of times.
    pub fn ensure_directories(&self) -> Result<(), BootstrapError> {
        for dir in self.directories() {
            fs::create_dir_all(&dir).map_err(|source| BootstrapError::Layout {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Write the fixed resolver config, replacing whatever is there.
    pub fn write_resolv_conf(&self) -> Result<PathBuf, BootstrapError> {
        let path = self.resolv_conf();
        write_file_with_dirs(&path, RESOLV_CONF).map_err(|source| BootstrapError::Layout {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Write the wake-lock wrapper used to keep Termux alive under the gateway.
    pub fn write_wakelock_script(&self) -> Result<PathBuf, BootstrapError> {
        let path = self.wakelock_script();
        write_file_mode(&path, WAKELOCK_SCRIPT, 0o755).map_err(|source| {
            BootstrapError::Layout {
                path: path.clone(),
                source,
            }
        })?;
        Ok(path)
    }
}
