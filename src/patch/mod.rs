//! Compatibility shim installation and shell profile activation.
//!
//! Both steps are idempotent: the shim is a whole-file replace with fixed
//! content, and a profile is only appended to when it does not carry the
//! activation marker yet. Profiles are appended in place so symlinked
//! dotfiles stay links.

pub mod profile;
pub mod shim;

use log::{debug, info};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::{append_to_file, replace_file_atomic};
use crate::errors::PatchError;
use crate::layout::{Layout, SHIM_GUEST_PATH};

pub use profile::{is_activated, MARKER, PRELOAD_VAR};

/// Preload setting to hand to processes launched after activation.
///
/// Replaces mutating the current process environment: whoever launches the
/// gateway receives this and decides how to apply it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShimActivation {
    pub var: &'static str,
    pub value: String,
}

impl ShimActivation {
    /// Preload the shim found at `shim` by the launched process.
    pub fn new(shim: &Path) -> Self {
        Self {
            var: PRELOAD_VAR,
            value: profile::preload_value(shim),
        }
    }

    /// Value to launch with: an already-set value wins over the shim's.
    pub fn resolve(&self, existing: Option<String>) -> String {
        match existing {
            Some(value) if !value.is_empty() => value,
            _ => self.value.clone(),
        }
    }
}

/// Writes the shim and patches profiles of one layout.
pub struct PatchInstaller<'a> {
    layout: &'a Layout,
    /// Shim path written into profiles and the preload setting.
    shim_reference: PathBuf,
}

impl<'a> PatchInstaller<'a> {
    /// Installer whose profiles reference the shim as seen from inside the rootfs.
    pub fn new(layout: &'a Layout) -> Self {
        Self {
            layout,
            shim_reference: PathBuf::from(SHIM_GUEST_PATH),
        }
    }

    /// Reference the shim by `path` instead, e.g. its host path when the
    /// gateway runs outside the sandbox.
    pub fn with_shim_reference(mut self, path: impl Into<PathBuf>) -> Self {
        self.shim_reference = path.into();
        self
    }

    /// Write the shim file, replacing any previous copy. Returns its path.
    pub fn install_compatibility_shim(&self) -> Result<PathBuf, PatchError> {
        let path = self.layout.shim_path();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| PatchError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        replace_file_atomic(&path, shim::render(), 0o644).map_err(|source| {
            PatchError::Write {
                path: path.clone(),
                source,
            }
        })?;

        info!("Installed compatibility shim at {}", path.display());
        Ok(path)
    }

    /// Append the activation block to every existing profile lacking it.
    ///
    /// Profiles that do not exist are left alone. Returns the files changed.
    pub fn activate_shim(&self) -> Result<BTreeSet<PathBuf>, PatchError> {
        let mut modified = BTreeSet::new();

        for path in self.layout.profile_candidates() {
            if !path.is_file() {
                debug!("Skipping absent profile {}", path.display());
                continue;
            }

            let content = fs::read_to_string(&path).map_err(|source| PatchError::Read {
                path: path.clone(),
                source,
            })?;

            let Some(block) = profile::pending_block(&content, &self.shim_reference) else {
                debug!("{} already activated", path.display());
                continue;
            };

            append_to_file(&path, block).map_err(|source| PatchError::Write {
                path: path.clone(),
                source,
            })?;
            info!("Updated {}", path.display());
            modified.insert(path);
        }

        Ok(modified)
    }

    /// Preload setting matching the installed shim.
    pub fn shim_activation(&self) -> ShimActivation {
        ShimActivation::new(&self.shim_reference)
    }

    /// True when every existing profile carries the marker.
    pub fn profiles_activated(&self) -> bool {
        self.layout
            .profile_candidates()
            .iter()
            .filter(|p| p.is_file())
            .all(|p| {
                fs::read_to_string(p)
                    .map(|c| is_activated(&c))
                    .unwrap_or(false)
            })
    }
}
