//! Utilities for file operations with automatic parent directory creation.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tempfile::NamedTempFile;

/// Write a file, creating parent directories as needed.
///
/// This is a convenience function that combines creating the parent directory
/// with writing the file content, eliminating the common pattern of:
/// ```ignore
/// if let Some(parent) = path.parent() {
///     fs::create_dir_all(parent)?;
/// }
/// fs::write(path, content)?;
/// ```
pub fn write_file_with_dirs<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

/// Write a file with specific Unix permissions, creating parent directories as needed.
///
/// # Arguments
/// * `path` - Path to the file to write
/// * `content` - Content to write
/// * `mode` - Unix permission bits (e.g., 0o644, 0o755)
pub fn write_file_mode<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
    mode: u32,
) -> io::Result<()> {
    let path = path.as_ref();
    write_file_with_dirs(path, content)?;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

/// Replace `path` with `content` in one step.
///
/// The content goes to a temporary file in the same directory which is then
/// renamed over the target, so readers see either the old or the new file,
/// never a partial write. An existing file's permissions are kept; a new
/// file gets `default_mode`.
pub fn replace_file_atomic<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
    default_mode: u32,
) -> io::Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let permissions = match fs::metadata(path) {
        Ok(meta) => meta.permissions(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => fs::Permissions::from_mode(default_mode),
        Err(e) => return Err(e),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_ref())?;
    tmp.as_file().sync_all()?;
    tmp.as_file().set_permissions(permissions)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Append `content` to an existing file.
///
/// Symlinks are followed, and the file keeps its owner and permissions.
pub fn append_to_file<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, content: C) -> io::Result<()> {
    let mut file = OpenOptions::new().append(true).open(path.as_ref())?;
    file.write_all(content.as_ref())?;
    file.sync_all()
}
