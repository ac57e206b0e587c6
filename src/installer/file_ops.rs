//! Basic file operations for script installation
//!
//! This module handles low-level file operations:
//! - Directory creation (create_parent_dirs)
//! - Atomic copies and writes (temp file in the target directory, then rename)
//! - Activation directive patching

use std::fs::Permissions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::fs::{read_error, remove_error, write_error};
use crate::error::{Result, fs as fs_error};

/// Create the missing ancestors of `path`, returning the ones created (outermost first)
pub fn create_parent_dirs(path: &Path) -> Result<Vec<PathBuf>> {
    let Some(parent) = path.parent() else {
        return Ok(Vec::new());
    };

    let mut missing: Vec<PathBuf> = parent
        .ancestors()
        .take_while(|dir| !dir.as_os_str().is_empty() && !dir.exists())
        .map(Path::to_path_buf)
        .collect();
    missing.reverse();

    std::fs::create_dir_all(parent).map_err(|e| write_error(parent, &e))?;
    Ok(missing)
}

/// Replace `target` with `contents` without ever exposing a partial file
///
/// Without explicit `permissions` the existing target's are kept. The temp
/// file is private (0600) until they are applied.
pub fn write_atomic(
    target: &Path,
    contents: &[u8],
    permissions: Option<Permissions>,
) -> Result<()> {
    let dir = target
        .parent()
        .ok_or_else(|| fs_error::write_failed(target.display().to_string(), "no parent directory"))?;
    let permissions =
        permissions.or_else(|| std::fs::metadata(target).ok().map(|m| m.permissions()));

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| write_error(target, &e))?;
    temp.write_all(contents)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| write_error(target, &e))?;
    if let Some(permissions) = permissions {
        temp.as_file()
            .set_permissions(permissions)
            .map_err(|e| write_error(target, &e))?;
    }
    temp.persist(target).map_err(|e| write_error(target, &e.error))?;
    Ok(())
}

/// The source's permissions, kept writable by the owner so refresh can replace the copy
fn installed_permissions(source: &Path) -> Result<Permissions> {
    let mut permissions = std::fs::metadata(source)
        .map_err(|e| read_error(source, &e))?
        .permissions();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        permissions.set_mode(permissions.mode() | 0o200);
    }
    #[cfg(not(unix))]
    permissions.set_readonly(false);
    Ok(permissions)
}

/// Copy `source` to `target` through [`write_atomic`], carrying over its permissions
pub fn copy_atomic(source: &Path, target: &Path) -> Result<()> {
    let contents = std::fs::read(source).map_err(|e| read_error(source, &e))?;
    write_atomic(target, &contents, Some(installed_permissions(source)?))
}

/// Remove a file, reporting whether it existed
pub fn remove_if_present(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(remove_error(path, &e)),
    }
}

/// The directive line, a blank line, then the untouched original
pub fn prepend_directive(content: &str, directive: &str) -> String {
    format!("{directive}\n\n{content}")
}

/// Write `target` as the clean `source` with the directive prepended
///
/// Always reads from the staged source, so running it twice never stacks
/// directives.
pub fn patch_from_source(source: &Path, target: &Path, directive: &str) -> Result<()> {
    let original = std::fs::read_to_string(source).map_err(|e| read_error(source, &e))?;
    write_atomic(
        target,
        prepend_directive(&original, directive).as_bytes(),
        Some(installed_permissions(source)?),
    )
}
