//! Filesystem primitives used by the bin.
//!
//! Nothing here follows symlinks: a held symlink is moved and deleted as a
//! link, never through to its target.

use std::fs;
use std::io;
use std::path::Path;

/// Whether anything (file, directory, or dangling symlink) lives at `path`.
#[must_use]
pub fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Move a file, directory, or symlink to `dst`.
///
/// A plain rename when both sides share a filesystem; otherwise the entry is
/// copied and the source removed afterwards.
pub fn move_entry(src: &Path, dst: &Path) -> io::Result<()> {
    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            tracing::debug!(
                src = %src.display(),
                dst = %dst.display(),
                "rename crosses devices; copying instead"
            );
            if let Err(copy_err) = copy_entry(src, dst) {
                let _ = remove_entry(dst);
                return Err(copy_err);
            }
            remove_entry(src).map(|_| ())
        }
        Err(err) => Err(err),
    }
}

/// Delete whatever lives at `path`, recursing into directories.
///
/// Returns `Ok(false)` when there was nothing to delete.
pub fn remove_entry(path: &Path) -> io::Result<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };

    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    match result {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

fn copy_entry(src: &Path, dst: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(src)?;
    let file_type = metadata.file_type();

    if file_type.is_symlink() {
        copy_symlink(src, dst)
    } else if file_type.is_dir() {
        fs::create_dir(dst)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            copy_entry(&entry.path(), &dst.join(entry.file_name()))?;
        }
        fs::set_permissions(dst, metadata.permissions())
    } else {
        fs::copy(src, dst).map(|_| ())
    }
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    let target = fs::read_link(src)?;
    std::os::unix::fs::symlink(target, dst)
}

#[cfg(windows)]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    let target = fs::read_link(src)?;
    if fs::metadata(src).is_ok_and(|m| m.is_dir()) {
        std::os::windows::fs::symlink_dir(target, dst)
    } else {
        std::os::windows::fs::symlink_file(target, dst)
    }
}
