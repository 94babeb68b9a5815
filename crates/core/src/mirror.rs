//! Recursive directory mirroring
//!
//! Used to duplicate the installed JDK into an isolated working copy that is
//! later invoked as a toolchain, so per-file attributes (notably executable
//! permission bits) must survive the copy. The mirror makes no attempt to
//! clean up after a failed copy; the owning stage's rollback removes the
//! partial destination, because the stage's completion predicate is keyed on
//! the destination root's existence.

use crate::errors::{path_io, Result};
use std::fs;
use std::path::Path;
use tracing::trace;

/// Recursively copy `src` into `dst`, creating intermediate directories and
/// preserving file permissions. `dst` itself is created if needed; existing
/// destination files are overwritten.
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).map_err(|e| path_io("create directory", dst, e))?;

    for entry in fs::read_dir(src).map_err(|e| path_io("read directory", src, e))? {
        let entry = entry.map_err(|e| path_io("read directory", src, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| path_io("stat", &entry.path(), e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());

        if file_type.is_dir() {
            copy_dir_all(&from, &to)?;
        } else if file_type.is_symlink() {
            copy_symlink(&from, &to)?;
        } else {
            trace!("copy {} -> {}", from.display(), to.display());
            // fs::copy carries permission bits over to the destination
            fs::copy(&from, &to).map_err(|e| path_io("copy", &from, e))?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> Result<()> {
    let target = fs::read_link(from).map_err(|e| path_io("read link", from, e))?;
    if to.symlink_metadata().is_ok() {
        fs::remove_file(to).map_err(|e| path_io("remove", to, e))?;
    }
    std::os::unix::fs::symlink(&target, to).map_err(|e| path_io("create link", to, e))?;
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> Result<()> {
    // Follow the link and copy its contents
    fs::copy(from, to).map_err(|e| path_io("copy", from, e))?;
    Ok(())
}
