//! Small whole-file text edits
//!
//! Used to fix up generated build configuration: rewriting the relative
//! library path in the generated Eclipse `.classpath`, and appending the
//! `JDK_HOME` line to `gradle.properties`. Edits read the file fully,
//! transform, and write back in one shot; they are applied at most once per
//! run because the owning stage's completion predicate guards them.

use crate::errors::{path_io, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// Replace every occurrence of `pattern` in `file` with `replacement`,
/// writing the file back in full.
///
/// Returns whether the pattern was found. An absent pattern is tolerated as
/// a no-op (the file's layout is owned by an external generator) and logged
/// rather than treated as an error.
pub fn replace_in_file(file: &Path, pattern: &str, replacement: &str) -> Result<bool> {
    let text = fs::read_to_string(file).map_err(|e| path_io("read", file, e))?;

    if !text.contains(pattern) {
        warn!(
            "Pattern '{}' not found in {}; leaving file unchanged",
            pattern,
            file.display()
        );
        return Ok(false);
    }

    let text = text.replace(pattern, replacement);
    fs::write(file, text).map_err(|e| path_io("write", file, e))?;
    debug!(
        "Rewrote '{}' -> '{}' in {}",
        pattern,
        replacement,
        file.display()
    );
    Ok(true)
}

/// Append `line` (plus a leading newline) to `file`
pub fn append_line(file: &Path, line: &str) -> Result<()> {
    let mut handle = fs::OpenOptions::new()
        .append(true)
        .open(file)
        .map_err(|e| path_io("open", file, e))?;
    writeln!(handle).map_err(|e| path_io("write", file, e))?;
    write!(handle, "{}", line).map_err(|e| path_io("write", file, e))?;
    Ok(())
}
