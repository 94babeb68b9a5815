//! Executable resolution
//!
//! Decides whether configured tools can actually be invoked before any stage
//! runs. A tool is available if its configured program is an existing
//! executable file, or if the operating system can resolve the bare name as a
//! command. "Not available" is a normal query result, never an error; only
//! [`verify_all`] turns missing tools into a failure, and it reports every
//! missing tool at once so a multi-hour setup never dies halfway on the
//! second of three.

use crate::config::ToolPath;
use crate::errors::{ConfigError, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Check whether a configured tool can be invoked
pub fn is_available(tool: &ToolPath) -> bool {
    let path = Path::new(tool.program());
    if is_executable_file(path) {
        debug!("Tool '{}' resolved as file: {}", tool.name(), path.display());
        return true;
    }
    let found = lookup_on_path(tool.program());
    debug!(
        "Tool '{}' PATH lookup for '{}': {}",
        tool.name(),
        tool.program(),
        if found { "found" } else { "not found" }
    );
    found
}

/// Verify every tool up front, collecting all missing ones into one report
pub fn verify_all(tools: &[&ToolPath]) -> Result<()> {
    let missing: Vec<String> = tools
        .iter()
        .filter(|tool| !is_available(tool))
        .map(|tool| format!("{} ({})", tool.name(), tool.program()))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ToolsMissing { names: missing }.into())
    }
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(windows)]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}

/// Ask the shell whether it can resolve the name as a command
#[cfg(unix)]
fn lookup_on_path(name: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v -- {}", shell_words::quote(name)))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(windows)]
fn lookup_on_path(name: &str) -> bool {
    Command::new("where")
        .arg(name)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
