//! External process invocation
//!
//! The orchestrator drives every external program (hg, gradle, eclipse, the
//! embedded jerkar wrapper) through the [`CommandRunner`] trait so tests can
//! substitute a recording implementation. The system implementation blocks on
//! the child and inherits stdio, so clone and build output streams straight
//! to the operator's terminal.

use crate::errors::{ProcessError, Result};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Seam for spawning external programs
pub trait CommandRunner {
    /// Spawn `program` with `args` in `cwd`, wait for it, and return the
    /// exit code. Only a spawn failure is an error; a nonzero exit is a
    /// normal result the caller interprets.
    fn run(&self, cwd: &Path, program: &str, args: &[String]) -> Result<i32>;

    /// Run and treat any nonzero exit as a fatal [`ProcessError`]
    fn run_checked(&self, cwd: &Path, program: &str, args: &[String]) -> Result<()> {
        match self.run(cwd, program, args)? {
            0 => Ok(()),
            code => Err(ProcessError::Failed {
                command: program.to_string(),
                code,
            }
            .into()),
        }
    }
}

/// [`CommandRunner`] backed by `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, cwd: &Path, program: &str, args: &[String]) -> Result<i32> {
        debug!(
            "Running command in {}: {} {}",
            cwd.display(),
            program,
            args.join(" ")
        );

        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .status()
            .map_err(|e| ProcessError::Spawn {
                command: program.to_string(),
                source: e,
            })?;

        // A signal-terminated child carries no exit code; report it as -1
        // so the caller still sees a nonzero result.
        Ok(status.code().unwrap_or(-1))
    }
}
