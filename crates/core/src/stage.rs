//! Stage model
//!
//! A stage is one unit of the setup pipeline: a name, a completion predicate
//! that is a pure function of filesystem state, a side-effecting action, and
//! an optional rollback that restores "not yet attempted" when the action
//! fails partway. Stages are immutable once declared and evaluated exactly
//! once per run; completion is re-derived from disk on every invocation, so
//! a killed run can always be restarted safely.

use crate::config::SetupConfig;
use crate::errors::Result;
use crate::process::CommandRunner;
use serde::Serialize;
use tracing::warn;

/// Shared read-only context handed to every stage
pub struct StageContext<'a> {
    pub config: &'a SetupConfig,
    pub runner: &'a dyn CommandRunner,
}

/// One unit of the setup pipeline
pub trait Stage {
    /// Stable human-readable stage name
    fn name(&self) -> &'static str;

    /// Whether this stage's work is already on disk. Must be a pure query
    /// with no side effects.
    fn is_complete(&self, ctx: &StageContext) -> bool;

    /// Perform the stage's work. Any error is fatal to the whole run.
    fn run(&self, ctx: &StageContext) -> Result<()>;

    /// Undo partial output so a retry re-attempts this stage from scratch.
    /// Best-effort; a rollback failure is logged, never propagated over the
    /// original error.
    fn rollback(&self, _ctx: &StageContext) -> Result<()> {
        Ok(())
    }
}

/// How a stage ended within one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageOutcome {
    /// Completion predicate already held at entry
    Skipped,
    /// Action ran and succeeded
    Done,
}

/// Per-run record of what each stage did, in execution order
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<(String, StageOutcome)>,
}

impl RunReport {
    pub fn push(&mut self, name: &str, outcome: StageOutcome) {
        self.outcomes.push((name.to_string(), outcome));
    }

    /// Names of stages whose actions actually ran
    pub fn executed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == StageOutcome::Done)
            .map(|(n, _)| n.as_str())
            .collect()
    }
}

/// Drop guard that fires a stage's rollback unless disarmed
///
/// Armed before the action runs and disarmed only on success, so rollback
/// executes deterministically on every non-success path out of the stage,
/// including unwinding.
pub struct RollbackGuard<'a, 'b> {
    stage: &'a dyn Stage,
    ctx: &'a StageContext<'b>,
    armed: bool,
}

impl<'a, 'b> RollbackGuard<'a, 'b> {
    pub fn new(stage: &'a dyn Stage, ctx: &'a StageContext<'b>) -> Self {
        Self {
            stage,
            ctx,
            armed: true,
        }
    }

    /// Call after the action succeeds to keep its output
    pub fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for RollbackGuard<'_, '_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("Stage '{}' failed; rolling back", self.stage.name());
            if let Err(e) = self.stage.rollback(self.ctx) {
                warn!("Rollback for stage '{}' failed: {}", self.stage.name(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigOverrides, SetupConfig};
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct NullRunner;

    impl CommandRunner for NullRunner {
        fn run(&self, _cwd: &Path, _program: &str, _args: &[String]) -> Result<i32> {
            Ok(0)
        }
    }

    struct FlagStage {
        rolled_back: AtomicBool,
    }

    impl Stage for FlagStage {
        fn name(&self) -> &'static str {
            "flag"
        }

        fn is_complete(&self, _ctx: &StageContext) -> bool {
            false
        }

        fn run(&self, _ctx: &StageContext) -> Result<()> {
            Ok(())
        }

        fn rollback(&self, _ctx: &StageContext) -> Result<()> {
            self.rolled_back.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    fn test_config() -> (tempfile::TempDir, SetupConfig) {
        let tmp = tempfile::TempDir::new().unwrap();
        let config =
            SetupConfig::load(tmp.path(), None, &ConfigOverrides::default()).unwrap();
        (tmp, config)
    }

    #[test]
    fn test_guard_fires_rollback_when_armed() {
        let (_tmp, config) = test_config();
        let runner = NullRunner;
        let ctx = StageContext {
            config: &config,
            runner: &runner,
        };
        let stage = FlagStage {
            rolled_back: AtomicBool::new(false),
        };

        {
            let _guard = RollbackGuard::new(&stage, &ctx);
        }
        assert!(stage.rolled_back.load(Ordering::SeqCst));
    }

    #[test]
    fn test_guard_disarmed_skips_rollback() {
        let (_tmp, config) = test_config();
        let runner = NullRunner;
        let ctx = StageContext {
            config: &config,
            runner: &runner,
        };
        let stage = FlagStage {
            rolled_back: AtomicBool::new(false),
        };

        {
            let mut guard = RollbackGuard::new(&stage, &ctx);
            guard.disarm();
        }
        assert!(!stage.rolled_back.load(Ordering::SeqCst));
    }

    #[test]
    fn test_run_report_executed() {
        let mut report = RunReport::default();
        report.push("mirror-jdk", StageOutcome::Skipped);
        report.push("clone-openjfx", StageOutcome::Done);
        assert_eq!(report.executed(), vec!["clone-openjfx"]);
    }
}
