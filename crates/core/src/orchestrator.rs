//! Setup orchestration
//!
//! Drives the stage pipeline: verifies the required external tools and the
//! JDK source directory before any stage runs (fail fast, naming every
//! missing tool at once), then walks the stages in declared order, skipping
//! each one whose completion predicate already holds and running the rest.
//! Any stage failure triggers that stage's rollback via a drop guard and
//! aborts the whole run; retry happens only by re-invoking the orchestrator,
//! which re-derives progress from disk.

use crate::config::SetupConfig;
use crate::errors::{ConfigError, Result};
use crate::exec;
use crate::pipeline;
use crate::process::CommandRunner;
use crate::stage::{RollbackGuard, RunReport, Stage, StageContext, StageOutcome};
use serde::Serialize;
use tracing::{info, instrument};

/// Single-run driver over the stage pipeline
pub struct SetupOrchestrator<'a> {
    config: &'a SetupConfig,
    runner: &'a dyn CommandRunner,
    stages: Vec<Box<dyn Stage>>,
}

impl<'a> SetupOrchestrator<'a> {
    /// Orchestrator over the standard setup pipeline
    pub fn new(config: &'a SetupConfig, runner: &'a dyn CommandRunner) -> Self {
        Self::with_stages(config, runner, pipeline::stages())
    }

    /// Orchestrator over an explicit stage list (used by tests)
    pub fn with_stages(
        config: &'a SetupConfig,
        runner: &'a dyn CommandRunner,
        stages: Vec<Box<dyn Stage>>,
    ) -> Self {
        Self {
            config,
            runner,
            stages,
        }
    }

    /// Verify tools and the JDK source before anything side-effecting runs
    pub fn preflight(&self) -> Result<()> {
        exec::verify_all(&self.config.tools())?;

        if !self.config.jdk_dir().exists() {
            return Err(ConfigError::JdkMissing {
                path: self.config.jdk_dir().to_path_buf(),
            }
            .into());
        }
        Ok(())
    }

    /// Run the full setup, skipping already-complete stages
    #[instrument(skip(self))]
    pub fn run(&self) -> Result<RunReport> {
        self.preflight()?;

        let ctx = StageContext {
            config: self.config,
            runner: self.runner,
        };
        let mut report = RunReport::default();

        for stage in &self.stages {
            if stage.is_complete(&ctx) {
                info!("Stage '{}' already complete, skipping", stage.name());
                report.push(stage.name(), StageOutcome::Skipped);
                continue;
            }

            info!("Stage '{}' starting", stage.name());
            let mut guard = RollbackGuard::new(stage.as_ref(), &ctx);
            match stage.run(&ctx) {
                Ok(()) => {
                    guard.disarm();
                    info!("Stage '{}' done", stage.name());
                    report.push(stage.name(), StageOutcome::Done);
                }
                Err(e) => {
                    // guard drop runs the rollback before we return
                    drop(guard);
                    return Err(e.in_stage(stage.name()));
                }
            }
        }

        Ok(report)
    }

    /// Classify every stage and tool without side effects
    pub fn status(&self) -> StatusReport {
        let ctx = StageContext {
            config: self.config,
            runner: self.runner,
        };

        let tools = self
            .config
            .tools()
            .iter()
            .map(|tool| ToolStatus {
                name: tool.name().to_string(),
                command: tool.program().to_string(),
                available: exec::is_available(tool),
            })
            .collect();

        let stages = self
            .stages
            .iter()
            .map(|stage| StageStatus {
                name: stage.name().to_string(),
                complete: stage.is_complete(&ctx),
            })
            .collect();

        StatusReport {
            jdk_dir: self.config.jdk_dir().display().to_string(),
            jdk_present: self.config.jdk_dir().exists(),
            tools,
            stages,
        }
    }
}

/// Availability of one configured tool
#[derive(Debug, Serialize)]
pub struct ToolStatus {
    pub name: String,
    pub command: String,
    pub available: bool,
}

/// Completion classification of one stage
#[derive(Debug, Serialize)]
pub struct StageStatus {
    pub name: String,
    pub complete: bool,
}

/// Snapshot of the environment for the `status` command
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub jdk_dir: String,
    pub jdk_present: bool,
    pub tools: Vec<ToolStatus>,
    pub stages: Vec<StageStatus>,
}
