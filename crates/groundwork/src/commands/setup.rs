//! Setup command implementation

use anyhow::Result;
use groundwork_core::config::SetupConfig;
use groundwork_core::orchestrator::SetupOrchestrator;
use groundwork_core::process::SystemRunner;
use groundwork_core::stage::StageOutcome;
use tracing::info;

/// Run the full staged bootstrap
pub fn execute(config: &SetupConfig) -> Result<()> {
    println!();
    println!("SETTING UP JFXGL DEVELOPMENT ENVIRONMENT...");
    println!();

    let runner = SystemRunner;
    let orchestrator = SetupOrchestrator::new(config, &runner);
    let report = orchestrator.run()?;

    info!("Setup finished: {} stages executed", report.executed().len());

    println!();
    for (name, outcome) in &report.outcomes {
        let label = match outcome {
            StageOutcome::Done => "done",
            StageOutcome::Skipped => "already complete",
        };
        println!("  {:<20} {}", name, label);
    }
    println!();
    println!("And we're all done!");
    println!();
    Ok(())
}
