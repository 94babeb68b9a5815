//! Status command implementation
//!
//! Reports tool availability and each stage's completion classification
//! without performing any side effects, in text or JSON form.

use crate::cli::OutputFormat;
use anyhow::Result;
use groundwork_core::config::SetupConfig;
use groundwork_core::orchestrator::SetupOrchestrator;
use groundwork_core::process::SystemRunner;

pub fn execute(config: &SetupConfig, output_format: OutputFormat) -> Result<()> {
    let runner = SystemRunner;
    let orchestrator = SetupOrchestrator::new(config, &runner);
    let status = orchestrator.status();

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        OutputFormat::Text => {
            println!(
                "JDK: {} ({})",
                status.jdk_dir,
                if status.jdk_present { "present" } else { "missing" }
            );
            println!();
            println!("Tools:");
            for tool in &status.tools {
                println!(
                    "  {:<10} {:<20} {}",
                    tool.name,
                    tool.command,
                    if tool.available { "available" } else { "NOT FOUND" }
                );
            }
            println!();
            println!("Stages:");
            for stage in &status.stages {
                println!(
                    "  {:<20} {}",
                    stage.name,
                    if stage.complete { "complete" } else { "pending" }
                );
            }
        }
    }
    Ok(())
}
