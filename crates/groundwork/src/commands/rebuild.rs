//! Rebuild command implementation
//!
//! Maintenance entry point: reruns the OpenJFX gradle build and refreshes
//! the staged per-module class output, without touching the rest of setup.

use anyhow::Result;
use groundwork_core::config::SetupConfig;
use groundwork_core::pipeline;
use groundwork_core::process::SystemRunner;

pub fn execute(config: &SetupConfig) -> Result<()> {
    let runner = SystemRunner;
    pipeline::rebuild(config, &runner)?;
    println!("OpenJFX rebuilt");
    Ok(())
}
