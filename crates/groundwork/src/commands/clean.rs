//! Clean command implementation

use anyhow::Result;
use groundwork_core::config::SetupConfig;
use groundwork_core::pipeline;

/// Remove every generated top-level directory
pub fn execute(config: &SetupConfig) -> Result<()> {
    pipeline::clean(config)?;
    println!("Cleaned generated directories");
    Ok(())
}
