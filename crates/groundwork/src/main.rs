use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

fn main() -> Result<()> {
    let parsed = cli::Cli::parse();

    match parsed.dispatch() {
        Ok(()) => Ok(()),
        Err(err) => {
            // Missing required tools is reported before any stage runs and
            // gets its own exit code so wrappers can tell it apart
            if let Some(core_err) = err.downcast_ref::<groundwork_core::errors::GroundworkError>() {
                if core_err.is_tools_missing() {
                    eprintln!("Error: {}", core_err);
                    std::process::exit(2);
                }
            }

            Err(err)
        }
    }
}
