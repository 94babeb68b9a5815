//! CLI argument definitions and dispatch

use crate::commands;
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use groundwork_core::config::{ConfigOverrides, SetupConfig};
use groundwork_core::logging;
use std::path::PathBuf;

/// Log format options
#[derive(Debug, Clone, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    Text,
    /// JSON structured format
    Json,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON structured format
    Json,
}

/// Bootstrap the JFXGL development environment
///
/// Mirrors the JDK, clones and builds OpenJFX at a pinned revision, clones
/// JFXGL and its demos, patches OpenJFX, and generates an Eclipse workspace.
/// Every step is idempotent: rerunning `setup` skips whatever is already on
/// disk, so an interrupted run can simply be restarted.
#[derive(Debug, Parser)]
#[command(name = "groundwork", version, author)]
pub struct Cli {
    /// Workspace folder the environment is created under
    #[arg(long, global = true, default_value = ".")]
    pub workspace_folder: PathBuf,

    /// Path to a groundwork.toml configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log format (text or json)
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Mercurial command (defaults to `hg` on PATH)
    #[arg(long, global = true, value_name = "COMMAND")]
    pub hg: Option<String>,

    /// Gradle command (defaults to `gradle` on PATH)
    #[arg(long, global = true, value_name = "COMMAND")]
    pub gradle: Option<String>,

    /// Eclipse launcher command (defaults to `eclipse` on PATH)
    #[arg(long, global = true, value_name = "COMMAND")]
    pub eclipse: Option<String>,

    /// JDK directory to mirror (defaults to `openjdk-8u121`)
    #[arg(long, global = true, value_name = "DIR")]
    pub jdk_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// groundwork subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full staged bootstrap
    Setup,

    /// Remove every generated directory (mirror, clones, workspace metadata)
    Clean,

    /// Rerun the OpenJFX build without re-running the rest of setup
    Rebuild,

    /// Report tool availability and per-stage completion
    Status {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        output_format: OutputFormat,
    },
}

impl Cli {
    /// Initialize logging, resolve configuration, and run the subcommand
    pub fn dispatch(self) -> Result<()> {
        let format = match self.log_format {
            Some(LogFormat::Json) => Some("json"),
            Some(LogFormat::Text) => Some("text"),
            None => None,
        };
        logging::init(format)?;

        let overrides = ConfigOverrides {
            jdk_dir: self.jdk_dir.clone(),
            hg: self.hg.clone(),
            gradle: self.gradle.clone(),
            eclipse: self.eclipse.clone(),
        };
        let config = SetupConfig::load(&self.workspace_folder, self.config.as_deref(), &overrides)?;

        match self.command {
            Commands::Setup => commands::setup::execute(&config),
            Commands::Clean => commands::clean::execute(&config),
            Commands::Rebuild => commands::rebuild::execute(&config),
            Commands::Status { output_format } => commands::status::execute(&config, output_format),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_setup_with_overrides() {
        let cli = Cli::try_parse_from([
            "groundwork",
            "setup",
            "--hg",
            "/opt/hg/bin/hg",
            "--jdk-dir",
            "/opt/jdk8",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Setup));
        assert_eq!(cli.hg.as_deref(), Some("/opt/hg/bin/hg"));
        assert_eq!(cli.jdk_dir.as_deref(), Some(std::path::Path::new("/opt/jdk8")));
    }

    #[test]
    fn test_parse_status_output_format() {
        let cli =
            Cli::try_parse_from(["groundwork", "status", "--output-format", "json"]).unwrap();
        match cli.command {
            Commands::Status { output_format } => {
                assert!(matches!(output_format, OutputFormat::Json))
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
