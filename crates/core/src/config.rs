//! Setup configuration
//!
//! Builds the immutable [`SetupConfig`] value the orchestrator is constructed
//! with: the working directory, the JDK source directory, and the external
//! tool commands. Values are layered: built-in defaults, then an optional
//! `groundwork.toml` file, then explicit CLI overrides. There is no
//! process-global configuration state.

use crate::errors::{path_io, ConfigError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default tool commands; the operating system resolves the bare names.
pub const DEFAULT_HG: &str = "hg";
pub const DEFAULT_GRADLE: &str = "gradle";
pub const DEFAULT_ECLIPSE: &str = "eclipse";

/// Default relative path of the JDK to mirror
pub const DEFAULT_JDK_DIR: &str = "openjdk-8u121";

/// Default configuration file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "groundwork.toml";

/// A configured external tool command
///
/// Holds the logical tool name plus the configured command, which may carry
/// leading arguments (e.g. `"/opt/hg/bin/hg --config ui.ssh=ssh"`). The
/// command string is split with shell-style word rules at parse time.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolPath {
    name: &'static str,
    program: String,
    leading_args: Vec<String>,
}

impl ToolPath {
    /// Parse a tool command string, splitting off any leading arguments
    pub fn parse(name: &'static str, raw: &str) -> Result<Self> {
        let mut words = shell_words::split(raw).map_err(|e| ConfigError::Parsing {
            message: format!("invalid command for tool '{}': {}", name, e),
        })?;
        if words.is_empty() {
            return Err(ConfigError::Validation {
                message: format!("empty command configured for tool '{}'", name),
            }
            .into());
        }
        let program = words.remove(0);
        Ok(Self {
            name,
            program,
            leading_args: words,
        })
    }

    /// Logical tool name (e.g. "hg")
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The program to spawn
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Configured leading arguments followed by the given call-site arguments
    pub fn args_with(&self, extra: &[&str]) -> Vec<String> {
        self.leading_args
            .iter()
            .cloned()
            .chain(extra.iter().map(|s| s.to_string()))
            .collect()
    }
}

/// Optional `groundwork.toml` contents
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ConfigFile {
    jdk_dir: Option<PathBuf>,
    #[serde(default)]
    tools: ToolsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ToolsSection {
    hg: Option<String>,
    gradle: Option<String>,
    eclipse: Option<String>,
}

/// Explicit overrides from the CLI, applied on top of file values
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub jdk_dir: Option<PathBuf>,
    pub hg: Option<String>,
    pub gradle: Option<String>,
    pub eclipse: Option<String>,
}

/// Resolved setup configuration, read-only after construction
#[derive(Debug, Clone)]
pub struct SetupConfig {
    working_dir: PathBuf,
    jdk_dir: PathBuf,
    hg: ToolPath,
    gradle: ToolPath,
    eclipse: ToolPath,
}

impl SetupConfig {
    /// Load configuration for the given workspace folder
    ///
    /// `config_path` selects an explicit configuration file; when `None`,
    /// `groundwork.toml` in the workspace folder is used if present. CLI
    /// overrides win over file values, which win over defaults.
    pub fn load(
        workspace_folder: &Path,
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let working_dir = fs::canonicalize(workspace_folder)
            .map_err(|e| path_io("resolve working directory", workspace_folder, e))?;

        let file = Self::load_file(&working_dir, config_path)?;

        let jdk_dir = overrides
            .jdk_dir
            .clone()
            .or(file.jdk_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_JDK_DIR));
        // Relative JDK paths are anchored at the working directory
        let jdk_dir = if jdk_dir.is_absolute() {
            jdk_dir
        } else {
            working_dir.join(jdk_dir)
        };

        let hg_raw = overrides
            .hg
            .clone()
            .or(file.tools.hg)
            .unwrap_or_else(|| DEFAULT_HG.to_string());
        let gradle_raw = overrides
            .gradle
            .clone()
            .or(file.tools.gradle)
            .unwrap_or_else(|| DEFAULT_GRADLE.to_string());
        let eclipse_raw = overrides
            .eclipse
            .clone()
            .or(file.tools.eclipse)
            .unwrap_or_else(|| DEFAULT_ECLIPSE.to_string());

        let config = Self {
            working_dir,
            jdk_dir,
            hg: ToolPath::parse("hg", &hg_raw)?,
            gradle: ToolPath::parse("gradle", &gradle_raw)?,
            eclipse: ToolPath::parse("eclipse", &eclipse_raw)?,
        };
        debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }

    fn load_file(working_dir: &Path, config_path: Option<&Path>) -> Result<ConfigFile> {
        let path = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound {
                        path: path.to_path_buf(),
                    }
                    .into());
                }
                path.to_path_buf()
            }
            None => {
                let default = working_dir.join(CONFIG_FILE_NAME);
                if !default.exists() {
                    return Ok(ConfigFile::default());
                }
                default
            }
        };

        debug!("Loading configuration file: {}", path.display());
        let text = fs::read_to_string(&path).map_err(ConfigError::Io)?;
        let file = toml::from_str(&text).map_err(|e| ConfigError::Parsing {
            message: e.to_string(),
        })?;
        Ok(file)
    }

    /// The root all stage outputs are created under
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// The JDK source directory to mirror
    pub fn jdk_dir(&self) -> &Path {
        &self.jdk_dir
    }

    pub fn hg(&self) -> &ToolPath {
        &self.hg
    }

    pub fn gradle(&self) -> &ToolPath {
        &self.gradle
    }

    pub fn eclipse(&self) -> &ToolPath {
        &self.eclipse
    }

    /// All configured tools, in reporting order
    pub fn tools(&self) -> [&ToolPath; 3] {
        [&self.hg, &self.gradle, &self.eclipse]
    }

    /// Destination of the JavaFX-free JDK mirror, named after the source
    /// directory with a `-noFX` suffix
    pub fn jdk_mirror_dir(&self) -> PathBuf {
        let name = self
            .jdk_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_JDK_DIR.to_string());
        self.working_dir.join(format!("{}-noFX", name))
    }

    /// The bundled JavaFX jar stripped out of the mirror
    pub fn javafx_jar(&self) -> PathBuf {
        self.jdk_mirror_dir().join("jre/lib/ext/jfxrt.jar")
    }

    pub fn openjfx_dir(&self) -> PathBuf {
        self.working_dir.join("openjfx")
    }

    pub fn jfxgl_dir(&self) -> PathBuf {
        self.working_dir.join("JFXGL")
    }

    pub fn demos_dir(&self) -> PathBuf {
        self.working_dir.join("JFXGL-demos")
    }

    /// Eclipse workspace metadata directory
    pub fn metadata_dir(&self) -> PathBuf {
        self.working_dir.join(".metadata")
    }

    /// Generated OpenJFX build configuration; doubles as the build stage's
    /// completion marker
    pub fn gradle_properties(&self) -> PathBuf {
        self.openjfx_dir().join("gradle.properties")
    }

    /// Marker written inside the OpenJFX tree once the JFXGL patch has been
    /// applied, so patch idempotency survives a reset of that tree
    pub fn patch_marker(&self) -> PathBuf {
        self.openjfx_dir().join(".jfxgl-patch-applied")
    }

    /// Generated top-level directories removed by `clean`, in removal order
    pub fn generated_dirs(&self) -> [PathBuf; 5] {
        [
            self.jdk_mirror_dir(),
            self.openjfx_dir(),
            self.jfxgl_dir(),
            self.demos_dir(),
            self.metadata_dir(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let tmp = TempDir::new().unwrap();
        let config =
            SetupConfig::load(tmp.path(), None, &ConfigOverrides::default()).unwrap();

        assert_eq!(config.hg().program(), "hg");
        assert_eq!(config.gradle().program(), "gradle");
        assert_eq!(config.eclipse().program(), "eclipse");
        assert!(config.jdk_dir().ends_with(DEFAULT_JDK_DIR));
        assert!(config
            .jdk_mirror_dir()
            .ends_with("openjdk-8u121-noFX"));
    }

    #[test]
    fn test_config_file_layering() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            r#"
jdk-dir = "/opt/jdk8"

[tools]
hg = "/usr/local/bin/hg"
gradle = "gradle --no-daemon"
"#,
        )
        .unwrap();

        let config =
            SetupConfig::load(tmp.path(), None, &ConfigOverrides::default()).unwrap();
        assert_eq!(config.jdk_dir(), Path::new("/opt/jdk8"));
        assert_eq!(config.hg().program(), "/usr/local/bin/hg");
        assert_eq!(config.gradle().program(), "gradle");
        assert_eq!(
            config.gradle().args_with(&[]),
            vec!["--no-daemon".to_string()]
        );
        // mirror name derives from the source directory name
        assert!(config.jdk_mirror_dir().ends_with("jdk8-noFX"));
    }

    #[test]
    fn test_cli_overrides_win_over_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "[tools]\nhg = \"file-hg\"\n",
        )
        .unwrap();

        let overrides = ConfigOverrides {
            hg: Some("cli-hg".to_string()),
            ..Default::default()
        };
        let config = SetupConfig::load(tmp.path(), None, &overrides).unwrap();
        assert_eq!(config.hg().program(), "cli-hg");
    }

    #[test]
    fn test_explicit_config_file_must_exist() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        let err = SetupConfig::load(tmp.path(), Some(&missing), &ConfigOverrides::default())
            .unwrap_err();
        assert!(format!("{}", err).contains("Configuration file not found"));
    }

    #[test]
    fn test_invalid_config_file_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE_NAME), "not valid toml [").unwrap();
        let err = SetupConfig::load(tmp.path(), None, &ConfigOverrides::default())
            .unwrap_err();
        assert!(format!("{}", err).contains("Failed to parse configuration file"));
    }

    #[test]
    fn test_tool_path_parse_rejects_empty() {
        assert!(ToolPath::parse("hg", "").is_err());
        assert!(ToolPath::parse("hg", "   ").is_err());
    }

    #[test]
    fn test_tool_path_args_with() {
        let tool = ToolPath::parse("hg", "hg --config ui.interactive=no").unwrap();
        assert_eq!(tool.program(), "hg");
        assert_eq!(
            tool.args_with(&["clone", "."]),
            vec![
                "--config".to_string(),
                "ui.interactive=no".to_string(),
                "clone".to_string(),
                ".".to_string()
            ]
        );
    }
}
