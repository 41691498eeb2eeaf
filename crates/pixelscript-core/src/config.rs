//! Configuration loading and typed config structures for the Pixelscript
//! engine.
//!
//! The canonical configuration lives in `pixelscript-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure, and provides a loader that reads and validates the file.
//! Every field has a default, so an empty file (or no file) is valid.

use std::path::Path;

use pixelscript_types::ColorToken;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Session boundaries and spawn limits.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Script execution semantics.
    #[serde(default)]
    pub scripting: ScriptingConfig,

    /// Frame composition settings.
    #[serde(default)]
    pub compositor: CompositorConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Settings used only by the engine binary.
    #[serde(default)]
    pub engine: EngineConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `PIXELSCRIPT_PROJECT` environment variable overrides
    /// `engine.project_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse_yaml(&contents)?;
        config.engine.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_yaml(yaml)?;
        config.engine.apply_env_overrides();
        Ok(config)
    }

    /// An empty document deserializes as YAML null, which serde refuses for
    /// a struct, so blank input maps straight to the defaults.
    fn parse_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Session boundary configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Number of ticks a session runs before it ends with
    /// `TickBudgetExhausted` (0 = unlimited).
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// How long the runner waits for a stop signal after each frame.
    #[serde(default = "default_stop_poll_ms")]
    pub stop_poll_ms: u64,

    /// Upper bound on live entities per session. Spawn requests beyond it
    /// are dropped.
    #[serde(default = "default_max_entities")]
    pub max_entities: u32,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            stop_poll_ms: default_stop_poll_ms(),
            max_entities: default_max_entities(),
        }
    }
}

/// What happens to the rest of a hook when it reaches a `Wait`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitPolicy {
    /// Queue a cursor past the `Wait` so the remaining instructions run
    /// once the wait elapses.
    #[default]
    Resume,
    /// A `Wait` ends the invocation; later instructions never run.
    Truncate,
}

/// Script execution configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScriptingConfig {
    /// Semantics of `Wait` instructions.
    #[serde(default)]
    pub wait_policy: WaitPolicy,
}

/// Where the compositor takes its background fill from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundSource {
    /// Always use [`CompositorConfig::fill`].
    #[default]
    Fixed,
    /// Use the project's configured background color.
    Project,
}

/// Frame composition configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompositorConfig {
    /// Source of the background fill for live frames.
    #[serde(default)]
    pub background: BackgroundSource,

    /// Fill token used when `background` is `fixed`.
    #[serde(default = "default_fill")]
    pub fill: ColorToken,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            background: BackgroundSource::Fixed,
            fill: default_fill(),
        }
    }
}

impl CompositorConfig {
    /// Resolve the fill token for a project with the given background.
    pub const fn fill_for(&self, project_background: ColorToken) -> ColorToken {
        match self.background {
            BackgroundSource::Fixed => self.fill,
            BackgroundSource::Project => project_background,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default log level filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Engine binary configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Path of the project JSON file to simulate.
    #[serde(default = "default_project_path")]
    pub project_path: String,

    /// Whether the terminal presenter prints every frame.
    #[serde(default = "default_true")]
    pub print_frames: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            project_path: default_project_path(),
            print_frames: true,
        }
    }
}

impl EngineConfig {
    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("PIXELSCRIPT_PROJECT") {
            self.project_path = path;
        }
    }
}

const fn default_max_ticks() -> u64 {
    100
}

const fn default_stop_poll_ms() -> u64 {
    800
}

const fn default_max_entities() -> u32 {
    256
}

const fn default_fill() -> ColorToken {
    ColorToken::Black
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_project_path() -> String {
    "project.json".to_owned()
}

const fn default_true() -> bool {
    true
}
