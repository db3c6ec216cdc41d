//! Configuration loading for voicecheck.
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/voicecheck/config.toml` (system)
//! 2. `~/.config/voicecheck/config.toml` (user)
//! 3. `./voicecheck.toml` (local override), or the path passed with `--config`
//! 4. Environment variables (`VOICECHECK_*`, `RUST_LOG`)
//!
//! # Example Config
//!
//! ```toml
//! [display]
//! columns = 2
//! bucketing = "pitch"
//! grouping = "auto"
//! width = 1200
//! panel_height = 400
//!
//! [telemetry]
//! log_level = "warn"
//!
//! [voices."Countertenor"]
//! lowest = 52
//! comfortable = [55, 72]
//! highest = 76
//!
//! [aliases]
//! "ct" = "Countertenor"
//! ```

pub mod display;
pub mod loader;

pub use display::{DisplayConfig, TelemetryConfig};
pub use loader::{discover_config_files_with_override, ConfigSources};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use voicerange::{Bucketing, Grouping, RangeCatalog, VoiceRange};

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value in config file {path}: {message}")]
    Invalid { path: PathBuf, message: String },

    #[error("Invalid value in environment variable {var}: {message}")]
    Env { var: String, message: String },
}

/// Complete voicecheck configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VoiceConfig {
    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Extra or replacement vocal parts, added on top of the built-in catalog.
    #[serde(default)]
    pub voices: Vec<VoiceRange>,

    /// Lowercase alias → part name.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl VoiceConfig {
    /// Load configuration, using `config_path` in place of `./voicecheck.toml`,
    /// and report where the values came from.
    ///
    /// A `config_path` that does not exist is an error; the standard locations
    /// are simply skipped when absent.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::FileRead {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
                });
            }
        }

        let mut sources = ConfigSources::default();
        let mut config = VoiceConfig::default();

        for path in loader::discover_config_files_with_override(config_path) {
            config = loader::load_from_file(&path, config)?;
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut config, &mut sources)?;

        Ok((config, sources))
    }

    /// The built-in part catalog with this config's parts and aliases applied.
    pub fn catalog(&self) -> RangeCatalog {
        let mut catalog = RangeCatalog::builtin();
        for range in &self.voices {
            catalog.insert(range.clone());
        }
        for (alias, part) in &self.aliases {
            catalog.add_alias(alias, part);
        }
        catalog
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> String {
        // Build TOML manually for nicer formatting
        let mut output = String::new();

        output.push_str("# voicecheck configuration\n\n");

        output.push_str("[display]\n");
        output.push_str(&format!("columns = {}\n", self.display.columns));
        output.push_str(&format!(
            "bucketing = \"{}\"\n",
            match self.display.bucketing {
                Bucketing::Pitch => "pitch",
                Bucketing::PitchClass => "pitch_class",
            }
        ));
        output.push_str(&format!(
            "grouping = \"{}\"\n",
            match self.display.grouping {
                Grouping::Auto => "auto",
                Grouping::Track => "track",
                Grouping::Channel => "channel",
            }
        ));
        output.push_str(&format!("width = {}\n", self.display.width));
        output.push_str(&format!("panel_height = {}\n", self.display.panel_height));

        output.push_str("\n[telemetry]\n");
        output.push_str(&format!("log_level = \"{}\"\n", self.telemetry.log_level));

        for range in &self.voices {
            output.push_str(&format!("\n[voices.{}]\n", quoted(&range.part)));
            output.push_str(&format!("lowest = {}\n", range.lowest));
            output.push_str(&format!(
                "comfortable = [{}, {}]\n",
                range.comfortable_low, range.comfortable_high
            ));
            output.push_str(&format!("highest = {}\n", range.highest));
        }

        if !self.aliases.is_empty() {
            output.push_str("\n[aliases]\n");
            for (alias, part) in &self.aliases {
                output.push_str(&format!("{} = {}\n", quoted(alias), quoted(part)));
            }
        }

        output
    }
}

/// A TOML basic string, usable as a key or a value.
fn quoted(text: &str) -> String {
    toml::Value::String(text.to_string()).to_string()
}
