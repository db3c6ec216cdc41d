//! Config file discovery, loading, and environment variable overlay.

use crate::{ConfigError, VoiceConfig};
use std::env;
use std::path::{Path, PathBuf};
use voicerange::VoiceRange;

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files in standard locations, optionally with a CLI override path.
///
/// Returns paths in load order (system, user, local). Only returns files that
/// exist. If `cli_path` is provided and exists, it replaces the local override.
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/voicecheck/config.toml");
    if system.exists() {
        files.push(system);
    }

    // User config (XDG_CONFIG_HOME or ~/.config)
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("voicecheck/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        if path.exists() {
            files.push(path.to_path_buf());
            return files;
        }
    }

    let local = PathBuf::from("voicecheck.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Load a TOML file on top of `base`.
pub fn load_from_file(path: &Path, base: VoiceConfig) -> Result<VoiceConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_toml(&contents, path, base)
}

/// Parse TOML and overlay every value it sets onto `base`.
pub(crate) fn parse_toml(
    contents: &str,
    path: &Path,
    base: VoiceConfig,
) -> Result<VoiceConfig, ConfigError> {
    let table: toml::Table = contents.parse().map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let invalid = |message: String| ConfigError::Invalid {
        path: path.to_path_buf(),
        message,
    };

    let mut config = base;

    if let Some(display) = table.get("display").and_then(|v| v.as_table()) {
        if let Some(v) = display.get("columns").and_then(|v| v.as_integer()) {
            if v < 1 {
                return Err(invalid(format!("display.columns must be at least 1, got {v}")));
            }
            config.display.columns = v as usize;
        }
        if let Some(v) = display.get("bucketing").and_then(|v| v.as_str()) {
            config.display.bucketing = v.parse().map_err(invalid)?;
        }
        if let Some(v) = display.get("grouping").and_then(|v| v.as_str()) {
            config.display.grouping = v.parse().map_err(invalid)?;
        }
        if let Some(v) = display.get("width").and_then(|v| v.as_integer()) {
            config.display.width = positive_u32(v, "display.width").map_err(invalid)?;
        }
        if let Some(v) = display.get("panel_height").and_then(|v| v.as_integer()) {
            config.display.panel_height = positive_u32(v, "display.panel_height").map_err(invalid)?;
        }
    }

    if let Some(telemetry) = table.get("telemetry").and_then(|v| v.as_table()) {
        if let Some(v) = telemetry.get("log_level").and_then(|v| v.as_str()) {
            config.telemetry.log_level = v.to_string();
        }
    }

    if let Some(voices) = table.get("voices").and_then(|v| v.as_table()) {
        for (part, value) in voices {
            let fields = value
                .as_table()
                .ok_or_else(|| invalid(format!("voices.\"{part}\" must be a table")))?;
            let range = parse_voice(part, fields).map_err(invalid)?;
            match config
                .voices
                .iter_mut()
                .find(|v| v.part.eq_ignore_ascii_case(part))
            {
                Some(existing) => *existing = range,
                None => config.voices.push(range),
            }
        }
    }

    if let Some(aliases) = table.get("aliases").and_then(|v| v.as_table()) {
        for (alias, part) in aliases {
            let part = part
                .as_str()
                .ok_or_else(|| invalid(format!("aliases.\"{alias}\" must be a part name")))?;
            config.aliases.insert(alias.to_lowercase(), part.to_string());
        }
    }

    Ok(config)
}

fn parse_voice(part: &str, fields: &toml::Table) -> Result<VoiceRange, String> {
    let note = |key: &str| -> Result<u8, String> {
        let value = fields
            .get(key)
            .and_then(|v| v.as_integer())
            .ok_or_else(|| format!("voices.\"{part}\".{key} is required"))?;
        midi_note(value, part, key)
    };

    let lowest = note("lowest")?;
    let highest = note("highest")?;
    let comfortable = fields
        .get("comfortable")
        .and_then(|v| v.as_array())
        .filter(|a| a.len() == 2)
        .ok_or_else(|| format!("voices.\"{part}\".comfortable must be a [low, high] pair"))?;
    let bound = |i: usize| -> Result<u8, String> {
        let value = comfortable[i]
            .as_integer()
            .ok_or_else(|| format!("voices.\"{part}\".comfortable must hold integers"))?;
        midi_note(value, part, "comfortable")
    };

    let range = VoiceRange::new(part, lowest, (bound(0)?, bound(1)?), highest);
    range.validate()?;
    Ok(range)
}

fn midi_note(value: i64, part: &str, key: &str) -> Result<u8, String> {
    u8::try_from(value)
        .ok()
        .filter(|n| *n <= 127)
        .ok_or_else(|| format!("voices.\"{part}\".{key}: {value} is not a MIDI note (0-127)"))
}

fn positive_u32(value: i64, key: &str) -> Result<u32, String> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| format!("{key} must be a positive integer, got {value}"))
}

/// Apply environment variable overrides to config.
///
/// Values are held to the same rules as the config file.
pub fn apply_env_overrides(
    config: &mut VoiceConfig,
    sources: &mut ConfigSources,
) -> Result<(), ConfigError> {
    if let Ok(v) = env::var("VOICECHECK_LOG_LEVEL") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("VOICECHECK_LOG_LEVEL".to_string());
    }
    // Also support RUST_LOG
    if let Ok(v) = env::var("RUST_LOG") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }

    if let Ok(v) = env::var("VOICECHECK_COLUMNS") {
        config.display.columns = parse_columns(&v).map_err(|message| ConfigError::Env {
            var: "VOICECHECK_COLUMNS".to_string(),
            message,
        })?;
        sources.env_overrides.push("VOICECHECK_COLUMNS".to_string());
    }

    Ok(())
}

fn parse_columns(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(columns) if columns > 0 => Ok(columns),
        _ => Err(format!("columns must be at least 1, got '{value}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voicerange::{Bucketing, Grouping};

    fn parse(toml: &str) -> Result<VoiceConfig, ConfigError> {
        parse_toml(toml, Path::new("test.toml"), VoiceConfig::default())
    }

    #[test]
    fn test_discover_config_files() {
        // Just verify it doesn't panic
        let _files = discover_config_files_with_override(None);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config = parse("[display]\ncolumns = 3\n").unwrap();
        assert_eq!(config.display.columns, 3);
        // Other values should be defaults
        assert_eq!(config.display.width, 1200);
        assert_eq!(config.telemetry.log_level, "warn");
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
[display]
columns = 1
bucketing = "pitch_class"
grouping = "channel"
width = 800
panel_height = 300

[telemetry]
log_level = "debug"

[voices."Countertenor"]
lowest = 52
comfortable = [55, 72]
highest = 76

[voices."Bass"]
lowest = 34
comfortable = [43, 60]
highest = 64

[aliases]
"CT" = "Countertenor"
"#;
        let config = parse(toml).unwrap();

        assert_eq!(config.display.columns, 1);
        assert_eq!(config.display.bucketing, Bucketing::PitchClass);
        assert_eq!(config.display.grouping, Grouping::Channel);
        assert_eq!(config.display.width, 800);
        assert_eq!(config.display.panel_height, 300);
        assert_eq!(config.telemetry.log_level, "debug");
        assert_eq!(config.voices.len(), 2);
        let countertenor = config.voices.iter().find(|v| v.part == "Countertenor");
        assert_eq!(
            countertenor,
            Some(&VoiceRange::new("Countertenor", 52, (55, 72), 76))
        );
        assert_eq!(config.aliases.get("ct"), Some(&"Countertenor".to_string()));

        let catalog = config.catalog();
        assert_eq!(catalog.part("bass").unwrap().lowest, 34);
    }

    #[test]
    fn test_later_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.toml");
        let second = dir.path().join("second.toml");
        std::fs::write(&first, "[display]\ncolumns = 4\nwidth = 900\n").unwrap();
        std::fs::write(&second, "[display]\ncolumns = 1\n").unwrap();

        let config = load_from_file(&first, VoiceConfig::default()).unwrap();
        let config = load_from_file(&second, config).unwrap();
        assert_eq!(config.display.columns, 1);
        assert_eq!(config.display.width, 900);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            parse("[display]\ncolumns = 0\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            parse("[display]\nbucketing = \"octave\"\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            parse("[voices.\"Odd\"]\nlowest = 60\ncomfortable = [50, 70]\nhighest = 72\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            parse("[voices.\"High\"]\nlowest = 60\ncomfortable = [62, 70]\nhighest = 200\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            parse("[voices.\"Short\"]\nlowest = 60\ncomfortable = [62]\nhighest = 72\n"),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_env_columns_follow_file_rules() {
        assert_eq!(parse_columns("3"), Ok(3));
        assert_eq!(parse_columns(" 2 "), Ok(2));
        assert!(parse_columns("0").is_err());
        assert!(parse_columns("wide").is_err());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        assert!(matches!(parse("[display\ncolumns ="), Err(ConfigError::Parse { .. })));
    }
}
