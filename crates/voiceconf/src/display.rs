//! Display and logging settings.

use serde::{Deserialize, Serialize};
use voicerange::{Bucketing, Grouping};

/// How the histogram figure is laid out and drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Panels per row.
    /// Default: 2
    #[serde(default = "DisplayConfig::default_columns")]
    pub columns: usize,

    /// Histogram bucket granularity.
    /// Default: pitch
    #[serde(default)]
    pub bucketing: Bucketing,

    /// How tracks and channels map onto voices.
    /// Default: auto
    #[serde(default)]
    pub grouping: Grouping,

    /// SVG image width in pixels.
    /// Default: 1200
    #[serde(default = "DisplayConfig::default_width")]
    pub width: u32,

    /// SVG height of one row of panels in pixels.
    /// Default: 400
    #[serde(default = "DisplayConfig::default_panel_height")]
    pub panel_height: u32,
}

impl DisplayConfig {
    fn default_columns() -> usize {
        2
    }

    fn default_width() -> u32 {
        1200
    }

    fn default_panel_height() -> u32 {
        400
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            columns: Self::default_columns(),
            bucketing: Bucketing::default(),
            grouping: Grouping::default(),
            width: Self::default_width(),
            panel_height: Self::default_panel_height(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level or `EnvFilter` directive (trace, debug, info, warn, error).
    /// Default: warn
    #[serde(default = "TelemetryConfig::default_log_level")]
    pub log_level: String,
}

impl TelemetryConfig {
    fn default_log_level() -> String {
        "warn".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
        }
    }
}
