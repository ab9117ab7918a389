//! Layered resolution of match-run options.
//!
//! Every tunable carries the source it was resolved from so the CLI can
//! report where a value came from. Precedence: CLI arguments > config
//! file > built-in defaults.

use serde::{Deserialize, Serialize};

/// Default attribute holding the glacier name.
pub const DEFAULT_NAME_FIELD: &str = "glac_names";

/// Default projected CRS: UTM zone 33N, which covers the Scandinavian
/// glacier inventories this tool was written for.
pub const DEFAULT_TARGET_EPSG: u32 = 32633;

/// Default number of result rows shown after a match run.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Where a resolved option value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Built-in default value
    Default,
    /// Loaded from a config file
    File,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Cli => 2,
        }
    }
}

/// An option value paired with its source
#[derive(Debug, Clone)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Resolved options for a match run
#[derive(Debug, Clone)]
pub struct MatchOptions {
    pub name_field: ConfigValue<String>,
    pub target_epsg: ConfigValue<u32>,
    pub preview_rows: ConfigValue<usize>,
    pub max_distance_km: ConfigValue<Option<f64>>,
}

impl MatchOptions {
    /// Create options holding only the built-in defaults
    pub fn with_defaults() -> Self {
        Self {
            name_field: ConfigValue::new(DEFAULT_NAME_FIELD.to_string(), ConfigSource::Default),
            target_epsg: ConfigValue::new(DEFAULT_TARGET_EPSG, ConfigSource::Default),
            preview_rows: ConfigValue::new(DEFAULT_PREVIEW_ROWS, ConfigSource::Default),
            max_distance_km: ConfigValue::new(None, ConfigSource::Default),
        }
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_precedence_ordering() {
        assert!(ConfigSource::Cli.precedence() > ConfigSource::File.precedence());
        assert!(ConfigSource::File.precedence() > ConfigSource::Default.precedence());
    }

    #[test]
    fn test_update_respects_precedence() {
        let mut value = ConfigValue::new(32633u32, ConfigSource::Default);

        value.update(25833, ConfigSource::File);
        assert_eq!(value.value, 25833);
        assert_eq!(value.source, ConfigSource::File);

        // A lower-precedence source must not win
        value.update(4326, ConfigSource::Default);
        assert_eq!(value.value, 25833);

        value.update(32632, ConfigSource::Cli);
        assert_eq!(value.value, 32632);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_defaults() {
        let options = MatchOptions::with_defaults();
        assert_eq!(options.name_field.value, "glac_names");
        assert_eq!(options.target_epsg.value, 32633);
        assert_eq!(options.preview_rows.value, 5);
        assert!(options.max_distance_km.value.is_none());
    }
}
