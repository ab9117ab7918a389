use anyhow::{Context, Result};
use glacimatch_core::config::{ConfigSource, MatchOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the config file picked up from the working directory
pub const CONFIG_FILE_NAME: &str = "glacimatch.toml";

/// Complete configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, rename = "match")]
    pub match_defaults: MatchDefaults,
}

/// Defaults for the match run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchDefaults {
    pub name_field: Option<String>,
    pub epsg: Option<u32>,
    pub preview_rows: Option<usize>,
    pub max_distance_km: Option<f64>,
}

impl ConfigFile {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// An explicitly given path must exist; otherwise the default file
    /// is picked up only when present.
    pub fn discover(explicit: Option<&Path>) -> Result<Option<Self>> {
        if let Some(path) = explicit {
            return Self::load(path).map(Some);
        }

        let default = Path::new(CONFIG_FILE_NAME);
        if default.exists() {
            Self::load(default).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Fold the file values into the layered options
    pub fn apply(&self, options: &mut MatchOptions) {
        if let Some(v) = &self.match_defaults.name_field {
            options.name_field.update(v.clone(), ConfigSource::File);
        }
        if let Some(v) = self.match_defaults.epsg {
            options.target_epsg.update(v, ConfigSource::File);
        }
        if let Some(v) = self.match_defaults.preview_rows {
            options.preview_rows.update(v, ConfigSource::File);
        }
        if let Some(v) = self.match_defaults.max_distance_km {
            options.max_distance_km.update(Some(v), ConfigSource::File);
        }
    }
}
