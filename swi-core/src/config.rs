//! Runtime configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! gives a working configuration: WGS84 geometries measured in UTM zone 51N.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use swi_geometry::projection::{Hemisphere, UtmZone};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub zone: u8,
    pub hemisphere: Hemisphere,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            zone: 51,
            hemisphere: Hemisphere::North,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub projection: ProjectionConfig,
}

impl Config {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Config = serde_json::from_str(json).context("invalid configuration JSON")?;
        config.utm_zone()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_json(&json)?;
        log::info!("[SWI] config: loaded {}", path.display());
        Ok(config)
    }

    /// The metric projection used to measure geometries.
    pub fn utm_zone(&self) -> anyhow::Result<UtmZone> {
        Ok(UtmZone::new(self.projection.zone, self.projection.hemisphere)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        let zone = config.utm_zone().unwrap();
        assert_eq!(zone.number(), 51);
        assert_eq!(zone.hemisphere(), Hemisphere::North);
    }

    #[test]
    fn reads_projection_section() {
        let config =
            Config::from_json(r#"{"projection": {"zone": 56, "hemisphere": "south"}}"#).unwrap();
        assert_eq!(config.projection.zone, 56);
        assert_eq!(config.projection.hemisphere, Hemisphere::South);
    }

    #[test]
    fn rejects_invalid_zone() {
        assert!(Config::from_json(r#"{"projection": {"zone": 0}}"#).is_err());
        assert!(Config::from_json(r#"{"projection": {"zone": 61}}"#).is_err());
    }
}
