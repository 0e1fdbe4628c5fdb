//! Demo configuration, read from an optional JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Simulated participants sharing the drawing
    pub peers: usize,
    /// Strokes each participant draws
    pub strokes: usize,
    /// Pointer moves per stroke
    pub points_per_stroke: usize,
    /// Canvas size in pixels, both backing store and displayed box
    pub canvas_size: f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            peers: 2,
            strokes: 3,
            points_per_stroke: 8,
            canvas_size: 2000.0,
        }
    }
}

impl DemoConfig {
    /// Defaults when `path` is `None`; missing keys fall back individually.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_json(&std::fs::read_to_string(path)?),
            None => Ok(Self::default()),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_path() {
        assert_eq!(DemoConfig::load(None).unwrap(), DemoConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let config = DemoConfig::from_json(r#"{"peers": 4}"#).unwrap();
        assert_eq!(config.peers, 4);
        assert_eq!(config.strokes, 3);
        assert_eq!(config.canvas_size, 2000.0);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(matches!(DemoConfig::from_json("{peers:"), Err(ConfigError::Json(_))));
    }
}
