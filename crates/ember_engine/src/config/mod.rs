//! Configuration system

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// UI renderer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Per-frame quad budget for the UI batch renderer
    pub max_quad_count: usize,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            max_quad_count: crate::ui::renderer::DEFAULT_MAX_QUAD_COUNT,
        }
    }
}

/// Render settings for the engine's frame loop and UI subsystem
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Number of in-flight frame slots
    pub max_frames_in_flight: usize,
    /// UI renderer settings
    pub ui: UiSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_frames_in_flight: 2,
            ui: UiSettings::default(),
        }
    }
}

impl Config for RenderSettings {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = RenderSettings::default();
        assert_eq!(settings.max_frames_in_flight, 2);
        assert_eq!(settings.ui.max_quad_count, 1024);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let settings: RenderSettings = toml::from_str("max_frames_in_flight = 3").expect("parse");
        assert_eq!(settings.max_frames_in_flight, 3);
        assert_eq!(settings.ui.max_quad_count, 1024);
    }

    #[test]
    fn test_toml_round_trip() {
        let settings = RenderSettings {
            max_frames_in_flight: 3,
            ui: UiSettings { max_quad_count: 256 },
        };
        let text = toml::to_string_pretty(&settings).expect("serialize");
        let parsed: RenderSettings = toml::from_str(&text).expect("parse");
        assert_eq!(parsed.max_frames_in_flight, 3);
        assert_eq!(parsed.ui.max_quad_count, 256);
    }
}
