//! Client configuration.
//!
//! Everything has a sensible default; a TOML file can override any field.
//! A missing file is not an error - the defaults simply apply.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Port used when the player types a bare address into the title screen.
pub const DEFAULT_PORT: u16 = 4950;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Window width in logical pixels.
    pub window_width: u32,

    /// Window height in logical pixels.
    pub window_height: u32,

    /// Window title.
    pub window_title: String,

    /// Simulation tick rate (ticks per second).
    pub tick_rate: u32,

    /// Default server address shown in the title screen text box.
    pub server_addr: String,

    /// Radians of view rotation per pixel of pointer motion.
    pub look_sensitivity: f32,

    /// Flight speed in meters/second.
    pub move_speed: f32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 450,
            window_title: "Bean Game".to_string(),
            tick_rate: 60,
            server_addr: "172.233.208.111".to_string(),
            look_sensitivity: 0.003,
            move_speed: 5.4,
        }
    }
}

impl ClientConfig {
    /// Seconds per simulation tick.
    pub fn tick_duration(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Parse a config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Load a config file if present, falling back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(path) => match Self::load(path) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!("config {} unusable ({err}), using defaults", path.display());
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_playable() {
        let config = ClientConfig::default();
        assert_eq!(config.window_width, 800);
        assert_eq!(config.window_height, 450);
        assert_eq!(config.window_title, "Bean Game");
        assert_eq!(config.tick_rate, 60);
        assert_eq!(config.server_addr, "172.233.208.111");
    }

    #[test]
    fn partial_toml_overrides() {
        let config: ClientConfig = toml::from_str("tick_rate = 30\nmove_speed = 3.0\n").unwrap();
        assert_eq!(config.tick_rate, 30);
        assert_eq!(config.move_speed, 3.0);
        // Untouched fields keep their defaults.
        assert_eq!(config.window_width, 800);
    }

    #[test]
    fn tick_duration_guards_zero() {
        let config: ClientConfig = toml::from_str("tick_rate = 0\n").unwrap();
        assert!(config.tick_duration().is_finite());
    }
}
