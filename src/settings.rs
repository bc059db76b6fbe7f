use crate::colors::ColorScheme;
use crate::config::Axis;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Optional user settings read from `config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub donut: DonutSettings,
}

/// Every key is optional; missing keys keep the built-in default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DonutSettings {
    pub radius: Option<f64>,
    pub ratio: Option<f64>,
    pub theta: Option<usize>,
    pub phi: Option<usize>,
    pub axis_a: Option<Axis>,
    pub axis_b: Option<Axis>,
    pub start_a: Option<f64>,
    pub start_b: Option<f64>,
    pub speed: Option<f64>,
    pub speed_ratio: Option<f64>,
    pub light: Option<[f64; 3]>,
    pub pixels: Option<i32>, // <= 0 autoscales
    pub zoom: Option<f64>,
    pub frames: Option<u64>,
    pub infinite: Option<bool>,
    pub palette: Option<String>,
    pub colors: Option<ColorScheme>,
    pub delay: Option<f32>,
}

impl Settings {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// A missing or broken file falls back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    debug!(path = %path.display(), "loaded settings");
                    settings
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring malformed settings");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read settings");
                Self::default()
            }
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("flying-donut")
            .join("config.toml")
    }
}
