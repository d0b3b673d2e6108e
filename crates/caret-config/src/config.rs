/// Caret metrics configuration: load, save and sanitize.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Pixel metrics used by the caret engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaretConfig {
    /// Fixed pixel height of a text row.
    pub row_height: f32,
    /// Pixels subtracted from a click's Y offset before resolving its row,
    /// so a click on a row's lower edge stays on that row.
    pub boundary_bias: f32,
    /// Width of one character cell in pixels.
    pub char_width: f32,
}

impl Default for CaretConfig {
    fn default() -> Self {
        Self {
            row_height: 20.0,
            boundary_bias: 0.1,
            char_width: 8.0,
        }
    }
}

impl CaretConfig {
    /// Returns the config file path: exe directory + `caret.json`.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.join("caret.json")))
            .unwrap_or_else(|| PathBuf::from("caret.json"))
    }

    /// Loads config from `path`, creating a default file if it doesn't exist.
    /// Returns defaults on any error (missing file, parse error, etc.).
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str::<CaretConfig>(&contents) {
                    Ok(mut config) => {
                        config.sanitize();
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {}: {e}", path.display());
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {}: {e}", path.display());
                }
            }
            // Return defaults on error (don't overwrite broken file)
            Self::default()
        } else {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Failed to create default config at {}: {e}", path.display());
            }
            config
        }
    }

    /// Saves config to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Clamps values to valid ranges.
    pub fn sanitize(&mut self) {
        if !self.row_height.is_finite() {
            self.row_height = Self::default().row_height;
        }
        if !self.char_width.is_finite() {
            self.char_width = Self::default().char_width;
        }
        if !self.boundary_bias.is_finite() {
            self.boundary_bias = Self::default().boundary_bias;
        }
        self.row_height = self.row_height.clamp(1.0, 512.0);
        self.char_width = self.char_width.clamp(1.0, 256.0);
        // The bias must never push a click out of the upper half of its row.
        self.boundary_bias = self.boundary_bias.clamp(0.0, self.row_height / 2.0);
    }
}
