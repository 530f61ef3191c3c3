//! Configuration handling for paint
//!
//! `PaintConfig` is read from `<config dir>/paint/config.toml` (or a path
//! given on the command line). A missing file just means defaults.

use crate::error::{PaintError, Result};
use crate::stroke::DEFAULT_BRUSH_SIZE;
use crate::types::Color;
use serde::Deserialize;
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaintConfig {
    pub title: String,
    pub initial_color: String,
    pub brush_size: u32,
    /// Colors bound to number keys 1..=9, in order.
    pub palette: Vec<String>,
    /// Where "download" drops `image.png`. Defaults to the user's download dir.
    pub download_dir: Option<PathBuf>,
    /// Target of save/open. Defaults to `paint.png` in the picture dir.
    pub save_path: Option<PathBuf>,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            title: "Paint".to_string(),
            initial_color: "black".to_string(),
            brush_size: DEFAULT_BRUSH_SIZE,
            palette: ["black", "red", "orange", "gold", "green", "deepskyblue", "blue", "purple", "white"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            download_dir: None,
            save_path: None,
        }
    }
}

impl PaintConfig {
    /// Default location of the configuration file
    pub fn default_path() -> PathBuf {
        let config_dir = if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("paint")
        } else {
            PathBuf::from(".config/paint")
        };

        config_dir.join("config.toml")
    }

    /// Load configuration from `path`, returning defaults if it doesn't exist
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => {
                let config: Self = toml::from_str(&content)?;
                config.validate()?;
                Ok(config)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(PaintError::Config(format!("{}: {e}", path.display()))),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.brush_size == 0 {
            return Err(PaintError::Config("brush_size must be at least 1".into()));
        }
        Color::parse(&self.initial_color)?;
        if self.palette.len() > 9 {
            return Err(PaintError::Config(format!(
                "palette has {} colors; only 9 number keys exist",
                self.palette.len()
            )));
        }
        for color in &self.palette {
            Color::parse(color)?;
        }
        Ok(())
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn save_path(&self) -> PathBuf {
        self.save_path.clone().unwrap_or_else(|| {
            dirs::picture_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("paint.png")
        })
    }

    /// Palette color for number key `n` (1-based).
    pub fn palette_color(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|i| self.palette.get(i))
            .map(String::as_str)
    }
}
