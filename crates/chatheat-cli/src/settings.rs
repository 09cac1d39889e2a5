use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    #[default]
    Light,
    Dark,
}

impl Appearance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Appearance::Light => "light",
            Appearance::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Appearance {
        match self {
            Appearance::Light => Appearance::Dark,
            Appearance::Dark => Appearance::Light,
        }
    }

    /// Terminal preference from `COLORFGBG`.
    pub fn from_system() -> Appearance {
        Self::from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
    }

    /// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`). Background
    /// indexes 0-6 and 8 are the dark ANSI colors.
    pub fn from_colorfgbg(value: Option<&str>) -> Appearance {
        let background = value
            .and_then(|v| v.rsplit(';').next())
            .and_then(|bg| bg.trim().parse::<u8>().ok());

        match background {
            Some(0..=6) | Some(8) => Appearance::Dark,
            _ => Appearance::Light,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub appearance: Appearance,
}

impl Settings {
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("chatheat");

        Ok(config_dir.join("settings.json"))
    }

    /// Saved settings, or on first run the system preference (which is
    /// then saved so later runs ignore the system).
    pub fn load_or_init() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_or_init_at(&path),
            Err(err) => {
                tracing::debug!(error = %err, "settings path unavailable");
                Self::from_system()
            }
        }
    }

    pub fn load_or_init_at(path: &Path) -> Self {
        if let Some(settings) = Self::load_from(path) {
            return settings;
        }

        let settings = Self::from_system();
        if let Err(err) = settings.save_to(path) {
            tracing::warn!(path = %path.display(), error = %err, "could not save settings");
        }
        settings
    }

    pub fn load_from(path: &Path) -> Option<Self> {
        fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn from_system() -> Self {
        Self {
            appearance: Appearance::from_system(),
        }
    }
}
