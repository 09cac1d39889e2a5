use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use chatheat_core::{ColorSchemeId, Provider};
use serde::Deserialize;

static CONFIG: OnceLock<ChatheatConfig> = OnceLock::new();

/// Optional user defaults read from `~/.chatheat` (TOML).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatheatConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultsConfig {
    pub provider: Option<String>,
    pub scheme: Option<String>,
}

impl ChatheatConfig {
    fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".chatheat"))
    }

    pub fn load() -> &'static ChatheatConfig {
        CONFIG.get_or_init(|| {
            Self::config_path()
                .and_then(|path| fs::read_to_string(path).ok())
                .map(|content| Self::parse(&content))
                .unwrap_or_default()
        })
    }

    pub fn parse(content: &str) -> ChatheatConfig {
        toml::from_str(content).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "ignoring malformed ~/.chatheat");
            ChatheatConfig::default()
        })
    }

    pub fn default_provider(&self) -> Option<Provider> {
        let id = self.defaults.provider.as_deref()?;
        match Provider::from_str(&id.to_lowercase()) {
            Some(provider) if !provider.is_disabled() => Some(provider),
            _ => {
                tracing::warn!(provider = id, "ignoring unusable default provider");
                None
            }
        }
    }

    pub fn default_scheme(&self) -> Option<ColorSchemeId> {
        let id = self.defaults.scheme.as_deref()?;
        match id.parse() {
            Ok(scheme) => Some(scheme),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring default color scheme");
                None
            }
        }
    }
}
