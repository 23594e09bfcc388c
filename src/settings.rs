use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::utils::get_config_path;

pub const DEFAULT_ENDPOINT: &str = "https://atlas.microsoft.com";
pub const DEFAULT_API_VERSION: &str = "2023-06-01";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct Settings {
    pub maps_key: Option<String>,
    pub endpoint: String,
    pub api_version: String,
    pub language: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            maps_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            language: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// Keeps the subscription key out of logs
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("maps_key", &self.maps_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .field("language", &self.language)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// On-disk form, every key optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    maps_key: Option<String>,
    endpoint: Option<String>,
    api_version: Option<String>,
    language: Option<String>,
    timeout_secs: Option<u64>,
}

impl Settings {
    /// Defaults, then the TOML file, then `AZURE_MAPS_*` environment variables.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut settings = Settings::default();

        match config_file {
            Some(path) => settings.apply_file(path)?,
            None => {
                let default_path = get_config_path();
                if default_path.exists() {
                    settings.apply_file(&default_path)?;
                }
            }
        }

        settings.apply_env(|name| std::env::var(name).ok())?;
        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    fn apply_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let file: FileSettings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        if file.maps_key.is_some() {
            self.maps_key = file.maps_key;
        }
        if let Some(endpoint) = file.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(api_version) = file.api_version {
            self.api_version = api_version;
        }
        if file.language.is_some() {
            self.language = file.language;
        }
        if let Some(timeout_secs) = file.timeout_secs {
            self.set_timeout(timeout_secs)
                .with_context(|| format!("Invalid timeout_secs in {}", path.display()))?;
        }
        Ok(())
    }

    fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup("AZURE_MAPS_KEY") {
            self.maps_key = Some(key);
        }
        if let Some(endpoint) = lookup("AZURE_MAPS_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Some(api_version) = lookup("AZURE_MAPS_API_VERSION") {
            self.api_version = api_version;
        }
        if let Some(language) = lookup("AZURE_MAPS_LANGUAGE") {
            self.language = Some(language);
        }
        if let Some(timeout) = lookup("AZURE_MAPS_TIMEOUT_SECS") {
            let secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("AZURE_MAPS_TIMEOUT_SECS is not a number: {}", timeout))?;
            self.set_timeout(secs).context("Invalid AZURE_MAPS_TIMEOUT_SECS")?;
        }
        Ok(())
    }

    /// A zero timeout would make every request fail immediately
    fn set_timeout(&mut self, secs: u64) -> Result<()> {
        if secs == 0 {
            bail!("request timeout must be at least 1 second");
        }
        self.timeout_secs = secs;
        Ok(())
    }

    pub fn require_maps_key(&self) -> Result<&str> {
        match self.maps_key.as_deref() {
            Some(key) => Ok(key),
            None => bail!(
                "Azure Maps subscription key is not set (AZURE_MAPS_KEY or maps_key in {})",
                get_config_path().display()
            ),
        }
    }
}
