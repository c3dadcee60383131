use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Credential and locale configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_keys = ["key-a", "key-b"]
/// user_api_key = "my-own-key"
/// locale = "de-DE"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Statically provisioned key pool, rotated round-robin across requests.
    #[serde(default)]
    pub api_keys: Vec<String>,

    /// User-supplied override key; always wins when non-empty.
    #[serde(default)]
    pub user_api_key: Option<String>,

    /// Single legacy key, consulted only when the pool is empty.
    #[serde(default)]
    pub legacy_api_key: Option<String>,

    /// `language-COUNTRY` locale used to pick the provider language
    /// parameter, e.g. "es-ES".
    #[serde(default)]
    pub locale: Option<String>,
}

impl Config {
    /// The key pool with blank entries dropped; provisioning sometimes
    /// leaves empty strings behind.
    pub fn key_pool(&self) -> Vec<String> {
        self.api_keys
            .iter()
            .filter(|k| !k.trim().is_empty())
            .cloned()
            .collect()
    }

    /// Store or replace the user override key.
    pub fn set_user_api_key(&mut self, key: String) {
        self.user_api_key = Some(key);
    }

    pub fn locale_or_default(&self) -> &str {
        self.locale.as_deref().unwrap_or("en-US")
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skywatch", "skywatch")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
