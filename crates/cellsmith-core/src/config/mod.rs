use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CellsmithError, Result};
use crate::pricing::BillingInterval;

/// Env var that overrides `auth.supabase_url`, for staging projects.
pub const SUPABASE_URL_ENV: &str = "CELLSMITH_SUPABASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub pricing: PricingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    pub supabase_url: String,
    /// Name of the env var holding the Supabase anon key. The key itself is never written to disk.
    pub anon_key_env: String,
    /// Where the magic link lands after the user clicks it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    15
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PricingSettings {
    #[serde(default)]
    pub default_interval: BillingInterval,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            supabase_url: "https://cellsmith.supabase.co".to_string(),
            anon_key_env: "CELLSMITH_SUPABASE_ANON_KEY".to_string(),
            redirect_to: Some("https://cellsmith.app/auth/callback".to_string()),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cellsmith")
            .join("config.toml")
    }

    pub fn load() -> Self {
        let config_path = Self::config_path();
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load_from(&config_path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring {}: {}", config_path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CellsmithError::Config(e.to_string()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CellsmithError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Supabase project URL, honoring the env override.
    pub fn supabase_url(&self) -> String {
        std::env::var(SUPABASE_URL_ENV)
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| self.auth.supabase_url.clone())
    }

    /// Get the anon key from the environment variable named in settings.
    pub fn anon_key(&self) -> Option<String> {
        std::env::var(&self.auth.anon_key_env)
            .ok()
            .filter(|key| !key.is_empty())
    }
}
