//! Provider configuration
//!
//! Loaded from TOML, then overridden by `GITEA_BASE_URL` / `GITEA_TOKEN`.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Environment variable overriding `base_url`
pub const ENV_BASE_URL: &str = "GITEA_BASE_URL";

/// Environment variable overriding `token`
pub const ENV_TOKEN: &str = "GITEA_TOKEN";

#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Gitea instance URL, e.g. `https://gitea.example.com`
    #[serde(default)]
    pub base_url: String,

    /// Access token of a site administrator
    #[serde(default)]
    pub token: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Re-read users after every edit
    #[serde(default)]
    pub refresh_after_update: bool,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
            refresh_after_update: false,
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("token", &if self.token.is_empty() { "" } else { "<redacted>" })
            .field("timeout_secs", &self.timeout_secs)
            .field("refresh_after_update", &self.refresh_after_update)
            .finish()
    }
}

impl ProviderConfig {
    /// Parse a TOML config string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid provider config format")
    }

    /// Load the config file at `path`
    ///
    /// A missing file yields the defaults, so a config can come entirely
    /// from the environment.
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("Config file {} does not exist, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        log::debug!("Loaded provider config from {}", path.display());
        Ok(config)
    }

    /// Load from `path` and apply environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from a variable lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            log::debug!("Using base_url from {ENV_BASE_URL}");
            self.base_url = base_url;
        }
        if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.is_empty()) {
            log::debug!("Using token from {ENV_TOKEN}");
            self.token = token;
        }
    }

    /// Check that the provider can be built from this config
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            bail!("base_url is not set (config file or {ENV_BASE_URL})");
        }
        if self.token.is_empty() {
            bail!("token is not set (config file or {ENV_TOKEN})");
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_from_toml_full() {
        let config = ProviderConfig::from_toml(
            r#"
base_url = "https://gitea.example.com"
token = "abc"
timeout_secs = 5
refresh_after_update = true
"#,
        )
        .unwrap();

        assert_eq!(config.base_url, "https://gitea.example.com");
        assert_eq!(config.token, "abc");
        assert_eq!(config.timeout_secs, 5);
        assert!(config.refresh_after_update);
    }

    #[test]
    fn test_from_toml_defaults() {
        let config = ProviderConfig::from_toml("base_url = \"http://localhost:3000\"").unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.refresh_after_update);
        assert!(config.token.is_empty());
    }

    #[test]
    fn test_from_toml_rejects_unknown_keys() {
        assert!(ProviderConfig::from_toml("base_uri = \"x\"").is_err());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = ProviderConfig::load_file(&tmp.path().join("nope.toml")).unwrap();
        assert!(config.base_url.is_empty());
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_load_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "base_url = \"https://git.local\"\ntoken = \"t\"\n").unwrap();

        let config = ProviderConfig::load_file(&path).unwrap();
        assert_eq!(config.base_url, "https://git.local");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_file_invalid() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"soon\"").unwrap();

        let err = ProviderConfig::load_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse"));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = ProviderConfig::from_toml(
            "base_url = \"https://file.example.com\"\ntoken = \"from-file\"",
        )
        .unwrap();
        let env: HashMap<&str, &str> = [(ENV_TOKEN, "from-env"), (ENV_BASE_URL, "")].into();

        config.apply_env(|key| env.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.token, "from-env");
        // empty values do not override
        assert_eq!(config.base_url, "https://file.example.com");
    }

    #[test]
    fn test_validate() {
        let mut config = ProviderConfig::default();
        assert!(config.validate().is_err());

        config.base_url = "https://gitea.example.com".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains(ENV_TOKEN));

        config.token = "t".into();
        assert!(config.validate().is_ok());

        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ProviderConfig {
            token: "sup3rs3cret".into(),
            ..Default::default()
        };
        assert!(!format!("{config:?}").contains("sup3rs3cret"));
    }
}
