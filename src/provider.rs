//! Provider bootstrapping
//!
//! Builds the Gitea client from configuration and hands out the resources
//! this provider registers.

use crate::config::ProviderConfig;
use crate::resource::user::{self, UserOptions, UserResource};
use anyhow::{Context, Result, bail};
use declarative::{BoxedResource, Schema};
use giteakit::HttpBackend;
use std::time::Duration;

/// Resource types this provider registers
pub const RESOURCE_TYPES: &[&str] = &[user::TYPE_NAME];

/// Schema of a registered resource type, without needing a client
pub fn schema_for(type_name: &str) -> Option<Schema> {
    match type_name {
        user::TYPE_NAME => Some(user::schema()),
        _ => None,
    }
}

/// A configured provider
#[derive(Debug)]
pub struct Provider {
    config: ProviderConfig,
}

impl Provider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        config.validate().context("Invalid provider configuration")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Build a fresh HTTP client for the configured instance
    pub fn client(&self) -> Result<HttpBackend> {
        HttpBackend::with_timeout(
            &self.config.base_url,
            &self.config.token,
            Duration::from_secs(self.config.timeout_secs),
        )
        .with_context(|| format!("Could not create Gitea client for {}", self.config.base_url))
    }

    /// Instantiate a registered resource
    pub fn resource(&self, type_name: &str) -> Result<BoxedResource> {
        match type_name {
            user::TYPE_NAME => {
                let options = UserOptions {
                    refresh_after_update: self.config.refresh_after_update,
                };
                Ok(Box::new(UserResource::with_options(self.client()?, options)))
            }
            other => bail!(
                "unknown resource type: {other} (known: {})",
                RESOURCE_TYPES.join(", ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProviderConfig {
        ProviderConfig {
            base_url: "https://gitea.example.com/".into(),
            token: "t".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_rejects_incomplete_config() {
        assert!(Provider::new(ProviderConfig::default()).is_err());
    }

    #[test]
    fn test_client_uses_base_url() {
        let provider = Provider::new(config()).unwrap();
        let client = provider.client().unwrap();
        assert_eq!(client.base_url(), "https://gitea.example.com");
    }

    #[test]
    fn test_resource_lookup() {
        let provider = Provider::new(config()).unwrap();

        let resource = provider.resource("gitea_user").unwrap();
        assert_eq!(resource.type_name(), "gitea_user");
        assert_eq!(resource.schema(), user::schema());

        let err = provider.resource("gitea_org").unwrap_err();
        assert!(err.to_string().contains("gitea_user"));
    }

    #[test]
    fn test_schema_for() {
        assert!(schema_for("gitea_user").is_some());
        assert!(schema_for("gitea_repo").is_none());
        for name in RESOURCE_TYPES {
            assert!(schema_for(name).is_some());
        }
    }
}
