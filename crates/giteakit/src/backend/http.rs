//! HTTP backend for the Gitea API v1.
//!
//! Requests are blocking and authenticated with an access token
//! (`Authorization: token <token>`). Non-success statuses are turned into
//! [`Error::Api`] carrying Gitea's own error message.

use crate::backend::AdminApi;
use crate::error::{Error, Result};
use crate::types::{ApiMessage, CreateUserOption, EditUserOption, User};
use std::borrow::Cow;
use std::time::Duration;
use ureq::http::Response;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("giteakit/", env!("CARGO_PKG_VERSION"));

/// Gitea API backend over HTTP.
///
/// # Example
///
/// ```no_run
/// use giteakit::backend::AdminApi;
/// use giteakit::backend::http::HttpBackend;
///
/// let backend = HttpBackend::new("https://gitea.example.com", "s3cr3t").unwrap();
/// let user = backend.get_user_info("alice").unwrap();
/// println!("{} has id {}", user.username, user.id);
/// ```
pub struct HttpBackend {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// Instance base URL without trailing slash.
    base_url: String,
    /// Access token.
    token: String,
}

impl HttpBackend {
    /// Create a backend with the default timeout.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, token, DEFAULT_TIMEOUT)
    }

    /// Create a backend with a custom global request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = normalize_base_url(&base_url.into())?;

        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();

        Ok(Self {
            agent: ureq::Agent::new_with_config(config),
            base_url,
            token: token.into(),
        })
    }

    /// Get the instance base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the admin users collection.
    fn admin_users_url(&self) -> String {
        format!("{}/api/v1/admin/users", self.base_url)
    }

    /// URL of one user under the admin API.
    fn admin_user_url(&self, username: &str) -> Result<String> {
        Ok(format!(
            "{}/api/v1/admin/users/{}",
            self.base_url,
            user_segment(username)?
        ))
    }

    /// URL of one user under the public API.
    fn user_url(&self, username: &str) -> Result<String> {
        Ok(format!(
            "{}/api/v1/users/{}",
            self.base_url,
            user_segment(username)?
        ))
    }

    fn auth_header(&self) -> String {
        format!("token {}", self.token)
    }
}

impl AdminApi for HttpBackend {
    fn create_user(&self, option: &CreateUserOption) -> Result<User> {
        let url = self.admin_users_url();
        log::debug!("POST {url} (username={:?})", option.username);

        let response = self
            .agent
            .post(&url)
            .header("Authorization", self.auth_header())
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .send_json(option)?;

        let mut response = check_status(response)?;
        Ok(response.body_mut().read_json()?)
    }

    fn get_user_info(&self, username: &str) -> Result<User> {
        let url = self.user_url(username)?;
        log::debug!("GET {url}");

        let response = self
            .agent
            .get(&url)
            .header("Authorization", self.auth_header())
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .call()?;

        let mut response = check_status(response)?;
        Ok(response.body_mut().read_json()?)
    }

    fn edit_user(&self, username: &str, option: &EditUserOption) -> Result<()> {
        let url = self.admin_user_url(username)?;
        log::debug!("PATCH {url} (admin={:?})", option.admin);

        let response = self
            .agent
            .patch(&url)
            .header("Authorization", self.auth_header())
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .send_json(option)?;

        check_status(response)?;
        Ok(())
    }

    fn delete_user(&self, username: &str) -> Result<()> {
        let url = self.admin_user_url(username)?;
        log::debug!("DELETE {url}");

        let response = self
            .agent
            .delete(&url)
            .header("Authorization", self.auth_header())
            .header("User-Agent", USER_AGENT)
            .call()?;

        check_status(response)?;
        Ok(())
    }
}

/// Pass success responses through, turn anything else into [`Error::Api`].
fn check_status(mut response: Response<ureq::Body>) -> Result<Response<ureq::Body>> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.body_mut().read_to_string().unwrap_or_default();
    Err(api_error(status.as_u16(), &body))
}

/// Build an API error from a status and a response body.
///
/// Gitea answers errors with `{"message": "...", "url": "..."}`; anything
/// else is reported verbatim.
fn api_error(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<ApiMessage>(body)
        .ok()
        .map(|m| m.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("HTTP {status}")
            } else {
                trimmed.to_string()
            }
        });

    Error::api(status, message)
}

/// Encode a username as exactly one path segment.
///
/// Reserved characters are percent-encoded; `.` and `..` would still be
/// resolved as dot segments and are rejected.
fn user_segment(username: &str) -> Result<Cow<'_, str>> {
    if username == "." || username == ".." {
        return Err(Error::InvalidConfig(format!(
            "invalid username: {username:?}"
        )));
    }
    Ok(urlencoding::encode(username))
}

/// Strip trailing slashes and reject empty URLs.
fn normalize_base_url(base_url: &str) -> Result<String> {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidConfig("base URL is empty".to_string()));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(Error::InvalidConfig(format!(
            "base URL must start with http:// or https://: {trimmed}"
        )));
    }
    Ok(trimmed.to_string())
}
