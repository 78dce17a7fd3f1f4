//! Wire types for the Gitea admin user API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Gitea user account as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Gitea-assigned numeric ID.
    pub id: i64,
    /// Canonical account handle.
    #[serde(rename = "login", alias = "username")]
    pub username: String,
    /// Display name.
    #[serde(default)]
    pub full_name: String,
    /// Primary e-mail address.
    #[serde(default)]
    pub email: String,
    /// Avatar URL derived by Gitea.
    #[serde(default)]
    pub avatar_url: String,
    /// Whether the account is a site administrator.
    #[serde(default)]
    pub is_admin: bool,
}

/// Body of `POST /admin/users`.
///
/// Gitea has no admin flag on this endpoint; promotion is a separate
/// [`EditUserOption`] call.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateUserOption {
    /// Primary e-mail address.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Login name used by the authentication source.
    pub login_name: String,
    /// Initial password.
    pub password: String,
    /// Whether Gitea should send a welcome e-mail.
    pub send_notify: bool,
    /// Account handle. Gitea derives one when empty.
    pub username: String,
}

impl fmt::Debug for CreateUserOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserOption")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("login_name", &self.login_name)
            .field("password", &"<redacted>")
            .field("send_notify", &self.send_notify)
            .field("username", &self.username)
            .finish()
    }
}

/// Body of `PATCH /admin/users/{username}`.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditUserOption {
    /// Admin flag. `None` leaves it untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,
    /// Primary e-mail address.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Login name used by the authentication source.
    pub login_name: String,
    /// New password. Gitea keeps the current one when empty.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
}

impl fmt::Debug for EditUserOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditUserOption")
            .field("admin", &self.admin)
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("login_name", &self.login_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Error body returned by Gitea on non-success responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiMessage {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_from_gitea_json() {
        let json = r#"{
            "id": 7,
            "login": "alice",
            "full_name": "Alice Liddell",
            "email": "alice@example.com",
            "avatar_url": "https://gitea.example.com/avatars/7",
            "is_admin": false,
            "language": "en-US"
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.username, "alice");
        assert_eq!(user.full_name, "Alice Liddell");
        assert_eq!(user.avatar_url, "https://gitea.example.com/avatars/7");
        assert!(!user.is_admin);
    }

    #[test]
    fn test_user_accepts_legacy_username_key() {
        let json = r#"{"id": 1, "username": "root", "email": "root@example.com"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.username, "root");
        assert_eq!(user.full_name, "");
    }

    #[test]
    fn test_create_option_body() {
        let opt = CreateUserOption {
            email: "bob@example.com".into(),
            full_name: "Bob".into(),
            login_name: "bob".into(),
            password: "hunter2".into(),
            send_notify: false,
            username: "bob".into(),
        };

        let body = serde_json::to_value(&opt).unwrap();
        assert_eq!(body["login_name"], "bob");
        assert_eq!(body["send_notify"], false);
        assert_eq!(body["password"], "hunter2");
    }

    #[test]
    fn test_edit_option_skips_unset_admin() {
        let opt = EditUserOption {
            email: "bob@example.com".into(),
            ..Default::default()
        };

        let body = serde_json::to_value(&opt).unwrap();
        assert!(body.get("admin").is_none());
        assert!(body.get("password").is_none());

        let promoted = EditUserOption {
            admin: Some(true),
            ..opt
        };
        let body = serde_json::to_value(&promoted).unwrap();
        assert_eq!(body["admin"], true);
    }

    #[test]
    fn test_debug_redacts_password() {
        let opt = CreateUserOption {
            password: "hunter2".into(),
            ..Default::default()
        };
        let edit = EditUserOption {
            password: "hunter2".into(),
            ..Default::default()
        };

        assert!(!format!("{opt:?}").contains("hunter2"));
        assert!(!format!("{edit:?}").contains("hunter2"));
    }
}
