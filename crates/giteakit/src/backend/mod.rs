//! Backend abstraction for Gitea admin operations.
//!
//! The [`AdminApi`] trait is the capability a resource adapter needs:
//! exactly the four admin user calls, nothing else. Real HTTP access lives
//! in [`http::HttpBackend`]; tests substitute their own implementation.

pub mod http;

use crate::error::Result;
use crate::types::{CreateUserOption, EditUserOption, User};

/// Admin user operations against a Gitea instance.
///
/// Every method performs exactly one request and never retries.
pub trait AdminApi: Send + Sync {
    /// Create a user (`POST /admin/users`).
    fn create_user(&self, option: &CreateUserOption) -> Result<User>;

    /// Fetch a user by username (`GET /users/{username}`).
    fn get_user_info(&self, username: &str) -> Result<User>;

    /// Edit a user (`PATCH /admin/users/{username}`).
    fn edit_user(&self, username: &str, option: &EditUserOption) -> Result<()>;

    /// Delete a user (`DELETE /admin/users/{username}`).
    fn delete_user(&self, username: &str) -> Result<()>;
}

impl<T: AdminApi + ?Sized> AdminApi for &T {
    fn create_user(&self, option: &CreateUserOption) -> Result<User> {
        (**self).create_user(option)
    }

    fn get_user_info(&self, username: &str) -> Result<User> {
        (**self).get_user_info(username)
    }

    fn edit_user(&self, username: &str, option: &EditUserOption) -> Result<()> {
        (**self).edit_user(username, option)
    }

    fn delete_user(&self, username: &str) -> Result<()> {
        (**self).delete_user(username)
    }
}

impl<T: AdminApi + ?Sized> AdminApi for Box<T> {
    fn create_user(&self, option: &CreateUserOption) -> Result<User> {
        (**self).create_user(option)
    }

    fn get_user_info(&self, username: &str) -> Result<User> {
        (**self).get_user_info(username)
    }

    fn edit_user(&self, username: &str, option: &EditUserOption) -> Result<()> {
        (**self).edit_user(username, option)
    }

    fn delete_user(&self, username: &str) -> Result<()> {
        (**self).delete_user(username)
    }
}
