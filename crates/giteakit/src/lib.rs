//! # giteakit
//!
//! Blocking Rust client for the Gitea admin user API.
//!
//! The crate exposes the admin operations as a capability trait,
//! [`AdminApi`], so code that manages users can be handed either the real
//! HTTP backend or a test double.
//!
//! ## Example
//!
//! ```no_run
//! use giteakit::{AdminApi, CreateUserOption, HttpBackend};
//!
//! let gitea = HttpBackend::new("https://gitea.example.com", "s3cr3t").unwrap();
//!
//! let user = gitea
//!     .create_user(&CreateUserOption {
//!         email: "alice@example.com".into(),
//!         full_name: "Alice".into(),
//!         login_name: "alice".into(),
//!         password: "correct horse battery staple".into(),
//!         send_notify: false,
//!         username: "alice".into(),
//!     })
//!     .expect("create failed");
//!
//! println!("created {} (id {})", user.username, user.id);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod types;

pub use backend::AdminApi;
pub use backend::http::HttpBackend;
pub use error::{Error, ErrorCategory, Result};
pub use types::{CreateUserOption, EditUserOption, User};
