//! Resources registered by the provider
//!
//! Each resource implements [`declarative::Resource`] on top of a
//! [`giteakit::AdminApi`] client.

pub mod user;
