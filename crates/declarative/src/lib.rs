//! # Declarative
//!
//! A small framework for declarative resource management.
//!
//! A resource declares a [`Schema`], receives the caller's configuration as
//! a [`ResourceData`] handle, and converges the remote side through four
//! lifecycle operations. What it observes remotely is written back as
//! tracked state.
//!
//! ## Core Concepts
//!
//! - **Schema**: typed field declarations (required, optional, computed, sensitive, defaults)
//! - **ResourceData**: desired values in, tracked values out, both checked against the schema
//! - **Resource**: create / read / update / delete for one resource type
//! - **Executor**: dispatches an [`Operation`] for one instance, or many instances in parallel
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{execute, Operation, ResourceData, Value};
//!
//! let resource = MyResource::new(client);
//! let mut data = ResourceData::from_desired(
//!     resource.schema(),
//!     [("name", Value::from("alice"))],
//! )?;
//!
//! let outcome = execute(&resource, Operation::Create, &mut data);
//! println!("{outcome:?}: {}", serde_json::to_string(&data)?);
//! ```

pub mod data;
pub mod error;
pub mod executor;
pub mod resource;
pub mod schema;

// Re-export main types at crate root
pub use data::{ResourceData, StateWriter, Value};
pub use error::DataError;
pub use executor::{execute, execute_batch, BatchSummary, Operation, Outcome};
pub use resource::{BoxedResource, Resource};
pub use schema::{FieldSchema, FieldType, Schema};
