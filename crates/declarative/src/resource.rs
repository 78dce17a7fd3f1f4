//! Resource trait for declarative state management
//!
//! A Resource knows how to bring one remote object in line with a declared
//! configuration through four lifecycle operations.

use crate::data::ResourceData;
use crate::schema::Schema;
use anyhow::Result;
use std::fmt;

/// Core trait for declarative resources
///
/// Implementations hold only immutable configuration and the client they
/// talk to. All per-instance state lives in the [`ResourceData`] passed to
/// each call, so one resource value can serve concurrent invocations for
/// different instances.
///
/// # Example
///
/// ```ignore
/// use declarative::{FieldSchema, Resource, ResourceData, Schema, StateWriter, Value};
///
/// #[derive(Debug)]
/// struct Greeting;
///
/// impl Resource for Greeting {
///     fn type_name(&self) -> &'static str {
///         "greeting"
///     }
///
///     fn schema(&self) -> Schema {
///         Schema::new(vec![
///             FieldSchema::string("name").required(),
///             FieldSchema::string("text").computed(),
///         ])
///     }
///
///     fn create(&self, d: &mut ResourceData) -> anyhow::Result<()> {
///         let text = format!("hello {}", d.get_str("name")?);
///         d.set("text", Value::from(text))?;
///         Ok(())
///     }
///
///     fn read(&self, d: &mut ResourceData) -> anyhow::Result<()> {
///         self.create(d)
///     }
///
///     fn update(&self, _d: &mut ResourceData) -> anyhow::Result<()> {
///         Ok(())
///     }
///
///     fn delete(&self, _d: &mut ResourceData) -> anyhow::Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait Resource: Send + Sync + fmt::Debug {
    /// Resource type name, e.g. "gitea_user"
    fn type_name(&self) -> &'static str;

    /// Field declarations for this resource type
    fn schema(&self) -> Schema;

    /// Create the remote object from desired state
    fn create(&self, d: &mut ResourceData) -> Result<()>;

    /// Refresh tracked state from the remote object
    fn read(&self, d: &mut ResourceData) -> Result<()>;

    /// Push desired state to an existing remote object
    fn update(&self, d: &mut ResourceData) -> Result<()>;

    /// Remove the remote object
    fn delete(&self, d: &mut ResourceData) -> Result<()>;

    /// Empty state handle for this resource's schema
    fn new_data(&self) -> ResourceData {
        ResourceData::new(self.schema())
    }
}

/// A boxed resource for type-erased storage
pub type BoxedResource = Box<dyn Resource>;
