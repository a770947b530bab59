//! The lifecycle callback contract every resource handler implements.

use async_trait::async_trait;

use crate::errors::{ProviderError, Result};
use crate::record::ResourceData;
use crate::schema::ResourceSchema;

/// CRUD + import callbacks invoked by the host for one resource type.
///
/// Every callback receives the record it operates on and writes the resulting
/// state back into it. Clearing the record identity signals that the remote
/// entity no longer exists.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Attribute declarations for this resource type.
    fn schema(&self) -> &'static ResourceSchema;

    /// Creates the remote entity from the desired attributes in `d`.
    async fn create(&self, d: &mut ResourceData) -> Result<()>;

    /// Refreshes `d` from the remote entity.
    async fn read(&self, d: &mut ResourceData) -> Result<()>;

    /// Applies changed attributes in place.
    ///
    /// Resource types without an in-place update path keep this default,
    /// which refuses; the host replaces them instead.
    async fn update(&self, d: &mut ResourceData) -> Result<()> {
        let _ = d;
        Err(ProviderError::UnsupportedOperation {
            resource: self.schema().type_name.to_string(),
            operation: "update".to_string(),
        })
    }

    /// Deletes the remote entity.
    async fn delete(&self, d: &mut ResourceData) -> Result<()>;

    /// Adopts an existing remote entity by its external identifier.
    ///
    /// The default is a pass-through: `id` becomes the record identity and a
    /// subsequent [`Resource::read`] fills in the rest.
    async fn import(&self, id: &str) -> Result<ResourceData> {
        Ok(ResourceData::with_id(id))
    }

    /// Returns `true` if [`Resource::update`] is implemented.
    fn supports_update(&self) -> bool {
        !self.schema().is_immutable()
    }
}
