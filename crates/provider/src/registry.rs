//! Resource type registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::TeamsApi;
use crate::errors::{ProviderError, Result};
use crate::identifiers::OrgName;
use crate::membership::TeamMembershipResource;
use crate::resource::Resource;
use crate::team::TeamResource;

/// Maps resource type names to their handlers.
///
/// All handlers share the injected API client; none of them holds mutable
/// state, so a `Provider` can serve concurrent callbacks.
pub struct Provider {
    resources: BTreeMap<&'static str, Arc<dyn Resource>>,
}

impl Provider {
    /// Builds the registry for an organization.
    pub fn new(api: Arc<dyn TeamsApi>, org: OrgName) -> Self {
        let mut provider = Self {
            resources: BTreeMap::new(),
        };
        provider.register(Arc::new(TeamResource::new(Arc::clone(&api), org)));
        provider.register(Arc::new(TeamMembershipResource::new(api)));
        provider
    }

    fn register(&mut self, resource: Arc<dyn Resource>) {
        self.resources.insert(resource.schema().type_name, resource);
    }

    /// Returns the handler for `type_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::UnknownResourceType`] if none is registered.
    pub fn resource(&self, type_name: &str) -> Result<Arc<dyn Resource>> {
        self.resources
            .get(type_name)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownResourceType(type_name.to_string()))
    }

    /// Names of all registered resource types, sorted.
    pub fn resource_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }
}
