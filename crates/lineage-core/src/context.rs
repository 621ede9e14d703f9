//! Read-only inputs shared by every reducer entry point.

use lineage_events::{ActionRegistry, EventContext};
use lineage_family::{EconomyConfig, LifecycleConfig};
use lineage_types::Catalog;

/// Catalog, action handlers, and tunables.
#[derive(Debug, Clone, Copy)]
pub struct CoreContext<'a> {
    /// Content catalog.
    pub catalog: &'a Catalog,
    /// Action handlers.
    pub registry: &'a ActionRegistry,
    /// Lifecycle tunables.
    pub lifecycle: &'a LifecycleConfig,
    /// Economic tunables.
    pub economy: &'a EconomyConfig,
}

impl<'a> CoreContext<'a> {
    /// The subset the event resolver needs.
    pub const fn events(&self) -> EventContext<'a> {
        EventContext {
            catalog: self.catalog,
            registry: self.registry,
            config: self.lifecycle,
        }
    }
}
