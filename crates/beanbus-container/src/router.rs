//! Class-name routing over the frozen registry.

use std::sync::Arc;

use crate::application::ApplicationHandle;
use crate::dispatch::DispatchError;
use crate::registry::ApplicationRegistry;

/// Resolves a fully-qualified class name to the application responsible
/// for it.
///
/// An application matches if its registered name occurs anywhere inside the
/// class name — substring containment, not prefix-anchored — and ties break
/// on deployment order. Intended but fragile: an application named `"App"`
/// will capture classes of an unrelated `"AppExtra"` deployed after it.
pub struct Router {
    registry: Arc<ApplicationRegistry>,
}

impl Router {
    pub fn new(registry: Arc<ApplicationRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ApplicationRegistry> {
        &self.registry
    }

    /// First registry entry whose name is contained in `class_name`.
    pub fn route(&self, class_name: &str) -> Result<Arc<ApplicationHandle>, DispatchError> {
        for (name, handle) in self.registry.entries() {
            if class_name.contains(name) {
                return Ok(handle.clone());
            }
        }
        Err(DispatchError::Routing(class_name.to_string()))
    }
}
