//! The application registry — insertion-ordered, frozen once serving starts.

use std::sync::Arc;

use tracing::info;

use crate::application::ApplicationHandle;
use crate::deployment::DeployError;

/// Insertion-ordered mapping from application name to handle.
///
/// Mutable only while deployment runs; serving code receives it behind an
/// `Arc` (see `Dispatcher::new`), after which all connection tasks read it
/// concurrently without locking. Iteration order is deployment order and is
/// semantically significant: the router returns the first match.
#[derive(Debug, Default)]
pub struct ApplicationRegistry {
    entries: Vec<(String, Arc<ApplicationHandle>)>,
}

impl ApplicationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an application. Duplicate names fail deployment rather than
    /// silently overwriting an earlier entry.
    pub fn register(&mut self, handle: ApplicationHandle) -> Result<(), DeployError> {
        let name = handle.name().to_string();
        if self.resolve(&name).is_some() {
            return Err(DeployError::DuplicateName(name));
        }
        info!("Registering application: {name}");
        self.entries.push((name, Arc::new(handle)));
        Ok(())
    }

    /// Exact-name lookup.
    pub fn resolve(&self, name: &str) -> Option<&Arc<ApplicationHandle>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, h)| h)
    }

    /// Entries in deployment order, for the router.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Arc<ApplicationHandle>)> {
        self.entries.iter().map(|(n, h)| (n.as_str(), h))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
