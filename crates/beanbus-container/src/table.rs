//! Dispatch-table component container.
//!
//! The statically-typed answer to reflective bean construction: each class
//! name maps to a factory registered at deploy time. Instances are scoped to
//! the caller's session — repeated lookups with the same session token reuse
//! the cached instance, while calls without a session get a fresh one.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::application::ApplicationHandle;
use crate::bean::{ComponentContainer, LookupError, SessionBean, SessionBeanDyn};

type BeanFactory =
    Arc<dyn Fn(&ApplicationHandle) -> Result<Arc<dyn SessionBeanDyn>, LookupError> + Send + Sync>;

/// A `ComponentContainer` backed by an explicit per-class factory table.
#[derive(Default)]
pub struct DispatchTable {
    factories: DashMap<String, BeanFactory>,
    sessions: DashMap<(String, String), Arc<dyn SessionBeanDyn>>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for `class_name`. The factory receives the owning
    /// application handle, mirroring the constructor argument the facade
    /// forwards.
    pub fn register<S, F>(&self, class_name: impl Into<String>, factory: F)
    where
        S: SessionBean + 'static,
        F: Fn(&ApplicationHandle) -> Result<S, LookupError> + Send + Sync + 'static,
    {
        let class_name = class_name.into();
        debug!("Registering bean class: {class_name}");
        self.factories.insert(
            class_name,
            Arc::new(move |app| factory(app).map(|bean| Arc::new(bean) as Arc<dyn SessionBeanDyn>)),
        );
    }

    pub fn registered_classes(&self) -> Vec<String> {
        self.factories.iter().map(|e| e.key().clone()).collect()
    }
}

impl ComponentContainer for DispatchTable {
    fn lookup(
        &self,
        class_name: &str,
        session_id: &str,
        app: &ApplicationHandle,
    ) -> Result<Arc<dyn SessionBeanDyn>, LookupError> {
        // Clone the factory out so no map guard is held while it runs.
        let factory = self
            .factories
            .get(class_name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| LookupError::UnknownClass(class_name.to_string()))?;

        if session_id.is_empty() {
            // Stateless call: fresh instance, never cached.
            return factory(app);
        }

        let key = (class_name.to_string(), session_id.to_string());
        if let Some(instance) = self.sessions.get(&key) {
            return Ok(instance.clone());
        }

        let instance = factory(app)?;
        self.sessions.insert(key, instance.clone());
        Ok(instance)
    }
}
