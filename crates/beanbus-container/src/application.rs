//! Application handles — one per deployed application.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;

use crate::bean::{ComponentContainer, LookupError, SessionBeanDyn};

/// Database connection parameters carried by an application handle.
///
/// Opaque to the container core; they are read from the deployment
/// descriptor and handed to whatever persistence layer the application's
/// beans use.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionParameters {
    pub driver: String,
    pub user: String,
    pub password: String,
    pub database_name: String,
}

/// One deployed application: a unique name, its configuration, and a
/// reference to the component container that constructs its beans.
///
/// Created once during deployment, immutable afterwards, owned exclusively
/// by the registry.
pub struct ApplicationHandle {
    name: String,
    app_root: PathBuf,
    data_source_name: String,
    path_to_entities: PathBuf,
    connection: Option<ConnectionParameters>,
    container: Arc<dyn ComponentContainer>,
}

impl ApplicationHandle {
    pub fn new(
        name: impl Into<String>,
        app_root: impl Into<PathBuf>,
        container: Arc<dyn ComponentContainer>,
    ) -> Self {
        let name = name.into();
        Self {
            data_source_name: name.clone(),
            name,
            app_root: app_root.into(),
            path_to_entities: PathBuf::new(),
            connection: None,
            container,
        }
    }

    pub fn with_data_source_name(mut self, data_source_name: impl Into<String>) -> Self {
        self.data_source_name = data_source_name.into();
        self
    }

    pub fn with_path_to_entities(mut self, path: impl Into<PathBuf>) -> Self {
        self.path_to_entities = path.into();
        self
    }

    pub fn with_connection(mut self, connection: ConnectionParameters) -> Self {
        self.connection = Some(connection);
        self
    }

    /// The unique application name the router matches against.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root directory of the deployed application archive.
    pub fn app_root(&self) -> &std::path::Path {
        &self.app_root
    }

    pub fn data_source_name(&self) -> &str {
        &self.data_source_name
    }

    pub fn path_to_entities(&self) -> &std::path::Path {
        &self.path_to_entities
    }

    pub fn connection(&self) -> Option<&ConnectionParameters> {
        self.connection.as_ref()
    }

    /// Lookup facade: obtain a session-scoped instance of `class_name` from
    /// this application's component container.
    ///
    /// The handle passes itself through as the constructor argument so the
    /// container can wire application configuration into the bean.
    pub fn lookup(
        &self,
        class_name: &str,
        session_id: &str,
    ) -> Result<Arc<dyn SessionBeanDyn>, LookupError> {
        self.container.lookup(class_name, session_id, self)
    }
}

impl std::fmt::Debug for ApplicationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationHandle")
            .field("name", &self.name)
            .field("app_root", &self.app_root)
            .field("data_source_name", &self.data_source_name)
            .finish_non_exhaustive()
    }
}
