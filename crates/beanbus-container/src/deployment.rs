//! Deploy-time discovery of applications from a filesystem layout.
//!
//! Applications live under a base directory, one subdirectory each, with a
//! `META-INF/datasource.json` descriptor. Every datasource in a descriptor
//! yields one registry entry keyed by the datasource name.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::application::{ApplicationHandle, ConnectionParameters};
use crate::bean::ComponentContainer;
use crate::registry::ApplicationRegistry;

/// Deployment failures. These abort startup; nothing is served from a
/// partially-deployed base directory.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("application name '{0}' is already registered")]
    DuplicateName(String),

    #[error("folder {0} contains no valid application archive")]
    InvalidArchive(String),

    #[error("invalid descriptor {path}: {source}")]
    InvalidDescriptor {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to scan application base directory: {0}")]
    Io(#[from] std::io::Error),
}

/// On-disk deployment descriptor (`META-INF/datasource.json`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Descriptor {
    datasources: Vec<Datasource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Datasource {
    name: String,
    #[serde(default)]
    path_to_entities: Option<String>,
    #[serde(default)]
    database: Option<ConnectionParameters>,
}

const META_INF: &str = "META-INF";
const DESCRIPTOR: &str = "datasource.json";

/// Scan `base` and build the registry, one folder at a time in sorted
/// path order.
///
/// `containers` supplies the component container for each datasource name;
/// the registry holds exactly one handle per datasource.
pub fn deploy_from_dir<F>(base: &Path, mut containers: F) -> Result<ApplicationRegistry, DeployError>
where
    F: FnMut(&str) -> Arc<dyn ComponentContainer>,
{
    let mut registry = ApplicationRegistry::new();

    // Directory iteration order is filesystem-dependent; sort so deployment
    // order (and with it routing tie-breaks) is stable across restarts.
    let mut folders: Vec<_> = std::fs::read_dir(base)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    folders.sort();

    for folder in folders {
        if !folder.join(META_INF).is_dir() {
            continue;
        }

        // An archive without a descriptor is a broken deployment, not an
        // ignorable directory.
        let descriptor_path = folder.join(META_INF).join(DESCRIPTOR);
        if !descriptor_path.is_file() {
            return Err(DeployError::InvalidArchive(folder.display().to_string()));
        }

        let raw = std::fs::read_to_string(&descriptor_path)?;
        let descriptor: Descriptor =
            serde_json::from_str(&raw).map_err(|source| DeployError::InvalidDescriptor {
                path: descriptor_path.display().to_string(),
                source,
            })?;

        for datasource in descriptor.datasources {
            let container = containers(&datasource.name);
            let mut handle = ApplicationHandle::new(&datasource.name, &folder, container)
                .with_data_source_name(&datasource.name);
            if let Some(path) = &datasource.path_to_entities {
                handle = handle.with_path_to_entities(folder.join(path));
            }
            if let Some(connection) = datasource.database {
                handle = handle.with_connection(connection);
            }
            registry.register(handle)?;
        }

        info!("Deployed application folder: {}", folder.display());
    }

    info!("Deployment complete: {} application(s)", registry.len());
    Ok(registry)
}
