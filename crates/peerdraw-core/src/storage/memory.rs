//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::project::Project;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-memory storage for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStorage {
    projects: RwLock<BTreeMap<String, Project>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, name: &str, project: &Project) -> BoxFuture<'_, StorageResult<()>> {
        let name = name.to_string();
        let project = project.clone();
        Box::pin(async move {
            self.projects.write().map_err(lock_error)?.insert(name, project);
            Ok(())
        })
    }

    fn load(&self, name: &str) -> BoxFuture<'_, StorageResult<Project>> {
        let name = name.to_string();
        Box::pin(async move {
            let projects = self.projects.read().map_err(lock_error)?;
            projects.get(&name).cloned().ok_or(StorageError::NotFound(name))
        })
    }

    fn delete(&self, name: &str) -> BoxFuture<'_, StorageResult<()>> {
        let name = name.to_string();
        Box::pin(async move {
            self.projects.write().map_err(lock_error)?.remove(&name);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let projects = self.projects.read().map_err(lock_error)?;
            Ok(projects.keys().cloned().collect())
        })
    }

    fn exists(&self, name: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let name = name.to_string();
        Box::pin(async move {
            let projects = self.projects.read().map_err(lock_error)?;
            Ok(projects.contains_key(&name))
        })
    }
}
