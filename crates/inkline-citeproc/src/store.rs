//! Process-wide directory of citation registries.
//!
//! One [`CitationStore`] is created at service startup and handed by
//! reference to every component that tracks citations. Each registry sits
//! behind its own mutex, so `add_citation` is an atomic read-modify-write
//! per document while unrelated documents proceed in parallel. Registries
//! are never evicted automatically; [`CitationStore::remove`] is the
//! explicit administrative teardown.

use crate::registry::{DocumentCitationRegistry, RegistryConfig};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use tracing::{debug, info};

/// Shared handle to one document's registry.
pub type SharedRegistry = Arc<Mutex<DocumentCitationRegistry>>;

/// Directory of per-document citation registries, keyed by document id.
#[derive(Debug, Default)]
pub struct CitationStore {
    registries: RwLock<HashMap<String, SharedRegistry>>,
}

impl CitationStore {
    pub fn new() -> CitationStore {
        CitationStore::default()
    }

    /// Create the registry for a document, or return the existing one.
    ///
    /// Idempotent under concurrent calls: the first caller inserts, later
    /// callers get the same handle back. Citations recorded between the two
    /// calls are never lost to a silent re-create.
    pub fn create_registry(
        &self,
        document_id: &str,
        session_id: &str,
        config: RegistryConfig,
    ) -> SharedRegistry {
        let mut registries = match self.registries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(existing) = registries.get(document_id) {
            debug!("registry for document {} already exists", document_id);
            return Arc::clone(existing);
        }

        info!("created citation registry for document {}", document_id);
        let registry = Arc::new(Mutex::new(DocumentCitationRegistry::new(
            document_id,
            session_id,
            config,
        )));
        registries.insert(document_id.to_string(), Arc::clone(&registry));
        registry
    }

    /// Look up the registry for a document.
    pub fn get(&self, document_id: &str) -> Option<SharedRegistry> {
        self.read_map().get(document_id).map(Arc::clone)
    }

    /// Evict a document's registry. Returns whether one existed.
    pub fn remove(&self, document_id: &str) -> bool {
        let mut registries = match self.registries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let removed = registries.remove(document_id).is_some();
        if removed {
            info!("removed citation registry for document {}", document_id);
        }
        removed
    }

    /// Ids of all documents with a live registry.
    pub fn document_ids(&self) -> Vec<String> {
        self.read_map().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read_map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_map().is_empty()
    }

    fn read_map(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, SharedRegistry>> {
        match self.registries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Lock a registry handle. A poisoned mutex still holds coherent data (the
/// registry is plain bookkeeping), so the guard is recovered rather than
/// propagated.
pub fn lock_registry(registry: &SharedRegistry) -> MutexGuard<'_, DocumentCitationRegistry> {
    match registry.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_is_idempotent() {
        let store = CitationStore::new();
        let first = store.create_registry("doc-1", "s-1", RegistryConfig::default());
        let second = store.create_registry("doc-1", "s-other", RegistryConfig::default());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.len(), 1);
        // The original session wins; the second create did not replace it.
        assert_eq!(lock_registry(&first).session_id(), "s-1");
    }

    #[test]
    fn test_get_absent_returns_none() {
        let store = CitationStore::new();
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_remove_evicts() {
        let store = CitationStore::new();
        store.create_registry("doc-1", "s-1", RegistryConfig::default());
        assert!(store.remove("doc-1"));
        assert!(!store.remove("doc-1"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_document_ids_lists_live_registries() {
        let store = CitationStore::new();
        store.create_registry("a", "s", RegistryConfig::default());
        store.create_registry("b", "s", RegistryConfig::default());
        let mut ids = store.document_ids();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
