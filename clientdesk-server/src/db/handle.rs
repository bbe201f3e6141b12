//! Readiness gate around the shared store
//!
//! The router is built with a [`DbHandle`] that may still be empty. Until a
//! store is installed every lookup fails with [`DbError::NotInitialized`],
//! which the HTTP layer turns into a 500. Once installed, the store never
//! changes for the life of the process.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::store::DocumentStore;
use super::DbError;

/// Shared, write-once handle to the document store
#[derive(Clone, Default)]
pub struct DbHandle {
    inner: Arc<OnceCell<Arc<dyn DocumentStore>>>,
}

impl DbHandle {
    /// A gate with no store yet.
    pub fn pending() -> Self {
        Self::default()
    }

    /// A gate that is already open.
    pub fn ready(store: impl DocumentStore + 'static) -> Self {
        let handle = Self::pending();
        // A fresh cell cannot already be set.
        let _ = handle.inner.set(Arc::new(store));
        handle
    }

    /// Open the gate. Fails if a store was installed before.
    pub fn install(&self, store: impl DocumentStore + 'static) -> Result<(), DbError> {
        self.inner
            .set(Arc::new(store))
            .map_err(|_| DbError::AlreadyInitialized)
    }

    /// The store, or `NotInitialized` while the gate is closed.
    pub fn store(&self) -> Result<&Arc<dyn DocumentStore>, DbError> {
        self.inner.get().ok_or(DbError::NotInitialized)
    }

    pub fn is_ready(&self) -> bool {
        self.inner.get().is_some()
    }
}

impl std::fmt::Debug for DbHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbHandle")
            .field("store", &self.inner.get().map(|s| s.kind()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[test]
    fn pending_gate_rejects() {
        let handle = DbHandle::pending();
        assert!(!handle.is_ready());
        assert!(matches!(handle.store(), Err(DbError::NotInitialized)));
    }

    #[test]
    fn install_opens_gate_for_clones() {
        let handle = DbHandle::pending();
        let clone = handle.clone();

        handle.install(MemoryStore::new()).unwrap();

        assert!(clone.is_ready());
        assert_eq!(clone.store().unwrap().kind(), "memory");
    }

    #[test]
    fn second_install_fails() {
        let handle = DbHandle::ready(MemoryStore::new());
        let err = handle.install(MemoryStore::new()).unwrap_err();
        assert!(matches!(err, DbError::AlreadyInitialized));
    }
}
