//! Lazily loaded, cached catalog
//!
//! The service moves through `Unloaded -> Loading -> Loaded` exactly once on
//! success. Concurrent first callers queue on a load gate, so only one fetch
//! is in flight and every caller ends up sharing the same `Arc`. A failed
//! fetch hands back the empty fallback and returns to `Unloaded`, so the
//! next call retries.

use std::sync::{Arc, PoisonError, RwLock};

use super::data::CatalogData;
use super::source::CatalogSource;

/// Observable load state of a [`CatalogService`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
}

enum Slot {
    Unloaded,
    Loading,
    Loaded(Arc<CatalogData>),
}

pub struct CatalogService<S> {
    source: S,
    slot: RwLock<Slot>,
    load_gate: tokio::sync::Mutex<()>,
}

impl<S: CatalogSource> CatalogService<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            slot: RwLock::new(Slot::Unloaded),
            load_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn state(&self) -> LoadState {
        match &*self.slot.read().unwrap_or_else(PoisonError::into_inner) {
            Slot::Unloaded => LoadState::Unloaded,
            Slot::Loading => LoadState::Loading,
            Slot::Loaded(_) => LoadState::Loaded,
        }
    }

    /// The cached catalog, if a load has completed
    pub fn cached(&self) -> Option<Arc<CatalogData>> {
        match &*self.slot.read().unwrap_or_else(PoisonError::into_inner) {
            Slot::Loaded(data) => Some(Arc::clone(data)),
            _ => None,
        }
    }

    /// Load the catalog if needed and return it. Never fails.
    pub async fn ensure_loaded(&self) -> Arc<CatalogData> {
        if let Some(data) = self.cached() {
            return data;
        }

        let _gate = self.load_gate.lock().await;
        // Another caller may have finished while we waited
        if let Some(data) = self.cached() {
            return data;
        }

        self.set(Slot::Loading);
        match self.source.fetch().await {
            Ok(data) => {
                tracing::info!(
                    "Loaded catalog from {}: {} tasks, {} rules, {} templates, {} articles",
                    self.source.describe(),
                    data.tasks.len(),
                    data.blueprint_rules.len(),
                    data.templates.len(),
                    data.playbook.len()
                );
                let dangling = data.dangling_rule_tasks();
                if !dangling.is_empty() {
                    tracing::debug!("Rules reference {} unknown task ids", dangling.len());
                }
                let data = Arc::new(data);
                self.set(Slot::Loaded(Arc::clone(&data)));
                data
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load catalog from {}: {} - using empty catalog",
                    self.source.describe(),
                    e
                );
                self.set(Slot::Unloaded);
                Arc::new(CatalogData::fallback())
            }
        }
    }

    fn set(&self, slot: Slot) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = slot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{EngineError, Result};
    use crate::core::types::{Category, Priority, Task};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        fetches: AtomicUsize,
        fail: bool,
    }

    impl CountingSource {
        fn new(fail: bool) -> Self {
            Self {
                fetches: AtomicUsize::new(0),
                fail,
            }
        }
    }

    impl CatalogSource for CountingSource {
        async fn fetch(&self) -> Result<CatalogData> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.fail {
                return Err(EngineError::Catalog("unreachable".into()));
            }
            let mut data = CatalogData::fallback();
            data.tasks.push(Task::new("t1", "A", 1, Category::Legal, Priority::High));
            Ok(data)
        }

        fn describe(&self) -> String {
            "counting".into()
        }
    }

    #[tokio::test]
    async fn test_loads_once_and_caches() {
        let service = CatalogService::new(CountingSource::new(false));
        assert_eq!(service.state(), LoadState::Unloaded);

        let first = service.ensure_loaded().await;
        let second = service.ensure_loaded().await;

        assert_eq!(service.state(), LoadState::Loaded);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(service.source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_loads_converge() {
        let service = Arc::new(CatalogService::new(CountingSource::new(false)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.ensure_loaded().await })
            })
            .collect();

        let mut loaded = Vec::new();
        for handle in handles {
            loaded.push(handle.await.unwrap());
        }

        assert!(loaded.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(service.source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_falls_back_and_retries() {
        let service = CatalogService::new(CountingSource::new(true));

        let data = service.ensure_loaded().await;
        assert!(data.tasks.is_empty());
        assert!(data.blueprint_rules.is_empty());
        assert_eq!(service.state(), LoadState::Unloaded);

        service.ensure_loaded().await;
        assert_eq!(service.source.fetches.load(Ordering::SeqCst), 2);
    }
}
