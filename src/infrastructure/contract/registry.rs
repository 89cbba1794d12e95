//! # Catalog Registry
//!
//! Process-lifetime cache of loaded contract catalogs.
//!
//! Uses [`DashMap`] keyed by contract location. A contract is loaded at most
//! once per successful load; if two loads of the same location race, the
//! catalog stored first is kept and handed to both callers.

use super::loader::{ContractLoader, ContractLocation};
use crate::domain::contract::ContractCatalog;
use crate::domain::errors::ContractResult;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;

/// Cache of catalogs shared across builders.
#[derive(Debug)]
pub struct CatalogRegistry {
    loader: Arc<dyn ContractLoader>,
    catalogs: DashMap<String, Arc<ContractCatalog>>,
}

impl CatalogRegistry {
    /// Creates an empty registry loading through `loader`.
    #[must_use]
    pub fn new(loader: Arc<dyn ContractLoader>) -> Self {
        Self {
            loader,
            catalogs: DashMap::new(),
        }
    }

    /// Returns the cached catalog for `location`, loading it on first use.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error. Failed loads are not cached.
    pub async fn get_or_load(
        &self,
        location: &ContractLocation,
    ) -> ContractResult<Arc<ContractCatalog>> {
        let key = location.cache_key();
        if let Some(catalog) = self.catalogs.get(&key) {
            return Ok(Arc::clone(catalog.value()));
        }

        let loaded = Arc::new(self.loader.load(location).await?);
        let stored = Arc::clone(self.catalogs.entry(key).or_insert(loaded).value());
        info!(
            location = %location,
            service = stored.service_name(),
            types = stored.type_names().len(),
            "contract catalog loaded"
        );
        Ok(stored)
    }

    /// Returns a cached catalog without loading.
    #[must_use]
    pub fn get(&self, location: &ContractLocation) -> Option<Arc<ContractCatalog>> {
        self.catalogs
            .get(&location.cache_key())
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Returns the number of cached catalogs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::errors::ContractError;
    use crate::infrastructure::contract::RATE_SERVICE_CONTRACT;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingLoader {
        loads: AtomicUsize,
    }

    #[async_trait]
    impl ContractLoader for CountingLoader {
        async fn load(&self, location: &ContractLocation) -> ContractResult<ContractCatalog> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            match location {
                ContractLocation::BundledRate => ContractCatalog::from_json(RATE_SERVICE_CONTRACT),
                other => Err(ContractError::contract_load(other.to_string(), "not found")),
            }
        }
    }

    #[tokio::test]
    async fn loads_once_and_shares() {
        let loader = Arc::new(CountingLoader::default());
        let registry = CatalogRegistry::new(loader.clone());

        let first = registry.get_or_load(&ContractLocation::BundledRate).await.unwrap();
        let second = registry.get_or_load(&ContractLocation::BundledRate).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn failed_load_is_not_cached() {
        let loader = Arc::new(CountingLoader::default());
        let registry = CatalogRegistry::new(loader.clone());
        let location = ContractLocation::Url("https://example.com/missing.json".into());

        assert!(registry.get_or_load(&location).await.is_err());
        assert!(registry.get_or_load(&location).await.is_err());

        assert_eq!(loader.loads.load(Ordering::SeqCst), 2);
        assert!(registry.is_empty());
        assert!(registry.get(&location).is_none());
    }

    #[tokio::test]
    async fn concurrent_loads_agree() {
        let registry = Arc::new(CatalogRegistry::new(Arc::new(CountingLoader::default())));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    registry.get_or_load(&ContractLocation::BundledRate).await.unwrap()
                })
            })
            .collect();

        let mut catalogs = Vec::new();
        for handle in handles {
            catalogs.push(handle.await.unwrap());
        }
        let cached = registry.get(&ContractLocation::BundledRate).unwrap();
        assert!(catalogs.iter().all(|c| Arc::ptr_eq(c, &cached)));
    }
}
