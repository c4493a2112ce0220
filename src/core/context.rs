use std::sync::Arc;

use anyhow::Result;

use crate::acquire::catalog::{CatalogProvider, HttpCatalog};
use crate::acquire::AdmissionTable;
use crate::notify::{HttpNotifier, NotificationSink, NullNotifier};
use crate::registry::RegistryStore;

use super::config::ServiceConfig;

/// Everything a request handler needs, built once at startup and passed
/// along explicitly instead of living in process-wide globals. Cloning is
/// cheap; all clones share the same admission table and collaborators.
#[derive(Clone)]
pub struct AppContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    config: ServiceConfig,
    registry: RegistryStore,
    admission: AdmissionTable,
    http: reqwest::Client,
    catalog: Arc<dyn CatalogProvider>,
    notifier: Arc<dyn NotificationSink>,
}

impl AppContext {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let http = reqwest::Client::new();
        let catalog = Arc::new(HttpCatalog::new(http.clone(), config.catalog_url.clone()));
        let notifier: Arc<dyn NotificationSink> = match &config.notify_url {
            Some(url) => Arc::new(HttpNotifier::new(http.clone(), url.clone())),
            None => Arc::new(NullNotifier),
        };
        Self::with_collaborators(config, http, catalog, notifier)
    }

    /// Constructor seam for substituting the catalog or the sink in tests.
    pub fn with_collaborators(
        config: ServiceConfig,
        http: reqwest::Client,
        catalog: Arc<dyn CatalogProvider>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Result<Self> {
        let registry = RegistryStore::new(config.registry_root.clone());
        registry.ensure_root()?;
        let swept = registry.sweep_pending()?;
        if swept > 0 {
            tracing::warn!("Removed {swept} orphaned pending download(s) at startup");
        }

        let admission = AdmissionTable::new(config.admission_capacity);
        Ok(Self {
            inner: Arc::new(ContextInner {
                config,
                registry,
                admission,
                http,
                catalog,
                notifier,
            }),
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &RegistryStore {
        &self.inner.registry
    }

    pub fn admission(&self) -> &AdmissionTable {
        &self.inner.admission
    }

    /// Shared client for artifact downloads.
    pub fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    pub fn catalog(&self) -> &dyn CatalogProvider {
        self.inner.catalog.as_ref()
    }

    pub fn notifier(&self) -> &dyn NotificationSink {
        self.inner.notifier.as_ref()
    }
}
