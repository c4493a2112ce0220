use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Default number of admission slots, matching the expected scale of tens to
/// low hundreds of artifacts.
pub const DEFAULT_ADMISSION_CAPACITY: usize = 100;

/// Service configuration, resolved once at startup and carried in the app
/// context. Every setting has an environment override so deployments and
/// tests can redirect the registry root, the catalog, and the notify
/// endpoint.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub registry_root: PathBuf,
    pub bind_addr: SocketAddr,
    pub catalog_url: String,
    /// No downstream notification when unset.
    pub notify_url: Option<String>,
    pub admission_capacity: usize,
    pub allowed_base_models: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            registry_root: PathBuf::from("models"),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            catalog_url: "https://civitai.com/api/v1".into(),
            notify_url: None,
            admission_capacity: DEFAULT_ADMISSION_CAPACITY,
            allowed_base_models: vec!["SD 1.5".into()],
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(root) = std::env::var("MODEL_DEPOT_ROOT") {
            config.registry_root = root.into();
        }
        if let Ok(addr) = std::env::var("MODEL_DEPOT_ADDR") {
            config.bind_addr = addr.parse().context("parse MODEL_DEPOT_ADDR")?;
        }
        if let Ok(url) = std::env::var("MODEL_DEPOT_CATALOG_URL") {
            config.catalog_url = url;
        }
        if let Ok(url) = std::env::var("MODEL_DEPOT_NOTIFY_URL") {
            config.notify_url = Some(url);
        }
        if let Ok(capacity) = std::env::var("MODEL_DEPOT_CAPACITY") {
            config.admission_capacity = capacity.parse().context("parse MODEL_DEPOT_CAPACITY")?;
        }
        if let Ok(models) = std::env::var("MODEL_DEPOT_BASE_MODELS") {
            config.allowed_base_models = models
                .split(',')
                .map(|model| model.trim().to_string())
                .filter(|model| !model.is_empty())
                .collect();
        }
        Ok(config)
    }
}
