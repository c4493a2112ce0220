use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

/// Raw catalog entry as returned by the provider's by-hash lookup. Field
/// names follow the provider's wire format.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Identifier of the matched model version.
    pub id: u64,
    pub model_id: u64,
    pub base_model: String,
    pub model: CatalogModel,
    #[serde(default)]
    pub files: Vec<CatalogFile>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogModel {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFile {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub primary: bool,
    #[serde(default, rename = "sizeKB")]
    pub size_kb: f64,
    #[serde(default)]
    pub pickle_scan_result: String,
    #[serde(default)]
    pub virus_scan_result: String,
    pub download_url: String,
}

/// Read-only metadata provider, one lookup per acquisition attempt.
/// Transport failures propagate unchanged and fail the attempt; no retry
/// happens at this layer.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn entry_by_hash(&self, content_hash: &str) -> Result<CatalogEntry>;
}

/// Civitai-shaped HTTP catalog client.
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CatalogProvider for HttpCatalog {
    async fn entry_by_hash(&self, content_hash: &str) -> Result<CatalogEntry> {
        let url = format!(
            "{}/model-versions/by-hash/{content_hash}",
            self.base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request {url}"))?
            .error_for_status()
            .with_context(|| format!("catalog lookup {url}"))?;
        response.json().await.context("parse catalog entry")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_provider_wire_format() {
        let raw = r#"{
            "id": 128713,
            "modelId": 4201,
            "baseModel": "SD 1.5",
            "model": { "name": "Realistic Vision", "type": "Checkpoint" },
            "files": [
                {
                    "id": 94081,
                    "name": "realisticVision.safetensors",
                    "primary": true,
                    "sizeKB": 2082642.5,
                    "pickleScanResult": "Success",
                    "virusScanResult": "Success",
                    "downloadUrl": "https://civitai.com/api/download/models/128713"
                }
            ]
        }"#;

        let entry: CatalogEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.id, 128713);
        assert_eq!(entry.model_id, 4201);
        assert_eq!(entry.model.kind, "Checkpoint");
        assert_eq!(entry.files.len(), 1);
        let file = &entry.files[0];
        assert!(file.primary);
        assert_eq!(file.pickle_scan_result, "Success");
        assert_eq!(file.name, "realisticVision.safetensors");
    }

    #[test]
    fn missing_scan_fields_default_to_empty() {
        let raw = r#"{
            "id": 1,
            "modelId": 2,
            "baseModel": "SD 1.5",
            "model": { "name": "m", "type": "Checkpoint" },
            "files": [{ "id": 3, "name": "m.ckpt", "downloadUrl": "https://example.invalid/m" }]
        }"#;

        let entry: CatalogEntry = serde_json::from_str(raw).unwrap();
        let file = &entry.files[0];
        assert!(!file.primary);
        assert!(file.pickle_scan_result.is_empty());
        assert!(file.virus_scan_result.is_empty());
    }
}
