use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Sidecar file suffix marking a committed artifact's metadata.
pub const SIDECAR_SUFFIX: &str = "modelcard";

/// Suffix for in-progress downloads; a file under this name is never visible
/// to registry scans.
pub const PENDING_SUFFIX: &str = "pending";

/// Catalog providers an artifact can originate from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactSource {
    Civitai,
}

/// The full metadata record for one acquired model file. Immutable once
/// committed; re-acquiring an alias never rewrites the stored record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDescriptor {
    pub alias: String,
    pub display_name: String,
    pub source: ArtifactSource,
    pub content_hash: String,
    pub catalog_model_id: u64,
    pub catalog_version_id: u64,
    pub catalog_file_id: u64,
    pub filename: String,
    /// Retained for traceability; only used while the download is running.
    pub download_url: String,
}

impl ArtifactDescriptor {
    #[must_use]
    pub fn data_path(&self, root: &Path) -> PathBuf {
        root.join(&self.filename)
    }

    #[must_use]
    pub fn sidecar_path(&self, root: &Path) -> PathBuf {
        root.join(format!("{}.{SIDECAR_SUFFIX}", self.filename))
    }

    #[must_use]
    pub fn pending_path(&self, root: &Path) -> PathBuf {
        root.join(format!("{}.{PENDING_SUFFIX}", self.filename))
    }
}
