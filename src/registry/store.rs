use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::descriptor::{ArtifactDescriptor, PENDING_SUFFIX, SIDECAR_SUFFIX};

/// Filesystem-backed registry of committed artifacts. The directory itself is
/// the source of truth; every query rescans it, so the answer never drifts
/// from what is actually on disk after a crash or restart.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    root: PathBuf,
}

impl RegistryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("create registry root {}", self.root.display()))?;
        Ok(())
    }

    /// Scans the registry root for committed artifacts, ordered by alias. A
    /// sidecar only counts once its data file exists under the final name,
    /// and a malformed sidecar is skipped with a diagnostic so one corrupt
    /// entry cannot hide the rest.
    pub fn list_all(&self) -> Result<Vec<ArtifactDescriptor>> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("read registry root {}", self.root.display()))?;

        let mut descriptors = Vec::new();
        for entry in entries {
            let entry = entry.context("read registry entry")?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SIDECAR_SUFFIX) {
                continue;
            }
            let Some(descriptor) = read_sidecar(&path) else {
                continue;
            };
            if !descriptor.data_path(&self.root).is_file() {
                // The rename never happened; the commit is incomplete.
                continue;
            }
            descriptors.push(descriptor);
        }

        descriptors.sort_by(|a, b| a.alias.cmp(&b.alias));
        Ok(descriptors)
    }

    pub fn get(&self, alias: &str) -> Result<Option<ArtifactDescriptor>> {
        let descriptors = self.list_all()?;
        Ok(descriptors.into_iter().find(|d| d.alias == alias))
    }

    /// Removes `.pending` leftovers from downloads that never reached the
    /// rename. Run once at startup; a failure mid-run deliberately leaves its
    /// temp file behind for inspection.
    pub fn sweep_pending(&self) -> Result<usize> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("read registry root {}", self.root.display()))?;

        let mut removed = 0;
        for entry in entries {
            let entry = entry.context("read registry entry")?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(PENDING_SUFFIX) {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => {
                    tracing::warn!("Removed orphaned pending download {}", path.display());
                    removed += 1;
                }
                Err(error) => {
                    tracing::warn!("Failed to remove pending file {}: {error:?}", path.display());
                }
            }
        }
        Ok(removed)
    }
}

fn read_sidecar(path: &Path) -> Option<ArtifactDescriptor> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!("Failed to read sidecar {}: {error:?}", path.display());
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(descriptor) => Some(descriptor),
        Err(error) => {
            tracing::warn!("Skipping malformed sidecar {}: {error:?}", path.display());
            None
        }
    }
}
