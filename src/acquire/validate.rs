use crate::error::PolicyRejection;

use super::catalog::CatalogEntry;

/// The only artifact type this service acquires.
pub const SUPPORTED_TYPE: &str = "Checkpoint";

/// The provider's sentinel for a passed scan.
pub const SCAN_SUCCESS: &str = "Success";

/// The primary file selected from a validated catalog entry, together with
/// the entry-level fields needed to build a descriptor. The download URL is
/// still pending commit at this point.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPrimaryFile {
    pub display_name: String,
    pub catalog_model_id: u64,
    pub catalog_version_id: u64,
    pub catalog_file_id: u64,
    pub filename: String,
    pub size_kb: f64,
    pub download_url: String,
}

/// Applies the policy gates in their fixed order: artifact type, base-model
/// allow-list, primary-file selection, pickle scan, virus scan. The first
/// failing gate decides the rejection.
pub fn validate(
    entry: &CatalogEntry,
    allowed_base_models: &[String],
) -> Result<ValidatedPrimaryFile, PolicyRejection> {
    if entry.model.kind != SUPPORTED_TYPE {
        return Err(PolicyRejection::WrongType {
            found: entry.model.kind.clone(),
        });
    }

    if !allowed_base_models.iter().any(|b| b == &entry.base_model) {
        return Err(PolicyRejection::UnsupportedBaseModel {
            found: entry.base_model.clone(),
        });
    }

    let primary = entry
        .files
        .iter()
        .find(|file| file.primary)
        .ok_or(PolicyRejection::NoPrimaryFile)?;

    if primary.pickle_scan_result != SCAN_SUCCESS {
        return Err(PolicyRejection::FailedSafetyScan);
    }

    if primary.virus_scan_result != SCAN_SUCCESS {
        return Err(PolicyRejection::FailedVirusScan);
    }

    Ok(ValidatedPrimaryFile {
        display_name: entry.model.name.clone(),
        catalog_model_id: entry.model_id,
        catalog_version_id: entry.id,
        catalog_file_id: primary.id,
        filename: file_basename(&primary.name),
        size_kb: primary.size_kb,
        download_url: primary.download_url.clone(),
    })
}

/// Catalog file names are untrusted input; keep only the final path segment
/// so an entry can never name a location outside the registry root.
fn file_basename(name: &str) -> String {
    name.rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .unwrap_or("model.bin")
        .to_string()
}
