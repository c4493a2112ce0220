use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::context::AppContext;
use crate::error::{AcquireError, PolicyRejection};
use crate::registry::{ArtifactDescriptor, ArtifactSource};

use super::admission::ClaimOutcome;
use super::download;
use super::validate;

/// Terminal outcomes of one acquisition attempt. Fatal conditions surface as
/// `AcquireError` instead.
#[derive(Debug)]
pub enum AcquireOutcome {
    /// The alias was already committed; no admission slot was consumed.
    Present(ArtifactDescriptor),
    /// Another request is currently acquiring this alias.
    AlreadyInFlight,
    /// A policy gate rejected the catalog entry before any bytes moved.
    Rejected(PolicyRejection),
    Committed(ArtifactDescriptor),
}

/// Runs the full acquisition state machine for one `(alias, content_hash)`
/// request: registry short-circuit, admission claim, catalog fetch and
/// validation, streamed download, two-step commit, slot release, downstream
/// notification.
pub async fn acquire(
    ctx: &AppContext,
    alias: &str,
    content_hash: &str,
) -> Result<AcquireOutcome, AcquireError> {
    // Cheap short-circuit only. The admission table is what actually
    // guarantees a single in-flight download per alias; this check merely
    // answers already-satisfied requests without consuming a slot.
    if let Some(existing) = ctx.registry().get(alias).map_err(AcquireError::Storage)? {
        return Ok(AcquireOutcome::Present(existing));
    }

    match ctx.admission().try_claim(alias) {
        ClaimOutcome::AlreadyInFlight => return Ok(AcquireOutcome::AlreadyInFlight),
        ClaimOutcome::CapacityExhausted => return Err(AcquireError::CapacityExhausted),
        ClaimOutcome::Claimed => {}
    }

    // The slot is released on every path out of the admitted section,
    // success or failure.
    let result = run_admitted(ctx, alias, content_hash).await;
    ctx.admission().release(alias);

    if let Ok(AcquireOutcome::Committed(descriptor)) = &result {
        ctx.notifier().artifact_committed(descriptor).await;
    }

    result
}

async fn run_admitted(
    ctx: &AppContext,
    alias: &str,
    content_hash: &str,
) -> Result<AcquireOutcome, AcquireError> {
    let entry = ctx
        .catalog()
        .entry_by_hash(content_hash)
        .await
        .map_err(AcquireError::Network)?;

    let file = match validate::validate(&entry, &ctx.config().allowed_base_models) {
        Ok(file) => file,
        Err(rejection) => {
            tracing::info!("Rejected acquisition of {alias}: {rejection}");
            return Ok(AcquireOutcome::Rejected(rejection));
        }
    };

    let descriptor = ArtifactDescriptor {
        alias: alias.to_string(),
        display_name: file.display_name,
        source: ArtifactSource::Civitai,
        content_hash: content_hash.to_string(),
        catalog_model_id: file.catalog_model_id,
        catalog_version_id: file.catalog_version_id,
        catalog_file_id: file.catalog_file_id,
        filename: file.filename,
        download_url: file.download_url,
    };

    let root = ctx.registry().root();
    let pending = descriptor.pending_path(root);
    // On failure the pending file stays behind for inspection; the startup
    // sweep clears leftovers on the next boot.
    let outcome =
        download::stream_to_pending(ctx.http(), &descriptor.download_url, &pending).await?;

    commit(root, &descriptor, &pending).map_err(AcquireError::Storage)?;
    tracing::info!(
        "Committed {alias} as {} ({} bytes, sha256 {})",
        descriptor.filename,
        outcome.bytes_written,
        outcome.sha256
    );

    Ok(AcquireOutcome::Committed(descriptor))
}

/// Two-step commit: write the sidecar first, then atomically rename the
/// pending data file into its final name. The rename is the only visibility
/// boundary, so a reader that can see the data file can always find its
/// metadata, and no reader ever observes a partially written artifact.
fn commit(root: &Path, descriptor: &ArtifactDescriptor, pending: &Path) -> Result<()> {
    let sidecar = descriptor.sidecar_path(root);
    let serialized = serde_json::to_vec_pretty(descriptor).context("serialize descriptor")?;
    fs::write(&sidecar, serialized)
        .with_context(|| format!("write sidecar {}", sidecar.display()))?;

    let data = descriptor.data_path(root);
    fs::rename(pending, &data)
        .with_context(|| format!("rename {} into place", pending.display()))?;
    Ok(())
}
