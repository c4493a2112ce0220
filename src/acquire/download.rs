use std::path::Path;

use anyhow::Context;
use sha2::{Digest, Sha256};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::AcquireError;

/// What the stream produced: bytes written to the pending file and the
/// digest observed over them.
#[derive(Debug)]
pub struct DownloadOutcome {
    pub bytes_written: u64,
    pub sha256: String,
}

/// Streams the artifact into `pending_path`, chunk by chunk as the transport
/// delivers them. The final name is never touched here, so a crash or error
/// mid-stream leaves only the `.pending` file behind. Transport errors are
/// network failures, file I/O errors are storage failures; either way the
/// partial file stays in place for inspection.
pub async fn stream_to_pending(
    client: &reqwest::Client,
    url: &str,
    pending_path: &Path,
) -> Result<DownloadOutcome, AcquireError> {
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("request {url}"))
        .map_err(AcquireError::Network)?
        .error_for_status()
        .with_context(|| format!("download {url}"))
        .map_err(AcquireError::Network)?;

    let mut file = File::create(pending_path)
        .await
        .with_context(|| format!("create pending file {}", pending_path.display()))
        .map_err(AcquireError::Storage)?;

    let mut hasher = Sha256::new();
    let mut bytes_written = 0u64;
    loop {
        let chunk = match response
            .chunk()
            .await
            .context("read download chunk")
            .map_err(AcquireError::Network)?
        {
            Some(chunk) => chunk,
            None => break,
        };
        hasher.update(&chunk);
        file.write_all(&chunk)
            .await
            .context("write download chunk")
            .map_err(AcquireError::Storage)?;
        bytes_written += chunk.len() as u64;
    }

    file.flush()
        .await
        .context("flush pending file")
        .map_err(AcquireError::Storage)?;

    Ok(DownloadOutcome {
        bytes_written,
        sha256: format!("{:x}", hasher.finalize()),
    })
}
