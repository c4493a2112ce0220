use thiserror::Error;

/// Policy gates that can reject a catalog entry. A rejection is terminal for
/// the acquisition attempt; retrying with the same inputs will fail the same
/// gate again.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyRejection {
    #[error("artifact type {found:?} is not a checkpoint")]
    WrongType { found: String },
    #[error("base model {found:?} is not supported")]
    UnsupportedBaseModel { found: String },
    #[error("catalog entry has no primary file")]
    NoPrimaryFile,
    #[error("primary file failed the pickle safety scan")]
    FailedSafetyScan,
    #[error("primary file failed the virus scan")]
    FailedVirusScan,
}

/// Fatal conditions for one acquisition attempt. None of these are retried
/// by the pipeline; the caller decides what to do next.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("admission table is full")]
    CapacityExhausted,
    #[error("network failure: {0:#}")]
    Network(anyhow::Error),
    #[error("storage failure: {0:#}")]
    Storage(anyhow::Error),
}
