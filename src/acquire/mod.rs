mod admission;
pub mod catalog;
mod download;
mod pipeline;
mod validate;

pub use admission::{AdmissionTable, ClaimOutcome};
pub use pipeline::{acquire, AcquireOutcome};
pub use validate::{validate, ValidatedPrimaryFile, SCAN_SUCCESS, SUPPORTED_TYPE};
