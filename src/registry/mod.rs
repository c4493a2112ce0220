mod descriptor;
mod store;

pub use descriptor::{ArtifactDescriptor, ArtifactSource, PENDING_SUFFIX, SIDECAR_SUFFIX};
pub use store::RegistryStore;
