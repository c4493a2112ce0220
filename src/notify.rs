use async_trait::async_trait;

use crate::registry::ArtifactDescriptor;

/// Downstream systems that want to refresh their view of available artifacts
/// after a commit. The call is best-effort; a failed notification is logged
/// and never rolls back the commit.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn artifact_committed(&self, descriptor: &ArtifactDescriptor);
}

/// POSTs the committed descriptor to a configured endpoint.
pub struct HttpNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpNotifier {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl NotificationSink for HttpNotifier {
    async fn artifact_committed(&self, descriptor: &ArtifactDescriptor) {
        let result = self
            .client
            .post(&self.endpoint)
            .json(descriptor)
            .send()
            .await
            .and_then(|response| response.error_for_status());
        if let Err(error) = result {
            tracing::warn!(
                "Failed to notify {} about {}: {error:?}",
                self.endpoint,
                descriptor.alias
            );
        }
    }
}

/// Used when no notify endpoint is configured.
pub struct NullNotifier;

#[async_trait]
impl NotificationSink for NullNotifier {
    async fn artifact_committed(&self, _descriptor: &ArtifactDescriptor) {}
}
