use async_trait::async_trait;
use tracing::info;

use super::backend::NotifyBackend;

/// Backend used when no webhook is configured.
pub struct NoopBackend;

#[async_trait]
impl NotifyBackend for NoopBackend {
    async fn send(&self, message: &str) -> anyhow::Result<()> {
        info!(text = message, "Notifications disabled, skipping message");
        Ok(())
    }
}
