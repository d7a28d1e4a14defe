use async_trait::async_trait;

/// Pluggable chat notification backend. Delivery is best-effort: callers log
/// errors and carry on.
#[async_trait]
pub trait NotifyBackend: Send + Sync {
    async fn send(&self, message: &str) -> anyhow::Result<()>;
}
