use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use super::backend::NotifyBackend;

/// Discord incoming webhook notification backend.
pub struct DiscordWebhook {
    webhook_url: String,
    http: reqwest::Client,
}

impl DiscordWebhook {
    pub fn new(webhook_url: String) -> Self {
        Self {
            webhook_url,
            http: reqwest::Client::new(),
        }
    }

    fn payload(message: &str) -> serde_json::Value {
        json!({ "content": message })
    }
}

#[async_trait]
impl NotifyBackend for DiscordWebhook {
    async fn send(&self, message: &str) -> anyhow::Result<()> {
        let resp = self
            .http
            .post(&self.webhook_url)
            .json(&Self::payload(message))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Discord webhook returned non-success");
            anyhow::bail!("Discord webhook returned {status}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_plain_content() {
        let payload = DiscordWebhook::payload("Riftfall cycle 3 ended. All continents have fallen.");
        assert_eq!(
            payload,
            json!({"content": "Riftfall cycle 3 ended. All continents have fallen."})
        );
    }
}
