pub mod backend;
pub mod discord;
pub mod noop;

use std::sync::Arc;

use tracing::info;

pub use backend::NotifyBackend;
pub use discord::DiscordWebhook;
pub use noop::NoopBackend;

/// Discord if a webhook is configured, otherwise a backend that only logs.
pub fn backend_for(webhook_url: Option<&str>) -> Arc<dyn NotifyBackend> {
    match webhook_url {
        Some(url) => {
            info!("Discord notifications enabled");
            Arc::new(DiscordWebhook::new(url.to_string()))
        }
        None => {
            info!("No DISCORD_WEBHOOK_URL set, notifications disabled");
            Arc::new(NoopBackend)
        }
    }
}
