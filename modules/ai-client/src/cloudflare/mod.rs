mod client;
pub(crate) mod types;

use anyhow::Result;
use async_trait::async_trait;

use crate::traits::{ChatModel, Message};
use client::WorkersAiClient;

// =============================================================================
// Workers AI Agent
// =============================================================================

#[derive(Clone)]
pub struct WorkersAi {
    account_id: String,
    api_token: String,
    model: String,
}

impl WorkersAi {
    pub fn new(
        account_id: impl Into<String>,
        api_token: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            api_token: api_token.into(),
            model: model.into(),
        }
    }

    fn client(&self) -> WorkersAiClient {
        WorkersAiClient::new(&self.account_id, &self.api_token)
    }
}

#[async_trait]
impl ChatModel for WorkersAi {
    async fn run(&self, messages: Vec<Message>) -> Result<serde_json::Value> {
        let request = types::RunRequest { messages };
        let body = self.client().run(&self.model, &request).await?;
        Ok(types::resolve_output(body))
    }
}
