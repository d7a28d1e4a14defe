use anyhow::{anyhow, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use super::types::*;

const CLOUDFLARE_API_URL: &str = "https://api.cloudflare.com/client/v4";

pub(crate) struct WorkersAiClient {
    account_id: String,
    api_token: String,
    http: reqwest::Client,
    base_url: String,
}

impl WorkersAiClient {
    pub fn new(account_id: &str, api_token: &str) -> Self {
        Self {
            account_id: account_id.to_string(),
            api_token: api_token.to_string(),
            http: reqwest::Client::new(),
            base_url: CLOUDFLARE_API_URL.to_string(),
        }
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_token))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// POST a conversation to `/accounts/{id}/ai/run/{model}` and return the
    /// raw JSON body.
    pub async fn run(&self, model: &str, request: &RunRequest) -> Result<serde_json::Value> {
        let url = format!(
            "{}/accounts/{}/ai/run/{}",
            self.base_url, self.account_id, model
        );

        debug!(model, messages = request.messages.len(), "Workers AI run request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow!(
                "Cloudflare AI request failed ({}): {}",
                status,
                error_text
            ));
        }

        let body: serde_json::Value = response.json().await?;

        if let Ok(envelope) = serde_json::from_value::<RunResponse>(body.clone()) {
            if envelope.success == Some(false) && envelope.result.is_none() {
                return Err(anyhow!(
                    "Cloudflare AI reported failure: {}",
                    serde_json::Value::Array(envelope.errors)
                ));
            }
        }

        Ok(body)
    }
}
