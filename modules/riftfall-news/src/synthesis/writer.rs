use ai_client::{strip_code_blocks, truncate_to_char_boundary, ChatModel};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::stats::Stats;
use crate::traits::NewsWriter;

use super::DraftItem;

const CORRESPONDENT_PROMPT: &str = "You are Riftfall's in-universe war correspondent. \
Summarize the last 6 hours of events in 2-5 short news items. \
Use dramatic but concise language. \
Mention which continents are in danger, which are stable, notable defender names from top 10, \
and any continents that fell or were saved at low HP. \
Return ONLY JSON array, no markdown, shaped as [{\"title\":\"...\",\"body\":\"...\"}].";

/// [`NewsWriter`] backed by a hosted chat model.
pub struct AiNewsWriter<M> {
    model: M,
}

impl<M: ChatModel> AiNewsWriter<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }
}

#[async_trait]
impl<M: ChatModel> NewsWriter for AiNewsWriter<M> {
    async fn write(&self, stats: &Stats) -> Result<Vec<DraftItem>> {
        let payload = serde_json::to_string(stats)?;
        let output = self.model.complete(CORRESPONDENT_PROMPT, &payload).await?;
        parse_drafts(output)
    }
}

/// Interpret model output as a list of drafts.
///
/// Strings are parsed as JSON (markdown fences tolerated). Only an array
/// counts. Elements are taken as they come: `title`/`body` strings are kept,
/// null or missing fields become empty strings, other scalars are
/// stringified and non-object elements become empty drafts.
pub fn parse_drafts(output: serde_json::Value) -> Result<Vec<DraftItem>> {
    let parsed = match output {
        serde_json::Value::String(text) => {
            let cleaned = strip_code_blocks(&text);
            serde_json::from_str(cleaned).map_err(|e| {
                debug!(preview = truncate_to_char_boundary(cleaned, 200), "Unparseable model output");
                anyhow!("model output is not JSON: {e}")
            })?
        }
        other => other,
    };

    match parsed {
        serde_json::Value::Array(elements) => Ok(elements.iter().map(draft_from).collect()),
        _ => Err(anyhow!("model output did not resolve to an array")),
    }
}

fn draft_from(element: &serde_json::Value) -> DraftItem {
    DraftItem {
        title: text_field(element, "title"),
        body: text_field(element, "body"),
    }
}

fn text_field(element: &serde_json::Value, key: &str) -> String {
    match element.get(key) {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
