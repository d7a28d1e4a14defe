use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

// =============================================================================
// Message Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

// =============================================================================
// ChatModel Trait
// =============================================================================

/// A hosted model that takes a conversation and returns its raw output.
///
/// Providers differ in how they wrap the generated text, so implementations
/// unwrap their own envelope and hand back whatever the model produced: a
/// string for free-text models, or structured JSON when the provider already
/// parsed it.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn run(&self, messages: Vec<Message>) -> Result<serde_json::Value>;

    /// Convenience for the common system + user exchange.
    async fn complete(&self, system: &str, user: &str) -> Result<serde_json::Value> {
        self.run(vec![Message::system(system), Message::user(user)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl ChatModel for Echo {
        async fn run(&self, messages: Vec<Message>) -> Result<serde_json::Value> {
            Ok(serde_json::to_value(messages)?)
        }
    }

    #[test]
    fn messages_serialize_with_lowercase_roles() {
        let json = serde_json::to_value(Message::system("be brief")).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "be brief");
    }

    #[test]
    fn complete_sends_system_then_user() {
        let out = tokio_test::block_on(Echo.complete("sys", "usr")).unwrap();
        assert_eq!(out[0]["role"], "system");
        assert_eq!(out[1]["role"], "user");
        assert_eq!(out[1]["content"], "usr");
    }
}
