use std::env;

use crate::error::RiftfallError;

pub const DEFAULT_AI_MODEL: &str = "@cf/meta/llama-3-8b-instruct";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_NEWS_FILE_PATH: &str = "data/news/news.json";
pub const DEFAULT_MAX_NEWS_ITEMS: usize = 200;

/// Workers AI credentials. Present only when both account and token are set.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub account_id: String,
    pub api_token: String,
    pub model: String,
}

/// Daemon configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Supabase (game state)
    pub supabase_url: String,
    pub supabase_service_key: String,

    // Cloudflare Workers AI
    pub ai: Option<AiConfig>,

    // GitHub (news history)
    pub github_token: String,
    pub github_repo: String,
    pub github_branch: String,
    pub news_file_path: String,

    // Discord
    pub discord_webhook_url: Option<String>,

    pub max_news_items: usize,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, RiftfallError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key source. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RiftfallError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| {
                RiftfallError::Config(format!("{key} environment variable is required"))
            })
        };

        let github_repo = required("GITHUB_REPO")?;
        match github_repo.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => {}
            _ => {
                return Err(RiftfallError::Config(format!(
                    "GITHUB_REPO must be formatted as owner/repo, got '{github_repo}'"
                )))
            }
        }

        let ai = match (get("CLOUDFLARE_ACCOUNT_ID"), get("CLOUDFLARE_API_TOKEN")) {
            (Some(account_id), Some(api_token)) => Some(AiConfig {
                account_id,
                api_token,
                model: get("CLOUDFLARE_AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
            }),
            _ => None,
        };

        let max_news_items = match get("MAX_NEWS_ITEMS") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(RiftfallError::Config(format!(
                        "MAX_NEWS_ITEMS must be a positive integer, got '{raw}'"
                    )))
                }
            },
            None => DEFAULT_MAX_NEWS_ITEMS,
        };

        Ok(Self {
            supabase_url: required("SUPABASE_URL")?,
            supabase_service_key: required("SUPABASE_SERVICE_KEY")?,
            ai,
            github_token: required("GITHUB_TOKEN")?,
            github_repo,
            github_branch: get("GITHUB_BRANCH").unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            news_file_path: get("NEWS_FILE_PATH")
                .unwrap_or_else(|| DEFAULT_NEWS_FILE_PATH.to_string()),
            discord_webhook_url: get("DISCORD_WEBHOOK_URL"),
            max_news_items,
        })
    }

    /// Log the loaded configuration with secrets reduced to a short preview.
    pub fn log_redacted(&self) {
        fn preview(val: &str) -> String {
            let n = val.char_indices().nth(5).map(|(i, _)| i).unwrap_or(val.len());
            format!("{}...({} chars)", &val[..n], val.len())
        }
        fn preview_opt(val: Option<&str>) -> String {
            match val {
                Some(v) if !v.is_empty() => preview(v),
                _ => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  SUPABASE_URL: {}", self.supabase_url);
        tracing::info!("  SUPABASE_SERVICE_KEY: {}", preview(&self.supabase_service_key));
        tracing::info!(
            "  CLOUDFLARE_API_TOKEN: {}",
            preview_opt(self.ai.as_ref().map(|a| a.api_token.as_str()))
        );
        tracing::info!(
            "  CLOUDFLARE_AI_MODEL: {}",
            self.ai.as_ref().map(|a| a.model.as_str()).unwrap_or("<ai disabled>")
        );
        tracing::info!("  GITHUB_TOKEN: {}", preview(&self.github_token));
        tracing::info!(
            "  GITHUB_REPO: {} @ {} ({})",
            self.github_repo,
            self.github_branch,
            self.news_file_path
        );
        tracing::info!(
            "  DISCORD_WEBHOOK_URL: {}",
            preview_opt(self.discord_webhook_url.as_deref())
        );
        tracing::info!("  MAX_NEWS_ITEMS: {}", self.max_news_items);
    }
}
