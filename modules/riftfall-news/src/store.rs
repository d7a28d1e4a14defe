use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use github_client::{GithubClient, GithubError, RepoRef};
use riftfall_common::{NewsFile, RiftfallError};

use crate::traits::{LoadedNews, NewsStore};

const COMMIT_MESSAGE: &str = "chore: update riftfall news";

/// News history kept as a JSON file in a GitHub repository. The blob sha
/// serves as the optimistic concurrency token.
pub struct GithubNewsStore {
    client: GithubClient,
    repo: RepoRef,
    branch: String,
    path: String,
}

impl GithubNewsStore {
    pub fn new(client: GithubClient, repo: RepoRef, branch: String, path: String) -> Self {
        Self {
            client,
            repo,
            branch,
            path,
        }
    }
}

#[async_trait]
impl NewsStore for GithubNewsStore {
    async fn load(&self) -> Result<LoadedNews> {
        let file = self
            .client
            .get_file(&self.repo, &self.path, &self.branch)
            .await
            .map_err(|e| RiftfallError::Store(format!("Failed to load {}: {e}", self.path)))?;

        let Some(file) = file else {
            warn!(path = %self.path, "No existing news file, starting a new one");
            return Ok(LoadedNews {
                news: NewsFile::empty(Utc::now()),
                sha: None,
            });
        };

        let news = decode_news(&file.text)
            .with_context(|| format!("Invalid news file at {}", self.path))?;
        info!(path = %self.path, items = news.items.len(), sha = %file.sha, "Loaded news file");

        Ok(LoadedNews {
            news,
            sha: Some(file.sha),
        })
    }

    async fn save(&self, news: &NewsFile, sha: Option<&str>) -> Result<()> {
        let text = encode_news(news)?;
        self.client
            .put_file(&self.repo, &self.path, &self.branch, COMMIT_MESSAGE, &text, sha)
            .await
            .map_err(|e| match e {
                GithubError::Conflict { .. } => RiftfallError::StoreConflict {
                    path: self.path.clone(),
                },
                other => RiftfallError::Store(format!("Failed to save {}: {other}", self.path)),
            })?;
        Ok(())
    }
}

pub fn decode_news(text: &str) -> Result<NewsFile> {
    Ok(serde_json::from_str(text)?)
}

/// Pretty-printed JSON, two-space indent.
pub fn encode_news(news: &NewsFile) -> Result<String> {
    Ok(serde_json::to_string_pretty(news)?)
}
