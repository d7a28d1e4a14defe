pub mod error;
pub mod types;

pub use error::{GithubError, Result};
pub use types::{CommitResult, FileContents, RepoRef};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use types::{ContentsResponse, UpdateFileRequest, UpdateFileResponse};

const BASE_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";

const DEFAULT_USER_AGENT: &str = "riftfall-news";

pub struct GithubClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl GithubClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn contents_url(&self, repo: &RepoRef, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url,
            repo.owner,
            repo.repo,
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, DEFAULT_USER_AGENT)
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    /// Fetch and decode a file at `git_ref`. Returns `Ok(None)` when the file
    /// does not exist yet.
    pub async fn get_file(
        &self,
        repo: &RepoRef,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<FileContents>> {
        let url = self.contents_url(repo, path);
        let resp = self
            .request(reqwest::Method::GET, &url)
            .query(&[("ref", git_ref)])
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(%repo, path, git_ref, "File not found");
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GithubError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let raw: ContentsResponse = resp.json().await?;
        if raw.entry_type.as_deref().is_some_and(|t| t != "file") {
            return Err(GithubError::NotFound(format!("{path} is not a file")));
        }
        let encoded = raw
            .content
            .ok_or_else(|| GithubError::NotFound(format!("{path} has no inline content")))?;
        if let Some(encoding) = raw.encoding.as_deref() {
            if encoding != "base64" {
                return Err(GithubError::Parse(format!(
                    "unsupported content encoding '{encoding}' for {path}"
                )));
            }
        }

        let text = decode_content(&encoded)?;
        tracing::debug!(%repo, path, sha = %raw.sha, bytes = text.len(), "Fetched file");

        Ok(Some(FileContents {
            path: raw.path,
            sha: raw.sha,
            text,
        }))
    }

    /// Create or update a file on `branch` in a single commit.
    ///
    /// `sha` must be the blob sha last read for an existing file; GitHub
    /// rejects the write with 409 if the file moved on since.
    pub async fn put_file(
        &self,
        repo: &RepoRef,
        path: &str,
        branch: &str,
        message: &str,
        text: &str,
        sha: Option<&str>,
    ) -> Result<CommitResult> {
        let url = self.contents_url(repo, path);
        let body = UpdateFileRequest {
            message,
            content: STANDARD.encode(text.as_bytes()),
            branch,
            sha,
        };

        let resp = self
            .request(reqwest::Method::PUT, &url)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::CONFLICT {
            let message = resp.text().await.unwrap_or_default();
            return Err(GithubError::Conflict {
                path: path.to_string(),
                message,
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GithubError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let updated: UpdateFileResponse = resp.json().await?;
        tracing::info!(
            %repo,
            path,
            branch,
            commit = %updated.commit.sha,
            "Committed file"
        );

        Ok(CommitResult {
            commit_sha: updated.commit.sha,
        })
    }
}

/// GitHub wraps base64 payloads at 60 columns.
fn decode_content(encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_wrapped_base64() {
        let encoded = STANDARD.encode("{\"version\": 1, \"items\": []}");
        let (head, tail) = encoded.split_at(10);
        let wrapped = format!("{head}\n{tail}\n");
        assert_eq!(
            decode_content(&wrapped).unwrap(),
            "{\"version\": 1, \"items\": []}"
        );
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(matches!(
            decode_content("not base64!!"),
            Err(GithubError::Parse(_))
        ));
    }

    #[test]
    fn contents_url_strips_leading_slash() {
        let client = GithubClient::new("t".into()).with_base_url("http://gh.local");
        let repo = RepoRef::parse("o/r").unwrap();
        assert_eq!(
            client.contents_url(&repo, "/data/news/news.json"),
            "http://gh.local/repos/o/r/contents/data/news/news.json"
        );
    }
}
