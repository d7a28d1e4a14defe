use serde::{Deserialize, Serialize};

use crate::error::{GithubError, Result};

/// `owner/repo` pair parsed from a single slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn parse(slug: &str) -> Result<Self> {
        match slug.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => Err(GithubError::InvalidRepo(slug.to_string())),
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A file fetched from the contents API, already decoded.
#[derive(Debug, Clone)]
pub struct FileContents {
    pub path: String,
    /// Blob sha; pass back on update to guard against concurrent writes.
    pub sha: String,
    pub text: String,
}

/// Raw response for `GET /repos/{owner}/{repo}/contents/{path}` on a file.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContentsResponse {
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    pub path: String,
    pub sha: String,
    pub content: Option<String>,
    pub encoding: Option<String>,
}

/// Body for `PUT /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct UpdateFileRequest<'a> {
    pub message: &'a str,
    /// Base64 of the new file bytes.
    pub content: String,
    pub branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UpdateFileResponse {
    pub commit: CommitInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitInfo {
    pub sha: String,
}

/// Result of a successful create-or-update.
#[derive(Debug, Clone)]
pub struct CommitResult {
    pub commit_sha: String,
}
