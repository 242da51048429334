// file: src/source/github.rs
// description: GitHub REST client listing recently changed files and fetching their contents
// reference: https://docs.github.com/en/rest/commits/commits

use crate::config::ChangesConfig;
use crate::error::{PipelineError, Result};
use crate::source::ChangeSource;
use crate::utils::Validator;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info};

const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";
const PAGE_SIZE: &str = "100";

#[derive(Debug, Deserialize)]
struct CommitSummary {
    sha: String,
    commit: CommitInfo,
}

#[derive(Debug, Deserialize)]
struct CommitInfo {
    author: Option<Signature>,
}

#[derive(Debug, Deserialize)]
struct Signature {
    date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    #[serde(default)]
    files: Vec<ChangedFile>,
}

#[derive(Debug, Deserialize)]
struct ChangedFile {
    filename: String,
}

pub struct GitHubChangeSource {
    client: Client,
    api_url: Url,
    owner: String,
    repo: String,
    token: Option<String>,
    git_ref: Option<String>,
}

impl GitHubChangeSource {
    pub fn new(config: &ChangesConfig, timeout: Duration) -> Result<Self> {
        let owner = required(config.owner.as_deref(), "changes.owner")?;
        let repo = required(config.repo.as_deref(), "changes.repo")?;

        Validator::validate_url(&config.api_url)?;
        let api_url = Url::parse(&config.api_url)
            .map_err(|e| PipelineError::Config(format!("Invalid changes.api_url: {}", e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PipelineError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url,
            owner,
            repo,
            token: config.token.clone(),
            git_ref: config.git_ref.clone(),
        })
    }

    /// `{api_url}/repos/{owner}/{repo}/{tail...}`, each segment percent-encoded.
    fn endpoint<'a>(&self, tail: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| PipelineError::Config(format!("Unusable API URL: {}", self.api_url)))?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.repo.as_str()])
            .extend(tail);
        Ok(url)
    }

    fn get(&self, url: Url, media_type: &str) -> RequestBuilder {
        let builder = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, media_type);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn source_error(&self, message: impl Into<String>) -> PipelineError {
        PipelineError::Source {
            location: self.location(),
            message: message.into(),
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| self.source_error(format!("Failed to request {}: {}", what, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.source_error(format!(
                "Fetching {} failed with status {}: {}",
                what,
                status,
                Validator::truncate_text(&body, 300)
            )));
        }

        response
            .json()
            .await
            .map_err(|e| self.source_error(format!("Failed to parse {}: {}", what, e)))
    }
}

#[async_trait]
impl ChangeSource for GitHubChangeSource {
    async fn changed_paths(&self, since: DateTime<Utc>) -> Result<Vec<String>> {
        info!(
            "Listing commits of {} since {}",
            self.location(),
            since.to_rfc3339()
        );

        let url = self.endpoint(["commits"])?;
        let request = self
            .get(url, JSON_MEDIA_TYPE)
            .query(&[("since", since.to_rfc3339().as_str()), ("per_page", PAGE_SIZE)]);
        let commits: Vec<CommitSummary> = self.get_json(request, "commit list").await?;

        let mut paths = BTreeSet::new();
        for sha in recent_shas(&commits, since) {
            let url = self.endpoint(["commits", sha])?;
            let detail: CommitDetail = self
                .get_json(self.get(url, JSON_MEDIA_TYPE), &format!("commit {}", sha))
                .await?;
            debug!("Commit {} touched {} files", sha, detail.files.len());
            paths.extend(detail.files.into_iter().map(|f| f.filename));
        }

        info!("Found {} changed files", paths.len());
        Ok(paths.into_iter().collect())
    }

    async fn fetch(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let url = self.endpoint(std::iter::once("contents").chain(path.split('/')))?;
        let mut request = self.get(url, RAW_MEDIA_TYPE);
        if let Some(git_ref) = &self.git_ref {
            request = request.query(&[("ref", git_ref.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.source_error(format!("Failed to request {}: {}", path, e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!("{} no longer exists in {}", path, self.location());
                Ok(None)
            }
            status if status.is_success() => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| self.source_error(format!("Failed to read {}: {}", path, e)))?;
                Ok(Some(bytes.to_vec()))
            }
            status => Err(self.source_error(format!(
                "Fetching {} failed with status {}",
                path, status
            ))),
        }
    }

    fn location(&self) -> String {
        let host = self.api_url.host_str().unwrap_or("github");
        format!("{}/{}/{}", host, self.owner, self.repo)
    }
}

/// Commits whose author date is after `since`; commits without one are kept.
fn recent_shas(commits: &[CommitSummary], since: DateTime<Utc>) -> Vec<&str> {
    commits
        .iter()
        .filter(|c| c.commit.author.as_ref().is_none_or(|a| a.date > since))
        .map(|c| c.sha.as_str())
        .collect()
}

fn required(value: Option<&str>, name: &str) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(PipelineError::Config(format!("{} is required", name))),
    }
}
