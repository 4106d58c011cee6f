use std::{process::Command, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::FetchError;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const GITHUB_JSON: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("prdash/", env!("CARGO_PKG_VERSION"));

/// Read access to the code-hosting API.
///
/// `resource` is either an absolute URL (as embedded in API responses) or a
/// path relative to the API root. `query` pairs are appended to the URL.
#[async_trait]
pub trait Forge: Sync {
    async fn get_json(&self, resource: &str, query: &[(&str, &str)]) -> Result<Value, FetchError>;
}

/// Fetches `resource` and decodes it into `T`.
pub async fn fetch<T, F>(forge: &F, resource: &str, query: &[(&str, &str)]) -> Result<T, FetchError>
where
    T: DeserializeOwned,
    F: Forge + ?Sized,
{
    let value = forge.get_json(resource, query).await?;
    serde_json::from_value(value).map_err(|source| FetchError::Decode {
        url: resource.to_string(),
        source,
    })
}

/// GitHub REST API client authenticated with a static bearer token.
#[derive(Debug, Clone)]
pub struct GitHub {
    client: reqwest::Client,
    base_url: Url,
    token: String,
}

impl GitHub {
    pub fn new(api_url: &str, token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut base_url =
            Url::parse(api_url).with_context(|| format!("Invalid API URL: '{api_url}'"))?;
        // Url::join replaces the last path segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            token: token.into(),
        })
    }

    /// Resolves a resource to an absolute URL with `query` appended.
    pub fn resolve(&self, resource: &str, query: &[(&str, &str)]) -> Result<Url, FetchError> {
        let parsed = if resource.starts_with("http://") || resource.starts_with("https://") {
            Url::parse(resource)
        } else {
            self.base_url.join(resource.trim_start_matches('/'))
        };
        let mut url = parsed.map_err(|source| FetchError::InvalidUrl {
            resource: resource.to_string(),
            source,
        })?;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl Forge for GitHub {
    async fn get_json(&self, resource: &str, query: &[(&str, &str)]) -> Result<Value, FetchError> {
        let url = self.resolve(resource, query)?;
        debug!(%url, "GET");

        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(FetchError::from_status(url.as_str(), status));
        }

        let body = response.bytes().await.map_err(transport)?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

pub fn get_github_token() -> Result<String> {
    // Prefer environment variables over gh CLI to avoid subprocess overhead.
    for name in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Ok(token) = std::env::var(name)
            && !token.trim().is_empty()
        {
            return Ok(token.trim().to_string());
        }
    }

    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .context("GitHub token not found. Set GITHUB_TOKEN or run 'gh auth login'")?;

    if !output.status.success() {
        anyhow::bail!("Failed to get GitHub token from gh CLI. Please run 'gh auth login' first");
    }

    let token = String::from_utf8(output.stdout)?.trim().to_string();

    if token.is_empty() {
        anyhow::bail!("Empty token returned from gh CLI");
    }

    Ok(token)
}
