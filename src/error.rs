//! Error types for fetching and triaging pull requests.

use std::fmt;

use thiserror::Error;

/// Failure to fetch or decode a single API resource.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid URL for resource '{resource}'")]
    InvalidUrl {
        resource: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request error for {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} Client Error for URL {url}")]
    Client { url: String, status: u16 },

    #[error("HTTP {status} Server Error for URL {url}")]
    Server { url: String, status: u16 },

    #[error("decoding JSON response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Classifies an HTTP error status (>= 400) as a client or server error.
    pub fn from_status(url: impl Into<String>, status: u16) -> Self {
        let url = url.into();
        if status >= 500 {
            FetchError::Server { url, status }
        } else {
            FetchError::Client { url, status }
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, FetchError::Client { .. })
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, FetchError::Server { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Client { status, .. } | FetchError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The sub-resources fetched for each pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Detail,
    Comments,
    Commits,
    Reviews,
    CheckRuns,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Detail => "PR details",
            ResourceKind::Comments => "comments",
            ResourceKind::Commits => "commits",
            ResourceKind::Reviews => "reviews",
            ResourceKind::CheckRuns => "check runs",
        };
        f.write_str(name)
    }
}

/// Failure to assemble the aggregate for one pull request.
#[derive(Error, Debug)]
#[error("error fetching {resource} for {reference}")]
pub struct EnrichError {
    pub reference: String,
    pub resource: ResourceKind,
    #[source]
    pub source: FetchError,
}

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("error fetching PR list")]
    Search(#[source] FetchError),

    #[error(transparent)]
    Enrich(#[from] EnrichError),
}

impl TriageError {
    pub fn fetch_error(&self) -> &FetchError {
        match self {
            TriageError::Search(err) => err,
            TriageError::Enrich(err) => &err.source,
        }
    }
}
