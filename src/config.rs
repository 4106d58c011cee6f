//! Run configuration loaded from `<config dir>/prdash/config.toml`.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::github::DEFAULT_API_URL;

pub const CONFIG_DIR_NAME: &str = "prdash";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine the user config directory")]
    NoConfigDir,

    #[error("config file not found at {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("error reading config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error decoding config file {}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: Option<usize>,
        message: String,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Flattens a TOML error to one line; its `Display` spans several lines with
/// a source snippet.
fn parse_error(content: &str, path: &Path, err: &toml::de::Error) -> ConfigError {
    let line = err.span().map(|span| {
        let before = content.get(..span.start).unwrap_or(content);
        before.matches('\n').count() + 1
    });
    let text = err.message().split_whitespace().collect::<Vec<_>>().join(" ");
    let message = match line {
        Some(line) => format!("line {line}: {text}"),
        None => text,
    };
    ConfigError::Parse {
        path: path.to_path_buf(),
        line,
        message,
    }
}

/// Who the caller is, who is on their team, and which organization to search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub my_github_user: String,
    pub team_users: Vec<String>,
    pub organization: String,
    /// REST API root; point at a GitHub Enterprise server if needed.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Config {
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Loads `path`, or the default location when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };
        Self::load_from_file(&path)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content, path)?;
        debug!(path = %path.display(), team = config.team_users.len(), "Loaded config");
        Ok(config)
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|err| parse_error(content, path, &err))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.my_github_user.trim().is_empty() {
            return Err(ConfigError::Invalid("my_github_user must not be empty".into()));
        }
        if self.organization.trim().is_empty() {
            return Err(ConfigError::Invalid("organization must not be empty".into()));
        }
        if let Some(user) = self.team_users.iter().find(|user| user.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "team_users contains an empty login: {user:?}"
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const VALID: &str = r#"
my_github_user = "me"
team_users = ["alice", "bob"]
organization = "acme"
"#;

    #[test]
    fn test_load_from_file_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, VALID).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.my_github_user, "me");
        assert_eq!(config.team_users, vec!["alice", "bob"]);
        assert_eq!(config.organization, "acme");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.toml");

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn test_missing_required_key_is_parse_error() {
        let err = Config::parse(
            "my_github_user = \"me\"\norganization = \"acme\"\n",
            Path::new("config.toml"),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = Config::parse("my_github_user = ", Path::new("config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: Some(1), .. }));
    }

    #[test]
    fn test_parse_error_renders_on_one_line() {
        let content = format!("{VALID}request_timeout_secs = \"soon\"\n");
        let err = Config::parse(&content, Path::new("config.toml")).unwrap_err();
        let rendered = format!("{:#}", anyhow::Error::from(err).context("loading config"));

        assert!(!rendered.contains('\n'));
        assert!(rendered.starts_with("loading config: error decoding config file "));
        assert!(rendered.contains("config.toml: line 5: "));
        assert_eq!(rendered.matches("config.toml").count(), 1);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let content = format!("{VALID}colour = \"blue\"\n");
        let err = Config::parse(&content, Path::new("config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_empty_organization_is_invalid() {
        let content = VALID.replace("\"acme\"", "\"\"");
        let err = Config::parse(&content, Path::new("config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_overrides_optional_fields() {
        let content = format!(
            "{VALID}api_url = \"https://ghe.example.com/api/v3\"\nrequest_timeout_secs = 5\n"
        );
        let config = Config::parse(&content, Path::new("config.toml")).unwrap();
        assert_eq!(config.api_url, "https://ghe.example.com/api/v3");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let content = format!("{VALID}request_timeout_secs = 0\n");
        let err = Config::parse(&content, Path::new("config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
