//! Run configuration.
//!
//! Options arrive through clap (see `main.rs`); issue tracker credentials are
//! read from the environment after an optional `.env` file is loaded:
//! - `GITHUB_AUTH_TOKEN`, `GITHUB_API_URL`
//! - `JIRA_USER`, `JIRA_PASSWORD`

use std::env;

use serde::{Deserialize, Serialize};

use crate::analysis::classify::LineRules;
use crate::error::{AppError, Result};
use crate::issues::github::GitHubClient;
use crate::issues::jira::JiraClient;
use crate::issues::IssueTracker;

pub const GITHUB_TOKEN_ENV: &str = "GITHUB_AUTH_TOKEN";
pub const GITHUB_API_URL_ENV: &str = "GITHUB_API_URL";
pub const JIRA_USER_ENV: &str = "JIRA_USER";
pub const JIRA_PASSWORD_ENV: &str = "JIRA_PASSWORD";

const DEFAULT_GITHUB_API: &str = "https://api.github.com";

/// Load `.env` from the working directory if present.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReduceOptions {
    pub filter_words: Vec<String>,
    pub rules: LineRules,
}

impl ReduceOptions {
    /// Blank filter words are dropped; no import keywords means the default
    /// `import`.
    pub fn new(filter_words: Vec<String>, import_keywords: Vec<String>) -> Self {
        let filter_words = filter_words
            .into_iter()
            .filter(|w| !w.trim().is_empty())
            .collect();
        let import_keywords: Vec<String> = import_keywords
            .into_iter()
            .filter(|k| !k.is_empty())
            .collect();
        let rules = if import_keywords.is_empty() {
            LineRules::default()
        } else {
            LineRules::with_import_keywords(import_keywords)
        };
        Self { filter_words, rules }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TrackerKind {
    /// GitHub pull requests, referenced as `(#123)`
    Github,
    /// Jira tickets, referenced as `PROJ-123`
    Jira,
}

impl TrackerKind {
    pub fn name(&self) -> &'static str {
        match self {
            TrackerKind::Github => "GitHub",
            TrackerKind::Jira => "Jira",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Anonymous,
    Token(String),
    Basic { user: String, password: String },
}

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub kind: TrackerKind,
    /// `owner/repo` for GitHub, the server base URL for Jira
    pub target: String,
    pub api_url: String,
    pub credentials: Credentials,
}

impl TrackerConfig {
    pub fn from_env(kind: TrackerKind, target: &str) -> Result<Self> {
        let target = target.trim().trim_end_matches('/').to_string();
        if target.is_empty() {
            return Err(AppError::Config(format!("{} target must not be empty", kind.name())));
        }

        let config = match kind {
            TrackerKind::Github => {
                if target.split('/').filter(|part| !part.is_empty()).count() != 2 {
                    return Err(AppError::Config(format!(
                        "GitHub repository must look like owner/repo, got {}",
                        target
                    )));
                }
                let credentials = match env::var(GITHUB_TOKEN_ENV) {
                    Ok(token) if !token.is_empty() => Credentials::Token(token),
                    _ => {
                        tracing::warn!("{} not set, using unauthenticated GitHub requests", GITHUB_TOKEN_ENV);
                        Credentials::Anonymous
                    }
                };
                TrackerConfig {
                    kind,
                    api_url: env::var(GITHUB_API_URL_ENV)
                        .unwrap_or_else(|_| DEFAULT_GITHUB_API.to_string())
                        .trim_end_matches('/')
                        .to_string(),
                    target,
                    credentials,
                }
            }
            TrackerKind::Jira => {
                let credentials = match (env::var(JIRA_USER_ENV), env::var(JIRA_PASSWORD_ENV)) {
                    (Ok(user), Ok(password)) if !user.is_empty() => Credentials::Basic { user, password },
                    _ => Credentials::Anonymous,
                };
                TrackerConfig {
                    kind,
                    api_url: target.clone(),
                    target,
                    credentials,
                }
            }
        };

        Ok(config)
    }

    /// The tracker client is chosen here, once; callers only see the trait.
    pub fn build(self) -> Box<dyn IssueTracker> {
        match self.kind {
            TrackerKind::Github => Box::new(GitHubClient::new(self.api_url, self.target, self.credentials)),
            TrackerKind::Jira => Box::new(JiraClient::new(self.api_url, self.credentials)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduce_options_drop_blank_words() {
        let options = ReduceOptions::new(
            vec!["MINOR".to_string(), " ".to_string(), String::new()],
            vec![],
        );
        assert_eq!(options.filter_words, vec!["MINOR"]);
        assert_eq!(options.rules, LineRules::default());

        let options = ReduceOptions::new(vec![], vec!["use ".to_string()]);
        assert_eq!(options.rules.import_keywords, vec!["use "]);
    }

    #[test]
    fn github_target_must_be_owner_repo() {
        assert!(matches!(
            TrackerConfig::from_env(TrackerKind::Github, "just-a-name"),
            Err(AppError::Config(_))
        ));
        let config = TrackerConfig::from_env(TrackerKind::Github, "rust-lang/git2-rs/").unwrap();
        assert_eq!(config.target, "rust-lang/git2-rs");
    }

    #[test]
    fn jira_target_is_the_base_url() {
        let config = TrackerConfig::from_env(TrackerKind::Jira, "https://issues.apache.org/jira/").unwrap();
        assert_eq!(config.api_url, "https://issues.apache.org/jira");
        assert!(TrackerConfig::from_env(TrackerKind::Jira, "  ").is_err());
    }
}
