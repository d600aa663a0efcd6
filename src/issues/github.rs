//! GitHub pull requests.
//!
//! `GET {api}/repos/{owner}/{repo}/pulls/{n}` for the title, author and
//! review count, then `GET {api}/repos/{owner}/{repo}/issues/{n}/comments`
//! (paged) for the conversation.

use serde::Deserialize;

use super::http::{get_json, make_agent};
use super::{IssueTracker, Person, RawComment, RawIssue};
use crate::config::{Credentials, TrackerKind};
use crate::error::Result;
use crate::models::{IssueDetails, IssueReference};

const TRACKER: &str = "GitHub";
const PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct GhUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GhPullRequest {
    #[serde(default)]
    title: String,
    user: Option<GhUser>,
    #[serde(default)]
    review_comments: u64,
}

#[derive(Debug, Deserialize)]
struct GhComment {
    user: Option<GhUser>,
    #[serde(default)]
    body: Option<String>,
}

impl From<GhUser> for Person {
    fn from(user: GhUser) -> Self {
        Person {
            display_name: user.login.clone(),
            login: user.login,
            email: None,
        }
    }
}

fn raw_issue(number: u64, pull: GhPullRequest, comments: Vec<GhComment>) -> RawIssue {
    RawIssue {
        reference: IssueReference::PullRequest(number),
        title: pull.title,
        owner: pull.user.map(Person::from),
        comments: comments
            .into_iter()
            .map(|c| RawComment {
                author: c.user.map(Person::from).unwrap_or_default(),
                body: c.body.unwrap_or_default(),
            })
            .collect(),
        details: IssueDetails::PullRequest {
            review_count: pull.review_comments,
        },
    }
}

pub struct GitHubClient {
    api_url: String,
    /// `owner/repo`
    repository: String,
    credentials: Credentials,
    agent: ureq::Agent,
}

impl GitHubClient {
    pub fn new(api_url: String, repository: String, credentials: Credentials) -> Self {
        Self {
            api_url,
            repository,
            credentials,
            agent: make_agent(),
        }
    }

    fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = format!("{}/repos/{}/{}", self.api_url, self.repository, path);
        get_json(&self.agent, TRACKER, &url, &self.credentials)
    }

    fn comments(&self, number: u64) -> Result<Vec<GhComment>> {
        let mut all = Vec::new();
        for page in 1.. {
            let batch: Vec<GhComment> = self
                .get(&format!("issues/{}/comments?per_page={}&page={}", number, PAGE_SIZE, page))?
                .unwrap_or_default();
            let done = batch.len() < PAGE_SIZE;
            all.extend(batch);
            if done {
                break;
            }
        }
        Ok(all)
    }
}

impl IssueTracker for GitHubClient {
    fn kind(&self) -> TrackerKind {
        TrackerKind::Github
    }

    fn fetch(&self, reference: &IssueReference) -> Result<Option<RawIssue>> {
        let IssueReference::PullRequest(number) = reference else {
            return Ok(None);
        };

        let Some(pull) = self.get::<GhPullRequest>(&format!("pulls/{}", number))? else {
            return Ok(None);
        };
        let comments = self.comments(*number)?;
        tracing::debug!("Pull request #{} has {} comments", number, comments.len());

        Ok(Some(raw_issue(*number, pull, comments)))
    }
}
