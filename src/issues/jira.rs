//! Jira tickets via `GET {base}/rest/api/2/issue/{key}`.

use serde::Deserialize;

use super::http::{get_json, make_agent};
use super::{IssueTracker, Person, RawComment, RawIssue};
use crate::config::{Credentials, TrackerKind};
use crate::error::Result;
use crate::models::{IssueDetails, IssueReference};

const TRACKER: &str = "Jira";
const FIELDS: &str =
    "summary,assignee,priority,components,labels,issuelinks,subtasks,votes,watches,comment";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JiraUser {
    #[serde(default)]
    name: String,
    #[serde(default)]
    display_name: String,
    email_address: Option<String>,
}

impl From<JiraUser> for Person {
    fn from(user: JiraUser) -> Self {
        Person {
            login: user.name,
            display_name: user.display_name,
            email: user.email_address,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct Votes {
    #[serde(default)]
    votes: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Watches {
    #[serde(default)]
    watch_count: u64,
}

#[derive(Debug, Deserialize)]
struct JiraComment {
    #[serde(default)]
    author: JiraUser,
    #[serde(default)]
    body: String,
}

#[derive(Debug, Default, Deserialize)]
struct CommentPage {
    #[serde(default)]
    comments: Vec<JiraComment>,
}

#[derive(Debug, Deserialize)]
struct Fields {
    #[serde(default)]
    summary: String,
    assignee: Option<JiraUser>,
    priority: Option<Named>,
    #[serde(default)]
    components: Vec<Named>,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    issuelinks: Vec<serde_json::Value>,
    #[serde(default)]
    subtasks: Vec<serde_json::Value>,
    #[serde(default)]
    votes: Votes,
    #[serde(default)]
    watches: Watches,
    #[serde(default)]
    comment: CommentPage,
}

#[derive(Debug, Deserialize)]
struct JiraIssue {
    key: String,
    fields: Fields,
}

impl From<JiraIssue> for RawIssue {
    fn from(issue: JiraIssue) -> Self {
        let fields = issue.fields;
        RawIssue {
            reference: IssueReference::Ticket(issue.key),
            title: fields.summary,
            owner: fields.assignee.map(Person::from),
            comments: fields
                .comment
                .comments
                .into_iter()
                .map(|c| RawComment {
                    author: c.author.into(),
                    body: c.body,
                })
                .collect(),
            details: IssueDetails::Ticket {
                priority: fields.priority.map(|p| p.name),
                components: fields.components.into_iter().map(|c| c.name).collect(),
                labels: fields.labels,
                linked_issues: fields.issuelinks.len(),
                subtasks: fields.subtasks.len(),
                votes: fields.votes.votes,
                watches: fields.watches.watch_count,
            },
        }
    }
}

pub struct JiraClient {
    base_url: String,
    credentials: Credentials,
    agent: ureq::Agent,
}

impl JiraClient {
    pub fn new(base_url: String, credentials: Credentials) -> Self {
        Self {
            base_url,
            credentials,
            agent: make_agent(),
        }
    }
}

impl IssueTracker for JiraClient {
    fn kind(&self) -> TrackerKind {
        TrackerKind::Jira
    }

    fn fetch(&self, reference: &IssueReference) -> Result<Option<RawIssue>> {
        let IssueReference::Ticket(key) = reference else {
            return Ok(None);
        };

        let url = format!("{}/rest/api/2/issue/{}?fields={}", self.base_url, key, FIELDS);
        let issue: Option<JiraIssue> = get_json(&self.agent, TRACKER, &url, &self.credentials)?;
        Ok(issue.map(RawIssue::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISSUE: &str = r#"{
        "id": "10001",
        "key": "CORE-42",
        "fields": {
            "summary": "Parser drops trailing line",
            "assignee": { "name": "grace", "displayName": "Grace Hopper", "emailAddress": "grace@example.com" },
            "priority": { "name": "Major", "id": "3" },
            "components": [ { "name": "parser" }, { "name": "cli" } ],
            "labels": [ "regression" ],
            "issuelinks": [ { "id": "1" }, { "id": "2" } ],
            "subtasks": [],
            "votes": { "votes": 3, "hasVoted": false },
            "watches": { "watchCount": 5, "isWatching": false },
            "comment": {
                "comments": [
                    { "author": { "name": "ada", "displayName": "Ada", "emailAddress": "ada@example.com" }, "body": "Repro attached" },
                    { "author": { "name": "hudson", "displayName": "Hudson Bot" }, "body": "Build failed" }
                ],
                "total": 2
            }
        }
    }"#;

    #[test]
    fn issue_payload_maps_all_details() {
        let issue: JiraIssue = serde_json::from_str(ISSUE).unwrap();
        let raw = RawIssue::from(issue);

        assert_eq!(raw.reference, IssueReference::Ticket("CORE-42".to_string()));
        assert_eq!(raw.title, "Parser drops trailing line");
        assert_eq!(raw.owner.as_ref().map(|p| p.login.as_str()), Some("grace"));
        assert_eq!(raw.comments.len(), 2);
        assert_eq!(
            raw.details,
            IssueDetails::Ticket {
                priority: Some("Major".to_string()),
                components: vec!["parser".to_string(), "cli".to_string()],
                labels: vec!["regression".to_string()],
                linked_issues: 2,
                subtasks: 0,
                votes: 3,
                watches: 5,
            }
        );
    }

    #[test]
    fn sparse_payload_uses_defaults() {
        let issue: JiraIssue =
            serde_json::from_str(r#"{ "key": "CORE-1", "fields": { "assignee": null, "priority": null } }"#)
                .unwrap();
        let raw = RawIssue::from(issue);
        assert!(raw.owner.is_none());
        assert!(raw.comments.is_empty());
        assert!(matches!(raw.details, IssueDetails::Ticket { priority: None, votes: 0, .. }));
    }
}
