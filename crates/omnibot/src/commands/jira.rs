//! Jira command - files a bug from chat.

use crate::commands::{check_status, UpstreamError};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use slackbot::{BotResult, CommandHandler, Invocation, ReplySink};
use std::time::Duration;
use tracing::{info, instrument, warn};

pub const TRIGGER: &str = "?jiracreate";
pub const DESCRIPTION: &str = "Usage: ?jiracreate PROJECT summary @ assignee";

/// `PROJECT summary words @ assignee`, with ASCII word characters only.
const PATTERN: &str = r"^([[:word:]]+)\s+([[:word:]\s]+)\s+@\s+([A-Za-z_]+)$";

pub struct JiraCreateHandler {
    client: Client,
    base_url: String,
    auth: SecretString,
    pattern: Regex,
}

/// A parsed `?jiracreate` request.
#[derive(Debug, PartialEq, Eq)]
struct IssueRequest {
    project: String,
    summary: String,
    assignee: String,
}

#[derive(Deserialize)]
struct CreatedIssue {
    #[serde(default)]
    key: String,
}

impl JiraCreateHandler {
    /// `auth` is the base64 `username:password` credential.
    pub fn new(
        base_url: impl Into<String>,
        auth: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth: SecretString::new(auth.into()),
            pattern: Regex::new(PATTERN)?,
        })
    }

    fn parse(&self, args: &[String]) -> Option<IssueRequest> {
        let line = args.join(" ");
        let captures = self.pattern.captures(&line)?;

        Some(IssueRequest {
            project: captures[1].to_uppercase(),
            summary: captures[2].to_string(),
            assignee: captures[3].to_string(),
        })
    }

    /// Returns the new issue key, empty if Jira did not send one.
    #[instrument(skip(self))]
    async fn create_issue(&self, request: &IssueRequest) -> Result<String, UpstreamError> {
        let body = json!({
            "fields": {
                "project": { "key": request.project },
                "summary": request.summary,
                "description": request.summary,
                "issuetype": { "name": "Bug" },
                "assignee": { "name": request.assignee },
            }
        });

        let response = self
            .client
            .post(format!("{}/rest/api/2/issue", self.base_url))
            .header(
                "Authorization",
                format!("Basic {}", self.auth.expose_secret()),
            )
            .json(&body)
            .send()
            .await?;

        let issue: CreatedIssue = check_status(response).await?.json().await?;
        Ok(issue.key)
    }
}

#[async_trait]
impl CommandHandler for JiraCreateHandler {
    async fn handle(&self, reply: &dyn ReplySink, invocation: &Invocation) -> BotResult<()> {
        let Some(request) = self.parse(invocation.args().unwrap_or_default()) else {
            return reply.reply(&invocation.channel_id, DESCRIPTION).await;
        };

        let text = match self.create_issue(&request).await {
            Ok(key) if key.is_empty() => DESCRIPTION.to_string(),
            Ok(key) => {
                info!("Created {} for @{}", key, invocation.user_name);
                format!("Issue created: {}/browse/{}", self.base_url, key)
            }
            Err(e) => {
                warn!("Issue creation in {} failed: {}", request.project, e);
                "Could not create the issue".to_string()
            }
        };

        reply.reply(&invocation.channel_id, &text).await
    }
}
