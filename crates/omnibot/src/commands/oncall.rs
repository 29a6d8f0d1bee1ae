//! On-call command - shows who is on call for the channel's escalation policy.

use crate::commands::{check_status, UpstreamError};
use crate::config::ChannelConfig;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use slackbot::{BotResult, CommandHandler, Invocation, ReplySink};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{instrument, warn};

pub const TRIGGER: &str = "?oncall";
pub const DESCRIPTION: &str = "Who's on call";

/// Deepest escalation level shown.
const MAX_LEVEL: u32 = 3;

pub struct OnCallHandler {
    client: Client,
    api_url: String,
    token: SecretString,
    /// Channel name to escalation policy id.
    policies: HashMap<String, String>,
}

#[derive(Deserialize)]
struct OnCallsResponse {
    #[serde(default)]
    oncalls: Vec<OnCall>,
}

#[derive(Deserialize)]
struct OnCall {
    escalation_level: u32,
    user: UserReference,
}

#[derive(Deserialize)]
struct UserReference {
    #[serde(default)]
    summary: String,
}

impl OnCallHandler {
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        channels: Vec<ChannelConfig>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: SecretString::new(token.into()),
            policies: channels
                .into_iter()
                .map(|c| (c.name, c.escalation_policy_id))
                .collect(),
        })
    }

    #[instrument(skip(self))]
    async fn fetch_oncalls(&self, policy_id: &str) -> Result<Vec<OnCall>, UpstreamError> {
        let response = self
            .client
            .get(format!("{}/oncalls", self.api_url))
            .header(
                "Authorization",
                format!("Token token={}", self.token.expose_secret()),
            )
            .header("Accept", "application/vnd.pagerduty+json;version=2")
            .query(&[("escalation_policy_ids[]", policy_id), ("limit", "100")])
            .send()
            .await?;

        let body: OnCallsResponse = check_status(response).await?.json().await?;
        Ok(body.oncalls)
    }

    /// One line per escalation level up to `MAX_LEVEL`, lowest first.
    /// When a level has several entries the last one wins.
    fn render(oncalls: &[OnCall]) -> Option<String> {
        let levels: BTreeMap<u32, &str> = oncalls
            .iter()
            .map(|o| (o.escalation_level, o.user.summary.as_str()))
            .collect();

        let lines: Vec<String> = levels
            .range(..=MAX_LEVEL)
            .map(|(level, name)| format!("Level {}: {}", level, name))
            .collect();

        (!lines.is_empty()).then(|| lines.join("\n"))
    }
}

#[async_trait]
impl CommandHandler for OnCallHandler {
    async fn handle(&self, reply: &dyn ReplySink, invocation: &Invocation) -> BotResult<()> {
        let channel = &invocation.channel_name;

        let Some(policy_id) = self.policies.get(channel) else {
            let text = format!("Uh oh, #{} is not configured for {}", channel, TRIGGER);
            return reply.reply(&invocation.channel_id, &text).await;
        };

        let text = match self.fetch_oncalls(policy_id).await {
            Ok(oncalls) => Self::render(&oncalls)
                .unwrap_or_else(|| format!("Nobody is on call for #{}", channel)),
            Err(e) => {
                warn!("Error listing on-calls for #{}: {}", channel, e);
                format!("Could not fetch the on-call schedule for #{}", channel)
            }
        };

        reply.reply(&invocation.channel_id, &text).await
    }
}
