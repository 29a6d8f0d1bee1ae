//! Bot command handlers.

mod jira;
mod oncall;
mod weather;

pub use jira::JiraCreateHandler;
pub use oncall::OnCallHandler;
pub use weather::WeatherHandler;

use crate::config::Config;
use anyhow::Context;
use reqwest::Response;
use serde_json::Value;
use slackbot::{Bot, Gateway};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Longest upstream error message relayed into chat.
const MAX_MESSAGE_CHARS: usize = 200;

/// Failure talking to a third-party API.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned {status}: {message}")]
    Status { status: u16, message: String },
}

impl UpstreamError {
    /// The upstream's own error message, if it sent one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

/// Pass successful responses through; turn the rest into `UpstreamError::Status`.
async fn check_status(response: Response) -> Result<Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), "Upstream error body: {}", body);

    // Only a JSON `message` is shown to users; HTML error pages are not.
    let message: String = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(str::to_string))
        .map(|m| m.trim().chars().take(MAX_MESSAGE_CHARS).collect())
        .unwrap_or_default();

    Err(UpstreamError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Register every command whose integration is configured.
pub fn register<G: Gateway>(bot: &mut Bot<G>, config: &Config) -> anyhow::Result<()> {
    match &config.pagerduty.token {
        Some(token) => {
            let channels = config
                .pagerduty
                .load_channels()
                .context("Failed to load on-call channel config")?;
            info!("On-call configured for {} channels", channels.len());
            let handler = OnCallHandler::new(
                &config.pagerduty.api_url,
                token,
                channels,
                config.pagerduty.timeout,
            )?;
            bot.add_command(oncall::TRIGGER, oncall::DESCRIPTION, Arc::new(handler));
        }
        None => warn!("PAGERDUTY__TOKEN not set; {} disabled", oncall::TRIGGER),
    }

    match &config.weather.api_key {
        Some(api_key) => {
            let handler =
                WeatherHandler::new(&config.weather.api_url, api_key, config.weather.timeout)?;
            bot.add_command(weather::TRIGGER, weather::DESCRIPTION, Arc::new(handler));
        }
        None => warn!("WEATHER__API_KEY not set; {} disabled", weather::TRIGGER),
    }

    match (&config.jira.base_url, config.jira.basic_auth()) {
        (Some(base_url), Some(auth)) => {
            let handler = JiraCreateHandler::new(base_url, auth, config.jira.timeout)?;
            bot.add_command(jira::TRIGGER, jira::DESCRIPTION, Arc::new(handler));
        }
        (Some(_), None) => warn!(
            "JIRA__BASE_URL set without JIRA__AUTH or JIRA__USERNAME/JIRA__PASSWORD; {} disabled",
            jira::TRIGGER
        ),
        (None, _) => warn!("JIRA__BASE_URL not set; {} disabled", jira::TRIGGER),
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use slackbot::{BotResult, Invocation, ReplySink};
    use std::sync::Mutex;

    /// Captures replies instead of sending them.
    #[derive(Default)]
    pub struct RecordingSink {
        replies: Mutex<Vec<(String, String)>>,
    }

    impl RecordingSink {
        pub fn replies(&self) -> Vec<(String, String)> {
            self.replies.lock().unwrap().clone()
        }

        /// The only reply sent, panicking unless there was exactly one.
        pub fn single(&self) -> String {
            let replies = self.replies();
            assert_eq!(replies.len(), 1, "expected exactly one reply: {:?}", replies);
            replies[0].1.clone()
        }
    }

    #[async_trait]
    impl ReplySink for RecordingSink {
        async fn reply(&self, channel_id: &str, text: &str) -> BotResult<()> {
            self.replies
                .lock()
                .unwrap()
                .push((channel_id.to_string(), text.to_string()));
            Ok(())
        }
    }

    /// An invocation from #ops, with `args` split on spaces.
    pub fn invocation(trigger: &str, args: Option<&str>) -> Invocation {
        Invocation {
            trigger: trigger.into(),
            channel_id: "C1".into(),
            channel_name: "ops".into(),
            user_id: "U1".into(),
            user_name: "alice".into(),
            args: args.map(|a| a.split_whitespace().map(str::to_string).collect()),
        }
    }
}
