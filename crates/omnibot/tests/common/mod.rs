//! Common test utilities for integration tests.

use async_trait::async_trait;
use omnibot::config::{BotConfig, Config, JiraConfig, PagerDutyConfig, SlackConfig, WeatherConfig};
use slack_client::{Channel, MessageEvent, RtmEvent, SlackError, User};
use slackbot::{BotResult, DirectorySource, EventSource, EventStream, ReplySink};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;
use wiremock::MockServer;

/// Workspace with channels #ops (C1) and #random (C2), and one user.
pub struct FakeSlack {
    events: Mutex<Option<UnboundedReceiver<Result<RtmEvent, SlackError>>>>,
    replies: UnboundedSender<(String, String)>,
}

/// Test-side handles to a [`FakeSlack`].
pub struct Chat {
    events: UnboundedSender<Result<RtmEvent, SlackError>>,
    replies: UnboundedReceiver<(String, String)>,
}

impl FakeSlack {
    pub fn new() -> (Self, Chat) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();

        let slack = Self {
            events: Mutex::new(Some(event_rx)),
            replies: reply_tx,
        };
        let chat = Chat {
            events: event_tx,
            replies: reply_rx,
        };
        (slack, chat)
    }
}

#[async_trait]
impl EventSource for FakeSlack {
    async fn connect(&self) -> BotResult<EventStream> {
        let receiver = self
            .events
            .lock()
            .unwrap()
            .take()
            .expect("connect called twice");
        Ok(Box::pin(UnboundedReceiverStream::new(receiver)))
    }
}

#[async_trait]
impl DirectorySource for FakeSlack {
    async fn list_channels(&self) -> BotResult<Vec<Channel>> {
        Ok(vec![
            Channel {
                id: "C1".into(),
                name: "ops".into(),
            },
            Channel {
                id: "C2".into(),
                name: "random".into(),
            },
        ])
    }

    async fn list_users(&self) -> BotResult<Vec<User>> {
        Ok(vec![User {
            id: "U1".into(),
            name: "alice".into(),
        }])
    }
}

#[async_trait]
impl ReplySink for FakeSlack {
    async fn reply(&self, channel_id: &str, text: &str) -> BotResult<()> {
        let _ = self.replies.send((channel_id.to_string(), text.to_string()));
        Ok(())
    }
}

impl Chat {
    /// Post a message as @alice.
    pub fn say(&self, channel: &str, text: &str) {
        self.events
            .send(Ok(RtmEvent::Message(MessageEvent::new(channel, "U1", text))))
            .unwrap();
    }

    /// Wait for the next reply.
    pub async fn next_reply(&mut self) -> (String, String) {
        tokio::time::timeout(Duration::from_secs(2), self.replies.recv())
            .await
            .expect("timed out waiting for reply")
            .expect("reply channel closed")
    }
}

/// A config with only Slack set; integrations are disabled.
pub fn base_config() -> Config {
    Config {
        slack: SlackConfig {
            token: "xoxb-test".into(),
            api_url: "http://slack.invalid/api".into(),
            timeout: Duration::from_secs(5),
        },
        bot: BotConfig::default(),
        pagerduty: PagerDutyConfig::default(),
        weather: WeatherConfig::default(),
        jira: JiraConfig::default(),
    }
}

/// Write an on-call channel file mapping #ops to `PABC123`.
pub fn write_channels_file(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{}-{}.json", name, std::process::id()));
    std::fs::write(
        &path,
        r#"{"channels": [{"name": "ops", "escalation_policy_id": "PABC123"}]}"#,
    )
    .unwrap();
    path
}

/// A config with every integration pointed at `mock_server`.
pub fn full_config(mock_server: &MockServer, channels_file: PathBuf) -> Config {
    let mut config = base_config();
    config.pagerduty.token = Some("pd-token".into());
    config.pagerduty.api_url = mock_server.uri();
    config.pagerduty.channels_file = channels_file;
    config.weather.api_key = Some("owm-key".into());
    config.weather.api_url = mock_server.uri();
    config.jira.base_url = Some(mock_server.uri());
    config.jira.username = Some("bot".into());
    config.jira.password = Some("hunter2".into());
    config
}
