//! Common test utilities for integration tests.

use async_trait::async_trait;
use slack_client::{Channel, MessageEvent, RtmEvent, SlackError, User};
use slackbot::{BotError, BotResult, DirectorySource, EventSource, EventStream, ReplySink};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Channel whose replies always fail to deliver.
pub const BROKEN_CHANNEL: &str = "CBROKEN";

/// In-memory gateway: events are pushed by the test, replies are captured.
pub struct FakeGateway {
    events: Mutex<Option<UnboundedReceiver<Result<RtmEvent, SlackError>>>>,
    replies: UnboundedSender<(String, String)>,
    fail_directory: bool,
}

/// Test-side handles to a [`FakeGateway`].
pub struct Harness {
    pub events: UnboundedSender<Result<RtmEvent, SlackError>>,
    pub replies: UnboundedReceiver<(String, String)>,
}

impl FakeGateway {
    pub fn new() -> (Self, Harness) {
        Self::build(false)
    }

    pub fn with_failing_directory() -> (Self, Harness) {
        Self::build(true)
    }

    fn build(fail_directory: bool) -> (Self, Harness) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();

        let gateway = Self {
            events: Mutex::new(Some(event_rx)),
            replies: reply_tx,
            fail_directory,
        };
        let harness = Harness {
            events: event_tx,
            replies: reply_rx,
        };
        (gateway, harness)
    }
}

#[async_trait]
impl EventSource for FakeGateway {
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
impl DirectorySource for FakeGateway {
    async fn list_channels(&self) -> BotResult<Vec<Channel>> {
        if self.fail_directory {
            return Err(BotError::Directory("error fetching channels: invalid_auth".into()));
        }
        Ok(vec![
            Channel {
                id: "C1".into(),
                name: "ops".into(),
            },
            Channel {
                id: "C2".into(),
                name: "general".into(),
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
impl ReplySink for FakeGateway {
    async fn reply(&self, channel_id: &str, text: &str) -> BotResult<()> {
        if channel_id == BROKEN_CHANNEL {
            return Err(BotError::Reply {
                channel: channel_id.to_string(),
                reason: "channel_not_found".into(),
            });
        }
        let _ = self.replies.send((channel_id.to_string(), text.to_string()));
        Ok(())
    }
}

impl Harness {
    /// Push a text message from user U1.
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

    /// Assert nothing is replied within a short window.
    pub async fn assert_silent(&mut self) {
        let result = tokio::time::timeout(Duration::from_millis(150), self.replies.recv()).await;
        assert!(result.is_err(), "unexpected reply: {:?}", result);
    }
}
