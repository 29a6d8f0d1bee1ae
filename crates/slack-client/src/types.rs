//! Slack API types.

use serde::{Deserialize, Serialize};

/// A public channel or private group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A workspace member.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// The identity behind the bot token, as reported by `auth.test`.
#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub user: String,
    #[serde(default)]
    pub team: Option<String>,
}

/// Result of `rtm.connect`.
#[derive(Debug, Clone, Deserialize)]
pub struct RtmConnect {
    /// WebSocket URL for the real-time session.
    pub url: String,
    #[serde(rename = "self")]
    pub identity: RtmSelf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RtmSelf {
    pub id: String,
    pub name: String,
}

/// `chat.postMessage` request body.
#[derive(Debug, Clone, Serialize)]
pub struct PostMessageRequest<'a> {
    pub channel: &'a str,
    pub text: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConversationsPage {
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UsersPage {
    #[serde(default)]
    pub members: Vec<User>,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

impl ResponseMetadata {
    /// The cursor for the next page, if Slack returned a non-empty one.
    pub(crate) fn cursor(&self) -> Option<String> {
        self.next_cursor
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(ToOwned::to_owned)
    }
}

/// A text message posted to a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageEvent {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
}

impl MessageEvent {
    pub fn new(
        channel: impl Into<String>,
        user: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            channel: channel.into(),
            user: user.into(),
            ..Default::default()
        }
    }
}

/// Error reported in-band on the RTM stream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RtmErrorBody {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
}

/// Events received over the RTM WebSocket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RtmEvent {
    Hello,
    Message(MessageEvent),
    Error { error: RtmErrorBody },
    Goodbye,
    #[serde(other)]
    Unknown,
}
