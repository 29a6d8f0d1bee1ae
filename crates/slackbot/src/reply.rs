//! Outbound replies.

use crate::error::{BotError, BotResult};
use async_trait::async_trait;
use slack_client::SlackClient;

/// Capability to post a message back into a channel.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn reply(&self, channel_id: &str, text: &str) -> BotResult<()>;
}

#[async_trait]
impl ReplySink for SlackClient {
    async fn reply(&self, channel_id: &str, text: &str) -> BotResult<()> {
        self.post_message(channel_id, text)
            .await
            .map_err(|e| BotError::Reply {
                channel: channel_id.to_string(),
                reason: e.to_string(),
            })
    }
}
