//! Inbound event source.

use crate::directory::DirectorySource;
use crate::error::{BotError, BotResult};
use crate::reply::ReplySink;
use async_trait::async_trait;
use futures::stream::BoxStream;
use slack_client::{RtmEvent, RtmReceiver, SlackClient, SlackError};
use tracing::info;

/// Stream of events from one gateway connection.
pub type EventStream = BoxStream<'static, Result<RtmEvent, SlackError>>;

/// Opens the persistent connection to the messaging gateway.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn connect(&self) -> BotResult<EventStream>;
}

#[async_trait]
impl EventSource for SlackClient {
    async fn connect(&self) -> BotResult<EventStream> {
        let rtm = self.rtm_connect().await.map_err(BotError::Connect)?;
        info!(bot = %rtm.identity.name, id = %rtm.identity.id, "RTM session started");

        let receiver = RtmReceiver::connect(&rtm.url)
            .await
            .map_err(BotError::Connect)?;
        Ok(Box::pin(receiver.stream()))
    }
}

/// Everything the event loop needs from the gateway.
pub trait Gateway: EventSource + DirectorySource + ReplySink + 'static {}

impl<T> Gateway for T where T: EventSource + DirectorySource + ReplySink + 'static {}
