//! The event loop.

use crate::directory::Directory;
use crate::error::{BotError, BotResult};
use crate::gateway::Gateway;
use crate::handler::CommandHandler;
use crate::registry::CommandRegistry;
use crate::reply::ReplySink;
use crate::router::{MessageRouter, Routed};
use slack_client::RtmEvent;
use std::sync::Arc;
use tokio_stream::StreamExt;
use tracing::{debug, error, info, warn};

/// A chat bot: a gateway plus the commands it answers.
///
/// Commands are registered before [`Bot::run`]; `run` consumes the bot, so
/// the registry cannot change once events are flowing.
pub struct Bot<G> {
    gateway: Arc<G>,
    registry: CommandRegistry,
}

impl<G: Gateway> Bot<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            registry: CommandRegistry::new(),
        }
    }

    /// Register a command. A second registration for the same trigger
    /// replaces the first.
    pub fn add_command(
        &mut self,
        trigger: impl Into<String>,
        description: impl Into<String>,
        handler: Arc<dyn CommandHandler>,
    ) -> &mut Self {
        self.registry.register(trigger, description, handler);
        self
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Connect, load the directory, then dispatch events until the
    /// connection ends.
    ///
    /// Each message is routed on its own task, so a slow handler never holds
    /// up the stream. There is no bound on in-flight tasks. Only returns on
    /// failure: a directory load error, or [`BotError::ConnectionClosed`]
    /// when the stream ends.
    pub async fn run(self) -> BotResult<()> {
        let mut events = self.gateway.connect().await?;
        let directory = Directory::load(self.gateway.as_ref()).await?;

        info!(commands = ?self.registry.triggers(), "Listening for commands");

        let sink: Arc<dyn ReplySink> = self.gateway.clone();
        let router = Arc::new(MessageRouter::new(self.registry, directory, sink));

        while let Some(event) = events.next().await {
            match event {
                Ok(RtmEvent::Message(message)) => {
                    let router = router.clone();
                    tokio::spawn(async move {
                        match router.route(&message).await {
                            Ok(Routed::Ignored) => {}
                            Ok(routed) => {
                                debug!(?routed, channel = %message.channel, "Message handled")
                            }
                            Err(e) => error!(channel = %message.channel, "Dispatch failed: {}", e),
                        }
                    });
                }
                Ok(RtmEvent::Error { error }) => {
                    warn!(code = error.code, "RTM error: {}", error.msg);
                }
                Ok(RtmEvent::Hello) => info!("Gateway said hello"),
                Ok(RtmEvent::Goodbye) => warn!("Gateway said goodbye; connection will close"),
                Ok(RtmEvent::Unknown) => {}
                Err(e) => warn!("Event stream error: {}", e),
            }
        }

        error!("Event stream ended");
        Err(BotError::ConnectionClosed)
    }
}
