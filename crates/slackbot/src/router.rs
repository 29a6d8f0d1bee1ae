//! Message routing: parse, resolve, look up, dispatch.

use crate::directory::Directory;
use crate::error::BotResult;
use crate::handler::Invocation;
use crate::registry::CommandRegistry;
use crate::reply::ReplySink;
use slack_client::MessageEvent;
use std::sync::Arc;
use tracing::{debug, info};

/// Argument that asks for a command's description instead of running it.
pub const HELP: &str = "help";

/// What the router did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// Not a command.
    Ignored,
    /// Replied with the command's description.
    Help,
    /// Handed to the command's handler.
    Dispatched,
}

/// Split a message into its trigger candidate and arguments.
///
/// Returns `None` for empty or whitespace-only text. Arguments are `None`
/// when nothing follows the trigger.
pub fn parse_command(text: &str) -> Option<(&str, Option<Vec<String>>)> {
    let mut tokens = text.split_whitespace();
    let trigger = tokens.next()?;
    let args: Vec<String> = tokens.map(str::to_string).collect();

    Some((trigger, (!args.is_empty()).then_some(args)))
}

/// Routes inbound messages to registered commands.
///
/// Owns the registry and directory; both are frozen once the router exists.
pub struct MessageRouter {
    registry: CommandRegistry,
    directory: Directory,
    reply: Arc<dyn ReplySink>,
}

impl MessageRouter {
    pub fn new(registry: CommandRegistry, directory: Directory, reply: Arc<dyn ReplySink>) -> Self {
        Self {
            registry,
            directory,
            reply,
        }
    }

    /// Route one message.
    pub async fn route(&self, message: &MessageEvent) -> BotResult<Routed> {
        let Some((trigger, args)) = parse_command(&message.text) else {
            return Ok(Routed::Ignored);
        };

        let Some(command) = self.registry.get(trigger) else {
            debug!("Ignoring non-command message in {}", message.channel);
            return Ok(Routed::Ignored);
        };

        let invocation = Invocation {
            trigger: command.trigger.clone(),
            channel_id: message.channel.clone(),
            channel_name: self.directory.channel_name(&message.channel).to_string(),
            user_id: message.user.clone(),
            user_name: self.directory.user_name(&message.user).to_string(),
            args,
        };

        info!(
            trigger = %invocation.trigger,
            channel = %invocation.channel_name,
            user = %invocation.user_name,
            "Command invoked"
        );

        if invocation.first_arg() == Some(HELP) {
            self.reply
                .reply(&invocation.channel_id, &command.description)
                .await?;
            return Ok(Routed::Help);
        }

        command
            .handler
            .handle(self.reply.as_ref(), &invocation)
            .await?;
        Ok(Routed::Dispatched)
    }
}
