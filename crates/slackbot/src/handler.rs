//! Command handler contract.

use crate::error::BotResult;
use crate::reply::ReplySink;
use async_trait::async_trait;

/// A matched command, resolved against the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// The trigger token that selected the command (e.g. "?weather").
    pub trigger: String,
    pub channel_id: String,
    /// Empty when the channel is not in the directory.
    pub channel_name: String,
    pub user_id: String,
    /// Empty when the user is not in the directory.
    pub user_name: String,
    /// Tokens after the trigger. `None` when nothing follows it, never an
    /// empty list.
    pub args: Option<Vec<String>>,
}

impl Invocation {
    /// The arguments as a slice, if any were given.
    pub fn args(&self) -> Option<&[String]> {
        self.args.as_deref()
    }

    /// The first argument, if any.
    pub fn first_arg(&self) -> Option<&str> {
        self.args().and_then(|a| a.first()).map(String::as_str)
    }
}

/// A command implementation.
///
/// Handlers validate their own arguments, run their own I/O with their own
/// timeouts, and turn every local failure into a reply. Only reply delivery
/// errors are returned.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, reply: &dyn ReplySink, invocation: &Invocation) -> BotResult<()>;
}
