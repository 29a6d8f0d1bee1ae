//! Command-dispatch core for chat bots.
//!
//! A [`Bot`] holds a gateway connection and a table of commands keyed by
//! trigger token. Each inbound message whose first word is a registered
//! trigger is handed to that command's [`CommandHandler`], which replies
//! through a [`ReplySink`].

mod bot;
mod directory;
mod error;
mod gateway;
mod handler;
mod registry;
mod reply;
mod router;

pub use bot::Bot;
pub use directory::{Directory, DirectorySource};
pub use error::{BotError, BotResult};
pub use gateway::{EventSource, EventStream, Gateway};
pub use handler::{CommandHandler, Invocation};
pub use registry::{Command, CommandRegistry};
pub use reply::ReplySink;
pub use router::{parse_command, MessageRouter, Routed, HELP};
