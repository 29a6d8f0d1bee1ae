//! Slack Web API and RTM client.

mod client;
mod error;
mod receiver;
mod types;

pub use client::SlackClient;
pub use error::SlackError;
pub use receiver::{parse_frame, RtmReceiver};
pub use types::*;
