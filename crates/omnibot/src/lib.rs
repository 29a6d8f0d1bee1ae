//! Omnibot: a Slack chat bot answering `?` commands.
//!
//! The binary wires configuration and logging to a [`slackbot::Bot`]; this
//! library holds the pieces it wires together so they can be tested.

pub mod commands;
pub mod config;
pub mod error;
