//! Command registry keyed by trigger token.

use crate::handler::CommandHandler;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A registered command.
#[derive(Clone)]
pub struct Command {
    pub trigger: String,
    /// Shown when the command is invoked with `help`.
    pub description: String,
    pub handler: Arc<dyn CommandHandler>,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("trigger", &self.trigger)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Registry of available commands.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
}

impl CommandRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, replacing any previous command with the same
    /// trigger. Returns the replaced command.
    pub fn register(
        &mut self,
        trigger: impl Into<String>,
        description: impl Into<String>,
        handler: Arc<dyn CommandHandler>,
    ) -> Option<Command> {
        let trigger = trigger.into();
        let command = Command {
            trigger: trigger.clone(),
            description: description.into(),
            handler,
        };

        let previous = self.commands.insert(trigger, command);
        if let Some(old) = &previous {
            debug!(trigger = %old.trigger, "Replacing registered command");
        }
        previous
    }

    /// Look up a command by trigger.
    pub fn get(&self, trigger: &str) -> Option<&Command> {
        self.commands.get(trigger)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All registered triggers, sorted.
    pub fn triggers(&self) -> Vec<&str> {
        let mut triggers: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        triggers.sort_unstable();
        triggers
    }
}
