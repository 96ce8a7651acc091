//! Command subsystem double.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use modswap_kernel::{CommandError, CommandHandler, CommandHost, CommandSink};

/// In-memory command table recording every message delivered to the user.
#[derive(Default)]
pub struct MockCommands {
    handlers: HashMap<String, CommandHandler>,
    messages: Vec<String>,
}

impl MockCommands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far, oldest first.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn has(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.handlers.get(name).cloned()
    }

    pub fn command_count(&self) -> usize {
        self.handlers.len()
    }
}

impl CommandSink for MockCommands {
    fn add(&mut self, name: &str, handler: CommandHandler) -> Result<(), CommandError> {
        if self.handlers.contains_key(name) {
            return Err(CommandError::Duplicate(name.to_string()));
        }
        self.handlers.insert(name.to_string(), handler);
        Ok(())
    }

    fn remove(&mut self, name: &str) -> bool {
        self.handlers.remove(name).is_some()
    }
}

impl CommandHost for MockCommands {
    fn message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }
}

/// Invoke a registered command the way the host would: look the handler up,
/// release the table, then run it with the given arguments.
pub fn run_command(commands: &Arc<Mutex<MockCommands>>, name: &str, args: &[&str]) {
    let handler = commands
        .lock()
        .handler(name)
        .unwrap_or_else(|| panic!("command '{name}' is not registered"));
    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
    handler(&args);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_add_rejected() {
        let mut commands = MockCommands::new();
        commands.add("say", Arc::new(|_| {})).unwrap();

        let err = commands.add("say", Arc::new(|_| {})).unwrap_err();
        assert_eq!(err, CommandError::Duplicate("say".into()));
        assert_eq!(commands.command_count(), 1);
    }

    #[test]
    fn test_remove() {
        let mut commands = MockCommands::new();
        commands.add("say", Arc::new(|_| {})).unwrap();

        assert!(commands.remove("say"));
        assert!(!commands.remove("say"));
        assert!(!commands.has("say"));
    }
}
