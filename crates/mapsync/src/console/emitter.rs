use tracing::debug;

use crate::reconcile::Action;

use super::commands::ConsoleCommand;
use super::sender::{CommandSender, DispatchError};

/// Turns reconcile actions into console commands for one server, world and marker set.
pub struct CommandEmitter<S> {
    sender: S,
    server: String,
    world: String,
    marker_set: String,
    dispatched: usize,
}

impl<S: CommandSender> CommandEmitter<S> {
    pub fn new(
        sender: S,
        server: impl Into<String>,
        world: impl Into<String>,
        marker_set: impl Into<String>,
    ) -> Self {
        Self {
            sender,
            server: server.into(),
            world: world.into(),
            marker_set: marker_set.into(),
            dispatched: 0,
        }
    }

    /// Asks the server to write pending map data to disk.
    pub fn request_save(&mut self) -> Result<(), DispatchError> {
        self.dispatch(&ConsoleCommand::SaveAll)
    }

    pub fn emit(&mut self, action: &Action) -> Result<(), DispatchError> {
        let command = ConsoleCommand::from_action(action, &self.marker_set, &self.world);
        self.dispatch(&command)
    }

    /// Stops at the first failure; commands already sent stay applied.
    pub fn emit_all(&mut self, actions: &[Action]) -> Result<(), DispatchError> {
        for action in actions {
            self.emit(action)?;
        }
        Ok(())
    }

    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    pub fn into_sender(self) -> S {
        self.sender
    }

    fn dispatch(&mut self, command: &ConsoleCommand) -> Result<(), DispatchError> {
        let rendered = command.to_string();
        self.sender.send(&self.server, &rendered)?;
        self.dispatched += 1;
        debug!(server = %self.server, command = %rendered, "console_command_dispatched");
        Ok(())
    }
}
