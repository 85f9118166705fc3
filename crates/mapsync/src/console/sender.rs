use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_DISPATCHER: &str = "mark2";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to run '{dispatcher}' for command '{command}': {source}")]
    Spawn {
        dispatcher: String,
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Delivers one console command to a named server. Delivery is fire-and-forget:
/// an `Ok` only means the command was handed over.
pub trait CommandSender {
    fn send(&mut self, server: &str, command: &str) -> Result<(), DispatchError>;
}

/// Runs `<dispatcher> send -n <server> <command...>` and waits for it to exit.
#[derive(Debug, Clone)]
pub struct ProcessCommandSender {
    dispatcher: String,
}

impl ProcessCommandSender {
    pub fn new(dispatcher: impl Into<String>) -> Self {
        Self {
            dispatcher: dispatcher.into(),
        }
    }
}

impl Default for ProcessCommandSender {
    fn default() -> Self {
        Self::new(DEFAULT_DISPATCHER)
    }
}

impl CommandSender for ProcessCommandSender {
    fn send(&mut self, server: &str, command: &str) -> Result<(), DispatchError> {
        // The command travels as separate words, the way a shell would split it.
        let status = Command::new(&self.dispatcher)
            .arg("send")
            .arg("-n")
            .arg(server)
            .args(command.split_whitespace())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status()
            .map_err(|source| DispatchError::Spawn {
                dispatcher: self.dispatcher.clone(),
                command: command.to_string(),
                source,
            })?;
        if !status.success() {
            warn!(
                dispatcher = %self.dispatcher,
                server,
                command,
                status = %status,
                "dispatcher_exit_nonzero"
            );
        }
        Ok(())
    }
}

/// Logs commands instead of running them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunCommandSender;

impl CommandSender for DryRunCommandSender {
    fn send(&mut self, server: &str, command: &str) -> Result<(), DispatchError> {
        info!(server, command, "dry_run_command");
        Ok(())
    }
}

/// Keeps every command it is given, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingCommandSender {
    pub sent: Vec<(String, String)>,
}

impl RecordingCommandSender {
    pub fn commands(&self) -> Vec<&str> {
        self.sent
            .iter()
            .map(|(_, command)| command.as_str())
            .collect()
    }
}

impl CommandSender for RecordingCommandSender {
    fn send(&mut self, server: &str, command: &str) -> Result<(), DispatchError> {
        self.sent.push((server.to_string(), command.to_string()));
        Ok(())
    }
}

impl<S: CommandSender + ?Sized> CommandSender for &mut S {
    fn send(&mut self, server: &str, command: &str) -> Result<(), DispatchError> {
        (**self).send(server, command)
    }
}

impl<S: CommandSender + ?Sized> CommandSender for Box<S> {
    fn send(&mut self, server: &str, command: &str) -> Result<(), DispatchError> {
        (**self).send(server, command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sender_keeps_order_and_server() {
        let mut sender = RecordingCommandSender::default();
        sender.send("pve", "save-all").expect("send");
        sender.send("pve", "dmarker delete id:3").expect("send");
        assert_eq!(sender.commands(), vec!["save-all", "dmarker delete id:3"]);
        assert!(sender.sent.iter().all(|(server, _)| server == "pve"));
    }

    #[test]
    fn missing_dispatcher_is_a_dispatch_error() {
        let mut sender = ProcessCommandSender::new("/definitely/not/a/dispatcher");
        let error = sender.send("pve", "save-all").expect_err("spawn");
        let DispatchError::Spawn {
            dispatcher,
            command,
            ..
        } = error;
        assert_eq!(dispatcher, "/definitely/not/a/dispatcher");
        assert_eq!(command, "save-all");
    }

    #[cfg(unix)]
    #[test]
    fn dispatcher_exit_status_is_not_inspected() {
        ProcessCommandSender::new("true")
            .send("pve", "dmarker delete id:1")
            .expect("true");
        ProcessCommandSender::new("false")
            .send("pve", "dmarker delete id:1")
            .expect("false still counts as dispatched");
    }

    #[test]
    fn default_dispatcher_is_mark2() {
        assert_eq!(ProcessCommandSender::default().dispatcher, "mark2");
    }
}
