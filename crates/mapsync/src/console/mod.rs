mod commands;
mod emitter;
mod sender;

pub use commands::{ConsoleCommand, MARKER_ICON};
pub use emitter::CommandEmitter;
pub use sender::{
    CommandSender, DispatchError, DryRunCommandSender, ProcessCommandSender,
    RecordingCommandSender, DEFAULT_DISPATCHER,
};
