use std::fmt;

use crate::reconcile::Action;

/// Icon given to every marker created for a map.
pub const MARKER_ICON: &str = "pin";

/// Server console commands issued during a sync, rendered without the leading `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    SaveAll,
    DeleteMarker {
        id: String,
    },
    AddMarker {
        id: String,
        marker_set: String,
        world: String,
        x: i64,
        y: i64,
        z: i64,
    },
}

impl ConsoleCommand {
    pub fn from_action(action: &Action, marker_set: &str, world: &str) -> Self {
        match action {
            Action::Delete { id } => ConsoleCommand::DeleteMarker { id: id.clone() },
            Action::Add { id, x, y, z } => ConsoleCommand::AddMarker {
                id: id.clone(),
                marker_set: marker_set.to_string(),
                world: world.to_string(),
                x: *x,
                y: *y,
                z: *z,
            },
        }
    }
}

impl fmt::Display for ConsoleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleCommand::SaveAll => f.write_str("save-all"),
            ConsoleCommand::DeleteMarker { id } => write!(f, "dmarker delete id:{id}"),
            // The label is the id; that is how managed markers are recognised on the next run.
            ConsoleCommand::AddMarker {
                id,
                marker_set,
                world,
                x,
                y,
                z,
            } => write!(
                f,
                "dmarker add id:{id} {id} icon:{MARKER_ICON} set:{marker_set} x:{x} y:{y} z:{z} world:{world}"
            ),
        }
    }
}
