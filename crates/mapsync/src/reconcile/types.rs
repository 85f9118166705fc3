use std::fmt;

use thiserror::Error;

pub const DEFAULT_MARKER_Y: i64 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// Height given to every created marker; map items carry no usable Y.
    pub marker_y: i64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            marker_y: DEFAULT_MARKER_Y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Delete { id: String },
    Add { id: String, x: i64, y: i64, z: i64 },
}

impl Action {
    pub fn id(&self) -> &str {
        match self {
            Action::Delete { id } | Action::Add { id, .. } => id,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Delete { id } => write!(f, "delete {id}"),
            Action::Add { id, x, y, z } => write!(f, "add {id} at {x},{y},{z}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Markers whose map no longer exists.
    pub pruned: usize,
    /// Maps that had no marker yet.
    pub added: usize,
    /// Markers recreated at a new position.
    pub moved: usize,
    pub unchanged: usize,
}

impl ReconcileSummary {
    pub fn status_label(&self) -> &'static str {
        if self.pruned + self.added + self.moved > 0 {
            "converging"
        } else {
            "in_sync"
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub actions: Vec<Action>,
    pub summary: ReconcileSummary,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn render_human_readable(&self) -> String {
        let mut output = format!(
            "pruned={} added={} moved={} unchanged={} status={}",
            self.summary.pruned,
            self.summary.added,
            self.summary.moved,
            self.summary.unchanged,
            self.summary.status_label()
        );
        for action in &self.actions {
            output.push('\n');
            output.push_str(&action.to_string());
        }
        output
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("marker {id} received conflicting actions: {sequence}")]
    ConflictingActions { id: String, sequence: String },
}
