mod planner;
mod types;

pub use planner::reconcile;
pub use types::{
    Action, ReconcileConfig, ReconcileError, ReconcilePlan, ReconcileSummary, DEFAULT_MARKER_Y,
};
