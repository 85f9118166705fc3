use std::thread;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::console::{CommandEmitter, CommandSender, DispatchError};
use crate::markers::{load_marker_table, MarkerLoadError};
use crate::reconcile::{reconcile, ReconcileError, ReconcileSummary};
use crate::records::{load_map_records, reduce_to_canonical, MapRecordError};
use crate::{PreconditionError, SyncRequest};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error(transparent)]
    Records(#[from] MapRecordError),
    #[error(transparent)]
    Markers(#[from] MarkerLoadError),
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub map_files_scanned: usize,
    pub map_records_kept: usize,
    pub canonical_maps: usize,
    pub managed_markers: usize,
    pub plan: ReconcileSummary,
    /// Includes the initial `save-all`.
    pub commands_dispatched: usize,
}

/// One full reconcile run: flush, settle, load both sides, plan and dispatch.
///
/// Any error ends the run where it happens. Commands dispatched before the error are not
/// undone; the next run starts from whatever the server ended up with.
pub fn run_sync<S: CommandSender>(
    request: &SyncRequest,
    config: &SyncConfig,
    sender: S,
) -> Result<SyncReport, SyncError> {
    request.check_preconditions()?;

    let mut emitter = CommandEmitter::new(
        sender,
        request.server.as_str(),
        request.world.as_str(),
        request.marker_set.as_str(),
    );

    // Only a delay orders this read after the save; a slow save can still be missed.
    emitter.request_save()?;
    if !config.settle_delay.is_zero() {
        info!(
            settle_ms = config.settle_delay.as_millis() as u64,
            "waiting_for_server_save"
        );
        thread::sleep(config.settle_delay);
    }

    let loaded = load_map_records(&request.maps_dir, &request.world)?;
    let maps = reduce_to_canonical(&loaded.records);
    let superseded = loaded.records.len() - maps.len();
    if superseded > 0 {
        info!(superseded, "superseded_map_records_dropped");
    }

    let markers = load_marker_table(&request.markers_file, &request.marker_set, &request.world)?;

    let plan = reconcile(&maps, &markers, &config.reconcile)?;
    info!(
        pruned = plan.summary.pruned,
        added = plan.summary.added,
        moved = plan.summary.moved,
        unchanged = plan.summary.unchanged,
        status = plan.summary.status_label(),
        "reconcile_plan_ready"
    );
    debug!(plan = %plan.render_human_readable(), "reconcile_plan_detail");

    if let Err(error) = emitter.emit_all(&plan.actions) {
        warn!(
            dispatched = emitter.dispatched(),
            planned = plan.actions.len(),
            "dispatch_aborted_without_rollback"
        );
        return Err(error.into());
    }

    let report = SyncReport {
        map_files_scanned: loaded.files_scanned,
        map_records_kept: loaded.records.len(),
        canonical_maps: maps.len(),
        managed_markers: markers.len(),
        plan: plan.summary,
        commands_dispatched: emitter.dispatched(),
    };
    info!(
        server = %request.server,
        world = %request.world,
        marker_set = %request.marker_set,
        map_files_scanned = report.map_files_scanned,
        canonical_maps = report.canonical_maps,
        managed_markers = report.managed_markers,
        commands_dispatched = report.commands_dispatched,
        "sync_summary"
    );
    Ok(report)
}
