use std::path::PathBuf;

use thiserror::Error;

pub mod config;
pub mod console;
pub mod markers;
pub mod reconcile;
pub mod records;
mod sync;

pub use config::{ConfigError, SyncConfig};
pub use console::{
    CommandEmitter, CommandSender, ConsoleCommand, DispatchError, DryRunCommandSender,
    ProcessCommandSender, RecordingCommandSender,
};
pub use markers::{load_marker_table, Marker, MarkerLoadError, MarkerTable};
pub use reconcile::{
    reconcile, Action, ReconcileConfig, ReconcileError, ReconcilePlan, ReconcileSummary,
};
pub use records::{
    list_map_files, load_map_records, reduce_to_canonical, CanonicalMapTable, MapCenter, MapFile,
    MapId, MapRecord, MapRecordError,
};
pub use sync::{run_sync, SyncError, SyncReport};

/// The positional inputs of one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    /// Server name understood by the dispatcher, e.g. `pve27`.
    pub server: String,
    /// World name; maps must show `minecraft:<world>` and markers must carry `world: <world>`.
    pub world: String,
    /// Directory holding `map_<n>.dat`, usually `<world>/data`.
    pub maps_dir: PathBuf,
    /// dynmap `markers.yml`.
    pub markers_file: PathBuf,
    pub marker_set: String,
}

#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error("\"{0}\" doesn't exist!")]
    MarkersFileMissing(PathBuf),
    #[error("\"{0}\" is not a directory!")]
    MapsDirMissing(PathBuf),
}

impl SyncRequest {
    /// Checked before anything is sent to the server.
    pub fn check_preconditions(&self) -> Result<(), PreconditionError> {
        if !self.markers_file.is_file() {
            return Err(PreconditionError::MarkersFileMissing(
                self.markers_file.clone(),
            ));
        }
        if !self.maps_dir.is_dir() {
            return Err(PreconditionError::MapsDirMissing(self.maps_dir.clone()));
        }
        Ok(())
    }
}
