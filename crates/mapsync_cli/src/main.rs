use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use mapsync::{run_sync, CommandSender, SyncConfig, SyncRequest};

mod bootstrap;

const FAILURE_EXIT: u8 = 1;

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(FAILURE_EXIT)
        }
    }
}

fn run_cli() -> Result<(), String> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    let request = parse_request(&args).ok_or_else(usage_text)?;

    let wiring = bootstrap::build_app().map_err(|error| format!("ERROR: {error}"))?;
    sync_request(&request, &wiring.config, wiring.sender)
}

fn sync_request<S: CommandSender>(
    request: &SyncRequest,
    config: &SyncConfig,
    sender: S,
) -> Result<(), String> {
    run_sync(request, config, sender)
        .map(|_| ())
        .map_err(|error| format!("ERROR: {error}"))
}

/// `<server> <world> <maps-dir> <markers-file> <marker-set>`, nothing more or less.
fn parse_request(args: &[String]) -> Option<SyncRequest> {
    let [server, world, maps_dir, markers_file, marker_set] = args else {
        return None;
    };
    Some(SyncRequest {
        server: server.clone(),
        world: world.clone(),
        maps_dir: PathBuf::from(maps_dir),
        markers_file: PathBuf::from(markers_file),
        marker_set: marker_set.clone(),
    })
}

fn usage_text() -> String {
    [
        "Usage: mapsync <server> <world> <maps-dir> <markers-file> <marker-set>",
        "",
        "Keeps one dynmap marker per Minecraft map location in <world>, named after the",
        "newest map number drawn there. Markers are changed through console commands",
        "sent with \"mark2 send -n <server>\".",
        "",
        "  <maps-dir>      directory holding map_<n>.dat, e.g. /servers/pve/worlds/world/data",
        "  <markers-file>  dynmap markers file, e.g. /servers/pve/plugins/dynmap/markers.yml",
        "  <marker-set>    marker set to update, usually \"markers\"",
        "",
        "Environment:",
        "  MAPSYNC_DISPATCHER  console relay executable (default mark2)",
        "  MAPSYNC_SETTLE_MS   wait after save-all before reading maps (default 5000)",
        "  MAPSYNC_MARKER_Y    Y coordinate of created markers (default 64)",
        "  MAPSYNC_DRY_RUN     1 to log commands instead of sending them",
        "  RUST_LOG            log filter (default info)",
    ]
    .join("\n")
}
