mod loader;
mod types;

pub use loader::load_marker_table;
pub use types::{Marker, MarkerLoadError, MarkerTable};
