mod discovery;
#[cfg(test)]
pub(crate) mod fixtures;
mod loader;
mod nbt;
mod reducer;
mod types;

pub use discovery::list_map_files;
pub use loader::{load_map_records, read_map_record, LoadedMaps};
pub use nbt::{decode_document, NbtError, NbtValue};
pub use reducer::{reduce_to_canonical, CanonicalMapTable};
pub use types::{MapCenter, MapFile, MapId, MapRecord, MapRecordError};
