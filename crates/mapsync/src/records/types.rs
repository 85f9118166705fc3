use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::nbt::NbtError;

/// Map item number, taken from the `map_<n>.dat` filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MapId(pub u64);

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MapCenter {
    pub x: i64,
    pub z: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapFile {
    pub path: PathBuf,
    pub id: MapId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapRecord {
    pub id: MapId,
    pub world: String,
    pub scale: i64,
    pub center: MapCenter,
}

#[derive(Debug, Error)]
pub enum MapRecordError {
    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read directory entry in {path}: {source}")]
    ReadDirEntry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read map file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("map file {path} is not valid NBT: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: NbtError,
    },
    #[error("map file {path} is missing field {field}")]
    MissingField { path: PathBuf, field: &'static str },
}
