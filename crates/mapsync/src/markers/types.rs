use std::collections::btree_map;
use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

/// A dynmap point marker. Only markers whose label equals their id are managed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub id: String,
    pub world: String,
    pub label: String,
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Marker {
    pub fn position(&self) -> (i64, i64, i64) {
        (self.x, self.y, self.z)
    }
}

/// Managed markers of one world and one marker set, keyed by marker id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerTable {
    markers: BTreeMap<String, Marker>,
}

impl MarkerTable {
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Marker> {
        self.markers.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.markers.contains_key(id)
    }

    pub fn iter(&self) -> btree_map::Values<'_, String, Marker> {
        self.markers.values()
    }
}

impl FromIterator<Marker> for MarkerTable {
    fn from_iter<I: IntoIterator<Item = Marker>>(iter: I) -> Self {
        Self {
            markers: iter
                .into_iter()
                .map(|marker| (marker.id.clone(), marker))
                .collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum MarkerLoadError {
    #[error("cannot open markers file {path} to read: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("markers file {path} is not valid YAML at {yaml_path}: {source}")]
    Parse {
        path: PathBuf,
        yaml_path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{path} doesn't seem to be a markers file (no top-level 'sets')")]
    MissingSets { path: PathBuf },
    #[error("markers file {path} has no marker set '{marker_set}'")]
    MissingMarkerSet { path: PathBuf, marker_set: String },
    #[error("marker '{marker_id}' in {path} has no {axis} coordinate")]
    MissingCoordinate {
        path: PathBuf,
        marker_id: String,
        axis: &'static str,
    },
    #[error("marker '{marker_id}' in {path} has a non-numeric {axis} coordinate")]
    InvalidCoordinate {
        path: PathBuf,
        marker_id: String,
        axis: &'static str,
    },
}
