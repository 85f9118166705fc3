use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use super::types::{Marker, MarkerLoadError, MarkerTable};

// Sets and markers stay untyped until they are known to be ours; other plugins'
// entries are never deserialized.
#[derive(Debug, Deserialize)]
struct MarkerDocument {
    #[serde(default)]
    sets: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct MarkerSetDocument {
    #[serde(default)]
    markers: Option<Mapping>,
}

/// Reads `markers_path` and returns the managed markers of `marker_set` in `world`.
pub fn load_marker_table(
    markers_path: &Path,
    marker_set: &str,
    world: &str,
) -> Result<MarkerTable, MarkerLoadError> {
    let raw = fs::read_to_string(markers_path).map_err(|source| MarkerLoadError::Open {
        path: markers_path.to_path_buf(),
        source,
    })?;
    let table = parse_marker_table(&raw, markers_path, marker_set, world)?;
    info!(
        markers_file = %markers_path.display(),
        marker_set,
        world,
        managed_markers = table.len(),
        "marker_table_loaded"
    );
    Ok(table)
}

pub(crate) fn parse_marker_table(
    raw: &str,
    markers_path: &Path,
    marker_set: &str,
    world: &str,
) -> Result<MarkerTable, MarkerLoadError> {
    if raw.trim().is_empty() {
        return Err(MarkerLoadError::MissingSets {
            path: markers_path.to_path_buf(),
        });
    }
    let deserializer = serde_yaml::Deserializer::from_str(raw);
    let document: Option<MarkerDocument> =
        serde_path_to_error::deserialize(deserializer).map_err(|error| {
            MarkerLoadError::Parse {
                path: markers_path.to_path_buf(),
                yaml_path: error.path().to_string(),
                source: error.into_inner(),
            }
        })?;

    let mut sets = document
        .and_then(|document| document.sets)
        .ok_or_else(|| MarkerLoadError::MissingSets {
            path: markers_path.to_path_buf(),
        })?;
    let set_value = sets
        .remove(marker_set)
        .ok_or_else(|| MarkerLoadError::MissingMarkerSet {
            path: markers_path.to_path_buf(),
            marker_set: marker_set.to_string(),
        })?;
    let set: Option<MarkerSetDocument> =
        serde_path_to_error::deserialize(set_value).map_err(|error| {
            let inner = error.path().to_string();
            let yaml_path = if inner == "." {
                format!("sets.{marker_set}")
            } else {
                format!("sets.{marker_set}.{inner}")
            };
            MarkerLoadError::Parse {
                path: markers_path.to_path_buf(),
                yaml_path,
                source: error.into_inner(),
            }
        })?;

    let mut managed = Vec::<Marker>::new();
    let entries = set.and_then(|set| set.markers).unwrap_or_default();
    for (key, entry) in &entries {
        let Some(id) = scalar_text(key) else {
            debug!("marker_with_non_scalar_id_ignored");
            continue;
        };
        let same_world = entry
            .get("world")
            .and_then(scalar_text)
            .is_some_and(|marker_world| marker_world == world);
        let labelled_by_id = entry
            .get("label")
            .and_then(scalar_text)
            .is_some_and(|label| label == id);
        if !same_world || !labelled_by_id {
            debug!(marker_id = %id, "marker_not_managed_ignored");
            continue;
        }

        let x = coordinate(markers_path, &id, entry, "x")?;
        let y = coordinate(markers_path, &id, entry, "y")?;
        let z = coordinate(markers_path, &id, entry, "z")?;
        managed.push(Marker {
            label: id.clone(),
            id,
            world: world.to_string(),
            x,
            y,
            z,
        });
    }

    Ok(managed.into_iter().collect())
}

/// A YAML scalar as text, so `5` and `'5'` name the same marker.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Reads one axis of a managed marker; dynmap stores doubles, truncated here.
fn coordinate(
    markers_path: &Path,
    marker_id: &str,
    entry: &Value,
    axis: &'static str,
) -> Result<i64, MarkerLoadError> {
    match entry.get(axis) {
        None | Some(Value::Null) => Err(MarkerLoadError::MissingCoordinate {
            path: markers_path.to_path_buf(),
            marker_id: marker_id.to_string(),
            axis,
        }),
        Some(value) => value
            .as_f64()
            .map(|value| value.trunc() as i64)
            .ok_or_else(|| MarkerLoadError::InvalidCoordinate {
                path: markers_path.to_path_buf(),
                marker_id: marker_id.to_string(),
                axis,
            }),
    }
}
