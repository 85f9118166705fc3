use std::fs;
use std::path::Path;

use tracing::{debug, info};

use super::discovery::list_map_files;
use super::nbt::{decode_document, NbtValue};
use super::types::{MapCenter, MapFile, MapRecord, MapRecordError};

const DIMENSION_NAMESPACE: &str = "minecraft:";

#[derive(Debug, Clone, Default)]
pub struct LoadedMaps {
    pub files_scanned: usize,
    pub records: Vec<MapRecord>,
}

/// Loads every full-detail (scale 0) map in `maps_dir` that shows `world`.
pub fn load_map_records(maps_dir: &Path, world: &str) -> Result<LoadedMaps, MapRecordError> {
    let files = list_map_files(maps_dir)?;
    let dimension = format!("{DIMENSION_NAMESPACE}{world}");

    let mut records = Vec::<MapRecord>::new();
    for file in &files {
        match read_map_record(file, &dimension)? {
            Some(record) if record.scale == 0 => {
                debug!(
                    map_id = %record.id,
                    x = record.center.x,
                    z = record.center.z,
                    "map_record_loaded"
                );
                records.push(record);
            }
            Some(record) => debug!(
                map_id = %record.id,
                scale = record.scale,
                "map_record_zoomed_out_skipped"
            ),
            None => {}
        }
    }

    info!(
        maps_dir = %maps_dir.display(),
        world,
        files_scanned = files.len(),
        records_kept = records.len(),
        "map_records_loaded"
    );
    Ok(LoadedMaps {
        files_scanned: files.len(),
        records,
    })
}

/// Decodes one map file. Returns `None` when the map shows a different dimension;
/// the remaining fields are only required for maps of the requested dimension.
pub fn read_map_record(
    file: &MapFile,
    dimension: &str,
) -> Result<Option<MapRecord>, MapRecordError> {
    let bytes = fs::read(&file.path).map_err(|source| MapRecordError::ReadFile {
        path: file.path.clone(),
        source,
    })?;
    let root = decode_document(&bytes).map_err(|source| MapRecordError::Decode {
        path: file.path.clone(),
        source,
    })?;
    let data = root
        .get("data")
        .filter(|data| data.as_compound().is_some())
        .ok_or_else(|| missing(file, "data"))?;

    let shown = data
        .get("dimension")
        .ok_or_else(|| missing(file, "data.dimension"))?;
    // Pre-1.16 saves store the dimension as a number; those never match a named world.
    if shown.as_str() != Some(dimension) {
        return Ok(None);
    }

    let scale = numeric_field(file, data, "scale", "data.scale")?;
    let x = numeric_field(file, data, "xCenter", "data.xCenter")?;
    let z = numeric_field(file, data, "zCenter", "data.zCenter")?;
    let world = dimension
        .strip_prefix(DIMENSION_NAMESPACE)
        .unwrap_or(dimension)
        .to_string();

    Ok(Some(MapRecord {
        id: file.id,
        world,
        scale,
        center: MapCenter { x, z },
    }))
}

fn numeric_field(
    file: &MapFile,
    data: &NbtValue,
    key: &str,
    field: &'static str,
) -> Result<i64, MapRecordError> {
    data.get(key)
        .and_then(NbtValue::as_i64)
        .ok_or_else(|| missing(file, field))
}

fn missing(file: &MapFile, field: &'static str) -> MapRecordError {
    MapRecordError::MissingField {
        path: file.path.clone(),
        field,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use tempfile::TempDir;

    use super::super::fixtures::{write_map_file, write_raw_map_file};
    use super::super::nbt::writer::encode_document;
    use super::super::types::MapId;
    use super::*;

    #[test]
    fn keeps_only_scale_zero_maps_of_the_requested_world() {
        let temp = TempDir::new().expect("tempdir");
        let dir = temp.path();
        write_map_file(dir, 1, "minecraft:overworld", 0, 128, -256);
        write_map_file(dir, 2, "minecraft:overworld", 2, 512, 512);
        write_map_file(dir, 3, "minecraft:the_nether", 0, 0, 0);
        write_map_file(dir, 10, "minecraft:overworld", 0, -64, 64);

        let loaded = load_map_records(dir, "overworld").expect("load");
        assert_eq!(loaded.files_scanned, 4);
        assert_eq!(
            loaded.records,
            vec![
                MapRecord {
                    id: MapId(1),
                    world: "overworld".to_string(),
                    scale: 0,
                    center: MapCenter { x: 128, z: -256 },
                },
                MapRecord {
                    id: MapId(10),
                    world: "overworld".to_string(),
                    scale: 0,
                    center: MapCenter { x: -64, z: 64 },
                },
            ]
        );
    }

    #[test]
    fn legacy_numeric_dimension_never_matches() {
        let temp = TempDir::new().expect("tempdir");
        let mut data = BTreeMap::new();
        data.insert("dimension".to_string(), NbtValue::Byte(0));
        data.insert("scale".to_string(), NbtValue::Byte(0));
        data.insert("xCenter".to_string(), NbtValue::Int(0));
        data.insert("zCenter".to_string(), NbtValue::Int(0));
        let mut root = BTreeMap::new();
        root.insert("data".to_string(), NbtValue::Compound(data));
        write_raw_map_file(
            temp.path(),
            4,
            &encode_document(&NbtValue::Compound(root)),
        );

        let loaded = load_map_records(temp.path(), "overworld").expect("load");
        assert_eq!(loaded.files_scanned, 1);
        assert!(loaded.records.is_empty());
    }

    #[test]
    fn missing_center_on_matching_map_is_fatal() {
        let temp = TempDir::new().expect("tempdir");
        let mut data = BTreeMap::new();
        data.insert(
            "dimension".to_string(),
            NbtValue::String("minecraft:overworld".to_string()),
        );
        data.insert("scale".to_string(), NbtValue::Byte(0));
        data.insert("xCenter".to_string(), NbtValue::Int(0));
        let mut root = BTreeMap::new();
        root.insert("data".to_string(), NbtValue::Compound(data));
        write_raw_map_file(
            temp.path(),
            5,
            &encode_document(&NbtValue::Compound(root)),
        );

        let error = load_map_records(temp.path(), "overworld").expect_err("error");
        assert!(matches!(
            error,
            MapRecordError::MissingField {
                field: "data.zCenter",
                ..
            }
        ));
    }

    #[test]
    fn garbage_map_file_is_fatal() {
        let temp = TempDir::new().expect("tempdir");
        write_map_file(temp.path(), 1, "minecraft:overworld", 0, 0, 0);
        write_raw_map_file(temp.path(), 2, b"definitely not nbt");

        let error = load_map_records(temp.path(), "overworld").expect_err("error");
        let MapRecordError::Decode { path, .. } = error else {
            panic!("expected decode error");
        };
        assert_eq!(path, temp.path().join("map_2.dat"));
    }
}
