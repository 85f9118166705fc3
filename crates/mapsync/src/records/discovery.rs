use std::fs;
use std::path::Path;

use tracing::warn;

use super::types::{MapFile, MapId, MapRecordError};

const MAP_FILE_PREFIX: &str = "map_";
const MAP_FILE_SUFFIX: &str = ".dat";

/// Lists `map_<n>.dat` files directly under `maps_dir`, sorted by file name.
pub fn list_map_files(maps_dir: &Path) -> Result<Vec<MapFile>, MapRecordError> {
    let entries = fs::read_dir(maps_dir).map_err(|source| MapRecordError::ReadDir {
        path: maps_dir.to_path_buf(),
        source,
    })?;

    let mut named = Vec::<(String, MapFile)>::new();
    for entry in entries {
        let entry = entry.map_err(|source| MapRecordError::ReadDirEntry {
            path: maps_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let Some(middle) = file_name
            .strip_prefix(MAP_FILE_PREFIX)
            .and_then(|rest| rest.strip_suffix(MAP_FILE_SUFFIX))
        else {
            continue;
        };
        match parse_map_id(middle) {
            Some(id) => named.push((file_name.to_string(), MapFile { path, id })),
            None => warn!(
                path = %path.display(),
                "map_file_name_not_numeric_skipped"
            ),
        }
    }

    named.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(named.into_iter().map(|(_, file)| file).collect())
}

fn parse_map_id(digits: &str) -> Option<MapId> {
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u64>().ok().map(MapId)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn lists_only_numeric_map_files_in_name_order() {
        let temp = TempDir::new().expect("tempdir");
        let dir = temp.path();
        for name in [
            "map_12.dat",
            "map_7.dat",
            "map_abc.dat",
            "map_.dat",
            "idcounts.dat",
            "map_3.dat.bak",
            "raids.dat",
        ] {
            fs::write(dir.join(name), b"").expect("write");
        }
        fs::create_dir_all(dir.join("map_99.dat")).expect("dir named like a map");

        let files = list_map_files(dir).expect("list");
        let ids = files.iter().map(|file| file.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![MapId(12), MapId(7)]);
        assert_eq!(files[0].path, dir.join("map_12.dat"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = TempDir::new().expect("tempdir");
        let error = list_map_files(&temp.path().join("nope")).expect_err("error");
        assert!(matches!(error, MapRecordError::ReadDir { .. }));
    }

    #[test]
    fn map_id_parsing_rejects_signs_and_spaces() {
        assert_eq!(parse_map_id("0"), Some(MapId(0)));
        assert_eq!(parse_map_id("0042"), Some(MapId(42)));
        assert_eq!(parse_map_id("+1"), None);
        assert_eq!(parse_map_id("-1"), None);
        assert_eq!(parse_map_id(" 1"), None);
    }
}
