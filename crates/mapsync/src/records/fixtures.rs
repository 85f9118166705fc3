use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::nbt::writer::{encode_document, gzip};
use super::nbt::NbtValue;

/// Writes a gzip-compressed `map_<id>.dat` shaped like a vanilla map save.
pub(crate) fn write_map_file(dir: &Path, id: u64, dimension: &str, scale: i8, x: i32, z: i32) {
    let mut data = BTreeMap::new();
    data.insert(
        "dimension".to_string(),
        NbtValue::String(dimension.to_string()),
    );
    data.insert("scale".to_string(), NbtValue::Byte(scale));
    data.insert("xCenter".to_string(), NbtValue::Int(x));
    data.insert("zCenter".to_string(), NbtValue::Int(z));
    data.insert("locked".to_string(), NbtValue::Byte(0));
    data.insert("trackingPosition".to_string(), NbtValue::Byte(1));
    data.insert("colors".to_string(), NbtValue::ByteArray(vec![0; 16]));
    data.insert("banners".to_string(), NbtValue::List(Vec::new()));

    let mut root = BTreeMap::new();
    root.insert("data".to_string(), NbtValue::Compound(data));
    root.insert("DataVersion".to_string(), NbtValue::Int(3700));

    let raw = encode_document(&NbtValue::Compound(root));
    write_raw_map_file(dir, id, &gzip(&raw));
}

pub(crate) fn write_raw_map_file(dir: &Path, id: u64, bytes: &[u8]) {
    fs::create_dir_all(dir).expect("maps dir");
    fs::write(dir.join(format!("map_{id}.dat")), bytes).expect("write map file");
}
