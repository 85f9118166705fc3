use std::collections::BTreeMap;
use std::io::{self, Read};

use flate2::read::GzDecoder;
use thiserror::Error;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const MAX_DEPTH: usize = 512;

const TAG_END: u8 = 0;
const TAG_BYTE: u8 = 1;
const TAG_SHORT: u8 = 2;
const TAG_INT: u8 = 3;
const TAG_LONG: u8 = 4;
const TAG_FLOAT: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_BYTE_ARRAY: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_LIST: u8 = 9;
const TAG_COMPOUND: u8 = 10;
const TAG_INT_ARRAY: u8 = 11;
const TAG_LONG_ARRAY: u8 = 12;

#[derive(Debug, Clone, PartialEq)]
pub enum NbtValue {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<NbtValue>),
    Compound(BTreeMap<String, NbtValue>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl NbtValue {
    pub fn get(&self, key: &str) -> Option<&NbtValue> {
        self.as_compound().and_then(|compound| compound.get(key))
    }

    pub fn as_compound(&self) -> Option<&BTreeMap<String, NbtValue>> {
        match self {
            NbtValue::Compound(compound) => Some(compound),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NbtValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// Any numeric tag as an integer; floating point values truncate toward zero.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            NbtValue::Byte(value) => Some(value.into()),
            NbtValue::Short(value) => Some(value.into()),
            NbtValue::Int(value) => Some(value.into()),
            NbtValue::Long(value) => Some(value),
            NbtValue::Float(value) => Some(value.trunc() as i64),
            NbtValue::Double(value) => Some(value.trunc() as i64),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum NbtError {
    #[error("gzip stream is corrupt: {0}")]
    Gzip(#[source] io::Error),
    #[error("unexpected end of data at byte {offset}")]
    UnexpectedEof { offset: usize },
    #[error("unknown tag type {tag} at byte {offset}")]
    UnknownTag { tag: u8, offset: usize },
    #[error("negative length {length} at byte {offset}")]
    NegativeLength { length: i32, offset: usize },
    #[error("root tag must be a compound, found type {tag}")]
    RootNotCompound { tag: u8 },
    #[error("nesting deeper than {MAX_DEPTH} levels")]
    TooDeep,
}

/// Decodes a whole NBT document, inflating it first when it carries a gzip header.
/// Returns the root compound; the root name is discarded.
pub fn decode_document(bytes: &[u8]) -> Result<NbtValue, NbtError> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut inflated = Vec::<u8>::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut inflated)
            .map_err(NbtError::Gzip)?;
        decode_uncompressed(&inflated)
    } else {
        decode_uncompressed(bytes)
    }
}

fn decode_uncompressed(bytes: &[u8]) -> Result<NbtValue, NbtError> {
    let mut cursor = 0usize;
    let tag = read_u8(bytes, &mut cursor)?;
    if tag != TAG_COMPOUND {
        return Err(NbtError::RootNotCompound { tag });
    }
    let _root_name = read_string(bytes, &mut cursor)?;
    read_payload(bytes, &mut cursor, tag, 0)
}

fn read_payload(
    bytes: &[u8],
    cursor: &mut usize,
    tag: u8,
    depth: usize,
) -> Result<NbtValue, NbtError> {
    if depth > MAX_DEPTH {
        return Err(NbtError::TooDeep);
    }
    let offset = *cursor;
    Ok(match tag {
        TAG_BYTE => NbtValue::Byte(read_u8(bytes, cursor)? as i8),
        TAG_SHORT => NbtValue::Short(i16::from_be_bytes(read_array(bytes, cursor)?)),
        TAG_INT => NbtValue::Int(read_i32(bytes, cursor)?),
        TAG_LONG => NbtValue::Long(read_i64(bytes, cursor)?),
        TAG_FLOAT => NbtValue::Float(f32::from_be_bytes(read_array(bytes, cursor)?)),
        TAG_DOUBLE => NbtValue::Double(f64::from_be_bytes(read_array(bytes, cursor)?)),
        TAG_BYTE_ARRAY => {
            let len = read_len(bytes, cursor)?;
            let raw = read_exact(bytes, cursor, len)?;
            NbtValue::ByteArray(raw.iter().map(|byte| *byte as i8).collect())
        }
        TAG_STRING => NbtValue::String(read_string(bytes, cursor)?),
        TAG_LIST => {
            let element_tag = read_u8(bytes, cursor)?;
            let len = read_len(bytes, cursor)?;
            let mut items = Vec::<NbtValue>::new();
            for _ in 0..len {
                items.push(read_payload(bytes, cursor, element_tag, depth + 1)?);
            }
            NbtValue::List(items)
        }
        TAG_COMPOUND => {
            let mut entries = BTreeMap::<String, NbtValue>::new();
            loop {
                let child_tag = read_u8(bytes, cursor)?;
                if child_tag == TAG_END {
                    break;
                }
                let name = read_string(bytes, cursor)?;
                let value = read_payload(bytes, cursor, child_tag, depth + 1)?;
                entries.insert(name, value);
            }
            NbtValue::Compound(entries)
        }
        TAG_INT_ARRAY => {
            let len = read_len(bytes, cursor)?;
            let mut values = Vec::<i32>::new();
            for _ in 0..len {
                values.push(read_i32(bytes, cursor)?);
            }
            NbtValue::IntArray(values)
        }
        TAG_LONG_ARRAY => {
            let len = read_len(bytes, cursor)?;
            let mut values = Vec::<i64>::new();
            for _ in 0..len {
                values.push(read_i64(bytes, cursor)?);
            }
            NbtValue::LongArray(values)
        }
        other => return Err(NbtError::UnknownTag { tag: other, offset }),
    })
}

fn read_string(bytes: &[u8], cursor: &mut usize) -> Result<String, NbtError> {
    let len = u16::from_be_bytes(read_array(bytes, cursor)?) as usize;
    let raw = read_exact(bytes, cursor, len)?;
    // Java modified UTF-8 only differs for NUL and supplementary characters.
    Ok(String::from_utf8_lossy(raw).into_owned())
}

fn read_len(bytes: &[u8], cursor: &mut usize) -> Result<usize, NbtError> {
    let offset = *cursor;
    let length = read_i32(bytes, cursor)?;
    usize::try_from(length).map_err(|_| NbtError::NegativeLength { length, offset })
}

fn read_u8(bytes: &[u8], cursor: &mut usize) -> Result<u8, NbtError> {
    Ok(read_array::<1>(bytes, cursor)?[0])
}

fn read_i32(bytes: &[u8], cursor: &mut usize) -> Result<i32, NbtError> {
    Ok(i32::from_be_bytes(read_array(bytes, cursor)?))
}

fn read_i64(bytes: &[u8], cursor: &mut usize) -> Result<i64, NbtError> {
    Ok(i64::from_be_bytes(read_array(bytes, cursor)?))
}

fn read_array<const N: usize>(bytes: &[u8], cursor: &mut usize) -> Result<[u8; N], NbtError> {
    let offset = *cursor;
    read_exact(bytes, cursor, N)?
        .try_into()
        .map_err(|_| NbtError::UnexpectedEof { offset })
}

fn read_exact<'a>(bytes: &'a [u8], cursor: &mut usize, len: usize) -> Result<&'a [u8], NbtError> {
    let end = cursor.saturating_add(len);
    if end > bytes.len() {
        return Err(NbtError::UnexpectedEof { offset: *cursor });
    }
    let out = &bytes[*cursor..end];
    *cursor = end;
    Ok(out)
}
