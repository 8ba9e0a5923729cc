//! Binary encoding of table files.
//!
//! Every integer is written little-endian with a fixed width, and every
//! variable-length item carries a `u64` length prefix:
//!
//! ```text
//! TableFile := NameLen(u64) Name ColumnCount(u64) Column* RowCount(u64) Row*
//! Column    := NameLen(u64) Name TypeTag(u32) PrimaryKey(u8) NotNull(u8) AutoIncrement(u8)
//! Row       := Field{ColumnCount}
//! Field     := TypeTag(u32) Payload
//! Payload   := i32 | Len(u64) UTF-8 bytes | f64 | u8 | (nothing, for NULL)
//! ```

use std::io::{Read, Write};

use crate::column::Column;
use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::value::Value;

/// Field tag for [Value::Null]. Never used as a column type.
pub const NULL_TAG: u32 = 4;

/// Upper bound on a single length prefix. Larger values mean a damaged file,
/// not a real string.
const MAX_LEN: u64 = 1 << 32;

// ============================================================================
// Primitives
// ============================================================================

pub fn write_u8(w: &mut impl Write, value: u8) -> Result<()> {
    w.write_all(&[value])?;
    Ok(())
}

pub fn write_u32(w: &mut impl Write, value: u32) -> Result<()> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

pub fn write_u64(w: &mut impl Write, value: u64) -> Result<()> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

pub fn write_bool(w: &mut impl Write, value: bool) -> Result<()> {
    write_u8(w, u8::from(value))
}

/// Writes a length-prefixed UTF-8 string.
pub fn write_str(w: &mut impl Write, value: &str) -> Result<()> {
    write_u64(w, value.len() as u64)?;
    w.write_all(value.as_bytes())?;
    Ok(())
}

fn read_array<const N: usize>(r: &mut impl Read) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => Error::Corrupt("unexpected end of file".into()),
        _ => Error::Io(e),
    })?;
    Ok(buf)
}

pub fn read_u8(r: &mut impl Read) -> Result<u8> {
    Ok(read_array::<1>(r)?[0])
}

pub fn read_u32(r: &mut impl Read) -> Result<u32> {
    Ok(u32::from_le_bytes(read_array(r)?))
}

pub fn read_u64(r: &mut impl Read) -> Result<u64> {
    Ok(u64::from_le_bytes(read_array(r)?))
}

pub fn read_bool(r: &mut impl Read) -> Result<bool> {
    match read_u8(r)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(Error::Corrupt(format!("invalid boolean byte {other}"))),
    }
}

/// Reads a length-prefixed UTF-8 string.
pub fn read_str(r: &mut impl Read) -> Result<String> {
    let len = read_u64(r)?;
    if len > MAX_LEN {
        return Err(Error::Corrupt(format!("string length {len} is too large")));
    }

    let mut bytes = Vec::new();
    r.by_ref().take(len).read_to_end(&mut bytes)?;
    if bytes.len() as u64 != len {
        return Err(Error::Corrupt("unexpected end of file".into()));
    }
    String::from_utf8(bytes).map_err(|e| Error::Corrupt(e.to_string()))
}

/// Reads a `u64` count and converts it to `usize`.
pub fn read_len(r: &mut impl Read) -> Result<usize> {
    let len = read_u64(r)?;
    usize::try_from(len).map_err(|_| Error::Corrupt(format!("count {len} is too large")))
}

// ============================================================================
// Schema and values
// ============================================================================

pub fn write_column(w: &mut impl Write, column: &Column) -> Result<()> {
    write_str(w, &column.name)?;
    write_u32(w, column.data_type.tag())?;
    write_bool(w, column.primary_key)?;
    write_bool(w, column.not_null)?;
    write_bool(w, column.auto_increment)
}

pub fn read_column(r: &mut impl Read) -> Result<Column> {
    let name = read_str(r)?;
    let tag = read_u32(r)?;
    let data_type = DataType::from_tag(tag)
        .ok_or_else(|| Error::Corrupt(format!("unknown column type tag {tag}")))?;

    Ok(Column {
        name,
        data_type,
        primary_key: read_bool(r)?,
        not_null: read_bool(r)?,
        auto_increment: read_bool(r)?,
    })
}

/// Writes a tagged field.
///
/// # Errors
/// Integers are stored on 32 bits; anything outside that range is refused
/// with [Error::IntegerOutOfRange] instead of being truncated.
pub fn write_value(w: &mut impl Write, value: &Value) -> Result<()> {
    match value {
        Value::Integer(i) => {
            let narrow = i32::try_from(*i).map_err(|_| Error::IntegerOutOfRange(*i))?;
            write_u32(w, DataType::INTEGER_TAG)?;
            w.write_all(&narrow.to_le_bytes())?;
        }
        Value::Text(s) => {
            write_u32(w, DataType::TEXT_TAG)?;
            write_str(w, s)?;
        }
        Value::Real(f) => {
            write_u32(w, DataType::REAL_TAG)?;
            w.write_all(&f.to_le_bytes())?;
        }
        Value::Boolean(b) => {
            write_u32(w, DataType::BOOLEAN_TAG)?;
            write_bool(w, *b)?;
        }
        Value::Null => write_u32(w, NULL_TAG)?,
    }
    Ok(())
}

pub fn read_value(r: &mut impl Read) -> Result<Value> {
    let value = match read_u32(r)? {
        DataType::INTEGER_TAG => Value::Integer(i32::from_le_bytes(read_array(r)?).into()),
        DataType::TEXT_TAG => Value::Text(read_str(r)?),
        DataType::REAL_TAG => Value::Real(f64::from_le_bytes(read_array(r)?)),
        DataType::BOOLEAN_TAG => Value::Boolean(read_bool(r)?),
        NULL_TAG => Value::Null,
        tag => return Err(Error::Corrupt(format!("unknown field type tag {tag}"))),
    };
    Ok(value)
}
