// Cell Values and Scan Destinations
//
// This module defines the raw value model a cursor produces for each column
// and the typed destinations those values are written into.

use std::fmt;

use thiserror::Error;

/// Possible data types for values in a row
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum DataValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Date(String),
    Timestamp(String),
    Blob(Vec<u8>),
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Null => write!(f, "NULL"),
            DataValue::Integer(i) => write!(f, "{}", i),
            DataValue::Float(fl) => write!(f, "{}", fl),
            DataValue::Text(s) => write!(f, "\"{}\"", s),
            DataValue::Boolean(b) => write!(f, "{}", b),
            DataValue::Date(s) => write!(f, "DATE '{}'", s),
            DataValue::Timestamp(s) => write!(f, "TIMESTAMP '{}'", s),
            DataValue::Blob(b) => write!(f, "BLOB ({} bytes)", b.len()),
        }
    }
}

impl DataValue {
    /// Name of the value's type, used in conversion errors
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "NULL",
            DataValue::Integer(_) => "INTEGER",
            DataValue::Float(_) => "FLOAT",
            DataValue::Text(_) => "TEXT",
            DataValue::Boolean(_) => "BOOLEAN",
            DataValue::Date(_) => "DATE",
            DataValue::Timestamp(_) => "TIMESTAMP",
            DataValue::Blob(_) => "BLOB",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::Integer(value)
    }
}

impl From<i32> for DataValue {
    fn from(value: i32) -> Self {
        DataValue::Integer(value as i64)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Float(value)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Boolean(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::Text(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::Text(value)
    }
}

impl From<Vec<u8>> for DataValue {
    fn from(value: Vec<u8>) -> Self {
        DataValue::Blob(value)
    }
}

impl From<&[u8]> for DataValue {
    fn from(value: &[u8]) -> Self {
        DataValue::Blob(value.to_vec())
    }
}

impl<V: Into<DataValue>> From<Option<V>> for DataValue {
    fn from(value: Option<V>) -> Self {
        value.map_or(DataValue::Null, Into::into)
    }
}

/// Error raised when a cell value cannot be stored in a destination
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("converting NULL to {0} is unsupported")]
    UnexpectedNull(&'static str),
    #[error("cannot convert {from} to {to}")]
    Unsupported { from: &'static str, to: &'static str },
    #[error("cannot parse {value:?} as {to}: {reason}")]
    Parse { value: String, to: &'static str, reason: String },
    #[error("value {value} is out of range for {to}")]
    OutOfRange { value: String, to: &'static str },
}

/// Result type for value conversions
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Conversion from a raw cell value into a typed Rust value.
///
/// This is the only place a cell's runtime type is looked at; every column
/// destination is statically typed by its `FromValue` implementation.
pub trait FromValue: Sized {
    /// Name used in conversion errors
    const TYPE_NAME: &'static str;

    fn from_value(value: DataValue) -> ConversionResult<Self>;
}

fn unsupported<V>(value: &DataValue, to: &'static str) -> ConversionResult<V> {
    match value {
        DataValue::Null => Err(ConversionError::UnexpectedNull(to)),
        other => Err(ConversionError::Unsupported { from: other.type_name(), to }),
    }
}

impl FromValue for i64 {
    const TYPE_NAME: &'static str = "i64";

    fn from_value(value: DataValue) -> ConversionResult<Self> {
        match value {
            DataValue::Integer(i) => Ok(i),
            // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
            DataValue::Float(f) if f.fract() == 0.0 => {
                if f >= i64::MIN as f64 && f < i64::MAX as f64 {
                    Ok(f as i64)
                } else {
                    Err(ConversionError::OutOfRange {
                        value: f.to_string(),
                        to: Self::TYPE_NAME,
                    })
                }
            }
            DataValue::Text(s) => s.trim().parse::<i64>().map_err(|e| ConversionError::Parse {
                value: s.clone(),
                to: Self::TYPE_NAME,
                reason: e.to_string(),
            }),
            other => unsupported(&other, Self::TYPE_NAME),
        }
    }
}

impl FromValue for i32 {
    const TYPE_NAME: &'static str = "i32";

    fn from_value(value: DataValue) -> ConversionResult<Self> {
        let wide = match value {
            DataValue::Null => return Err(ConversionError::UnexpectedNull(Self::TYPE_NAME)),
            other => i64::from_value(other).map_err(|e| match e {
                ConversionError::Parse { value, reason, .. } => ConversionError::Parse { value, to: Self::TYPE_NAME, reason },
                ConversionError::Unsupported { from, .. } => ConversionError::Unsupported { from, to: Self::TYPE_NAME },
                ConversionError::OutOfRange { value, .. } => ConversionError::OutOfRange { value, to: Self::TYPE_NAME },
                other => other,
            })?,
        };
        i32::try_from(wide).map_err(|_| ConversionError::OutOfRange {
            value: wide.to_string(),
            to: Self::TYPE_NAME,
        })
    }
}

impl FromValue for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn from_value(value: DataValue) -> ConversionResult<Self> {
        match value {
            DataValue::Float(f) => Ok(f),
            DataValue::Integer(i) => Ok(i as f64),
            DataValue::Text(s) => s.trim().parse::<f64>().map_err(|e| ConversionError::Parse {
                value: s.clone(),
                to: Self::TYPE_NAME,
                reason: e.to_string(),
            }),
            other => unsupported(&other, Self::TYPE_NAME),
        }
    }
}

impl FromValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_value(value: DataValue) -> ConversionResult<Self> {
        match value {
            DataValue::Boolean(b) => Ok(b),
            DataValue::Integer(0) => Ok(false),
            DataValue::Integer(1) => Ok(true),
            DataValue::Integer(i) => Err(ConversionError::OutOfRange { value: i.to_string(), to: Self::TYPE_NAME }),
            DataValue::Text(s) => {
                if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("t") || s == "1" {
                    Ok(true)
                } else if s.eq_ignore_ascii_case("false") || s.eq_ignore_ascii_case("f") || s == "0" {
                    Ok(false)
                } else {
                    Err(ConversionError::Parse {
                        value: s,
                        to: Self::TYPE_NAME,
                        reason: "expected true/false, t/f or 1/0".to_string(),
                    })
                }
            }
            other => unsupported(&other, Self::TYPE_NAME),
        }
    }
}

impl FromValue for String {
    const TYPE_NAME: &'static str = "String";

    fn from_value(value: DataValue) -> ConversionResult<Self> {
        match value {
            DataValue::Text(s) | DataValue::Date(s) | DataValue::Timestamp(s) => Ok(s),
            DataValue::Integer(i) => Ok(i.to_string()),
            DataValue::Float(f) => Ok(f.to_string()),
            DataValue::Boolean(b) => Ok(b.to_string()),
            DataValue::Blob(b) => String::from_utf8(b).map_err(|e| ConversionError::Parse {
                value: format!("BLOB ({} bytes)", e.as_bytes().len()),
                to: Self::TYPE_NAME,
                reason: e.utf8_error().to_string(),
            }),
            DataValue::Null => Err(ConversionError::UnexpectedNull(Self::TYPE_NAME)),
        }
    }
}

impl FromValue for Vec<u8> {
    const TYPE_NAME: &'static str = "Vec<u8>";

    fn from_value(value: DataValue) -> ConversionResult<Self> {
        match value {
            DataValue::Blob(b) => Ok(b),
            DataValue::Text(s) => Ok(s.into_bytes()),
            other => unsupported(&other, Self::TYPE_NAME),
        }
    }
}

impl FromValue for DataValue {
    const TYPE_NAME: &'static str = "DataValue";

    fn from_value(value: DataValue) -> ConversionResult<Self> {
        Ok(value)
    }
}

impl<V: FromValue> FromValue for Option<V> {
    const TYPE_NAME: &'static str = V::TYPE_NAME;

    fn from_value(value: DataValue) -> ConversionResult<Self> {
        match value {
            DataValue::Null => Ok(None),
            other => V::from_value(other).map(Some),
        }
    }
}

/// An opaque write target handed to a cursor's scan call.
///
/// Cursors write exactly one value per destination, positionally.
pub trait Destination {
    fn assign(&mut self, value: DataValue) -> ConversionResult<()>;
}

/// A typed destination holding the last value written by a scan
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Slot<V> {
    value: V,
}

impl<V: Default> Slot<V> {
    pub fn new() -> Self {
        Slot { value: V::default() }
    }

    /// Move the scanned value out, leaving the default behind
    pub fn take(&mut self) -> V {
        std::mem::take(&mut self.value)
    }
}

impl<V> Slot<V> {
    pub fn get(&self) -> &V {
        &self.value
    }
}

impl<V: FromValue> Destination for Slot<V> {
    fn assign(&mut self, value: DataValue) -> ConversionResult<()> {
        self.value = V::from_value(value)?;
        Ok(())
    }
}

/// Destination for result columns no column is bound to; values are dropped
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl Destination for Discard {
    fn assign(&mut self, _value: DataValue) -> ConversionResult<()> {
        Ok(())
    }
}
