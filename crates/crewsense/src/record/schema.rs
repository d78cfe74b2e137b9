use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::config::roster::MAX_RECORD_SIZE;
use crate::error::{Error, Result};
use crate::record::{FieldValue, Record};

/// Scalar type of a schema field
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FieldKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
    /// Padding; the width comes from the field descriptor
    Skip,
}

impl FieldKind {
    /// Fixed width in bytes, `None` for padding
    pub fn width(self) -> Option<usize> {
        match self {
            Self::I8 | Self::U8 => Some(1),
            Self::I16 | Self::U16 => Some(2),
            Self::I32 | Self::U32 | Self::F32 => Some(4),
            Self::F64 => Some(8),
            Self::Skip => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endian {
    #[default]
    Little,
    Big,
}

/// One entry of a record schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Padding width (only used by `skip`)
    #[serde(default, skip_serializing_if = "is_zero")]
    pub width: usize,
    #[serde(default)]
    pub endian: Endian,
}

fn is_zero(value: &usize) -> bool {
    *value == 0
}

impl FieldSpec {
    pub fn field(kind: FieldKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            width: 0,
            endian: Endian::Little,
        }
    }

    pub fn skip(width: usize) -> Self {
        Self {
            kind: FieldKind::Skip,
            name: String::new(),
            width,
            endian: Endian::Little,
        }
    }

    pub fn big_endian(mut self) -> Self {
        self.endian = Endian::Big;
        self
    }

    /// Bytes this entry occupies in the record
    pub fn size(&self) -> usize {
        self.kind.width().unwrap_or(self.width)
    }
}

/// Ordered field list describing one fixed-width record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSchema {
    fields: Vec<FieldSpec>,
}

impl RecordSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Total record width in bytes, saturating at `usize::MAX`
    pub fn width(&self) -> usize {
        self.fields
            .iter()
            .fold(0usize, |total, field| total.saturating_add(field.size()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields
            .iter()
            .any(|f| f.kind != FieldKind::Skip && f.name == name)
    }

    /// Check the schema is usable and names every field in `required`
    pub fn validate(&self, required: &[&str]) -> Result<()> {
        if self.fields.is_empty() {
            return Err(Error::InvalidSchema("schema has no fields".to_string()));
        }

        let mut seen = HashSet::new();
        let mut total = 0usize;
        for (index, field) in self.fields.iter().enumerate() {
            total = total
                .checked_add(field.size())
                .filter(|&width| width <= MAX_RECORD_SIZE)
                .ok_or_else(|| {
                    Error::InvalidSchema(format!(
                        "record exceeds {} bytes at entry #{}",
                        MAX_RECORD_SIZE, index
                    ))
                })?;

            if field.kind == FieldKind::Skip {
                if field.width == 0 {
                    return Err(Error::InvalidSchema(format!(
                        "skip entry #{} has zero width",
                        index
                    )));
                }
                continue;
            }
            if field.name.is_empty() {
                return Err(Error::InvalidSchema(format!(
                    "{} entry #{} has no name",
                    field.kind, index
                )));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate field '{}'",
                    field.name
                )));
            }
        }

        if let Some(missing) = required.iter().find(|name| !seen.contains(*name)) {
            return Err(Error::InvalidSchema(format!(
                "required field '{}' is missing",
                missing
            )));
        }

        Ok(())
    }

    /// Decode `bytes` into a named-field record.
    ///
    /// The buffer must be exactly [`width`](Self::width) bytes long.
    pub fn decode(&self, bytes: &[u8]) -> Result<Record> {
        let expected = self.width();
        if bytes.len() != expected {
            return Err(Error::RecordSizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }

        let mut record = Record::with_capacity(self.fields.len());
        let mut cursor = 0usize;
        for field in &self.fields {
            let size = field.size();
            let raw = &bytes[cursor..cursor + size];
            cursor += size;

            if field.kind != FieldKind::Skip {
                record.push(&field.name, decode_scalar(field.kind, field.endian, raw));
            }
        }

        Ok(record)
    }
}

fn array<const N: usize>(raw: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(raw);
    out
}

macro_rules! from_bytes {
    ($ty:ty, $endian:expr, $raw:expr) => {
        match $endian {
            Endian::Little => <$ty>::from_le_bytes(array($raw)),
            Endian::Big => <$ty>::from_be_bytes(array($raw)),
        }
    };
}

fn decode_scalar(kind: FieldKind, endian: Endian, raw: &[u8]) -> FieldValue {
    match kind {
        FieldKind::I8 => FieldValue::Int(raw[0] as i8 as i64),
        FieldKind::U8 => FieldValue::Int(raw[0] as i64),
        FieldKind::I16 => FieldValue::Int(from_bytes!(i16, endian, raw) as i64),
        FieldKind::U16 => FieldValue::Int(from_bytes!(u16, endian, raw) as i64),
        FieldKind::I32 => FieldValue::Int(from_bytes!(i32, endian, raw) as i64),
        FieldKind::U32 => FieldValue::Int(from_bytes!(u32, endian, raw) as i64),
        FieldKind::F32 => FieldValue::Float(from_bytes!(f32, endian, raw) as f64),
        FieldKind::F64 => FieldValue::Float(from_bytes!(f64, endian, raw)),
        FieldKind::Skip => unreachable!("padding is never decoded"),
    }
}
