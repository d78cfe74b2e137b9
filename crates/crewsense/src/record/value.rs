use serde::Serialize;

/// One decoded scalar
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
}

impl FieldValue {
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Int(v) => v,
            Self::Float(v) => v as i64,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    pub fn is_nonzero(self) -> bool {
        match self {
            Self::Int(v) => v != 0,
            Self::Float(v) => v != 0.0,
        }
    }
}

/// A decoded record: field names in schema order with their values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: &str, value: FieldValue) {
        self.fields.push((name.to_string(), value));
    }

    pub fn get(&self, name: &str) -> Option<FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| *value)
    }

    /// Field as u32 (0 when absent); wider values are truncated
    pub fn u32(&self, name: &str) -> u32 {
        self.get(name).map(|v| v.as_i64() as u32).unwrap_or(0)
    }

    /// Field as an unsigned address (0 when absent)
    pub fn address(&self, name: &str) -> u64 {
        self.get(name).map(|v| v.as_i64() as u64).unwrap_or(0)
    }

    /// Field as a boolean flag: nonzero means set
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(FieldValue::is_nonzero)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), *value))
    }
}
