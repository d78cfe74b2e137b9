use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How the operand found at a signature match encodes its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressMode {
    /// 32-bit absolute address (x86 `mov reg, [imm32]`)
    #[default]
    Absolute,
    /// 32-bit displacement relative to the end of the operand (x64 RIP-relative)
    Relative,
}

/// A code signature locating the static field at the head of one or more
/// pointer chains
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Hex byte pattern, `?` or `??` for wildcards
    pub pattern: String,
    /// Distance from the match start to the 32-bit operand
    pub pattern_offset: u64,
    /// Added to the resolved module-relative offset
    #[serde(default)]
    pub result_offset: i64,
    #[serde(default)]
    pub mode: AddressMode,
    /// Offset table chains whose head this signature replaces
    pub targets: Vec<String>,
}

impl Signature {
    pub fn pattern_bytes(&self) -> Result<Vec<Option<u8>>> {
        parse_pattern(&self.pattern)
    }
}

pub fn parse_pattern(pattern: &str) -> Result<Vec<Option<u8>>> {
    let mut bytes = Vec::new();
    for token in pattern.split_whitespace() {
        if token == "??" || token == "?" {
            bytes.push(None);
            continue;
        }

        let value = u8::from_str_radix(token, 16).map_err(|e| {
            Error::InvalidSignature(format!("Invalid signature token '{}': {}", token, e))
        })?;
        bytes.push(Some(value));
    }

    if bytes.is_empty() {
        return Err(Error::InvalidSignature(
            "Signature pattern is empty".to_string(),
        ));
    }
    if bytes.iter().all(Option::is_none) {
        return Err(Error::InvalidSignature(format!(
            "Signature pattern '{}' has no concrete bytes",
            pattern
        )));
    }

    Ok(bytes)
}

pub fn format_pattern(bytes: &[Option<u8>]) -> String {
    bytes
        .iter()
        .map(|b| match b {
            Some(value) => format!("{:02X}", value),
            None => "??".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
