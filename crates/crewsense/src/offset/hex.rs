//! Serde helpers accepting offsets as JSON numbers or hex strings.
//!
//! Offset tables are hand-curated from disassembly, where `"0x1C57F54"`
//! is far easier to check than `29720404`.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOffset {
    Number(u64),
    Text(String),
}

fn parse<E: serde::de::Error>(raw: RawOffset) -> Result<u64, E> {
    match raw {
        RawOffset::Number(value) => Ok(value),
        RawOffset::Text(text) => parse_hex(&text).map_err(E::custom),
    }
}

/// Parse a hex string (with or without 0x prefix)
pub fn parse_hex(text: &str) -> Result<u64, String> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u64::from_str_radix(digits, 16).map_err(|e| format!("invalid hex offset '{}': {}", text, e))
}

pub fn value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    parse(RawOffset::deserialize(deserializer)?)
}

pub fn chain<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u64>, D::Error> {
    Vec::<RawOffset>::deserialize(deserializer)?
        .into_iter()
        .map(parse)
        .collect()
}

pub fn opt_chain<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u64>>, D::Error> {
    match Option::<Vec<RawOffset>>::deserialize(deserializer)? {
        Some(raw) => raw.into_iter().map(parse).collect::<Result<_, _>>().map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "chain")]
        chain: Vec<u64>,
        #[serde(deserialize_with = "value")]
        stride: u64,
        #[serde(default, deserialize_with = "opt_chain")]
        extra: Option<Vec<u64>>,
    }

    #[test]
    fn test_mixed_numbers_and_hex() {
        let sample: Sample =
            serde_json::from_str(r#"{ "chain": ["0x1C57F54", 92, "0"], "stride": "10" }"#)
                .unwrap();
        assert_eq!(sample.chain, vec![0x1C57F54, 92, 0]);
        assert_eq!(sample.stride, 0x10);
        assert!(sample.extra.is_none());
    }

    #[test]
    fn test_invalid_hex_is_rejected() {
        let result: Result<Sample, _> =
            serde_json::from_str(r#"{ "chain": ["0xZZ"], "stride": 4 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_hex_prefixes() {
        assert_eq!(parse_hex("0x5C").unwrap(), 0x5C);
        assert_eq!(parse_hex("0X5c").unwrap(), 0x5C);
        assert_eq!(parse_hex(" ff ").unwrap(), 0xFF);
        assert!(parse_hex("").is_err());
    }
}
