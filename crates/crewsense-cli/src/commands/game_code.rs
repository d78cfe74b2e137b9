//! Game code decoding command.

use anyhow::{Context, Result};
use crewsense::lobby_code;
use crewsense::offset::parse_hex;

/// Parse a decimal or 0x-prefixed value
fn parse_value(text: &str) -> Result<u32> {
    let text = text.trim();
    let value = if text.starts_with("0x") || text.starts_with("0X") {
        parse_hex(text).map_err(anyhow::Error::msg)?
    } else if let Some(negative) = text.strip_prefix('-') {
        // Codes read as signed ints come out negative
        let magnitude: u64 = negative.parse().context("Invalid game code value")?;
        (magnitude as i64).wrapping_neg() as u64
    } else {
        text.parse().context("Invalid game code value")?
    };
    Ok(value as u32)
}

pub fn run(value: &str) -> Result<()> {
    let packed = parse_value(value)?;
    println!("{}", lobby_code(packed));
    Ok(())
}
