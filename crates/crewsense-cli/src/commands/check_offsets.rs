//! Offset table validation command.

use std::path::Path;

use anyhow::{Context, Result};
use crewsense::load_offset_table;
use crewsense::offset::RESOLVABLE_CHAINS;

/// Validate `path` and print what it contains
pub fn run(path: &Path) -> Result<()> {
    let table = load_offset_table(path)
        .with_context(|| format!("Invalid offset table {}", path.display()))?;

    println!("Offsets {} ({:?} pointers): OK", table.version, table.pointer_width);
    println!();

    println!("Static chains:");
    for name in RESOLVABLE_CHAINS {
        let head = table.chain_head(name).unwrap_or(0);
        let signed = table
            .signatures
            .iter()
            .any(|s| s.targets.iter().any(|t| t == name));
        println!(
            "  {:<18} 0x{:08X}{}",
            name,
            head,
            if signed { "  (signature)" } else { "" }
        );
    }
    println!();

    let schema = &table.player.schema;
    println!(
        "Player record: {} bytes, {} fields",
        schema.width(),
        schema.fields().len()
    );
    let mut offset = 0;
    for field in schema.fields() {
        if !field.name.is_empty() {
            let kind: &'static str = field.kind.into();
            println!("  +0x{:02X} {:<4} {}", offset, kind, field.name);
        }
        offset += field.size();
    }
    println!();

    println!("Signatures: {}", table.signatures.len());
    for signature in &table.signatures {
        println!(
            "  {} (+{}) -> {}",
            signature.pattern,
            signature.pattern_offset,
            signature.targets.join(", ")
        );
    }

    Ok(())
}
