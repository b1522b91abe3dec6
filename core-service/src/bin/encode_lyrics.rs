//! Convert a raw lyrics text file into the stored lyrics encoding.
//!
//! Usage: `encode-lyrics [INPUT]` (defaults to `input.txt`). Paragraphs are
//! separated by blank lines; every non-empty line becomes a verse. The encoded
//! value is printed to stdout, ready to be stored in a song's `text` column.

use anyhow::Context;
use core_library::lyrics;

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "input.txt".to_string());

    let raw = std::fs::read_to_string(&path).with_context(|| format!("Error reading {}", path))?;
    let text = lyrics::segment(&raw);
    let encoded = lyrics::encode(&text).context("Error encoding lyrics")?;

    println!("{}", encoded);
    eprintln!("{} verses", text.len());
    Ok(())
}
