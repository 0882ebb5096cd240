//! Parser for charset files.
//!
//! A charset file lists one code point per line in hexadecimal, optionally prefixed with `U+`.
//! Anything after a `#` is a comment, and blank lines are ignored:
//!
//! ```text
//! # Basic Latin
//! U+0041
//! 0042 # B
//! ```

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// The Euro sign, which is always appended to the charset of a subset font.
pub const EURO_SIGN: u32 = 0x20AC;

fn parse_line(line: &str) -> Option<&str> {
    let line = match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    };
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(line.strip_prefix("U+").unwrap_or(line))
}

/// Parses the contents of a charset file into a list of code points, in file order.
pub fn parse_charset(text: &str) -> Result<Vec<u32>> {
    let mut charset = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let Some(hex) = parse_line(line) else {
            continue;
        };
        let code = u32::from_str_radix(hex, 16)
            .with_context(|| format!("line {}: {line:?} is not a hex code point", line_no + 1))?;
        charset.push(code);
    }
    Ok(charset)
}

/// Reads a charset file from disk.
pub fn read_charset(path: &Path) -> Result<Vec<u32>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("could not read charset file {}", path.display()))?;
    let charset =
        parse_charset(&text).with_context(|| format!("invalid charset file {}", path.display()))?;
    debug!("Read {} code points from {}", charset.len(), path.display());
    Ok(charset)
}
