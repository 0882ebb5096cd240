use std::io::{self, Write};
use typeforge_common::ranges::RangeList;

const UNKNOWN: &str = "Unknown";

/// One line of the Unicode table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CodepointRow {
    pub code: u32,
    pub glyph: char,
    pub description: String,
}
impl CodepointRow {
    pub fn new(code: u32) -> CodepointRow {
        let ch = char::from_u32(code);
        CodepointRow { code, glyph: display_glyph(ch), description: describe(ch) }
    }
}

/// Returns the Unicode name of a character, or `Unknown` for unnamed and unassigned
/// code points.
pub fn describe(ch: Option<char>) -> String {
    match ch.and_then(unicode_names2::name) {
        Some(name) => name.to_string(),
        None => UNKNOWN.to_string(),
    }
}

// Control characters would break the table layout, and surrogates have no `char`.
fn display_glyph(ch: Option<char>) -> char {
    match ch {
        Some(ch) if !ch.is_control() => ch,
        _ => char::REPLACEMENT_CHARACTER,
    }
}

pub fn rows(ranges: &RangeList) -> impl Iterator<Item = CodepointRow> + '_ {
    ranges.codepoints().map(CodepointRow::new)
}

/// Prints a table of every code point in `ranges` with its glyph and name.
pub fn write_table(out: &mut impl Write, ranges: &RangeList) -> io::Result<()> {
    writeln!(out, "{:<10} {:<8} {}", "Unicode", "Glyph", "Description")?;
    writeln!(out, "{}", "=".repeat(30))?;
    for row in rows(ranges) {
        let code = format!("U+{:04X}", row.code);
        writeln!(out, "{code:<10} {:<8} {}", row.glyph, row.description)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(ranges: &str) -> String {
        let mut out = Vec::new();
        write_table(&mut out, &ranges.parse().unwrap()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn listing_a_range() {
        let table = render("U+0041-0043");
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Unicode    Glyph    Description");
        assert_eq!(lines[1], "=".repeat(30));
        assert_eq!(lines[2], "U+0041     A        LATIN CAPITAL LETTER A");
        assert_eq!(lines[3], "U+0042     B        LATIN CAPITAL LETTER B");
        assert_eq!(lines[4], "U+0043     C        LATIN CAPITAL LETTER C");
    }

    #[test]
    fn unassigned_codepoints_are_unknown() {
        let row = CodepointRow::new(0x0378);
        assert_eq!(row.description, "Unknown");
        assert!(render("U+0378").contains("U+0378     \u{378}        Unknown"));
    }

    #[test]
    fn singletons_after_ranges_show_their_own_codepoint() {
        let table = render("U+0041-0042,U+20AC");
        let last = table.lines().last().unwrap();
        assert_eq!(last, "U+20AC     €        EURO SIGN");
    }

    #[test]
    fn control_characters_and_surrogates() {
        let row = CodepointRow::new(0x0A);
        assert_eq!(row.glyph, char::REPLACEMENT_CHARACTER);
        assert_eq!(row.description, "Unknown");

        let row = CodepointRow::new(0xD800);
        assert_eq!(row.glyph, char::REPLACEMENT_CHARACTER);
        assert_eq!(row.description, "Unknown");
    }

    #[test]
    fn wide_codepoints_are_not_truncated() {
        let row = CodepointRow::new(0x1F600);
        assert_eq!(row.description, "GRINNING FACE");
        assert!(render("U+1F600").contains("U+1F600    😀"));
    }

    #[test]
    fn recent_characters_have_names() {
        assert_eq!(describe(Some('\u{20C0}')), "SOM SIGN");
        assert_eq!(CodepointRow::new(0x1FAE8).description, "SHAKING FACE");
    }
}
