use anyhow::{bail, Result};
use std::str::FromStr;

/// The alignment of a table column.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Align {
    Left,
    Right,
    Center,
    None,
}
impl Align {
    fn pad(self, cell: &str, width: usize) -> String {
        let fill = width.saturating_sub(cell.chars().count());
        match self {
            Align::Right => format!("{}{cell}", " ".repeat(fill)),
            Align::Center => {
                let left = fill / 2;
                format!("{}{cell}{}", " ".repeat(left), " ".repeat(fill - left))
            }
            Align::Left | Align::None => format!("{cell}{}", " ".repeat(fill)),
        }
    }

    fn delimiter(self, width: usize) -> String {
        match self {
            Align::Left => format!(":{}", "-".repeat(width - 1)),
            Align::Right => format!("{}:", "-".repeat(width - 1)),
            Align::Center => format!(":{}:", "-".repeat(width - 2)),
            Align::None => "-".repeat(width),
        }
    }
}
impl FromStr for Align {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "l" | "left" => Align::Left,
            "r" | "right" => Align::Right,
            "c" | "center" => Align::Center,
            "" | "none" => Align::None,
            _ => bail!("unknown column alignment {s:?}"),
        })
    }
}

fn is_number(cell: &str) -> bool {
    cell.trim().parse::<f64>().is_ok()
}

fn write_row(out: &mut String, cells: impl Iterator<Item = String>) {
    out.push('|');
    for cell in cells {
        out.push(' ');
        out.push_str(&cell);
        out.push_str(" |");
    }
    out.push('\n');
}

fn cell(row: &[String], column: usize) -> &str {
    row.get(column).map(String::as_str).unwrap_or("")
}

/// Renders a Markdown table in the pipe layout of Python's `tabulate`.
///
/// Columns where every cell is a number are right-aligned, all others left-aligned. Each
/// column is as wide as its widest cell, and at least two characters wider than its header.
/// The result has no trailing newline.
pub fn pipe_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let columns: Vec<_> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let numeric = !rows.is_empty() && rows.iter().all(|row| is_number(cell(row, i)));
            let align = if numeric { Align::Right } else { Align::Left };
            let width = rows
                .iter()
                .map(|row| cell(row, i).chars().count())
                .fold(header.chars().count() + 2, usize::max);
            (align, width)
        })
        .collect();

    let mut out = String::new();
    write_row(
        &mut out,
        headers
            .iter()
            .zip(&columns)
            .map(|(header, (align, width))| align.pad(header, *width)),
    );
    out.push('|');
    for (align, width) in &columns {
        out.push_str(&align.delimiter(*width + 2));
        out.push('|');
    }
    out.push('\n');
    for row in rows {
        write_row(
            &mut out,
            columns
                .iter()
                .enumerate()
                .map(|(i, (align, width))| align.pad(cell(row, i), *width)),
        );
    }
    out.pop();
    out
}

/// Renders a Markdown table with explicit per-column alignment, as used by the `markdown_table`
/// template helper.
///
/// Columns are as wide as their widest cell, with a minimum of three characters so that
/// every delimiter can carry its alignment colons.
pub fn markdown_table(headers: &[String], rows: &[Vec<String>], align: &[Align]) -> String {
    let columns: Vec<_> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let width = rows
                .iter()
                .map(|row| cell(row, i).chars().count())
                .fold(header.chars().count().max(3), usize::max);
            (align.get(i).copied().unwrap_or(Align::None), width)
        })
        .collect();

    let mut out = String::new();
    write_row(
        &mut out,
        headers
            .iter()
            .zip(&columns)
            .map(|(header, (align, width))| align.pad(header, *width)),
    );
    write_row(&mut out, columns.iter().map(|(align, width)| align.delimiter(*width)));
    for row in rows {
        write_row(
            &mut out,
            columns
                .iter()
                .enumerate()
                .map(|(i, (align, width))| align.pad(cell(row, i), *width)),
        );
    }
    out.pop();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_casing::test_casing;

    fn rows(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn pipe_table_layout() {
        let table = pipe_table(
            &["Name", "Age", "Country"],
            &rows(&[&["John", "30", "USA"], &["Alice", "25", "Canada"], &["Bob", "22", "UK"]]),
        );
        let expected = "\
| Name   |   Age | Country   |
|:-------|------:|:----------|
| John   |    30 | USA       |
| Alice  |    25 | Canada    |
| Bob    |    22 | UK        |";
        assert_eq!(table, expected);
    }

    #[test]
    fn pipe_table_widens_to_long_cells() {
        let table = pipe_table(&["Id"], &rows(&[&["Jane Smith"]]));
        assert_eq!(table, "| Id         |\n|:-----------|\n| Jane Smith |");
    }

    #[test]
    fn pipe_table_without_rows() {
        assert_eq!(pipe_table(&["Name"], &[]), "| Name   |\n|:-------|");
    }

    #[test]
    fn aligned_markdown_table() {
        let table = markdown_table(
            &["Font".to_string(), "Size".to_string()],
            &rows(&[&["Display", "64"], &["Body", "16"]]),
            &[Align::Left, Align::Right],
        );
        let expected = "\
| Font    | Size |
| :------ | ---: |
| Display |   64 |
| Body    |   16 |";
        assert_eq!(table, expected);
    }

    #[test]
    fn markdown_table_pads_short_rows() {
        let table = markdown_table(&["a".to_string(), "b".to_string()], &rows(&[&["x"]]), &[]);
        assert_eq!(table, "| a   | b   |\n| --- | --- |\n| x   |     |");
    }

    #[test_casing(6, [
        ("l", Align::Left), ("left", Align::Left), ("R", Align::Right),
        ("c", Align::Center), ("center", Align::Center), ("", Align::None),
    ])]
    fn parsing_alignment(str: &str, align: Align) {
        assert_eq!(str.parse::<Align>().unwrap(), align);
    }

    #[test]
    fn centered_cells() {
        assert_eq!(Align::Center.pad("ab", 5), " ab  ");
        assert_eq!(Align::Center.delimiter(5), ":---:");
    }
}
