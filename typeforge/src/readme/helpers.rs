//! Formatting functions available to README templates.

use crate::readme::table::{self, Align};
use chrono::{DateTime, Local};
use minijinja::{value::ValueKind, Environment, Error, ErrorKind, Value};

pub fn register(env: &mut Environment<'_>) {
    env.add_function("heading", heading);
    env.add_function("bold", bold);
    env.add_function("italic", italic);
    env.add_function("list_item", list_item);
    env.add_function("code_block", code_block);
    env.add_function("link", link);
    env.add_function("image", image);
    env.add_function("current_date_time", current_date_time);
    env.add_function("markdown_table", markdown_table);
}

/// Level 0 is the document title.
fn heading(level: usize, text: String) -> String {
    format!("{} {text}\n", "#".repeat(level + 1))
}

fn bold(text: String) -> String {
    format!("**{text}**")
}

fn italic(text: String) -> String {
    format!("*{text}*")
}

fn list_item(text: String) -> String {
    format!("- {text}\n")
}

fn code_block(code: String, language: Option<String>) -> String {
    let language = language.unwrap_or_else(|| "javascript".to_string());
    format!("```{language}\n{code}\n```\n")
}

fn link(url: String, text: String) -> String {
    format!("[{text}]({url})\n")
}

fn image(url: String, text: String) -> String {
    format!("![{text}]({url})\n")
}

fn current_date_time(format: String) -> String {
    format_date_time(&format, &Local::now())
}

/// Replaces the first occurrence of each of the `YYYY`, `MM`, `DD`, `HH`, `mm` and `ss`
/// tokens with the matching zero-padded field of `time`.
fn format_date_time(format: &str, time: &DateTime<Local>) -> String {
    let mut out = format.to_string();
    for (token, spec) in [
        ("YYYY", "%Y"),
        ("MM", "%m"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("mm", "%M"),
        ("ss", "%S"),
    ] {
        out = out.replacen(token, &time.format(spec).to_string(), 1);
    }
    out
}

fn invalid(msg: String) -> Error {
    Error::new(ErrorKind::InvalidOperation, msg)
}

fn cell_text(value: Value) -> String {
    if value.is_undefined() || value.is_none() {
        String::new()
    } else {
        value.to_string()
    }
}

/// Builds a Markdown table from a header list and rows given either as lists of cells or as
/// maps keyed by header.
fn markdown_table(
    headers: Vec<String>,
    rows: Vec<Value>,
    align: Option<Vec<String>>,
) -> Result<String, Error> {
    let align = align
        .unwrap_or_default()
        .iter()
        .map(|a| a.parse::<Align>().map_err(|e| invalid(e.to_string())))
        .collect::<Result<Vec<_>, _>>()?;

    let mut cells = Vec::new();
    for row in rows {
        let row = match row.kind() {
            ValueKind::Map => headers
                .iter()
                .map(|header| row.get_attr(header).map(cell_text))
                .collect::<Result<Vec<_>, _>>()?,
            ValueKind::Seq => row.try_iter()?.map(cell_text).collect(),
            kind => {
                return Err(invalid(format!("table rows must be lists or maps, not {kind:?}")))
            }
        };
        cells.push(row);
    }

    Ok(table::markdown_table(&headers, &cells, &align))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use minijinja::context;

    fn render(source: &str) -> String {
        let mut env = Environment::new();
        register(&mut env);
        env.render_str(source, context! {}).unwrap()
    }

    #[test]
    fn inline_helpers() {
        assert_eq!(render("{{ heading(0, 'Title') }}"), "# Title\n");
        assert_eq!(render("{{ heading(1, 'Usage') }}"), "## Usage\n");
        assert_eq!(render("{{ heading(2, 'Options') }}"), "### Options\n");
        assert_eq!(render("{{ bold('a') }} {{ italic('b') }}"), "**a** *b*");
        assert_eq!(render("{{ list_item('one') }}"), "- one\n");
        assert_eq!(render("{{ link('https://a.b', 'a') }}"), "[a](https://a.b)\n");
        assert_eq!(render("{{ image('logo.png', 'Logo') }}"), "![Logo](logo.png)\n");
    }

    #[test]
    fn code_blocks_default_to_javascript() {
        assert_eq!(render("{{ code_block('let x;') }}"), "```javascript\nlet x;\n```\n");
        assert_eq!(render("{{ code_block('ls', 'sh') }}"), "```sh\nls\n```\n");
    }

    #[test]
    fn date_time_tokens() {
        let time = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(format_date_time("YYYY-MM-DD HH:mm:ss", &time), "2024-03-07 09:05:02");
        assert_eq!(format_date_time("built DD/MM", &time), "built 07/03");
    }

    #[test]
    fn tables_from_maps_and_lists() {
        let from_maps = render(
            "{{ markdown_table(['Name', 'Age'], \
             [{'Name': 'John', 'Age': 30}, {'Name': 'Alice'}], ['l', 'r']) }}",
        );
        assert_eq!(from_maps, "| Name  | Age |\n| :---- | --: |\n| John  |  30 |\n| Alice |     |");

        let from_lists = render("{{ markdown_table(['Name', 'Age'], [['Bob', 22]]) }}");
        assert_eq!(from_lists, "| Name | Age |\n| ---- | --- |\n| Bob  | 22  |");
    }

    #[test]
    fn bad_table_rows() {
        let mut env = Environment::new();
        register(&mut env);
        assert!(env
            .render_str("{{ markdown_table(['a'], [1]) }}", context! {})
            .is_err());
        assert!(env
            .render_str("{{ markdown_table(['a'], [['x']], ['sideways']) }}", context! {})
            .is_err());
    }
}
