//! Renders the project README from a Jinja template.

use anyhow::{bail, Context, Result};
use minijinja::{context, AutoEscape, Environment, UndefinedBehavior};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use typeforge_common::paths::{check_base_dir, path_to_string, resolve_in};

mod helpers;
pub mod table;

/// A row of the README data table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Country")]
    pub country: String,
}
impl Record {
    pub const HEADERS: [&'static str; 3] = ["Name", "Age", "Country"];

    fn new(name: &str, age: u32, country: &str) -> Record {
        Record { name: name.to_string(), age, country: country.to_string() }
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone(), self.age.to_string(), self.country.clone()]
    }
}

/// The inputs of the README generator.
///
/// Paths are relative to the base directory passed to [`generate_readme`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadmeConfig {
    pub template: PathBuf,
    pub output: PathBuf,
    pub table_of_contents: String,
    pub features: Vec<String>,
    pub custom_section: String,
    pub records: Vec<Record>,
}
impl Default for ReadmeConfig {
    fn default() -> Self {
        ReadmeConfig {
            template: PathBuf::from("scripts/README_template.md"),
            output: PathBuf::from("README.md"),
            table_of_contents: "1. Introduction\n2. Usage\n3. Example".to_string(),
            features: vec![
                "Feature 1".to_string(),
                "Feature 2".to_string(),
                "Feature 3".to_string(),
            ],
            custom_section: "Additional information and notes.".to_string(),
            records: vec![
                Record::new("John", 30, "USA"),
                Record::new("Alice", 25, "Canada"),
                Record::new("Bob", 22, "UK"),
            ],
        }
    }
}
impl ReadmeConfig {
    pub fn load(path: &Path) -> Result<ReadmeConfig> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path_to_string(path)))?;
        toml::from_str(&text)
            .with_context(|| format!("invalid README config in {}", path_to_string(path)))
    }

    /// Renders the records as a pipe-delimited Markdown table.
    pub fn table(&self) -> String {
        let rows: Vec<_> = self.records.iter().map(Record::cells).collect();
        table::pipe_table(&Record::HEADERS, &rows)
    }
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    helpers::register(&mut env);
    env
}

/// Renders a README template with the values of `config`.
///
/// Any variable the template uses that is not provided is an error.
pub fn render_readme(name: &str, template: &str, config: &ReadmeConfig) -> Result<String> {
    if config.features.len() < 2 {
        bail!("At least two features are required, found {}.", config.features.len());
    }

    let rendered = environment()
        .render_named_str(name, template, context! {
            table_of_contents => &config.table_of_contents,
            feature1 => &config.features[0],
            feature2 => &config.features[1],
            features => &config.features,
            custom_section => &config.custom_section,
            table => config.table(),
            records => &config.records,
        })
        .with_context(|| format!("could not render template {name}"))?;
    Ok(rendered)
}

/// Reads the template, renders it and writes the README. Returns the path written.
pub fn generate_readme(config: &ReadmeConfig, base_dir: &Path) -> Result<PathBuf> {
    check_base_dir(base_dir)?;
    let template_path = resolve_in(base_dir, &config.template);
    let output_path = resolve_in(base_dir, &config.output);

    debug!("Reading template from '{}'", path_to_string(&template_path));
    let template = std::fs::read_to_string(&template_path)
        .with_context(|| format!("could not read {}", path_to_string(&template_path)))?;
    let name = path_to_string(&config.template);
    let rendered = render_readme(&name, &template, config)?;

    std::fs::write(&output_path, &rendered)
        .with_context(|| format!("could not write {}", path_to_string(&output_path)))?;
    info!("Wrote {} bytes to '{}'", rendered.len(), path_to_string(&output_path));
    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
| Name   |   Age | Country   |
|:-------|------:|:----------|
| John   |    30 | USA       |
| Alice  |    25 | Canada    |
| Bob    |    22 | UK        |";

    #[test]
    fn default_table() {
        assert_eq!(ReadmeConfig::default().table(), TABLE);
    }

    #[test]
    fn rendering_placeholders() {
        let template = "\
# Project

{{ table_of_contents }}

- {{ feature1 }}
- {{ feature2 }}

{{ table }}

{{ custom_section }}
";
        let rendered = render_readme("README.md", template, &ReadmeConfig::default()).unwrap();
        let expected = format!(
            "# Project\n\n1. Introduction\n2. Usage\n3. Example\n\n- Feature 1\n- Feature 2\n\n\
             {TABLE}\n\nAdditional information and notes."
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn rendering_lists() {
        let template = "{% for f in features %}{{ f }};{% endfor %}\
                        {% for r in records %}{{ r.Name }}={{ r.Age }} {% endfor %}";
        let rendered = render_readme("list.md", template, &ReadmeConfig::default()).unwrap();
        assert_eq!(rendered, "Feature 1;Feature 2;Feature 3;John=30 Alice=25 Bob=22 ");
    }

    #[test]
    fn rendering_project_template() {
        let template = include_str!("../../../scripts/README_template.md");
        let rendered = render_readme("README.md", template, &ReadmeConfig::default()).unwrap();
        assert!(rendered.starts_with("# typeforge\n"));
        assert!(rendered.contains(TABLE));
        assert!(rendered.contains("```sh\nsubset-font "));
        assert!(rendered.contains("- **font-info**: prints the identity of font files\n"));
        assert!(!rendered.contains("{{"));
    }

    #[test]
    fn unknown_placeholders_fail() {
        let result = render_readme("bad.md", "{{ title }}", &ReadmeConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn too_few_features_fail() {
        let config = ReadmeConfig { features: vec!["Only".to_string()], ..Default::default() };
        assert!(render_readme("x.md", "{{ feature1 }}", &config).is_err());
    }

    #[test]
    fn loading_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readme.toml");
        std::fs::write(
            &path,
            r#"
            custom_section = "See the wiki."

            [[records]]
            Name = "Zoe"
            Age = 41
            Country = "France"
            "#,
        )
        .unwrap();

        let config = ReadmeConfig::load(&path).unwrap();
        assert_eq!(config.custom_section, "See the wiki.");
        assert_eq!(config.records, vec![Record::new("Zoe", 41, "France")]);
        assert_eq!(config.features.len(), 3);
        assert_eq!(config.template, Path::new("scripts/README_template.md"));
    }

    #[test]
    fn generating_readme_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("scripts")).unwrap();
        std::fs::write(dir.path().join("scripts/README_template.md"), "{{ table }}\n").unwrap();
        std::fs::write(dir.path().join("README.md"), "stale content that is longer").unwrap();

        let written = generate_readme(&ReadmeConfig::default(), dir.path()).unwrap();
        assert_eq!(written, dir.path().join("README.md"));
        assert_eq!(std::fs::read_to_string(written).unwrap(), TABLE);
    }

    #[test]
    fn missing_template_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(generate_readme(&ReadmeConfig::default(), dir.path()).is_err());
        assert!(!dir.path().join("README.md").exists());
    }
}
