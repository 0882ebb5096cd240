//! Extracts font metadata into per-directory `metadata.json` files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use tracing::{error, info, warn};
use typeforge_common::paths::{path_to_string, resolve_in};
use typeforge_fontops::font_info::{BoundingBox, FontInfo, NamedInstance, VariationAxis};

pub const METADATA_FILE: &str = "metadata.json";

/// An entry of the fonts list.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct FontEntry {
    pub name: String,
    pub infile: PathBuf,
    pub outpath: PathBuf,
    #[serde(default)]
    pub category: Option<String>,
}

/// Reads the list of fonts to process.
pub fn read_font_entries(path: &Path) -> Result<Vec<FontEntry>> {
    if !path.exists() {
        bail!("File not found: {}", path_to_string(path));
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path_to_string(path)))?;
    serde_json::from_str(&text)
        .with_context(|| format!("could not parse fonts list {}", path_to_string(path)))
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AxisRecord {
    pub name: String,
    pub min: f32,
    pub default: f32,
    pub max: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
}
impl AxisRecord {
    fn new(axis: &VariationAxis) -> AxisRecord {
        AxisRecord {
            name: axis.name.clone(),
            min: *axis.range.start(),
            default: axis.default,
            max: *axis.range.end(),
            valid: axis.is_valid().filter(|&valid| valid),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BboxRecord {
    pub min_x: i16,
    pub min_y: i16,
    pub max_x: i16,
    pub max_y: i16,
}
impl From<BoundingBox> for BboxRecord {
    fn from(bbox: BoundingBox) -> Self {
        BboxRecord { min_x: bbox.min_x, min_y: bbox.min_y, max_x: bbox.max_x, max_y: bbox.max_y }
    }
}

fn named_variations(instances: &[NamedInstance]) -> BTreeMap<String, BTreeMap<String, f32>> {
    instances
        .iter()
        .map(|instance| (instance.name.clone(), instance.coordinates.iter().cloned().collect()))
        .collect()
}

/// The metadata stored for one font.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontRecord {
    pub postscript_name: String,
    pub family_name: String,
    pub category: Option<String>,
    pub subfamily_name: String,
    pub copyright: String,
    pub version: String,
    pub version_display: String,
    pub outpath: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variation_axes: BTreeMap<String, AxisRecord>,
    pub units_per_em: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ascent: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descent: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_gap: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline_position: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline_thickness: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap_height: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_height: Option<i16>,
    pub character_set: Vec<u32>,
    pub num_glyphs: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_width_avg: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BboxRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub available_features: Vec<String>,
    /// Design coordinates of each named instance, keyed by instance name and then axis tag.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub named_variations: BTreeMap<String, BTreeMap<String, f32>>,
}
impl FontRecord {
    pub fn new(entry: &FontEntry, info: &FontInfo) -> FontRecord {
        let metrics = &info.metrics;
        // Both underline values are needed to draw an underline.
        let (underline_position, underline_thickness) =
            match (metrics.underline_position, metrics.underline_thickness) {
                (Some(position), Some(thickness)) => (Some(position), Some(thickness)),
                _ => (None, None),
            };

        FontRecord {
            postscript_name: info.postscript_name.clone(),
            family_name: info.font_family.clone(),
            category: entry.category.clone(),
            subfamily_name: info.font_style.clone(),
            copyright: info.copyright.clone(),
            version: info.font_version.clone(),
            version_display: info.version_display().to_string(),
            outpath: path_to_string(&entry.outpath),
            variation_axes: info
                .variations
                .iter()
                .map(|axis| (axis.tag_name(), AxisRecord::new(axis)))
                .collect(),
            units_per_em: info.units_per_em,
            ascent: metrics.ascent,
            descent: metrics.descent,
            line_gap: metrics.line_gap,
            underline_position,
            underline_thickness,
            cap_height: metrics.cap_height,
            x_height: metrics.x_height,
            character_set: info.all_codepoints().iter().collect(),
            num_glyphs: info.glyph_count,
            version_number: info.version_number().map(str::to_string),
            copyright_url: info.copyright_url().map(str::to_string),
            x_width_avg: Some(info.x_width_avg).filter(|&x| x != 0),
            italic_angle: metrics.italic_angle.filter(|&angle| angle != 0.0),
            bbox: metrics.bounding_box.map(BboxRecord::from),
            available_features: info.layout_features.clone(),
            named_variations: named_variations(&info.named_instances),
        }
    }
}

/// Stores `record` under `key` in a `metadata.json` file, keeping the other keys already there.
pub fn merge_metadata(path: &Path, key: &str, record: &FontRecord) -> Result<()> {
    let mut metadata = if path.exists() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path_to_string(path)))?;
        match serde_json::from_str::<Value>(&text)
            .with_context(|| format!("could not parse {}", path_to_string(path)))?
        {
            Value::Object(map) => map,
            _ => bail!("{} does not contain a JSON object.", path_to_string(path)),
        }
    } else {
        Map::new()
    };
    metadata.insert(key.to_string(), serde_json::to_value(record)?);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("could not create {}", path_to_string(parent)))?;
    }
    let json = serde_json::to_string_pretty(&Value::Object(metadata))?;
    std::fs::write(path, json).with_context(|| format!("could not write {}", path_to_string(path)))
}

fn process_font(entry: &FontEntry, base_dir: &Path) -> Result<PathBuf> {
    let infile = resolve_in(base_dir, &entry.infile);
    let info = FontInfo::load_file(&infile)?
        .into_iter()
        .next()
        .with_context(|| format!("no fonts in {}", path_to_string(&infile)))?;
    info!("Loaded font file '{}': {}", path_to_string(&entry.infile), info.postscript_name);

    let record = FontRecord::new(entry, &info);
    if record.copyright_url.is_none() {
        warn!("No GitHub URL in the copyright notice of '{}'.", entry.name);
    }

    let target = resolve_in(base_dir, &entry.outpath).join(METADATA_FILE);
    merge_metadata(&target, &entry.name, &record)?;
    Ok(target)
}

/// Writes the metadata of every font in `entries`. Fonts that fail are logged and skipped.
///
/// Returns the metadata files that were written.
pub fn generate_metadata(entries: &[FontEntry], base_dir: &Path) -> Vec<PathBuf> {
    let mut written = Vec::new();
    for entry in entries {
        match process_font(entry, base_dir) {
            Ok(path) => {
                info!("Metadata for '{}' written to '{}'", entry.name, path_to_string(&path));
                written.push(path);
            }
            Err(e) => error!("Could not build metadata for '{}': {e:?}", entry.name),
        }
    }
    written
}
