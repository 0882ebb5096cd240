use anyhow::{bail, Context, Result};
use crate::sfnt::tag_to_string;
use hb_subset::{
    sys::{hb_face_get_upem, hb_ot_layout_table_get_feature_tags, hb_tag_t},
    Blob, FontFace,
};
use regex::Regex;
use roaring::RoaringBitmap;
use std::{
    fmt::{Debug, Display, Formatter},
    path::Path,
    sync::LazyLock,
};
use tracing::debug;

mod metrics;
mod registered_axes;
mod variation_axes;

pub use metrics::{BoundingBox, FontMetrics};
pub use registered_axes::RegisteredAxis;
pub use variation_axes::{NamedInstance, VariationAxis};

static VERSION_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.\d+").unwrap());
static GITHUB_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((https://github\.com/[^)]+)\)").unwrap());

fn read_layout_features(face: &FontFace) -> Vec<String> {
    let mut features = Vec::new();
    for table in [b"GSUB", b"GPOS"] {
        unsafe {
            let face = face.as_raw();
            let table = u32::from_be_bytes(*table);
            let count = hb_ot_layout_table_get_feature_tags(
                face,
                table,
                0,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
            );
            let mut tags: Vec<hb_tag_t> = vec![0; count as usize];
            let mut len = count;
            hb_ot_layout_table_get_feature_tags(face, table, 0, &mut len, tags.as_mut_ptr());
            tags.truncate(len as usize);
            features.extend(tags.into_iter().map(tag_to_string));
        }
    }
    features.sort();
    features.dedup();
    features
}

/// Identity, metrics and coverage of a single font face.
#[derive(Clone)]
pub struct FontInfo {
    pub postscript_name: String,
    pub font_family: String,
    pub font_style: String,
    pub copyright: String,
    pub font_version: String,
    pub units_per_em: u32,
    pub glyph_count: usize,
    pub variations: Vec<VariationAxis>,
    pub named_instances: Vec<NamedInstance>,
    /// Feature tags of the `GSUB` and `GPOS` tables, sorted and deduplicated.
    pub layout_features: Vec<String>,
    pub metrics: FontMetrics,
    pub x_width_avg: u32,
    available_codepoints: RoaringBitmap,
}
impl FontInfo {
    /// Loads every font face in a font file or font collection.
    pub fn load(buffer: &[u8]) -> Result<Vec<FontInfo>> {
        let is_woff = buffer.len() >= 4 && &buffer[0..4] == b"wOFF";
        let is_woff2 = buffer.len() >= 4 && &buffer[0..4] == b"wOF2";
        let is_collection = buffer.len() >= 4 && &buffer[0..4] == b"ttcf";

        if is_woff || is_woff2 {
            bail!("woff/woff2 input is not supported. Please convert to .ttf or .otf first.");
        }

        let mut fonts = Vec::new();
        if let Some(font) = Self::load_for_font(buffer, 0)? {
            fonts.push(font);
        } else {
            bail!("No glyphs in first font?");
        }

        if is_collection {
            let mut i = 1;
            while let Some(x) = Self::load_for_font(buffer, i)? {
                fonts.push(x);
                i += 1;
            }
        }

        debug!("Found {} fonts in collection.", fonts.len());

        Ok(fonts)
    }

    /// Loads every font face in a file.
    pub fn load_file(path: &Path) -> Result<Vec<FontInfo>> {
        let buffer =
            std::fs::read(path).with_context(|| format!("could not read {}", path.display()))?;
        Self::load(&buffer).with_context(|| format!("could not load {}", path.display()))
    }

    fn load_for_font(buffer: &[u8], idx: u32) -> Result<Option<FontInfo>> {
        let blob = Blob::from_bytes(buffer)?;
        let font_face = FontFace::new_with_index(blob, idx)?;
        if font_face.glyph_count() == 0 {
            return Ok(None);
        }

        let variations = variation_axes::get_variation_axes(&font_face);
        let is_variable = !variations.is_empty();

        let font_family = if is_variable {
            // a lot of dynamic fonts have a weight prebaked in the font_family for some reason
            let family = font_face.font_family();
            let typographic_family = font_face.typographic_family();

            if family.starts_with(&typographic_family) && !typographic_family.is_empty() {
                typographic_family
            } else {
                family
            }
        } else {
            font_face.font_family()
        };
        let font_style = font_face.font_subfamily();
        let font_version = font_face.version_string();
        let units_per_em = unsafe { hb_face_get_upem(font_face.as_raw()) };

        let mut available_codepoints = RoaringBitmap::new();
        for char in &font_face.covered_codepoints()? {
            available_codepoints.insert(char as u32);
        }

        debug!(
            "Loaded font: {font_family} / {font_style} / {font_version} / {} codepoints{}",
            available_codepoints.len(),
            if is_variable { " / Variable font" } else { "" },
        );
        for axis in &variations {
            debug!(
                "- {} / ({}..={}, default: {})",
                axis.name,
                axis.range.start(),
                axis.range.end(),
                axis.default,
            );
        }

        Ok(Some(FontInfo {
            postscript_name: font_face.postscript_name(),
            font_family,
            font_style,
            copyright: font_face.copyright(),
            font_version,
            units_per_em,
            glyph_count: font_face.glyph_count() as usize,
            named_instances: variation_axes::get_named_instances(&font_face, &variations),
            variations,
            layout_features: read_layout_features(&font_face),
            metrics: metrics::read_metrics(&font_face),
            x_width_avg: metrics::weighted_x_width(&font_face),
            available_codepoints,
        }))
    }

    pub fn is_variable(&self) -> bool {
        !self.variations.is_empty()
    }

    /// The version string up to the first `;`, e.g. `Version 2.37` for
    /// `Version 2.37;Glyphs 3.2`.
    pub fn version_display(&self) -> &str {
        self.font_version.split(';').next().unwrap_or_default()
    }

    /// The first `major.minor` number in the version string.
    pub fn version_number(&self) -> Option<&str> {
        VERSION_NUMBER.find(&self.font_version).map(|m| m.as_str())
    }

    /// The first `(https://github.com/...)` link in the copyright notice, without parentheses.
    pub fn copyright_url(&self) -> Option<&str> {
        GITHUB_URL
            .captures(&self.copyright)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    pub fn codepoints_in_set(&self, set: &RoaringBitmap) -> RoaringBitmap {
        self.available_codepoints.clone() & set
    }
    pub fn all_codepoints(&self) -> &RoaringBitmap {
        &self.available_codepoints
    }
}
impl Debug for FontInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[font: {} / {} / {}]",
            self.font_family,
            self.font_style,
            self.version_display(),
        )
    }
}
impl Display for FontInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.font_family, self.font_style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info_with(version: &str, copyright: &str) -> FontInfo {
        FontInfo {
            postscript_name: String::new(),
            font_family: "Test".to_string(),
            font_style: "Regular".to_string(),
            copyright: copyright.to_string(),
            font_version: version.to_string(),
            units_per_em: 1000,
            glyph_count: 1,
            variations: vec![],
            named_instances: vec![],
            layout_features: vec![],
            metrics: FontMetrics::default(),
            x_width_avg: 0,
            available_codepoints: RoaringBitmap::new(),
        }
    }

    #[test]
    fn version_strings() {
        let info = info_with("Version 2.037;Glyphs 3.2 (3227)", "");
        assert_eq!(info.version_display(), "Version 2.037");
        assert_eq!(info.version_number(), Some("2.037"));

        assert_eq!(info_with("Version 7", "").version_number(), None);
        assert_eq!(info_with("v3 build 1.5", "").version_number(), Some("1.5"));
        assert_eq!(info_with("", "").version_display(), "");
        assert_eq!(info_with(" Version 1.0 ; build", "").version_display(), " Version 1.0 ");
        assert_eq!(info_with("1.2.3", "").version_number(), Some("1.2"));
    }

    #[test]
    fn copyright_urls() {
        let info = info_with("", "Copyright 2020 The Inter Project (https://github.com/rsms/inter)");
        assert_eq!(info.copyright_url(), Some("https://github.com/rsms/inter"));
        assert_eq!(info_with("", "Copyright 2020 Someone").copyright_url(), None);
        assert_eq!(info_with("", "(https://github.com/)").copyright_url(), None);

        let info = info_with(
            "",
            "Copyright (https://github.com/) Project (https://github.com/rsms/inter)",
        );
        assert_eq!(info.copyright_url(), Some("https://github.com/rsms/inter"));
    }

    #[test]
    fn woff_is_rejected() {
        let err = FontInfo::load(b"wOF2\0\0\0\0").unwrap_err();
        assert!(err.to_string().contains("woff"), "{err}");
    }
}
