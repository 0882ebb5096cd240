use crate::{
    font_info::FontInfo,
    head::{self, HeadPatch},
    sfnt,
};
use anyhow::{Context, Result};
use chrono::Utc;
use enumset::{EnumSet, EnumSetType};
use hb_subset::{
    sys::{
        hb_set_add, hb_set_clear, hb_set_invert, hb_set_t,
        hb_subset_flags_t_HB_SUBSET_FLAGS_DESUBROUTINIZE,
        hb_subset_flags_t_HB_SUBSET_FLAGS_GLYPH_NAMES,
        hb_subset_flags_t_HB_SUBSET_FLAGS_NAME_LEGACY,
        hb_subset_flags_t_HB_SUBSET_FLAGS_NOTDEF_OUTLINE,
        hb_subset_flags_t_HB_SUBSET_FLAGS_NO_HINTING,
        hb_subset_flags_t_HB_SUBSET_FLAGS_RETAIN_GIDS, hb_subset_input_get_flags,
        hb_subset_input_set, hb_subset_input_set_flags,
        hb_subset_sets_t_HB_SUBSET_SETS_DROP_TABLE_TAG,
        hb_subset_sets_t_HB_SUBSET_SETS_LAYOUT_FEATURE_TAG,
        hb_subset_sets_t_HB_SUBSET_SETS_NAME_ID, hb_subset_sets_t_HB_SUBSET_SETS_NAME_LANG_ID,
    },
    Blob, FontFace, SubsetInput,
};
use roaring::RoaringBitmap;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};
use typeforge_common::ranges::RangeList;

/// Boolean switches of a [`SubsetOptions`].
#[derive(EnumSetType, Debug, Serialize, Deserialize)]
#[enumset(serialize_repr = "list")]
#[serde(rename_all = "snake_case")]
pub enum SubsetFlag {
    /// Keep legacy (non-Unicode) name records.
    NameLegacy,
    /// Keep the outline of the `.notdef` glyph.
    NotdefOutline,
    /// Keep the bounding box HarfBuzz computes for the subset. Without this flag the bounding
    /// box of the source font is restored.
    RecalcBounds,
    /// Set `head.modified` to the time of subsetting.
    RecalcTimestamp,
    /// Keep glyph names in the `post` table.
    GlyphNames,
    /// Drop hinting instructions.
    NoHinting,
    /// Remove CFF subroutines.
    Desubroutinize,
}

/// Either every value, written as `"*"`, or an explicit list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Selection<T> {
    All,
    Only(Vec<T>),
}
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Selection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawSelection<T> {
            Wildcard(String),
            List(Vec<T>),
        }

        match RawSelection::deserialize(deserializer)? {
            RawSelection::Wildcard(str) if str == "*" => Ok(Selection::All),
            RawSelection::Wildcard(str) => {
                Err(de::Error::custom(format!("expected \"*\" or a list, found {str:?}")))
            }
            RawSelection::List(list) => Ok(Selection::Only(list)),
        }
    }
}

/// How glyphs are numbered in the subset font.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlyphOrder {
    /// Kept glyphs are renumbered in the order of the source font.
    #[default]
    Canonical,
    /// Glyphs keep their source ids, leaving empty slots for removed glyphs.
    RetainGids,
}

/// Options controlling what a subset font keeps.
///
/// The defaults keep every name record, language and layout feature, and drop the `TTFA`
/// table on top of HarfBuzz's default list of dropped tables.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SubsetOptions {
    pub name_ids: Selection<u32>,
    pub name_languages: Selection<u32>,
    pub layout_features: Selection<String>,
    pub flags: EnumSet<SubsetFlag>,
    pub glyph_order: GlyphOrder,
    /// Tables to drop, in addition to the ones HarfBuzz drops by default.
    pub drop_tables: Vec<String>,
}
impl Default for SubsetOptions {
    fn default() -> Self {
        SubsetOptions {
            name_ids: Selection::All,
            name_languages: Selection::All,
            layout_features: Selection::All,
            flags: SubsetFlag::NameLegacy
                | SubsetFlag::NotdefOutline
                | SubsetFlag::RecalcBounds
                | SubsetFlag::RecalcTimestamp,
            glyph_order: GlyphOrder::Canonical,
            drop_tables: vec!["TTFA".to_string()],
        }
    }
}
impl SubsetOptions {
    /// Loads options from a TOML file. Missing keys take their default values.
    pub fn load(path: &Path) -> Result<SubsetOptions> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("invalid subset options in {}", path.display()))
    }

    fn hb_flags(&self) -> u32 {
        let mut flags = 0;
        if self.flags.contains(SubsetFlag::NameLegacy) {
            flags |= hb_subset_flags_t_HB_SUBSET_FLAGS_NAME_LEGACY;
        }
        if self.flags.contains(SubsetFlag::NotdefOutline) {
            flags |= hb_subset_flags_t_HB_SUBSET_FLAGS_NOTDEF_OUTLINE;
        }
        if self.flags.contains(SubsetFlag::GlyphNames) {
            flags |= hb_subset_flags_t_HB_SUBSET_FLAGS_GLYPH_NAMES;
        }
        if self.flags.contains(SubsetFlag::NoHinting) {
            flags |= hb_subset_flags_t_HB_SUBSET_FLAGS_NO_HINTING;
        }
        if self.flags.contains(SubsetFlag::Desubroutinize) {
            flags |= hb_subset_flags_t_HB_SUBSET_FLAGS_DESUBROUTINIZE;
        }
        if self.glyph_order == GlyphOrder::RetainGids {
            flags |= hb_subset_flags_t_HB_SUBSET_FLAGS_RETAIN_GIDS;
        }
        flags
    }

    fn apply(&self, input: &mut SubsetInput) -> Result<()> {
        let features = match &self.layout_features {
            Selection::All => Selection::All,
            Selection::Only(list) => {
                Selection::Only(list.iter().map(|x| sfnt::tag(x)).collect::<Result<_>>()?)
            }
        };
        let drop_tables =
            self.drop_tables.iter().map(|x| sfnt::tag(x)).collect::<Result<Vec<_>>>()?;

        unsafe {
            let raw = input.as_raw();
            let flags = hb_subset_input_get_flags(raw) | self.hb_flags();
            hb_subset_input_set_flags(raw, flags);

            fill_set(
                hb_subset_input_set(raw, hb_subset_sets_t_HB_SUBSET_SETS_NAME_ID),
                &self.name_ids,
            );
            fill_set(
                hb_subset_input_set(raw, hb_subset_sets_t_HB_SUBSET_SETS_NAME_LANG_ID),
                &self.name_languages,
            );
            fill_set(
                hb_subset_input_set(raw, hb_subset_sets_t_HB_SUBSET_SETS_LAYOUT_FEATURE_TAG),
                &features,
            );

            let drop_set =
                hb_subset_input_set(raw, hb_subset_sets_t_HB_SUBSET_SETS_DROP_TABLE_TAG);
            for tag in drop_tables {
                hb_set_add(drop_set, tag);
            }
        }
        Ok(())
    }
}

unsafe fn fill_set(set: *mut hb_set_t, selection: &Selection<u32>) {
    hb_set_clear(set);
    match selection {
        Selection::All => hb_set_invert(set),
        Selection::Only(list) => {
            for value in list {
                hb_set_add(set, *value);
            }
        }
    }
}

/// Reduces a font to the glyphs needed to render `codepoints`.
///
/// Glyphs reachable through substitutions (ligatures, alternates) are kept as well. Values that
/// are not Unicode scalar values are skipped.
pub fn subset_font(
    font_data: &[u8],
    codepoints: &[u32],
    options: &SubsetOptions,
) -> Result<Vec<u8>> {
    let blob = Blob::from_bytes(font_data)?;
    let font = FontFace::new_with_index(blob, 0)?;

    let mut subset_input = SubsetInput::new()?;
    subset_input.unicode_set().clear();
    for &code in codepoints {
        if let Some(ch) = char::from_u32(code) {
            subset_input.unicode_set().insert(ch);
        } else {
            warn!("Skipping U+{code:04X}, which is not a Unicode scalar value.");
        }
    }
    options.apply(&mut subset_input)?;

    let new_font = subset_input.subset_font(&font)?;
    let mut new_font = new_font.underlying_blob().to_vec();

    let patch = HeadPatch {
        modified: options.flags.contains(SubsetFlag::RecalcTimestamp).then(Utc::now),
        bounding_box: if options.flags.contains(SubsetFlag::RecalcBounds) {
            None
        } else {
            Some(head::read_bounding_box(font_data)?)
        },
    };
    head::patch_head(&mut new_font, &patch)?;

    Ok(new_font)
}

/// Subsets the font at `source` and writes the result to `target`.
pub fn subset_font_file(
    source: &Path,
    target: &Path,
    codepoints: &[u32],
    options: &SubsetOptions,
) -> Result<()> {
    let font_data =
        std::fs::read(source).with_context(|| format!("could not read {}", source.display()))?;

    let info = FontInfo::load(&font_data)?;
    let requested: RoaringBitmap = codepoints.iter().copied().collect();
    let available = info[0].codepoints_in_set(&requested);
    let missing = requested - &available;
    if !missing.is_empty() {
        warn!(
            "{} requested codepoints are not in {}: {}",
            missing.len(),
            info[0],
            RangeList::from_codepoints(missing.iter()),
        );
    }
    debug!("Subsetting {:?} to {} codepoints.", info[0], available.len());

    let new_font = subset_font(&font_data, codepoints, options)
        .with_context(|| format!("could not subset {}", source.display()))?;
    std::fs::write(target, &new_font)
        .with_context(|| format!("could not write {}", target.display()))?;
    info!(
        "Wrote {} ({} -> {} bytes)",
        target.display(),
        font_data.len(),
        new_font.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let options = SubsetOptions::default();
        assert_eq!(options.name_ids, Selection::All);
        assert!(options.flags.contains(SubsetFlag::NameLegacy));
        assert!(options.flags.contains(SubsetFlag::RecalcTimestamp));
        assert!(!options.flags.contains(SubsetFlag::NoHinting));
        assert_eq!(options.glyph_order, GlyphOrder::Canonical);
        assert_eq!(options.drop_tables, ["TTFA"]);
    }

    #[test]
    fn options_from_toml() {
        let options: SubsetOptions = toml::from_str(
            r#"
            name_ids = [1, 2, 3]
            layout_features = "*"
            flags = ["notdef_outline", "no_hinting"]
            glyph_order = "retain_gids"
            "#,
        )
        .unwrap();
        assert_eq!(options.name_ids, Selection::Only(vec![1, 2, 3]));
        assert_eq!(options.name_languages, Selection::All);
        assert_eq!(options.layout_features, Selection::All);
        assert_eq!(options.flags, SubsetFlag::NotdefOutline | SubsetFlag::NoHinting);
        assert_eq!(options.glyph_order, GlyphOrder::RetainGids);
        assert_eq!(options.drop_tables, ["TTFA"]);
    }

    #[test]
    fn bad_wildcard_is_rejected() {
        let result = toml::from_str::<SubsetOptions>(r#"name_ids = "all""#);
        assert!(result.is_err());
    }

    #[test]
    fn flags_map_to_harfbuzz() {
        let options = SubsetOptions {
            flags: EnumSet::empty(),
            glyph_order: GlyphOrder::RetainGids,
            ..SubsetOptions::default()
        };
        assert_eq!(options.hb_flags(), hb_subset_flags_t_HB_SUBSET_FLAGS_RETAIN_GIDS);

        let options = SubsetOptions::default();
        assert_eq!(
            options.hb_flags(),
            hb_subset_flags_t_HB_SUBSET_FLAGS_NAME_LEGACY
                | hb_subset_flags_t_HB_SUBSET_FLAGS_NOTDEF_OUTLINE,
        );
    }
}
