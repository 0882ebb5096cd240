//! Loads font files and prints a short report of their identity.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, error};
use typeforge_common::paths::path_to_string;
use typeforge_fontops::font_info::FontInfo;

/// A font file and the faces it contains.
#[derive(Clone, Debug)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub fonts: Vec<FontInfo>,
}

/// Loads every file in `paths`. Files that cannot be parsed are logged and skipped.
pub fn load_fonts(paths: impl IntoIterator<Item = PathBuf>) -> Vec<LoadedFile> {
    let mut loaded = Vec::new();
    for path in paths {
        match FontInfo::load_file(&path) {
            Ok(fonts) => {
                debug!("Loaded {} fonts from '{}'", fonts.len(), path_to_string(&path));
                loaded.push(LoadedFile { path, fonts });
            }
            Err(e) => error!("Could not load '{}': {e:?}", path_to_string(&path)),
        }
    }
    loaded
}

pub fn write_font(out: &mut impl Write, path: &Path, info: &FontInfo) -> io::Result<()> {
    writeln!(out, "{}", path_to_string(path))?;
    writeln!(out, "  PostScript name: {}", info.postscript_name)?;
    writeln!(out, "  Family: {}", info.font_family)?;
    writeln!(out, "  Subfamily: {}", info.font_style)?;
    writeln!(out, "  Copyright: {}", info.copyright)?;
    writeln!(out, "  Version: {}", info.font_version)?;
    writeln!(out, "  Units per em: {}", info.units_per_em)?;
    for axis in &info.variations {
        writeln!(
            out,
            "  Axis {}: {} ({}..={}, default: {}){}",
            axis.tag_name(),
            axis.name,
            axis.range.start(),
            axis.range.end(),
            axis.default,
            if axis.is_hidden { ", hidden" } else { "" },
        )?;
    }
    Ok(())
}

/// Writes the report of every font in `files`.
pub fn write_report(out: &mut impl Write, files: &[LoadedFile]) -> io::Result<()> {
    for file in files {
        for font in &file.fonts {
            write_font(out, &file.path, font)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEJAVU_SANS: &[u8] =
        include_bytes!("../../typeforge_fontops/tests/fonts/DejaVuSans.ttf");

    #[test]
    fn bad_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("DejaVuSans.ttf");
        let bad = dir.path().join("broken.ttf");
        std::fs::write(&good, DEJAVU_SANS).unwrap();
        std::fs::write(&bad, b"not a font at all").unwrap();

        let loaded = load_fonts([bad, good.clone(), dir.path().join("missing.ttf")]);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].path, good);
        assert_eq!(loaded[0].fonts.len(), 1);

        let mut out = Vec::new();
        write_report(&mut out, &loaded).unwrap();
        let report = String::from_utf8(out).unwrap();
        assert!(report.starts_with(&format!("{}\n", path_to_string(&good))));
        assert!(report.contains("  PostScript name: DejaVuSans\n"));
        assert!(report.contains("  Family: DejaVu Sans\n"));
        assert!(report.contains("  Units per em: 2048\n"));
        assert!(!report.contains("Axis"));
    }
}
