use crate::sfnt::{read_i16, read_u16, read_u32};
use hb_subset::{
    sys::{
        hb_blob_destroy, hb_blob_get_data, hb_face_reference_table, hb_face_t, hb_font_create,
        hb_font_destroy, hb_font_get_glyph_h_advance, hb_font_get_nominal_glyph,
    },
    FontFace,
};
use std::{ffi::c_uint, slice};

/// Letter frequencies of English text, used to weight advance widths when computing the
/// average x-width of a font.
const WEIGHTINGS: &[(char, f64)] = &[
    ('a', 0.0668),
    ('b', 0.0122),
    ('c', 0.0228),
    ('d', 0.0348),
    ('e', 0.1039),
    ('f', 0.0182),
    ('g', 0.0165),
    ('h', 0.0499),
    ('i', 0.057),
    ('j', 0.0013),
    ('k', 0.0063),
    ('l', 0.0329),
    ('m', 0.0197),
    ('n', 0.0552),
    ('o', 0.0614),
    ('p', 0.0158),
    ('q', 0.0008),
    ('r', 0.049),
    ('s', 0.0518),
    ('t', 0.0741),
    ('u', 0.0226),
    ('v', 0.008),
    ('w', 0.0193),
    ('x', 0.0012),
    ('y', 0.0162),
    ('z', 0.0006),
    (' ', 0.1818),
];

/// The `head` bounding box of all glyphs, in font units.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BoundingBox {
    pub min_x: i16,
    pub min_y: i16,
    pub max_x: i16,
    pub max_y: i16,
}

/// Vertical metrics of a font, in font units.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FontMetrics {
    pub ascent: Option<i16>,
    pub descent: Option<i16>,
    pub line_gap: Option<i16>,
    pub underline_position: Option<i16>,
    pub underline_thickness: Option<i16>,
    pub cap_height: Option<i16>,
    pub x_height: Option<i16>,
    /// Counter-clockwise slant from the vertical, in degrees.
    pub italic_angle: Option<f64>,
    pub bounding_box: Option<BoundingBox>,
}

unsafe fn table_data(face: *mut hb_face_t, tag: &[u8; 4]) -> Vec<u8> {
    let blob = hb_face_reference_table(face, u32::from_be_bytes(*tag));
    let mut len: c_uint = 0;
    let data = hb_blob_get_data(blob, &mut len);
    let out = if data.is_null() || len == 0 {
        Vec::new()
    } else {
        slice::from_raw_parts(data as *const u8, len as usize).to_vec()
    };
    hb_blob_destroy(blob);
    out
}

pub(crate) fn read_metrics(face: &FontFace) -> FontMetrics {
    let (head, hhea, os2, post) = unsafe {
        let face = face.as_raw();
        (
            table_data(face, b"head"),
            table_data(face, b"hhea"),
            table_data(face, b"OS/2"),
            table_data(face, b"post"),
        )
    };

    let mut metrics = FontMetrics {
        ascent: read_i16(&hhea, 4).ok(),
        descent: read_i16(&hhea, 6).ok(),
        line_gap: read_i16(&hhea, 8).ok(),
        underline_position: read_i16(&post, 8).ok(),
        underline_thickness: read_i16(&post, 10).ok(),
        italic_angle: read_u32(&post, 4).ok().map(|fixed| fixed as i32 as f64 / 65536.0),
        bounding_box: read_bounding_box(&head),
        ..FontMetrics::default()
    };
    // sxHeight and sCapHeight only exist from OS/2 version 2 onwards
    if read_u16(&os2, 0).is_ok_and(|version| version >= 2) {
        metrics.x_height = read_i16(&os2, 86).ok();
        metrics.cap_height = read_i16(&os2, 88).ok();
    }
    metrics
}

fn read_bounding_box(head: &[u8]) -> Option<BoundingBox> {
    Some(BoundingBox {
        min_x: read_i16(head, 36).ok()?,
        min_y: read_i16(head, 38).ok()?,
        max_x: read_i16(head, 40).ok()?,
        max_y: read_i16(head, 42).ok()?,
    })
}

/// Computes the letter-frequency weighted average advance width of lowercase Latin text.
///
/// Characters missing from the font contribute the advance of `.notdef`.
pub(crate) fn weighted_x_width(face: &FontFace) -> u32 {
    let mut weighted_width = 0.0;
    unsafe {
        let font = hb_font_create(face.as_raw());
        for &(ch, weight) in WEIGHTINGS {
            let mut glyph = 0;
            if hb_font_get_nominal_glyph(font, ch as u32, &mut glyph) == 0 {
                glyph = 0;
            }
            let advance = hb_font_get_glyph_h_advance(font, glyph);
            weighted_width += advance as f64 * weight;
        }
        hb_font_destroy(font);
    }
    weighted_width.round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_from_head() {
        let mut head = vec![0u8; 54];
        head[36..44].copy_from_slice(&[0xFF, 0x9C, 0xFF, 0x38, 0x03, 0xE8, 0x07, 0xD0]);
        let bbox = read_bounding_box(&head).unwrap();
        assert_eq!(bbox, BoundingBox { min_x: -100, min_y: -200, max_x: 1000, max_y: 2000 });
        assert_eq!(read_bounding_box(&head[..40]), None);
    }

    #[test]
    fn weightings_sum_to_one() {
        let sum: f64 = WEIGHTINGS.iter().map(|(_, weight)| weight).sum();
        assert!((sum - 1.0).abs() < 0.01, "{sum}");
    }
}
