//! Minimal access to the table directory of an OpenType font.

use anyhow::{bail, ensure, Context, Result};
use std::ops::Range;

/// The magic number `head.checksumAdjustment` is computed against.
pub const SFNT_CHECKSUM: u32 = 0xB1B0_AFBA;

const COLLECTION_TAG: &[u8] = b"ttcf";
const SFNT_HEADER_LEN: usize = 12;
const TABLE_RECORD_LEN: usize = 16;

/// Converts a table or feature tag such as `TTFA` or `liga` to its numeric form.
///
/// Tags shorter than four characters are padded with spaces.
pub fn tag(str: &str) -> Result<u32> {
    ensure!(
        !str.is_empty() && str.len() <= 4 && str.bytes().all(|b| (0x20..=0x7E).contains(&b)),
        "{str:?} is not a valid OpenType tag",
    );
    let mut bytes = [b' '; 4];
    bytes[..str.len()].copy_from_slice(str.as_bytes());
    Ok(u32::from_be_bytes(bytes))
}

pub fn tag_to_string(tag: u32) -> String {
    String::from_utf8_lossy(&tag.to_be_bytes()).trim_end().to_string()
}

pub(crate) fn read_u16(data: &[u8], offset: usize) -> Result<u16> {
    let bytes = data
        .get(offset..offset + 2)
        .with_context(|| format!("unexpected end of data at offset {offset}"))?;
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}

pub(crate) fn read_i16(data: &[u8], offset: usize) -> Result<i16> {
    Ok(read_u16(data, offset)? as i16)
}

pub(crate) fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    let bytes = data
        .get(offset..offset + 4)
        .with_context(|| format!("unexpected end of data at offset {offset}"))?;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

pub(crate) fn write_u32(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

/// Computes the OpenType checksum of a byte range, padding it with zeroes to a 4-byte boundary.
pub fn checksum(data: &[u8]) -> u32 {
    let mut sum = 0u32;
    for chunk in data.chunks(4) {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum = sum.wrapping_add(u32::from_be_bytes(word));
    }
    sum
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct TableRecord {
    pub checksum: u32,
    pub offset: usize,
    pub length: usize,
    /// Where the record itself lives in the font data.
    pub record_offset: usize,
}
impl TableRecord {
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.length
    }
}

/// Finds a table in the first font of an OpenType font or font collection.
pub(crate) fn find_table(font: &[u8], tag: u32) -> Result<Option<TableRecord>> {
    let directory = if font.get(0..4) == Some(COLLECTION_TAG) {
        read_u32(font, 12)? as usize
    } else {
        0
    };

    let table_count = read_u16(font, directory + 4)? as usize;
    for i in 0..table_count {
        let record_offset = directory + SFNT_HEADER_LEN + i * TABLE_RECORD_LEN;
        if read_u32(font, record_offset)? != tag {
            continue;
        }

        let record = TableRecord {
            checksum: read_u32(font, record_offset + 4)?,
            offset: read_u32(font, record_offset + 8)? as usize,
            length: read_u32(font, record_offset + 12)? as usize,
            record_offset,
        };
        if record.offset + record.length > font.len() {
            bail!("Table '{}' is out of bounds.", tag_to_string(tag));
        }
        return Ok(Some(record));
    }
    Ok(None)
}
