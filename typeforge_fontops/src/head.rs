//! Post-processing of the `head` table of a subset font.

use crate::sfnt::{self, find_table, read_u32, write_u32, SFNT_CHECKSUM};
use anyhow::{ensure, Context, Result};
use chrono::{DateTime, Utc};
use std::ops::Range;
use tracing::debug;

const HEAD_TAG: u32 = u32::from_be_bytes(*b"head");
const HEAD_LEN: usize = 54;
const CHECKSUM_ADJUSTMENT: usize = 8;
const MODIFIED: usize = 28;
const BOUNDING_BOX: Range<usize> = 36..44;

/// Seconds between 1904-01-01 (the OpenType epoch) and 1970-01-01.
const MAC_EPOCH_OFFSET: i64 = 2_082_844_800;

/// Converts a time to an OpenType `LONGDATETIME`.
pub fn to_long_datetime(time: DateTime<Utc>) -> i64 {
    time.timestamp() + MAC_EPOCH_OFFSET
}

/// Changes to apply to a `head` table.
#[derive(Clone, Debug, Default)]
pub struct HeadPatch {
    /// New modification time.
    pub modified: Option<DateTime<Utc>>,
    /// New `xMin`, `yMin`, `xMax` and `yMax`, as raw big-endian bytes.
    pub bounding_box: Option<[u8; 8]>,
}

fn head_range(font: &[u8]) -> Result<(Range<usize>, usize, u32)> {
    let record = find_table(font, HEAD_TAG)?.context("Font has no 'head' table.")?;
    ensure!(record.length >= HEAD_LEN, "'head' table is too short ({} bytes).", record.length);
    Ok((record.range(), record.record_offset, record.checksum))
}

/// Reads the raw bounding box stored in the `head` table.
pub fn read_bounding_box(font: &[u8]) -> Result<[u8; 8]> {
    let (range, _, _) = head_range(font)?;
    let mut bbox = [0; 8];
    bbox.copy_from_slice(&font[range.start + BOUNDING_BOX.start..range.start + BOUNDING_BOX.end]);
    Ok(bbox)
}

/// Reads `head.modified` as an OpenType `LONGDATETIME`.
pub fn read_modified(font: &[u8]) -> Result<i64> {
    let (range, _, _) = head_range(font)?;
    let high = read_u32(font, range.start + MODIFIED)? as u64;
    let low = read_u32(font, range.start + MODIFIED + 4)? as u64;
    Ok(((high << 32) | low) as i64)
}

/// Applies `patch` to a single (non-collection) font, then fixes up the `head` table checksum
/// and `head.checksumAdjustment`.
pub fn patch_head(font: &mut [u8], patch: &HeadPatch) -> Result<()> {
    let (range, record_offset, old_checksum) = head_range(font)?;
    let head = range.start;

    if let Some(modified) = patch.modified {
        let value = to_long_datetime(modified) as u64;
        write_u32(font, head + MODIFIED, (value >> 32) as u32);
        write_u32(font, head + MODIFIED + 4, value as u32);
    }
    if let Some(bbox) = &patch.bounding_box {
        font[head + BOUNDING_BOX.start..head + BOUNDING_BOX.end].copy_from_slice(bbox);
    }

    write_u32(font, head + CHECKSUM_ADJUSTMENT, 0);
    let table_checksum = sfnt::checksum(&font[range]);
    write_u32(font, record_offset + 4, table_checksum);
    let adjustment = SFNT_CHECKSUM.wrapping_sub(sfnt::checksum(font));
    write_u32(font, head + CHECKSUM_ADJUSTMENT, adjustment);

    debug!("Patched 'head': checksum {old_checksum:08x} -> {table_checksum:08x}");
    Ok(())
}
