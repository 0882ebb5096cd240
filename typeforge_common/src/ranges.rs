use anyhow::{bail, Context, Result};
use std::{
    fmt::{Display, Formatter},
    ops::RangeInclusive,
    str::FromStr,
};

/// The Unicode ranges covered by the French web subset.
pub const DEFAULT_UNICODE_RANGE: &str = "U+0000-007F,U+00A0-00B5,U+00B6-0100,U+0131,U+0152-0154,\
U+02BB-02BD,U+02C6,U+02DA,U+02DC,U+2002-2008,U+2009-200C,U+2010,U+2013-2016,U+2018-201B,\
U+201C-201F,U+2020-2023,U+2026,U+202F-2031,U+2032-2035,U+2039-203B,U+2044,U+2052,U+2074,U+20AC,\
U+2122,U+2191,U+2193,U+2212,U+FEFF";

/// A single entry of a [`RangeList`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UnicodeRange {
    Single(u32),
    Span(RangeInclusive<u32>),
}
impl UnicodeRange {
    pub fn codepoints(&self) -> RangeInclusive<u32> {
        match self {
            UnicodeRange::Single(code) => *code..=*code,
            UnicodeRange::Span(range) => range.clone(),
        }
    }
}
impl Display for UnicodeRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            UnicodeRange::Single(code) => write!(f, "U+{code:04X}"),
            UnicodeRange::Span(range) => {
                write!(f, "U+{:04X}-{:04X}", range.start(), range.end())
            }
        }
    }
}

fn parse_hex(str: &str) -> Result<u32> {
    let str = str.trim();
    let hex = str
        .strip_prefix("U+")
        .or_else(|| str.strip_prefix("u+"))
        .unwrap_or(str);
    u32::from_str_radix(hex, 16).with_context(|| format!("{str:?} is not a hex code point"))
}

impl FromStr for UnicodeRange {
    type Err = anyhow::Error;

    fn from_str(segment: &str) -> Result<Self> {
        if let Some((start, end)) = segment.split_once('-') {
            let start = parse_hex(start)?;
            let end = parse_hex(end)?;
            if start > end {
                bail!("range {segment:?} ends before it starts");
            }
            Ok(UnicodeRange::Span(start..=end))
        } else {
            Ok(UnicodeRange::Single(parse_hex(segment)?))
        }
    }
}

/// A comma-separated list of code points and inclusive code point ranges, such as
/// `U+0041-005A,U+20AC`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RangeList(Vec<UnicodeRange>);
impl RangeList {
    pub fn ranges(&self) -> &[UnicodeRange] {
        &self.0
    }

    /// Iterates over every code point in the list, in list order.
    pub fn codepoints(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().flat_map(UnicodeRange::codepoints)
    }

    /// Builds the shortest list of ranges covering the given code points.
    pub fn from_codepoints(codepoints: impl IntoIterator<Item = u32>) -> RangeList {
        let mut codepoints: Vec<_> = codepoints.into_iter().collect();
        codepoints.sort_unstable();
        codepoints.dedup();

        let mut ranges = Vec::new();
        let mut iter = codepoints.into_iter();
        let Some(mut range_start) = iter.next() else {
            return RangeList(ranges);
        };
        let mut range_last = range_start;
        for code in iter {
            if code != range_last + 1 {
                ranges.push(to_range(range_start, range_last));
                range_start = code;
            }
            range_last = code;
        }
        ranges.push(to_range(range_start, range_last));
        RangeList(ranges)
    }
}

fn to_range(start: u32, last: u32) -> UnicodeRange {
    if start == last {
        UnicodeRange::Single(start)
    } else {
        UnicodeRange::Span(start..=last)
    }
}

impl FromStr for RangeList {
    type Err = anyhow::Error;

    fn from_str(str: &str) -> Result<Self> {
        let mut ranges = Vec::new();
        for segment in str.split(',') {
            if segment.trim().is_empty() {
                continue;
            }
            ranges.push(segment.parse().with_context(|| format!("bad range {segment:?}"))?);
        }
        Ok(RangeList(ranges))
    }
}
impl Display for RangeList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, range) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(",")?;
            }
            write!(f, "{range}")?;
        }
        Ok(())
    }
}
