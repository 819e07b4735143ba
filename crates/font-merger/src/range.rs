//! Codepoint range expressions
//!
//! Accepted forms, case-insensitive, with optional prefixes stripped per
//! endpoint:
//!
//! - `U+4E00`, `0x4E00`, `4E00`: a single codepoint
//! - `U+4E00-U+9FFF`, `0x4E00-0x9FFF`, `4E00-9FFF`: an inclusive range

use std::{
    fmt::{self, Display, Formatter},
    ops::RangeInclusive,
    str::FromStr,
};

use crate::{error::RangeError, types::Codepoint};

/// An inclusive range of codepoints
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CodepointRange {
    start: Codepoint,
    end: Codepoint,
}

impl CodepointRange {
    /// Create a range, rejecting `start > end`
    pub fn new(start: Codepoint, end: Codepoint) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Reversed { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single(cp: Codepoint) -> Self {
        Self { start: cp, end: cp }
    }

    pub fn start(&self) -> Codepoint {
        self.start
    }

    pub fn end(&self) -> Codepoint {
        self.end
    }

    pub fn len(&self) -> usize {
        (self.end.to_u32() - self.start.to_u32()) as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Codepoints in ascending order
    pub fn iter(&self) -> impl Iterator<Item = Codepoint> + use<> {
        self.as_u32_range().map(Codepoint::new)
    }

    fn as_u32_range(&self) -> RangeInclusive<u32> {
        self.start.to_u32()..=self.end.to_u32()
    }
}

impl FromStr for CodepointRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RangeError::Empty);
        }

        match s.split_once('-') {
            Some((start, end)) => Self::new(parse_codepoint(start)?, parse_codepoint(end)?),
            None => parse_codepoint(s).map(Self::single),
        }
    }
}

impl Display for CodepointRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Parse a single codepoint: hexadecimal, optionally prefixed by `U+` or `0x`.
pub fn parse_codepoint(s: &str) -> Result<Codepoint, RangeError> {
    let trimmed = s.trim();
    let digits = strip_prefix_ignore_case(trimmed, "U+")
        .or_else(|| strip_prefix_ignore_case(trimmed, "0x"))
        .unwrap_or(trimmed);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(RangeError::InvalidCodepoint(s.trim().to_string()));
    }

    u32::from_str_radix(digits, 16)
        .map(Codepoint::new)
        .map_err(|_| RangeError::InvalidCodepoint(s.trim().to_string()))
}

/// Parse one range expression into its codepoints, in ascending order.
pub fn parse_range(s: &str) -> Result<Vec<Codepoint>, RangeError> {
    Ok(s.parse::<CodepointRange>()?.iter().collect())
}

/// Parse several range expressions, concatenating their codepoints in order.
///
/// Duplicates across expressions are kept; they are no-ops during the merge.
pub fn parse_ranges(
    ranges: impl IntoIterator<Item = impl AsRef<str>>,
) -> Result<Vec<Codepoint>, RangeError> {
    let mut codepoints = Vec::new();
    for range in ranges {
        codepoints.extend(range.as_ref().parse::<CodepointRange>()?.iter());
    }
    Ok(codepoints)
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cps(values: &[u32]) -> Vec<Codepoint> {
        values.iter().copied().map(Codepoint::new).collect()
    }

    #[test]
    fn test_single_prefix_forms() {
        for input in ["U+4E00", "u+4e00", "0x4E00", "0X4e00", "4E00", "4e00", "  U+4E00  "] {
            assert_eq!(parse_range(input).unwrap(), cps(&[0x4E00]), "input {input:?}");
        }
    }

    #[test]
    fn test_range_inclusive_ascending() {
        let result = parse_range("U+4E00-U+4E10").unwrap();
        assert_eq!(result.len(), 17);
        assert_eq!(result.first(), Some(&Codepoint::new(0x4E00)));
        assert_eq!(result.last(), Some(&Codepoint::new(0x4E10)));
        assert!(result.windows(2).all(|w| w[0].to_u32() + 1 == w[1].to_u32()));
    }

    #[test]
    fn test_range_mixed_prefixes() {
        assert_eq!(parse_range("0x41-U+43").unwrap(), cps(&[0x41, 0x42, 0x43]));
        assert_eq!(parse_range("41 - 43").unwrap(), cps(&[0x41, 0x42, 0x43]));
        assert_eq!(parse_range("u+61-0X62").unwrap(), cps(&[0x61, 0x62]));
    }

    #[test]
    fn test_degenerate_range() {
        assert_eq!(parse_range("U+FFFF-U+FFFF").unwrap(), cps(&[0xFFFF]));
    }

    #[test]
    fn test_supplementary_plane() {
        assert_eq!(parse_range("U+20000-U+20002").unwrap(), cps(&[0x20000, 0x20001, 0x20002]));
    }

    #[test]
    fn test_invalid_hex() {
        assert_eq!(
            parse_range("U+XYZ"),
            Err(RangeError::InvalidCodepoint("U+XYZ".to_string()))
        );
        assert!(parse_range("U+4E00-nope").is_err());
        assert!(parse_range("U+").is_err());
        assert!(parse_range("-4E00").is_err());
        assert!(parse_range("4E00-").is_err());
        assert!(parse_range("+41").is_err());
    }

    #[test]
    fn test_empty() {
        assert_eq!(parse_range(""), Err(RangeError::Empty));
        assert_eq!(parse_range("   "), Err(RangeError::Empty));
    }

    #[test]
    fn test_overflow() {
        assert!(parse_range("1FFFFFFFF").is_err());
    }

    #[test]
    fn test_reversed() {
        assert_eq!(
            parse_range("U+0043-U+0041"),
            Err(RangeError::Reversed { start: Codepoint::new(0x43), end: Codepoint::new(0x41) })
        );
    }

    #[test]
    fn test_parse_ranges_keeps_order_and_duplicates() {
        let result = parse_ranges(["U+0042", "U+0041-U+0042"]).unwrap();
        assert_eq!(result, cps(&[0x42, 0x41, 0x42]));
    }

    #[test]
    fn test_parse_ranges_fails_on_any_bad_entry() {
        assert!(parse_ranges(["U+0041", "bogus"]).is_err());
    }

    #[test]
    fn test_display() {
        let range: CodepointRange = "0x41-0x5a".parse().unwrap();
        assert_eq!(range.to_string(), "U+0041-U+005A");
        assert_eq!(range.len(), 26);
        let single: CodepointRange = "4e00".parse().unwrap();
        assert_eq!(single.to_string(), "U+4E00");
    }
}
