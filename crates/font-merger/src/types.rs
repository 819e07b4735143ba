//! Domain-specific newtypes for type safety
//!
//! These types keep code points, glyph records and metrics apart from the raw
//! integers and strings they wrap.

use std::{
    fmt,
    fmt::{Display, Formatter},
};

use crate::glyph_name::GlyphName;

/// A Unicode codepoint
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Codepoint(pub u32);

impl Codepoint {
    pub const fn new(cp: u32) -> Self {
        Self(cp)
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }

    /// Convert to a Rust char if valid
    pub fn to_char(self) -> Option<char> {
        char::from_u32(self.0)
    }

    /// Whether the codepoint lies in the Basic Multilingual Plane
    pub const fn is_bmp(self) -> bool {
        self.0 <= 0xFFFF
    }
}

impl From<u32> for Codepoint {
    fn from(cp: u32) -> Self {
        Self(cp)
    }
}

impl From<char> for Codepoint {
    fn from(c: char) -> Self {
        Self(c as u32)
    }
}

impl From<Codepoint> for u32 {
    fn from(cp: Codepoint) -> Self {
        cp.0
    }
}

impl Display for Codepoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}", self.0)
    }
}

/// One glyph scheduled for insertion into the destination font.
///
/// `codepoint` is `None` for glyphs pulled in only as composite components.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphRecord {
    pub codepoint: Option<Codepoint>,
    pub source: GlyphName,
    pub dest: GlyphName,
}

impl GlyphRecord {
    pub fn mapped(codepoint: Codepoint, source: GlyphName, dest: GlyphName) -> Self {
        Self { codepoint: Some(codepoint), source, dest }
    }

    pub fn component(source: GlyphName, dest: GlyphName) -> Self {
        Self { codepoint: None, source, dest }
    }

    pub fn is_component(&self) -> bool {
        self.codepoint.is_none()
    }
}

/// Advance and side bearing of one glyph along one axis
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphMetric {
    pub advance: u16,
    pub side_bearing: i16,
}

impl GlyphMetric {
    pub const fn new(advance: u16, side_bearing: i16) -> Self {
        Self { advance, side_bearing }
    }
}
