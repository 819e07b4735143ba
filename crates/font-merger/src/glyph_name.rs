//! Glyph name type
//!
//! Glyphs are addressed by name throughout the merge; glyph IDs only appear
//! at the edges, when a font is read or serialized.

use std::{
    borrow::Borrow,
    fmt::{Display, Formatter, Result},
    ops::Deref,
};

/// A glyph name, unique within one font's glyph order
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlyphName(String);

impl GlyphName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Fallback name for a glyph without a `post` entry
    pub fn for_gid(gid: u32) -> Self {
        Self(format!("glyph{gid:05}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for GlyphName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GlyphName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for GlyphName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for GlyphName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for GlyphName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Display for GlyphName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GlyphName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for GlyphName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<GlyphName> for String {
    fn from(GlyphName(name): GlyphName) -> Self {
        name
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_fallback_name() {
        assert_eq!(GlyphName::for_gid(7), "glyph00007");
        assert_eq!(GlyphName::for_gid(123456), "glyph123456");
    }

    #[test]
    fn test_lookup_by_str() {
        let mut set: HashSet<GlyphName> = HashSet::new();
        set.insert(GlyphName::new("uni4E00"));
        assert!(set.contains("uni4E00"));
        assert!(!set.contains("uni4E01"));
    }
}
