//! Collision-free glyph names for inserted glyphs

use std::collections::HashSet;

use crate::{glyph_name::GlyphName, types::Codepoint};

/// `uniXXXX` inside the BMP, `uXXXXX` beyond it
pub fn codepoint_glyph_name(codepoint: Codepoint) -> String {
    if codepoint.is_bmp() {
        format!("uni{:04X}", codepoint.to_u32())
    } else {
        format!("u{:X}", codepoint.to_u32())
    }
}

/// Hands out names not yet used in the destination font.
///
/// Every name handed out is reserved immediately, so names are unique across
/// one merge.
#[derive(Clone, Debug, Default)]
pub struct NameAllocator {
    used: HashSet<GlyphName>,
}

impl NameAllocator {
    pub fn new(existing: impl IntoIterator<Item = GlyphName>) -> Self {
        Self { used: existing.into_iter().collect() }
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Name for the glyph of `codepoint`
    pub fn allocate(&mut self, codepoint: Codepoint) -> GlyphName {
        self.allocate_from(&codepoint_glyph_name(codepoint))
    }

    /// `base` if unused, otherwise `base.altN` for the smallest free N >= 1
    pub fn allocate_from(&mut self, base: &str) -> GlyphName {
        let name = if self.is_used(base) {
            (1..)
                .map(|n| format!("{base}.alt{n}"))
                .find(|candidate| !self.is_used(candidate))
                .map(GlyphName::new)
                .unwrap_or_else(|| GlyphName::new(base))
        } else {
            GlyphName::new(base)
        };

        self.used.insert(name.clone());
        name
    }
}
