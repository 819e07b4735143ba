//! Codepoint to glyph resolution

use crate::{glyph_name::GlyphName, tables::CharMapTable, types::Codepoint};

/// The glyph `codepoint` maps to, searching sub-tables in table order.
///
/// A missing mapping is not an error; callers skip the codepoint.
pub fn resolve(cmap: &impl CharMapTable, codepoint: Codepoint) -> Option<GlyphName> {
    cmap.lookup(codepoint)
}

/// Resolve every codepoint, splitting them into resolved pairs and misses.
///
/// Order is preserved on both sides. A codepoint requested more than once
/// resolves once.
pub fn resolve_all(
    cmap: &impl CharMapTable,
    codepoints: &[Codepoint],
) -> (Vec<(Codepoint, GlyphName)>, Vec<Codepoint>) {
    let mut resolved: Vec<(Codepoint, GlyphName)> = Vec::new();
    let mut missing = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for &codepoint in codepoints {
        if !seen.insert(codepoint) {
            continue;
        }
        match resolve(cmap, codepoint) {
            Some(glyph) => resolved.push((codepoint, glyph)),
            None => missing.push(codepoint),
        }
    }

    (resolved, missing)
}
