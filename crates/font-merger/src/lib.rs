//! Copy glyphs for a set of Unicode codepoints from one TrueType font into
//! another.
//!
//! Composite glyphs bring their components along, inserted glyphs get
//! collision-free names, and existing glyph IDs of the destination never
//! change, so its layout tables stay valid.

mod closure;
mod error;
mod font;
mod glyph_name;
mod merger;
mod naming;
mod options;
mod plan;
mod range;
mod rename;
mod resolve;
pub mod tables;
mod types;

#[cfg(test)]
mod test_fonts;

pub use closure::closure;
pub use error::{MergeError, RangeError, Result};
pub use font::{FontModel, GLYPH_COUNT_TABLES, VARIATION_TABLES};
pub use glyph_name::GlyphName;
pub use merger::{GlyphSetMerger, MergeEvent, MergeObserver, MergeReport};
pub use naming::{NameAllocator, codepoint_glyph_name};
pub use options::Options;
pub use plan::MergePlan;
pub use range::{CodepointRange, parse_codepoint, parse_range, parse_ranges};
pub use rename::{FamilyNames, rename_family};
pub use resolve::resolve;
pub use types::{Codepoint, GlyphMetric, GlyphRecord};

/// Merge glyphs between two fonts given as raw bytes.
///
/// Convenience wrapper around [`GlyphSetMerger`]; returns the serialized
/// destination font and the merge report.
///
/// # Example
///
/// ```no_run
/// use glyphgraft_merger::{MergeEvent, Options, merge_bytes, parse_range};
///
/// let source = std::fs::read("source.ttf").unwrap();
/// let dest = std::fs::read("dest.ttf").unwrap();
/// let codepoints = parse_range("U+4E00-U+4E10").unwrap();
/// let (merged, report) =
///     merge_bytes(&source, &dest, &codepoints, &Options::default(), &mut |_: MergeEvent| {}).unwrap();
/// println!("copied {} glyphs", report.copied.len());
/// std::fs::write("merged.ttf", merged).unwrap();
/// ```
pub fn merge_bytes(
    source: &[u8],
    dest: &[u8],
    codepoints: &[Codepoint],
    options: &Options,
    observer: &mut impl MergeObserver,
) -> Result<(Vec<u8>, MergeReport)> {
    let source = FontModel::new(source)?;
    let mut dest = FontModel::new(dest)?;

    let report = GlyphSetMerger::new(options.clone()).merge(&source, &mut dest, codepoints, observer)?;
    let bytes = dest.to_bytes()?;

    Ok((bytes, report))
}
