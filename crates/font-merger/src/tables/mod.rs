//! Table adapters
//!
//! The merge logic talks to a font through one small trait per table concern.
//! [`FontModel`](crate::FontModel) provides concrete adapters backed by
//! `read-fonts` data; tests substitute in-memory fakes.

pub mod cmap;
pub mod glyf;
pub mod maxp;
pub mod metrics;
pub mod name;
pub mod post;

use crate::{
    Result,
    glyph_name::GlyphName,
    types::{Codepoint, GlyphMetric},
};

pub use glyf::Outline;

/// Character to glyph mapping
pub trait CharMapTable {
    /// The glyph mapped to `codepoint` by the first Unicode sub-table that has it
    fn lookup(&self, codepoint: Codepoint) -> Option<GlyphName>;

    /// Map `codepoint` to `glyph` in every writable sub-table, replacing any
    /// existing mapping.
    fn install(&mut self, codepoint: Codepoint, glyph: &GlyphName);
}

/// Glyph outlines addressed by name
pub trait OutlineTable {
    fn contains(&self, glyph: &str) -> bool;

    /// All glyph names, in glyph order
    fn glyph_names(&self) -> Vec<GlyphName>;

    /// Direct component references of a composite glyph.
    ///
    /// Empty for simple and empty glyphs, and for names not in the table.
    fn components(&self, glyph: &str) -> Result<Vec<GlyphName>>;

    fn outline(&self, glyph: &str) -> Result<Outline>;

    /// Insert a new glyph at the end of the glyph order, or replace the
    /// outline of an existing one in place.
    fn insert(&mut self, glyph: GlyphName, outline: Outline) -> Result<()>;
}

/// Per-glyph advance and side bearing along one axis
pub trait MetricsTable {
    fn metric(&self, glyph: &str) -> Option<GlyphMetric>;

    fn set_metric(&mut self, glyph: &GlyphName, metric: GlyphMetric);
}

/// Name records addressed by name ID
pub trait NamingTable {
    /// The first decodable record carrying `name_id`
    fn get(&self, name_id: u16) -> Option<String>;

    /// Rewrite every record carrying `name_id`; returns how many were rewritten.
    fn set(&mut self, name_id: u16, value: &str) -> usize;
}
