//! Merge planning
//!
//! Turns a codepoint request into an ordered list of glyph copies: which source
//! glyph lands under which destination name, with composite components placed
//! before the glyphs that reference them.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::{
    closure::closure,
    glyph_name::GlyphName,
    naming::NameAllocator,
    resolve::resolve_all,
    tables::{CharMapTable, OutlineTable},
    types::{Codepoint, GlyphRecord},
};

/// Ordered glyph copies for one merge
#[derive(Clone, Debug, Default)]
pub struct MergePlan {
    /// Copy order: every component precedes the glyphs that use it
    pub records: Vec<GlyphRecord>,
    /// Requested codepoints the source font does not map
    pub unresolved: Vec<Codepoint>,
    dest_names: HashMap<GlyphName, GlyphName>,
}

impl MergePlan {
    /// Plan copying `codepoints` from the source tables into the destination.
    ///
    /// Each resolved codepoint gets a fresh `uniXXXX`/`uXXXXX` name. Each
    /// glyph in a composite closure that is not already scheduled is copied
    /// once, keeping its source name unless that collides.
    pub fn new(
        source_cmap: &impl CharMapTable,
        source_outlines: &impl OutlineTable,
        dest_outlines: &impl OutlineTable,
        codepoints: &[Codepoint],
    ) -> Self {
        let (resolved, unresolved) = resolve_all(source_cmap, codepoints);
        let mut allocator = NameAllocator::new(dest_outlines.glyph_names());

        let mut scheduled: Vec<GlyphRecord> = Vec::with_capacity(resolved.len());
        let mut dest_names: HashMap<GlyphName, GlyphName> = HashMap::new();

        for (codepoint, source) in resolved {
            let dest = allocator.allocate(codepoint);
            dest_names.entry(source.clone()).or_insert_with(|| dest.clone());
            scheduled.push(GlyphRecord::mapped(codepoint, source, dest));
        }

        let closures: Vec<Vec<GlyphName>> =
            scheduled.iter().map(|record| closure(source_outlines, &record.source)).collect();

        for dependency in closures.iter().flatten() {
            if dest_names.contains_key(dependency) {
                continue;
            }
            let dest = allocator.allocate_from(dependency);
            debug!("Scheduling component '{dependency}' as '{dest}'");
            dest_names.insert(dependency.clone(), dest.clone());
            scheduled.push(GlyphRecord::component(dependency.clone(), dest));
        }

        let records = copy_order(&scheduled, &closures);
        Self { records, unresolved, dest_names }
    }

    /// Destination name of a scheduled source glyph
    pub fn dest_name(&self, source: &str) -> Option<&GlyphName> {
        self.dest_names.get(source)
    }

    pub fn mapped(&self) -> impl Iterator<Item = &GlyphRecord> {
        self.records.iter().filter(|r| !r.is_component())
    }

    pub fn components(&self) -> impl Iterator<Item = &GlyphRecord> {
        self.records.iter().filter(|r| r.is_component())
    }
}

/// Order records so each mapped glyph follows its closure.
///
/// `closures` lines up with the mapped records at the front of `scheduled`.
fn copy_order(scheduled: &[GlyphRecord], closures: &[Vec<GlyphName>]) -> Vec<GlyphRecord> {
    let mut first_by_source: HashMap<&GlyphName, usize> = HashMap::new();
    for (index, record) in scheduled.iter().enumerate() {
        first_by_source.entry(&record.source).or_insert(index);
    }

    let mut emitted: HashSet<usize> = HashSet::new();
    let mut order = Vec::with_capacity(scheduled.len());

    for (index, closure) in closures.iter().enumerate() {
        for dependency in closure {
            if let Some(&dep_index) = first_by_source.get(dependency)
                && emitted.insert(dep_index)
            {
                order.push(scheduled[dep_index].clone());
            }
        }
        if emitted.insert(index) {
            order.push(scheduled[index].clone());
        }
    }

    order
}
