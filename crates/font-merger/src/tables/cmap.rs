//! cmap adapter

use std::collections::BTreeMap;

use log::{debug, warn};
use read_fonts::{
    FontRef, TableProvider,
    tables::cmap::{CmapSubtable, PlatformId},
};
use write_fonts::{
    from_obj::ToOwnedTable,
    tables::cmap::{Cmap, Cmap12, CmapSubtable as WriteCmapSubtable, EncodingRecord, SequentialMapGroup},
};

use crate::{glyph_name::GlyphName, tables::CharMapTable, types::Codepoint};

/// One Unicode sub-table, decoded to glyph names
#[derive(Clone, Debug)]
struct Subtable {
    platform_id: PlatformId,
    encoding_id: u16,
    mappings: BTreeMap<Codepoint, GlyphName>,
}

/// A sub-table we do not decode (variation sequences, legacy encodings),
/// carried into a rebuilt cmap as-is. Glyph IDs of existing glyphs never
/// change, so its mappings stay valid.
#[derive(Clone, Debug)]
struct Carried {
    platform_id: PlatformId,
    encoding_id: u16,
    subtable: WriteCmapSubtable,
}

/// The Unicode sub-tables of a font's cmap, in table order
#[derive(Clone, Debug, Default)]
pub struct CharMap {
    subtables: Vec<Subtable>,
    carried: Vec<Carried>,
    modified: bool,
}

impl CharMap {
    /// Decode the font's Unicode sub-tables of formats 4, 6 and 12.
    ///
    /// A missing or unreadable cmap gives an empty map.
    pub fn new(font: &FontRef, order: &[GlyphName]) -> Self {
        let cmap = match font.cmap() {
            Ok(cmap) => cmap,
            Err(e) => {
                debug!("No usable cmap ({e})");
                return Self::default();
            }
        };

        let mut subtables = Vec::new();
        let mut carried = Vec::new();

        for record in cmap.encoding_records() {
            let platform_id = record.platform_id();
            let encoding_id = record.encoding_id();
            let Ok(subtable) = record.subtable(cmap.offset_data()) else {
                warn!("Unreadable cmap sub-table ({platform_id:?}, {encoding_id})");
                continue;
            };

            let pairs = is_unicode(platform_id, encoding_id)
                .then(|| iter_cmap_subtable(&subtable))
                .flatten();
            let Some(pairs) = pairs else {
                carried.push(Carried {
                    platform_id,
                    encoding_id,
                    subtable: subtable.to_owned_table(),
                });
                continue;
            };

            let mappings = pairs
                .into_iter()
                .filter_map(|(cp, gid)| Some((cp, order.get(gid as usize)?.clone())))
                .collect();
            subtables.push(Subtable { platform_id, encoding_id, mappings });
        }

        Self { subtables, carried, modified: false }
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Every mapping, the first sub-table winning for each codepoint
    pub fn mappings(&self) -> BTreeMap<Codepoint, GlyphName> {
        let mut merged = BTreeMap::new();
        for subtable in &self.subtables {
            for (cp, name) in &subtable.mappings {
                merged.entry(*cp).or_insert_with(|| name.clone());
            }
        }
        merged
    }

    /// Compile a cmap of format 12 sub-tables for the full repertoire, plus
    /// every carried sub-table.
    ///
    /// `gid` turns a glyph name into its glyph ID in the output font.
    pub fn build(&self, gid: impl Fn(&str) -> Option<u32>) -> Cmap {
        for subtable in &self.subtables {
            debug!(
                "Carrying {} mappings from cmap sub-table ({:?}, {})",
                subtable.mappings.len(),
                subtable.platform_id,
                subtable.encoding_id
            );
        }

        let mappings: Vec<(u32, u32)> = self
            .mappings()
            .into_iter()
            .filter_map(|(cp, name)| Some((cp.to_u32(), gid(&name)?)))
            .collect();

        let mut records = build_format12_records(&mappings);
        for carried in &self.carried {
            let key = (carried.platform_id, carried.encoding_id);
            if records.iter().any(|r| (r.platform_id, r.encoding_id) == key) {
                warn!(
                    "Replacing cmap sub-table ({:?}, {}) with the rebuilt format 12 table",
                    carried.platform_id, carried.encoding_id
                );
                continue;
            }
            debug!("Keeping cmap sub-table ({:?}, {})", carried.platform_id, carried.encoding_id);
            records.push(EncodingRecord::new(
                carried.platform_id,
                carried.encoding_id,
                carried.subtable.clone(),
            ));
        }
        records.sort_by_key(|r| (r.platform_id, r.encoding_id));

        Cmap::new(records)
    }
}

impl CharMapTable for CharMap {
    fn lookup(&self, codepoint: Codepoint) -> Option<GlyphName> {
        self.subtables.iter().find_map(|s| s.mappings.get(&codepoint).cloned())
    }

    fn install(&mut self, codepoint: Codepoint, glyph: &GlyphName) {
        if self.subtables.is_empty() {
            debug!("No Unicode cmap sub-table; creating (3, 10)");
            self.subtables.push(Subtable {
                platform_id: PlatformId::Windows,
                encoding_id: 10,
                mappings: BTreeMap::new(),
            });
        }

        for subtable in &mut self.subtables {
            subtable.mappings.insert(codepoint, glyph.clone());
        }
        self.modified = true;
    }
}

fn is_unicode(platform_id: PlatformId, encoding_id: u16) -> bool {
    platform_id == PlatformId::Unicode
        || (platform_id == PlatformId::Windows && matches!(encoding_id, 1 | 10))
}

/// Encoding records using only format 12 subtables.
///
/// This avoids the format 4 overflow issue that occurs with large character sets
/// (format 4 uses u16 for segment counts and can overflow with >32k entries).
fn build_format12_records(mappings: &[(u32, u32)]) -> Vec<EncodingRecord> {
    let groups = build_sequential_groups(mappings);

    let cmap12 = Cmap12 { language: 0, groups };

    // (0, 4) and (3, 10): Unicode full repertoire on both platforms
    vec![
        EncodingRecord::new(PlatformId::Unicode, 4, WriteCmapSubtable::Format12(cmap12.clone())),
        EncodingRecord::new(PlatformId::Windows, 10, WriteCmapSubtable::Format12(cmap12)),
    ]
}

/// Build sequential map groups from sorted (codepoint, glyph_id) pairs.
///
/// Groups consecutive codepoints that map to consecutive glyph IDs.
fn build_sequential_groups(mappings: &[(u32, u32)]) -> Vec<SequentialMapGroup> {
    let Some((&(first_cp, first_gid), rest)) = mappings.split_first() else {
        return Vec::new();
    };

    let mut groups = Vec::new();
    let (mut start_cp, mut start_gid) = (first_cp, first_gid);
    let (mut prev_cp, mut prev_gid) = (first_cp, first_gid);

    for &(cp, gid) in rest {
        if cp == prev_cp + 1 && gid == prev_gid + 1 {
            prev_cp = cp;
            prev_gid = gid;
        } else {
            groups.push(SequentialMapGroup::new(start_cp, prev_cp, start_gid));
            (start_cp, start_gid) = (cp, gid);
            (prev_cp, prev_gid) = (cp, gid);
        }
    }

    groups.push(SequentialMapGroup::new(start_cp, prev_cp, start_gid));

    groups
}

/// (codepoint, glyph id) pairs of a sub-table, or `None` for formats we do
/// not decode.
fn iter_cmap_subtable(subtable: &CmapSubtable) -> Option<Vec<(Codepoint, u32)>> {
    let mappings = match subtable {
        CmapSubtable::Format4(f4) => f4
            .iter()
            .filter(|(_, gid)| gid.to_u32() != 0)
            .map(|(cp, gid)| (Codepoint::new(cp), gid.to_u32()))
            .collect(),
        CmapSubtable::Format12(f12) => f12
            .iter()
            .filter(|(_, gid)| gid.to_u32() != 0)
            .map(|(cp, gid)| (Codepoint::new(cp), gid.to_u32()))
            .collect(),
        CmapSubtable::Format6(f6) => {
            let first = f6.first_code() as u32;
            f6.glyph_id_array()
                .iter()
                .enumerate()
                .filter(|(_, gid)| gid.get() != 0)
                .map(|(i, gid)| (Codepoint::new(first + i as u32), gid.get() as u32))
                .collect()
        }
        _ => return None,
    };
    Some(mappings)
}
