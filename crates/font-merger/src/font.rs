//! In-memory font model
//!
//! [`FontModel`] wraps the original font bytes and the table adapters the
//! merge mutates. Serialization rebuilds only the tables that changed and
//! copies everything else verbatim.

use log::debug;
use read_fonts::{FontRef, TableProvider, types::Tag};
use write_fonts::{
    FontBuilder,
    from_obj::ToOwnedTable,
    tables::{glyf::Bbox, head::Head, loca::LocaFormat, maxp::Maxp},
};

use crate::{
    Result,
    tables::{
        MetricsTable,
        cmap::CharMap,
        glyf::Outlines,
        maxp::build_maxp,
        metrics::{Metrics, build_hhea, build_vhea},
        name::NameTable,
        post::{build_post, glyph_order},
    },
    types::GlyphMetric,
};

/// Tables of variable fonts; they describe the original glyph set only
pub const VARIATION_TABLES: &[[u8; 4]] =
    &[*b"fvar", *b"gvar", *b"avar", *b"cvar", *b"HVAR", *b"VVAR", *b"MVAR", *b"STAT"];

/// Per-glyph tables sized by the glyph count, invalid once glyphs are added
pub const GLYPH_COUNT_TABLES: &[[u8; 4]] = &[*b"hdmx", *b"LTSH"];

/// A parsed TrueType font plus the adapters used while merging
pub struct FontModel<'a> {
    font: FontRef<'a>,
    pub(crate) outlines: Outlines<'a>,
    pub(crate) cmap: CharMap,
    pub(crate) hmtx: Option<Metrics>,
    pub(crate) vmtx: Option<Metrics>,
    pub(crate) names: Option<NameTable>,
    maxp: Option<Maxp>,
    removed: Vec<Tag>,
}

impl<'a> FontModel<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self> {
        Self::from_font(FontRef::new(data)?)
    }

    pub fn from_font(font: FontRef<'a>) -> Result<Self> {
        let order = glyph_order(&font)?;
        let cmap = CharMap::new(&font, &order);
        let hmtx = Metrics::horizontal(&font, &order);
        let vmtx = Metrics::vertical(&font, &order);
        let names = NameTable::new(&font);
        let outlines = Outlines::new(&font, order)?;

        Ok(Self { font, outlines, cmap, hmtx, vmtx, names, maxp: None, removed: Vec::new() })
    }

    pub fn font(&self) -> &FontRef<'a> {
        &self.font
    }

    pub fn outlines(&self) -> &Outlines<'a> {
        &self.outlines
    }

    pub fn cmap(&self) -> &CharMap {
        &self.cmap
    }

    pub fn hmtx(&self) -> Option<&Metrics> {
        self.hmtx.as_ref()
    }

    pub fn vmtx(&self) -> Option<&Metrics> {
        self.vmtx.as_ref()
    }

    pub fn names(&self) -> Option<&NameTable> {
        self.names.as_ref()
    }

    pub fn num_glyphs(&self) -> usize {
        self.outlines.len()
    }

    /// Whether the table is in the font and has not been removed
    pub fn has_table(&self, tag: Tag) -> bool {
        self.font.table_data(tag).is_some() && !self.removed.contains(&tag)
    }

    /// Drop every listed table the font carries; returns the ones dropped.
    pub fn remove_tables(&mut self, tags: &[[u8; 4]]) -> Vec<Tag> {
        let dropped: Vec<Tag> =
            tags.iter().map(Tag::new).filter(|tag| self.has_table(*tag)).collect();
        self.removed.extend(dropped.iter().copied());
        dropped
    }

    /// Raise the outline limits in `maxp` to cover glyphs from `source`.
    pub fn raise_limits(&mut self, source: &FontModel) -> Result<()> {
        self.maxp = Some(build_maxp(&self.font, Some(&source.font), 0)?);
        Ok(())
    }

    /// Serialize the font.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut builder = FontBuilder::new();
        let glyphs_changed = self.outlines.is_modified();
        let num_glyphs = self.outlines.len() as u16;

        if glyphs_changed {
            let (glyf, loca, format) = self.outlines.build()?;

            let mut head: Head = self.font.head()?.to_owned_table();
            head.index_to_loc_format = match format {
                LocaFormat::Short => 0,
                LocaFormat::Long => 1,
            };
            if let Some(bounds) = self.outlines.inserted_bounds() {
                head.x_min = head.x_min.min(bounds.x_min);
                head.y_min = head.y_min.min(bounds.y_min);
                head.x_max = head.x_max.max(bounds.x_max);
                head.y_max = head.y_max.max(bounds.y_max);
            }

            builder.add_table(&head)?;
            builder.add_table(&glyf)?;
            builder.add_table(&loca)?;

            if let Some(post) = build_post(&self.font, self.outlines.names())? {
                builder.add_table(&post)?;
            }
        }

        if glyphs_changed || self.maxp.is_some() {
            let maxp = match &self.maxp {
                Some(maxp) => Maxp { num_glyphs, ..maxp.clone() },
                None => build_maxp(&self.font, None, num_glyphs)?,
            };
            builder.add_table(&maxp)?;
        }

        if let Some(hmtx) = self.hmtx.as_ref().filter(|m| glyphs_changed || m.is_modified()) {
            let table = hmtx.build_hmtx(self.outlines.names());
            let inserted = self.inserted_extents(hmtx);
            builder.add_table(&build_hhea(&self.font, &table, hmtx, &inserted)?)?;
            builder.add_table(&table)?;
        }

        if let Some(vmtx) = self.vmtx.as_ref().filter(|m| glyphs_changed || m.is_modified()) {
            let table = vmtx.build_vmtx(self.outlines.names());
            let inserted = self.inserted_extents(vmtx);
            builder.add_table(&build_vhea(&self.font, &table, vmtx, &inserted)?)?;
            builder.add_table(&table)?;
        }

        if self.cmap.is_modified() {
            builder.add_table(&self.cmap.build(|name| self.outlines.gid(name)))?;
        }

        if let Some(names) = self.names.as_ref().filter(|n| n.is_modified()) {
            builder.add_table(&names.build())?;
        }

        self.copy_other_tables(&mut builder);

        Ok(builder.build())
    }

    fn inserted_extents(&self, metrics: &Metrics) -> Vec<(GlyphMetric, Bbox)> {
        self.outlines
            .inserted()
            .filter_map(|(name, bbox)| Some((metrics.metric(name)?, bbox)))
            .collect()
    }

    fn copy_other_tables(&self, builder: &mut FontBuilder) {
        for record in self.font.table_directory.table_records() {
            let tag = record.tag();
            if self.removed.contains(&tag) || builder.contains(tag) {
                continue;
            }
            if let Some(data) = self.font.table_data(tag) {
                debug!("Copying table '{tag}' unchanged");
                builder.add_raw(tag, data.as_bytes().to_vec());
            }
        }
    }
}
