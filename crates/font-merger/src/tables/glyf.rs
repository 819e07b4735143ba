//! glyf/loca adapter (TrueType outlines)
//!
//! Glyphs already in the font are read lazily from the original `glyf` data
//! and keep their glyph IDs. Inserted glyphs are appended at the end of the
//! glyph order, so nothing that refers to existing glyph IDs goes stale.
//!
//! Composite components are held by name while a glyph is in flight between
//! fonts, and turned back into glyph IDs only when `glyf` is compiled.

use indexmap::IndexMap;
use log::warn;
use read_fonts::{
    FontRef, TableProvider,
    tables::{
        glyf::{Glyf as ReadGlyf, Glyph as ReadGlyph},
        loca::Loca as ReadLoca,
    },
    types::GlyphId,
};
use write_fonts::{
    from_obj::ToOwnedTable,
    tables::{
        glyf::{
            Anchor, Bbox, Component, ComponentFlags, CompositeGlyph, Glyf, GlyfLocaBuilder, Glyph,
            SimpleGlyph, Transform,
        },
        loca::{Loca, LocaFormat},
    },
};

use crate::{MergeError, Result, glyph_name::GlyphName, tables::OutlineTable};

/// `maxp.numGlyphs` is a u16
const MAX_GLYPHS: usize = u16::MAX as usize;

/// A glyph outline detached from any font
#[derive(Clone, Debug)]
pub enum Outline {
    Empty,
    Simple(SimpleGlyph),
    Composite(CompositeOutline),
}

/// A composite glyph whose components are referenced by name
#[derive(Clone, Debug)]
pub struct CompositeOutline {
    pub bbox: Bbox,
    pub components: Vec<OutlineComponent>,
}

#[derive(Clone, Debug)]
pub struct OutlineComponent {
    pub glyph: GlyphName,
    pub anchor: Anchor,
    pub transform: Transform,
    pub flags: ComponentFlags,
}

impl Outline {
    pub fn is_composite(&self) -> bool {
        matches!(self, Outline::Composite(_))
    }

    /// Names of the glyphs this outline references directly
    pub fn component_names(&self) -> impl Iterator<Item = &GlyphName> {
        let components = match self {
            Outline::Composite(composite) => composite.components.as_slice(),
            _ => &[],
        };
        components.iter().map(|c| &c.glyph)
    }

    /// Point component references at new names; unmapped references are kept.
    pub fn rename_components(&mut self, mut rename: impl FnMut(&GlyphName) -> Option<GlyphName>) {
        if let Outline::Composite(composite) = self {
            for component in &mut composite.components {
                if let Some(name) = rename(&component.glyph) {
                    component.glyph = name;
                }
            }
        }
    }

    /// Drop per-glyph TrueType instructions.
    ///
    /// Instructions call into `fpgm` functions and `cvt` values of the font
    /// they were written for.
    pub fn strip_instructions(&mut self) {
        if let Outline::Simple(simple) = self {
            simple.instructions.clear();
        }
    }

    pub fn bbox(&self) -> Option<Bbox> {
        match self {
            Outline::Empty => None,
            Outline::Simple(simple) => Some(simple.bbox),
            Outline::Composite(composite) => Some(composite.bbox),
        }
    }
}

enum Slot {
    Original(u32),
    Inserted(Outline),
}

/// Outlines of one font, keyed by glyph name in glyph order
pub struct Outlines<'a> {
    glyf: ReadGlyf<'a>,
    loca: ReadLoca<'a>,
    slots: IndexMap<GlyphName, Slot>,
}

impl<'a> Outlines<'a> {
    /// Wrap the font's `glyf`/`loca`; `order` names every glyph ID in turn.
    pub fn new(font: &FontRef<'a>, order: Vec<GlyphName>) -> Result<Self> {
        let glyf = font.glyf().map_err(|_| MergeError::MissingTable("glyf"))?;
        let loca = font.loca(None).map_err(|_| MergeError::MissingTable("loca"))?;
        let slots = order
            .into_iter()
            .enumerate()
            .map(|(gid, name)| (name, Slot::Original(gid as u32)))
            .collect();

        Ok(Self { glyf, loca, slots })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn gid(&self, glyph: &str) -> Option<u32> {
        self.slots.get_index_of(glyph).map(|idx| idx as u32)
    }

    /// Glyph names in glyph order
    pub fn names(&self) -> impl Iterator<Item = &GlyphName> {
        self.slots.keys()
    }

    pub fn is_modified(&self) -> bool {
        self.slots.values().any(|slot| matches!(slot, Slot::Inserted(_)))
    }

    /// Inserted glyphs that have contours, with their bounding boxes
    pub fn inserted(&self) -> impl Iterator<Item = (&GlyphName, Bbox)> {
        self.slots.iter().filter_map(|(name, slot)| match slot {
            Slot::Inserted(outline) => Some((name, outline.bbox()?)),
            Slot::Original(_) => None,
        })
    }

    /// Union of the bounding boxes of inserted glyphs
    pub fn inserted_bounds(&self) -> Option<Bbox> {
        self.slots
            .values()
            .filter_map(|slot| match slot {
                Slot::Inserted(outline) => outline.bbox(),
                Slot::Original(_) => None,
            })
            .reduce(union)
    }

    /// Compile `glyf` and `loca`.
    ///
    /// The caller sets `head.indexToLocFormat` from the returned format.
    pub fn build(&self) -> Result<(Glyf, Loca, LocaFormat)> {
        let mut builder = GlyfLocaBuilder::new();

        for (name, slot) in &self.slots {
            match slot {
                Slot::Original(gid) => {
                    let glyph = self.original_glyph(name, *gid);
                    if let Err(e) = builder.add_glyph(&glyph) {
                        warn!("Glyph '{name}' failed validation ({e}), writing it empty");
                        builder.add_glyph(&Glyph::Empty)?;
                    }
                }
                Slot::Inserted(outline) => {
                    let glyph = self.compile(name, outline)?;
                    builder
                        .add_glyph(&glyph)
                        .map_err(|source| MergeError::InvalidOutline { glyph: name.clone(), source })?;
                }
            }
        }

        Ok(builder.build())
    }

    fn name_for_gid(&self, gid: u32) -> Option<&GlyphName> {
        self.slots.get_index(gid as usize).map(|(name, _)| name)
    }

    fn read_glyph(&self, gid: u32) -> Result<Option<ReadGlyph<'a>>> {
        Ok(self.loca.get_glyf(GlyphId::new(gid), &self.glyf)?)
    }

    fn original_glyph(&self, name: &GlyphName, gid: u32) -> Glyph {
        match self.read_glyph(gid) {
            Ok(Some(ReadGlyph::Simple(simple))) => Glyph::Simple(simple.to_owned_table()),
            Ok(Some(ReadGlyph::Composite(composite))) => {
                Glyph::Composite(composite.to_owned_table())
            }
            Ok(None) => Glyph::Empty,
            Err(e) => {
                warn!("Glyph '{name}' could not be read ({e}), writing it empty");
                Glyph::Empty
            }
        }
    }

    /// Detach a glyph from this font, resolving component IDs to names
    fn detach(&self, name: &str, glyph: &ReadGlyph) -> Result<Outline> {
        match glyph {
            ReadGlyph::Simple(simple) => Ok(Outline::Simple(simple.to_owned_table())),
            ReadGlyph::Composite(composite) => {
                let components = composite
                    .components()
                    .map(|comp| {
                        let gid = comp.glyph.to_u32();
                        let glyph = self.name_for_gid(gid).cloned().ok_or_else(|| {
                            MergeError::ComponentOutOfRange { glyph: GlyphName::new(name), gid }
                        })?;

                        let anchor = match comp.anchor {
                            read_fonts::tables::glyf::Anchor::Offset { x, y } => {
                                Anchor::Offset { x, y }
                            }
                            read_fonts::tables::glyf::Anchor::Point { base, component } => {
                                Anchor::Point { base, component }
                            }
                        };

                        let transform = Transform {
                            xx: comp.transform.xx,
                            yx: comp.transform.yx,
                            xy: comp.transform.xy,
                            yy: comp.transform.yy,
                        };

                        Ok(OutlineComponent { glyph, anchor, transform, flags: comp.flags.into() })
                    })
                    .collect::<Result<Vec<_>>>()?;

                if components.is_empty() {
                    return Ok(Outline::Empty);
                }

                let bbox = Bbox {
                    x_min: composite.x_min(),
                    y_min: composite.y_min(),
                    x_max: composite.x_max(),
                    y_max: composite.y_max(),
                };

                Ok(Outline::Composite(CompositeOutline { bbox, components }))
            }
        }
    }

    /// Resolve component names against this font's glyph order
    fn compile(&self, name: &GlyphName, outline: &Outline) -> Result<Glyph> {
        let composite = match outline {
            Outline::Empty => return Ok(Glyph::Empty),
            Outline::Simple(simple) => return Ok(Glyph::Simple(simple.clone())),
            Outline::Composite(composite) => composite,
        };

        let mut components = composite
            .components
            .iter()
            .map(|comp| {
                let gid = self.gid(&comp.glyph).ok_or_else(|| MergeError::MissingComponent {
                    glyph: name.clone(),
                    component: comp.glyph.clone(),
                })?;
                Ok(Component {
                    glyph: font_types::GlyphId16::new(gid as u16),
                    anchor: comp.anchor,
                    transform: comp.transform.clone(),
                    flags: comp.flags,
                })
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter();

        let Some(first) = components.next() else {
            return Ok(Glyph::Empty);
        };
        let mut glyph = CompositeGlyph::new(first, composite.bbox);
        for component in components {
            glyph.add_component(component, composite.bbox);
        }

        Ok(Glyph::Composite(glyph))
    }
}

impl OutlineTable for Outlines<'_> {
    fn contains(&self, glyph: &str) -> bool {
        self.slots.contains_key(glyph)
    }

    fn glyph_names(&self) -> Vec<GlyphName> {
        self.slots.keys().cloned().collect()
    }

    fn components(&self, glyph: &str) -> Result<Vec<GlyphName>> {
        let Some((_, name, slot)) = self.slots.get_full(glyph) else {
            return Ok(Vec::new());
        };

        let gid = match slot {
            Slot::Inserted(outline) => return Ok(outline.component_names().cloned().collect()),
            Slot::Original(gid) => *gid,
        };

        let Some(ReadGlyph::Composite(composite)) = self.read_glyph(gid)? else {
            return Ok(Vec::new());
        };

        Ok(composite
            .components()
            .filter_map(|comp| {
                let component_gid = comp.glyph.to_u32();
                let component = self.name_for_gid(component_gid).cloned();
                if component.is_none() {
                    warn!(
                        "Glyph '{name}' references glyph id {component_gid}, which is out of range; skipping it"
                    );
                }
                component
            })
            .collect())
    }

    fn outline(&self, glyph: &str) -> Result<Outline> {
        let (name, slot) = self
            .slots
            .get_key_value(glyph)
            .ok_or_else(|| MergeError::UnknownGlyph(GlyphName::new(glyph)))?;

        match slot {
            Slot::Inserted(outline) => Ok(outline.clone()),
            Slot::Original(gid) => match self.read_glyph(*gid)? {
                Some(read) => self.detach(name, &read),
                None => Ok(Outline::Empty),
            },
        }
    }

    fn insert(&mut self, glyph: GlyphName, outline: Outline) -> Result<()> {
        if !self.slots.contains_key(&glyph) && self.slots.len() >= MAX_GLYPHS {
            return Err(MergeError::TooManyGlyphs { max: MAX_GLYPHS });
        }

        // Compile once up front so a bad glyph fails here rather than at
        // serialization, when it can no longer be skipped.
        let compiled = self.compile(&glyph, &outline)?;
        GlyfLocaBuilder::new()
            .add_glyph(&compiled)
            .map_err(|source| MergeError::InvalidOutline { glyph: glyph.clone(), source })?;

        self.slots.insert(glyph, Slot::Inserted(outline));
        Ok(())
    }
}

fn union(a: Bbox, b: Bbox) -> Bbox {
    Bbox {
        x_min: a.x_min.min(b.x_min),
        y_min: a.y_min.min(b.y_min),
        x_max: a.x_max.max(b.x_max),
        y_max: a.y_max.max(b.y_max),
    }
}
