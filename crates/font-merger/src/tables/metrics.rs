//! hmtx/vmtx adapter

use std::collections::HashMap;

use font_types::{FWord, UfWord};
use read_fonts::{FontRef, TableProvider};
use write_fonts::{
    from_obj::ToOwnedTable,
    tables::{glyf::Bbox, hhea::Hhea, hmtx::Hmtx, vhea::Vhea, vmtx::Vmtx},
};

use crate::{
    Result,
    glyph_name::GlyphName,
    tables::MetricsTable,
    types::GlyphMetric,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Advances and side bearings of every glyph along one axis
#[derive(Clone, Debug)]
pub struct Metrics {
    axis: Axis,
    values: HashMap<GlyphName, GlyphMetric>,
    modified: bool,
}

impl Metrics {
    /// Load `hmtx`; `None` when the font has no `hhea`/`hmtx`.
    pub fn horizontal(font: &FontRef, order: &[GlyphName]) -> Option<Self> {
        let hhea = font.hhea().ok()?;
        let hmtx = font.hmtx().ok()?;
        let long = hmtx.h_metrics();
        let bearings = hmtx.left_side_bearings();

        let values = collect(
            order,
            hhea.number_of_h_metrics() as usize,
            |i| long.get(i).map(|m| GlyphMetric::new(m.advance.get(), m.side_bearing.get())),
            |i| bearings.get(i).map(|b| b.get()),
        );
        Some(Self { axis: Axis::Horizontal, values, modified: false })
    }

    /// Load `vmtx`; `None` when the font has no `vhea`/`vmtx`.
    pub fn vertical(font: &FontRef, order: &[GlyphName]) -> Option<Self> {
        let vhea = font.vhea().ok()?;
        let vmtx = font.vmtx().ok()?;
        let long = vmtx.v_metrics();
        let bearings = vmtx.top_side_bearings();

        let values = collect(
            order,
            vhea.number_of_long_ver_metrics() as usize,
            |i| long.get(i).map(|m| GlyphMetric::new(m.advance.get(), m.side_bearing.get())),
            |i| bearings.get(i).map(|b| b.get()),
        );
        Some(Self { axis: Axis::Vertical, values, modified: false })
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn max_advance(&self) -> u16 {
        self.values.values().map(|m| m.advance).max().unwrap_or(0)
    }

    /// Metrics in glyph order, split into long metrics and trailing side
    /// bearings that repeat the last advance.
    fn pack<'a>(
        &self,
        order: impl IntoIterator<Item = &'a GlyphName>,
    ) -> (Vec<GlyphMetric>, Vec<i16>) {
        let mut metrics: Vec<GlyphMetric> = order
            .into_iter()
            .map(|name| self.values.get(name).copied().unwrap_or_default())
            .collect();

        let mut num_long = metrics.len();
        while num_long > 1 && metrics[num_long - 1].advance == metrics[num_long - 2].advance {
            num_long -= 1;
        }
        let bearings = metrics.split_off(num_long).into_iter().map(|m| m.side_bearing).collect();
        (metrics, bearings)
    }

    pub fn build_hmtx<'a>(&self, order: impl IntoIterator<Item = &'a GlyphName>) -> Hmtx {
        let (long, left_side_bearings) = self.pack(order);
        let h_metrics = long
            .into_iter()
            .map(|m| write_fonts::tables::hmtx::LongMetric {
                advance: m.advance,
                side_bearing: m.side_bearing,
            })
            .collect();
        Hmtx { h_metrics, left_side_bearings }
    }

    pub fn build_vmtx<'a>(&self, order: impl IntoIterator<Item = &'a GlyphName>) -> Vmtx {
        let (long, top_side_bearings) = self.pack(order);
        let v_metrics = long
            .into_iter()
            .map(|m| write_fonts::tables::vmtx::LongMetric {
                advance: m.advance,
                side_bearing: m.side_bearing,
            })
            .collect();
        Vmtx { v_metrics, top_side_bearings }
    }
}

impl MetricsTable for Metrics {
    fn metric(&self, glyph: &str) -> Option<GlyphMetric> {
        self.values.get(glyph).copied()
    }

    fn set_metric(&mut self, glyph: &GlyphName, metric: GlyphMetric) {
        self.values.insert(glyph.clone(), metric);
        self.modified = true;
    }
}

/// Glyphs past the long metrics reuse the last advance.
fn collect(
    order: &[GlyphName],
    num_long: usize,
    long: impl Fn(usize) -> Option<GlyphMetric>,
    bearing: impl Fn(usize) -> Option<i16>,
) -> HashMap<GlyphName, GlyphMetric> {
    let last_advance = num_long.checked_sub(1).and_then(&long).map(|m| m.advance).unwrap_or(0);

    order
        .iter()
        .enumerate()
        .map(|(gid, name)| {
            let metric = if gid < num_long {
                long(gid).unwrap_or_default()
            } else {
                GlyphMetric::new(last_advance, bearing(gid - num_long).unwrap_or(0))
            };
            (name.clone(), metric)
        })
        .collect()
}

/// Side bearing extremes of a set of glyphs along one axis
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Extents {
    min_leading: i16,
    min_trailing: i16,
    max_extent: i16,
}

impl Extents {
    /// `glyphs` pairs each glyph's metric with its outline span
    /// (`x_min..x_max` horizontally, `y_min..y_max` vertically).
    fn of(glyphs: impl IntoIterator<Item = (GlyphMetric, i16, i16)>) -> Option<Self> {
        glyphs
            .into_iter()
            .map(|(metric, low, high)| {
                let extent = metric.side_bearing as i32 + (high as i32 - low as i32);
                Self {
                    min_leading: metric.side_bearing,
                    min_trailing: clamp(metric.advance as i32 - extent),
                    max_extent: clamp(extent),
                }
            })
            .reduce(|a, b| Self {
                min_leading: a.min_leading.min(b.min_leading),
                min_trailing: a.min_trailing.min(b.min_trailing),
                max_extent: a.max_extent.max(b.max_extent),
            })
    }
}

fn clamp(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

/// `hhea` updated for a rebuilt `hmtx`.
///
/// `inserted` holds the metric and bounding box of every added glyph with
/// contours; the bearing and extent fields only ever widen.
pub fn build_hhea(
    font: &FontRef,
    hmtx: &Hmtx,
    metrics: &Metrics,
    inserted: &[(GlyphMetric, Bbox)],
) -> Result<Hhea> {
    let mut hhea: Hhea = font.hhea()?.to_owned_table();
    hhea.number_of_h_metrics = hmtx.h_metrics.len() as u16;
    let max_advance = hhea.advance_width_max.to_u16().max(metrics.max_advance());
    hhea.advance_width_max = UfWord::new(max_advance);

    if let Some(extents) = Extents::of(inserted.iter().map(|(m, b)| (*m, b.x_min, b.x_max))) {
        hhea.min_left_side_bearing =
            FWord::new(hhea.min_left_side_bearing.to_i16().min(extents.min_leading));
        hhea.min_right_side_bearing =
            FWord::new(hhea.min_right_side_bearing.to_i16().min(extents.min_trailing));
        hhea.x_max_extent = FWord::new(hhea.x_max_extent.to_i16().max(extents.max_extent));
    }
    Ok(hhea)
}

/// `vhea` updated for a rebuilt `vmtx`
pub fn build_vhea(
    font: &FontRef,
    vmtx: &Vmtx,
    metrics: &Metrics,
    inserted: &[(GlyphMetric, Bbox)],
) -> Result<Vhea> {
    let mut vhea: Vhea = font.vhea()?.to_owned_table();
    vhea.number_of_long_ver_metrics = vmtx.v_metrics.len() as u16;
    let max_advance = vhea.advance_height_max.to_u16().max(metrics.max_advance());
    vhea.advance_height_max = UfWord::new(max_advance);

    if let Some(extents) = Extents::of(inserted.iter().map(|(m, b)| (*m, b.y_min, b.y_max))) {
        vhea.min_top_side_bearing =
            FWord::new(vhea.min_top_side_bearing.to_i16().min(extents.min_leading));
        vhea.min_bottom_side_bearing =
            FWord::new(vhea.min_bottom_side_bearing.to_i16().min(extents.min_trailing));
        vhea.y_max_extent = FWord::new(vhea.y_max_extent.to_i16().max(extents.max_extent));
    }
    Ok(vhea)
}
