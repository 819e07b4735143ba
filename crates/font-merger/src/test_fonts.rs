//! Synthetic TrueType fonts for unit tests

use std::collections::HashMap;

use kurbo::BezPath;
use read_fonts::types::{GlyphId, NameId, Tag};
use write_fonts::{
    FontBuilder,
    tables::{
        cmap::Cmap,
        glyf::{
            Anchor, Bbox, Component, ComponentFlags, CompositeGlyph, GlyfLocaBuilder, Glyph,
            SimpleGlyph, Transform,
        },
        head::Head,
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        loca::LocaFormat,
        maxp::Maxp,
        name::{Name, NameRecord},
        post::Post,
        vhea::Vhea,
        vmtx::Vmtx,
    },
};

pub enum Shape {
    Empty,
    Rect(i16, i16, i16, i16),
    Composite(Vec<(String, i16, i16)>),
}

impl Shape {
    pub fn rect(x_min: i16, y_min: i16, x_max: i16, y_max: i16) -> Self {
        Shape::Rect(x_min, y_min, x_max, y_max)
    }

    pub fn composite(parts: &[(&str, i16, i16)]) -> Self {
        Shape::Composite(parts.iter().map(|(n, x, y)| (n.to_string(), *x, *y)).collect())
    }
}

struct TestGlyph {
    name: String,
    shape: Shape,
    advance: u16,
    instructions: Vec<u8>,
}

pub struct TestFont {
    glyphs: Vec<TestGlyph>,
    cmap: Vec<(u32, String)>,
    names: Option<(String, String)>,
    vertical: bool,
    post_names: bool,
    raw: Vec<(Tag, Vec<u8>)>,
}

impl TestFont {
    /// A font holding only `.notdef`
    pub fn new() -> Self {
        Self {
            glyphs: vec![TestGlyph {
                name: ".notdef".to_string(),
                shape: Shape::Empty,
                advance: 500,
                instructions: Vec::new(),
            }],
            cmap: Vec::new(),
            names: None,
            vertical: false,
            post_names: true,
            raw: Vec::new(),
        }
    }

    pub fn glyph(mut self, name: &str, shape: Shape, advance: u16) -> Self {
        self.glyphs.push(TestGlyph {
            name: name.to_string(),
            shape,
            advance,
            instructions: Vec::new(),
        });
        self
    }

    pub fn hinted_glyph(mut self, name: &str, shape: Shape, advance: u16) -> Self {
        self.glyphs.push(TestGlyph {
            name: name.to_string(),
            shape,
            advance,
            instructions: vec![0xB0, 0x00],
        });
        self
    }

    pub fn map(mut self, codepoint: u32, glyph: &str) -> Self {
        self.cmap.push((codepoint, glyph.to_string()));
        self
    }

    pub fn names(mut self, family: &str, subfamily: &str) -> Self {
        self.names = Some((family.to_string(), subfamily.to_string()));
        self
    }

    pub fn vertical(mut self, vertical: bool) -> Self {
        self.vertical = vertical;
        self
    }

    /// Use a format 3 `post`, which carries no glyph names
    pub fn without_glyph_names(mut self) -> Self {
        self.post_names = false;
        self
    }

    pub fn raw_table(mut self, tag: &[u8; 4], data: Vec<u8>) -> Self {
        self.raw.push((Tag::new(tag), data));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let gids: HashMap<&str, u16> = self
            .glyphs
            .iter()
            .enumerate()
            .map(|(i, g)| (g.name.as_str(), i as u16))
            .collect();

        let bounds: Vec<Bbox> = self.glyphs.iter().map(|g| self.bbox_of(&g.shape)).collect();

        let mut glyf_builder = GlyfLocaBuilder::new();
        for glyph in &self.glyphs {
            let compiled = match &glyph.shape {
                Shape::Empty => Glyph::Empty,
                Shape::Rect(x0, y0, x1, y1) => {
                    let mut simple = SimpleGlyph::from_bezpath(&rect_path(*x0, *y0, *x1, *y1))
                        .expect("rect path");
                    simple.instructions = glyph.instructions.clone();
                    Glyph::Simple(simple)
                }
                Shape::Composite(parts) => {
                    let bbox = self.bbox_of(&glyph.shape);
                    let mut components = parts.iter().map(|(name, x, y)| {
                        Component::new(
                            font_types::GlyphId16::new(gids[name.as_str()]),
                            Anchor::Offset { x: *x, y: *y },
                            Transform::default(),
                            ComponentFlags::default(),
                        )
                    });
                    let first = components.next().expect("at least one component");
                    let mut composite = CompositeGlyph::new(first, bbox);
                    for component in components {
                        composite.add_component(component, bbox);
                    }
                    Glyph::Composite(composite)
                }
            };
            glyf_builder.add_glyph(&compiled).expect("valid glyph");
        }
        let (glyf, loca, loca_format) = glyf_builder.build();

        let num_glyphs = self.glyphs.len() as u16;
        let head = Head {
            units_per_em: 1000,
            magic_number: 0x5F0F3CF5,
            x_min: bounds.iter().map(|b| b.x_min).min().unwrap_or(0),
            y_min: bounds.iter().map(|b| b.y_min).min().unwrap_or(0),
            x_max: bounds.iter().map(|b| b.x_max).max().unwrap_or(0),
            y_max: bounds.iter().map(|b| b.y_max).max().unwrap_or(0),
            index_to_loc_format: match loca_format {
                LocaFormat::Short => 0,
                LocaFormat::Long => 1,
            },
            ..Default::default()
        };

        let hhea = Hhea {
            ascender: font_types::FWord::new(800),
            descender: font_types::FWord::new(-200),
            advance_width_max: font_types::UfWord::new(
                self.glyphs.iter().map(|g| g.advance).max().unwrap_or(0),
            ),
            caret_slope_rise: 1,
            number_of_h_metrics: num_glyphs,
            ..Default::default()
        };

        let hmtx = Hmtx {
            h_metrics: self
                .glyphs
                .iter()
                .zip(&bounds)
                .map(|(g, b)| LongMetric { advance: g.advance, side_bearing: b.x_min })
                .collect(),
            left_side_bearings: vec![],
        };

        let maxp = Maxp {
            num_glyphs,
            max_points: Some(4),
            max_contours: Some(1),
            max_composite_points: Some(8),
            max_composite_contours: Some(2),
            max_zones: Some(1),
            max_twilight_points: Some(0),
            max_storage: Some(0),
            max_function_defs: Some(0),
            max_instruction_defs: Some(0),
            max_stack_elements: Some(0),
            max_size_of_instructions: Some(2),
            max_component_elements: Some(2),
            max_component_depth: Some(1),
        };

        let post = if self.post_names {
            Post::new_v2(self.glyphs.iter().map(|g| g.name.as_str()))
        } else {
            Post {
                version: font_types::Version16Dot16::VERSION_3_0,
                ..Default::default()
            }
        };

        let cmap = Cmap::from_mappings(self.cmap.iter().filter_map(|(cp, name)| {
            Some((char::from_u32(*cp)?, GlyphId::new(*gids.get(name.as_str())? as u32)))
        }))
        .expect("cmap");

        let mut builder = FontBuilder::new();
        builder.add_table(&head).unwrap();
        builder.add_table(&hhea).unwrap();
        builder.add_table(&hmtx).unwrap();
        builder.add_table(&maxp).unwrap();
        builder.add_table(&cmap).unwrap();
        builder.add_table(&post).unwrap();
        builder.add_table(&glyf).unwrap();
        builder.add_table(&loca).unwrap();

        if let Some((family, subfamily)) = &self.names {
            builder.add_table(&make_name(family, subfamily)).unwrap();
        }

        if self.vertical {
            let vhea = Vhea {
                ascender: font_types::FWord::new(500),
                descender: font_types::FWord::new(-500),
                advance_height_max: font_types::UfWord::new(1000),
                caret_slope_rise: 1,
                number_of_long_ver_metrics: num_glyphs,
                ..Default::default()
            };
            let vmtx = Vmtx {
                v_metrics: self
                    .glyphs
                    .iter()
                    .map(|_| write_fonts::tables::vmtx::LongMetric { advance: 1000, side_bearing: 100 })
                    .collect(),
                top_side_bearings: vec![],
            };
            builder.add_table(&vhea).unwrap();
            builder.add_table(&vmtx).unwrap();
        }

        for (tag, data) in &self.raw {
            builder.add_raw(*tag, data.clone());
        }

        builder.build()
    }

    fn bbox_of(&self, shape: &Shape) -> Bbox {
        match shape {
            Shape::Empty => Bbox::default(),
            Shape::Rect(x_min, y_min, x_max, y_max) => {
                Bbox { x_min: *x_min, y_min: *y_min, x_max: *x_max, y_max: *y_max }
            }
            Shape::Composite(parts) => parts
                .iter()
                .filter_map(|(name, dx, dy)| {
                    let glyph = self.glyphs.iter().find(|g| &g.name == name)?;
                    let b = self.bbox_of(&glyph.shape);
                    Some(Bbox {
                        x_min: b.x_min + dx,
                        y_min: b.y_min + dy,
                        x_max: b.x_max + dx,
                        y_max: b.y_max + dy,
                    })
                })
                .reduce(|a, b| Bbox {
                    x_min: a.x_min.min(b.x_min),
                    y_min: a.y_min.min(b.y_min),
                    x_max: a.x_max.max(b.x_max),
                    y_max: a.y_max.max(b.y_max),
                })
                .unwrap_or_default(),
        }
    }
}

fn rect_path(x0: i16, y0: i16, x1: i16, y1: i16) -> BezPath {
    let mut path = BezPath::new();
    path.move_to((x0 as f64, y0 as f64));
    path.line_to((x0 as f64, y1 as f64));
    path.line_to((x1 as f64, y1 as f64));
    path.line_to((x1 as f64, y0 as f64));
    path.close_path();
    path
}

/// IDs 1, 2, 4 and 6 on the Mac Roman and Windows Unicode platforms
fn make_name(family: &str, subfamily: &str) -> Name {
    let full = format!("{family} {subfamily}");
    let postscript = format!("{}-{}", family.replace(' ', ""), subfamily.replace(' ', ""));
    let values = [(1, family), (2, subfamily), (4, full.as_str()), (6, postscript.as_str())];

    let mut records = Vec::new();
    for (platform_id, encoding_id, language_id) in [(1, 0, 0), (3, 1, 0x409)] {
        for (name_id, value) in values {
            records.push(NameRecord::new(
                platform_id,
                encoding_id,
                language_id,
                NameId::new(name_id),
                value.to_string().into(),
            ));
        }
    }
    Name::new(records)
}
