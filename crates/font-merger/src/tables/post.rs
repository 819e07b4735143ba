//! Glyph order and the post table

use std::collections::{HashMap, HashSet};

use font_types::Version16Dot16;
use log::debug;
use read_fonts::{FontRef, TableProvider, tables::post::Post as ReadPost};
use write_fonts::tables::post::Post;

use crate::{Result, glyph_name::GlyphName};

/// The font's glyph order as unique names.
///
/// Names come from `post`; glyphs without one are named `glyphNNNNN`.
/// A name seen again later in the order becomes `name#1`, `name#2`, ...
pub fn glyph_order(font: &FontRef) -> Result<Vec<GlyphName>> {
    let num_glyphs = font.maxp()?.num_glyphs();
    let post = font.post().ok();

    let mut used: HashSet<String> = HashSet::new();
    let mut suffixes: HashMap<String, usize> = HashMap::new();
    let mut order = Vec::with_capacity(num_glyphs as usize);

    for gid in 0..num_glyphs {
        let base = post
            .as_ref()
            .and_then(|p| glyph_name_from_post(p, gid))
            .unwrap_or_else(|| GlyphName::for_gid(gid as u32).into_string());

        let name = if used.contains(&base) {
            let suffix = suffixes.entry(base.clone()).or_insert(0);
            let candidate = loop {
                *suffix += 1;
                let candidate = format!("{base}#{suffix}");
                if !used.contains(&candidate) {
                    break candidate;
                }
            };
            debug!("Duplicate glyph name '{base}' at gid {gid}, using '{candidate}'");
            candidate
        } else {
            base
        };

        used.insert(name.clone());
        order.push(GlyphName::new(name));
    }

    Ok(order)
}

fn glyph_name_from_post(post: &ReadPost, gid: u16) -> Option<String> {
    post.glyph_name(read_fonts::types::GlyphId16::new(gid))
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
}

/// Rebuild `post` as format 2 carrying `names`.
///
/// Glyphs the font already names keep their stored name, so the `name#N`
/// keys given to duplicates never reach the output. Returns `None` when the
/// font has no `post` table or a format 3 one, which stores no names and
/// stays valid for any glyph count.
pub fn build_post<'a>(
    font: &FontRef,
    names: impl IntoIterator<Item = &'a GlyphName>,
) -> Result<Option<Post>> {
    let Ok(original) = font.post() else {
        return Ok(None);
    };
    if original.version() == Version16Dot16::VERSION_3_0 {
        return Ok(None);
    }

    let glyph_names: Vec<&str> = names
        .into_iter()
        .enumerate()
        .map(|(gid, name)| {
            u16::try_from(gid)
                .ok()
                .and_then(|gid| original.glyph_name(read_fonts::types::GlyphId16::new(gid)))
                .filter(|stored| !stored.is_empty())
                .unwrap_or(name.as_str())
        })
        .collect();
    let mut post = Post::new_v2(glyph_names);

    post.italic_angle = original.italic_angle();
    post.underline_position = original.underline_position();
    post.underline_thickness = original.underline_thickness();
    post.is_fixed_pitch = original.is_fixed_pitch();
    post.min_mem_type42 = original.min_mem_type42();
    post.max_mem_type42 = original.max_mem_type42();
    post.min_mem_type1 = original.min_mem_type1();
    post.max_mem_type1 = original.max_mem_type1();

    Ok(Some(post))
}
