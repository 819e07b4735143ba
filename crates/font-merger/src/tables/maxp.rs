//! maxp table rebuilding

use font_types::Version16Dot16;
use read_fonts::{FontRef, TableProvider};
use write_fonts::tables::maxp::Maxp;

use crate::Result;

/// Rebuild the destination's `maxp` for `num_glyphs` glyphs.
///
/// Outline limits are raised to cover the glyphs copied from `source`.
/// Limits tied to the hinting programs (storage, function and instruction
/// definitions) stay the destination's, since `fpgm` and `prep` are not copied.
pub fn build_maxp(dest: &FontRef, source: Option<&FontRef>, num_glyphs: u16) -> Result<Maxp> {
    let dest = dest.maxp()?;
    let source = source.and_then(|f| f.maxp().ok());

    if dest.version() != Version16Dot16::VERSION_1_0 {
        return Ok(Maxp { num_glyphs, ..Default::default() });
    }

    let kept = |field: Option<u16>| field.unwrap_or(0);
    let source_limits = source.as_ref().map(|m| {
        (
            m.max_points(),
            m.max_contours(),
            m.max_composite_points(),
            m.max_composite_contours(),
            m.max_stack_elements(),
            m.max_size_of_instructions(),
            m.max_component_elements(),
            m.max_component_depth(),
        )
    });
    let (
        src_points,
        src_contours,
        src_composite_points,
        src_composite_contours,
        src_stack_elements,
        src_size_of_instructions,
        src_component_elements,
        src_component_depth,
    ) = source_limits.unwrap_or_default();

    Ok(Maxp {
        num_glyphs,
        max_points: raise(dest.max_points(), src_points),
        max_contours: raise(dest.max_contours(), src_contours),
        max_composite_points: raise(dest.max_composite_points(), src_composite_points),
        max_composite_contours: raise(dest.max_composite_contours(), src_composite_contours),
        max_zones: Some(dest.max_zones().unwrap_or(1)),
        max_twilight_points: Some(kept(dest.max_twilight_points())),
        max_storage: Some(kept(dest.max_storage())),
        max_function_defs: Some(kept(dest.max_function_defs())),
        max_instruction_defs: Some(kept(dest.max_instruction_defs())),
        max_stack_elements: raise(dest.max_stack_elements(), src_stack_elements),
        max_size_of_instructions: raise(
            dest.max_size_of_instructions(),
            src_size_of_instructions,
        ),
        max_component_elements: raise(dest.max_component_elements(), src_component_elements),
        max_component_depth: raise(dest.max_component_depth(), src_component_depth),
    })
}

fn raise(own: Option<u16>, other: Option<u16>) -> Option<u16> {
    Some(own.unwrap_or(0).max(other.unwrap_or(0)))
}

#[cfg(test)]
mod tests {
    use write_fonts::FontBuilder;

    use super::*;

    fn font_with_maxp(maxp: Maxp) -> Vec<u8> {
        let mut builder = FontBuilder::new();
        builder.add_table(&maxp).unwrap();
        builder.build()
    }

    fn truetype_maxp(num_glyphs: u16, max_points: u16, max_function_defs: u16) -> Maxp {
        Maxp {
            num_glyphs,
            max_points: Some(max_points),
            max_contours: Some(2),
            max_composite_points: Some(0),
            max_composite_contours: Some(0),
            max_zones: Some(2),
            max_twilight_points: Some(0),
            max_storage: Some(0),
            max_function_defs: Some(max_function_defs),
            max_instruction_defs: Some(0),
            max_stack_elements: Some(0),
            max_size_of_instructions: Some(0),
            max_component_elements: Some(0),
            max_component_depth: Some(0),
        }
    }

    #[test]
    fn test_limits_raised_to_source() {
        let dest = font_with_maxp(truetype_maxp(3, 10, 4));
        let source = font_with_maxp(truetype_maxp(50, 80, 9));
        let dest = FontRef::new(&dest).unwrap();
        let source = FontRef::new(&source).unwrap();

        let maxp = build_maxp(&dest, Some(&source), 5).unwrap();
        assert_eq!(maxp.num_glyphs, 5);
        assert_eq!(maxp.max_points, Some(80));
        assert_eq!(maxp.max_function_defs, Some(4));
        assert_eq!(maxp.max_zones, Some(2));
    }

    #[test]
    fn test_version_05_stays_short() {
        let dest = font_with_maxp(Maxp { num_glyphs: 3, ..Default::default() });
        let dest = FontRef::new(&dest).unwrap();
        let maxp = build_maxp(&dest, None, 4).unwrap();
        assert_eq!(maxp.num_glyphs, 4);
        assert_eq!(maxp.max_points, None);
    }
}
