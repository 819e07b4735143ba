//! Composite dependency closure

use std::collections::HashMap;

use log::warn;

use crate::{glyph_name::GlyphName, tables::OutlineTable};

#[derive(Copy, Clone, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

enum Step {
    Enter(GlyphName),
    Exit(GlyphName),
}

/// Every glyph reachable from `glyph` through composite component references.
///
/// The result is in post-order: each glyph comes after all the glyphs it
/// references. `glyph` itself is not included. Simple glyphs and names absent
/// from the table have an empty closure. A component reference back into the
/// current chain is a cycle; it is logged and not followed.
pub fn closure(outlines: &impl OutlineTable, glyph: &str) -> Vec<GlyphName> {
    let root = GlyphName::new(glyph);
    let mut state: HashMap<GlyphName, Visit> = HashMap::new();
    let mut order = Vec::new();
    let mut stack = vec![Step::Enter(root.clone())];

    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(name) => {
                match state.get(&name) {
                    Some(Visit::Done) => continue,
                    Some(Visit::InProgress) => {
                        warn!("Component cycle through glyph '{name}' under '{root}'; not following it");
                        continue;
                    }
                    None => {}
                }

                state.insert(name.clone(), Visit::InProgress);
                let components = outlines.components(&name).unwrap_or_else(|e| {
                    warn!("Components of glyph '{name}' could not be read: {e}");
                    Vec::new()
                });

                stack.push(Step::Exit(name));
                stack.extend(components.into_iter().rev().map(Step::Enter));
            }
            Step::Exit(name) => {
                state.insert(name.clone(), Visit::Done);
                if name != root {
                    order.push(name);
                }
            }
        }
    }

    order
}
