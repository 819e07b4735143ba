//! Options for glyph merging

/// Options for glyph merging
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// New family name for the output font
    pub family_name: Option<String>,

    /// Keep TrueType instructions on copied simple glyphs
    pub keep_hinting: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn family_name(mut self, family: impl Into<String>) -> Self {
        self.family_name = Some(family.into());
        self
    }

    /// Set or clear the family name
    pub fn maybe_family_name(mut self, family: Option<impl Into<String>>) -> Self {
        self.family_name = family.map(Into::into);
        self
    }

    pub fn keep_hinting(mut self, keep: bool) -> Self {
        self.keep_hinting = keep;
        self
    }
}
