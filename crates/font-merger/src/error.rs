use std::result;

use read_fonts::ReadError;
use thiserror::Error;
use write_fonts::{BuilderError, error};

use crate::{glyph_name::GlyphName, types::Codepoint};

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("failed to read font: {0}")]
    ReadError(#[from] ReadError),

    #[error("failed to write font: {0}")]
    WriteError(#[from] error::Error),

    #[error("failed to build font: {0}")]
    BuilderError(#[from] BuilderError),

    #[error("required table '{0}' not found")]
    MissingTable(&'static str),

    #[error("glyph '{0}' not found")]
    UnknownGlyph(GlyphName),

    #[error("glyph '{glyph}' references glyph id {gid}, which is out of range")]
    ComponentOutOfRange { glyph: GlyphName, gid: u32 },

    #[error("component '{component}' of glyph '{glyph}' was not copied")]
    MissingComponent { glyph: GlyphName, component: GlyphName },

    #[error("font would exceed {max} glyphs")]
    TooManyGlyphs { max: usize },

    #[error("glyph '{glyph}' could not be compiled: {source}")]
    InvalidOutline {
        glyph: GlyphName,
        #[source]
        source: error::Error,
    },
}

pub type Result<T> = result::Result<T, MergeError>;

/// Errors from parsing codepoint range expressions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("empty codepoint range")]
    Empty,

    #[error("invalid codepoint '{0}': expected hexadecimal with optional U+ or 0x prefix")]
    InvalidCodepoint(String),

    #[error("reversed codepoint range {start}-{end}")]
    Reversed { start: Codepoint, end: Codepoint },
}
