//! CLI definitions and command dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::merge::merge_glyphs;

const MERGE_EXAMPLES: &str = "\
Examples:
  # Copy Latin uppercase letters (A-Z)
  glyphgraft merge source.ttf dest.ttf output.ttf -r U+0041-U+005A

  # Copy CJK Unified Ideographs and rename the family
  glyphgraft merge source.ttf dest.ttf output.ttf -r U+4E00-U+9FFF -f \"My Custom Font\"

  # Copy several ranges and single characters
  glyphgraft merge source.ttf dest.ttf output.ttf -r 0x41-0x5A -r U+4E00 -r 4E03";

#[derive(Parser)]
#[command(name = "glyphgraft", version)]
#[command(about = "Copy glyphs for Unicode ranges from one TrueType font into another")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct MergeArgs {
    /// Font to copy glyphs from
    pub source: PathBuf,
    /// Font to copy glyphs into
    pub dest: PathBuf,
    /// Output font file, overwritten if it exists
    pub output: PathBuf,
    /// Unicode range to copy, e.g. U+4E00-U+9FFF; repeatable
    #[arg(short = 'r', long = "range", value_name = "RANGE", required = true)]
    pub ranges: Vec<String>,
    /// New family name for the output font
    #[arg(short, long)]
    pub family_name: Option<String>,
    /// Keep TrueType instructions on copied glyphs
    #[arg(long)]
    pub keep_hinting: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Copy glyphs, with their composite components, into a destination font
    #[command(after_help = MERGE_EXAMPLES)]
    Merge {
        #[command(flatten)]
        args: MergeArgs,
    },
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Merge { args } => {
                merge_glyphs(&args)?;
            }
        }
        Ok(())
    }
}
