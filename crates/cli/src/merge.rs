use anyhow::{Context, Result, bail};
use glyphgraft_merger::{
    Codepoint, MergeEvent, MergeObserver, MergeReport, Options, merge_bytes, parse_ranges,
};
use log::debug;

use crate::{cli::MergeArgs, io::FontFile};

/// Prints merge progress to stdout.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl MergeObserver for ConsoleReporter {
    fn on_event(&mut self, event: MergeEvent<'_>) {
        match event {
            MergeEvent::CodepointSkipped { codepoint } => {
                println!("  Skip: {codepoint} ({}) - not in source font", display_char(codepoint));
            }
            MergeEvent::GlyphCopied { record } => match record.codepoint {
                Some(codepoint) => println!(
                    "  ✓ Copied: {codepoint} ({}) - {}",
                    display_char(codepoint),
                    record.dest
                ),
                None => println!("  ✓ Component: {} - {}", record.source, record.dest),
            },
            MergeEvent::GlyphFailed { record, error } => match record.codepoint {
                Some(codepoint) => {
                    println!("  Error copying {codepoint} ({}): {error}", display_char(codepoint))
                }
                None => println!("  Error copying component {}: {error}", record.source),
            },
            MergeEvent::FamilyRenamed { names } => {
                println!("\nFont family renamed to: {}", names.family);
            }
            MergeEvent::RenameSkipped => {
                println!("\nNo name table in destination font; family name unchanged");
            }
            MergeEvent::TableRemoved { tag } => println!("  Removed table: {tag}"),
        }
    }
}

fn display_char(codepoint: Codepoint) -> char {
    codepoint.to_char().filter(|c| !c.is_control()).unwrap_or('?')
}

pub fn merge_glyphs(args: &MergeArgs) -> Result<MergeReport> {
    let codepoints = parse_ranges(&args.ranges).context("Invalid codepoint range")?;

    let source = FontFile::new(&args.source);
    let dest = FontFile::new(&args.dest);
    let output = FontFile::new(&args.output);
    if !source.exists() {
        bail!("Source font file not found: {}", source.path().display());
    }
    if !dest.exists() {
        bail!("Destination font file not found: {}", dest.path().display());
    }

    println!("Source: {}", source.path().display());
    println!("Destination: {}", dest.path().display());
    println!("Processing {} codepoints...", codepoints.len());

    let source_data = source.read()?;
    let dest_data = dest.read()?;

    let options = Options::new()
        .maybe_family_name(args.family_name.clone())
        .keep_hinting(args.keep_hinting);
    debug!("Merge options: {options:?}");
    let (merged, report) =
        merge_bytes(&source_data, &dest_data, &codepoints, &options, &mut ConsoleReporter)
            .with_context(|| format!("Failed to merge glyphs into {}", dest.path().display()))?;

    output.ensure_parent_dir()?;
    output.write(&merged)?;
    println!("\nSaved: {}", output.path().display());

    println!("\n✓ Complete!");
    println!("  Copied: {} glyphs", report.copied.len());
    if !report.components.is_empty() {
        println!("  Components: {} glyphs", report.components.len());
    }
    println!("  Skipped: {} glyphs", report.skipped());

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn args(source: &str, dest: &str, ranges: &[&str]) -> MergeArgs {
        MergeArgs {
            source: PathBuf::from(source),
            dest: PathBuf::from(dest),
            output: std::env::temp_dir().join("glyphgraft-never-written.ttf"),
            ranges: ranges.iter().map(|r| r.to_string()).collect(),
            family_name: None,
            keep_hinting: false,
        }
    }

    #[test]
    fn test_invalid_range_rejected_before_io() {
        let err = merge_glyphs(&args("missing-source.ttf", "missing-dest.ttf", &["U+XYZ"])).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid codepoint range"));
    }

    #[test]
    fn test_missing_source_font() {
        let err = merge_glyphs(&args("missing-source.ttf", "missing-dest.ttf", &["U+4E00"])).unwrap_err();
        assert_eq!(err.to_string(), "Source font file not found: missing-source.ttf");
    }

    #[test]
    fn test_display_char() {
        assert_eq!(display_char(Codepoint::new(0x4E00)), '一');
        assert_eq!(display_char(Codepoint::new(0x0A)), '?');
        assert_eq!(display_char(Codepoint::new(0x110000)), '?');
    }
}
