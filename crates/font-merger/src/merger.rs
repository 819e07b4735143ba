//! Glyph set merging

use log::{debug, info, warn};
use read_fonts::types::Tag;

use crate::{
    MergeError, Result,
    font::{FontModel, GLYPH_COUNT_TABLES, VARIATION_TABLES},
    options::Options,
    plan::MergePlan,
    rename::{FamilyNames, rename_family},
    tables::{CharMapTable, MetricsTable, OutlineTable},
    types::{Codepoint, GlyphRecord},
};

/// Progress of a merge, reported as it happens
#[derive(Debug)]
pub enum MergeEvent<'a> {
    /// The source font does not map the codepoint
    CodepointSkipped { codepoint: Codepoint },
    GlyphCopied { record: &'a GlyphRecord },
    GlyphFailed { record: &'a GlyphRecord, error: &'a MergeError },
    FamilyRenamed { names: &'a FamilyNames },
    /// A family name was requested but the font has no `name` table
    RenameSkipped,
    TableRemoved { tag: Tag },
}

/// Receives [`MergeEvent`]s; any `FnMut(MergeEvent)` closure works.
pub trait MergeObserver {
    fn on_event(&mut self, event: MergeEvent<'_>);
}

impl<F: FnMut(MergeEvent<'_>)> MergeObserver for F {
    fn on_event(&mut self, event: MergeEvent<'_>) {
        self(event)
    }
}

/// Outcome of a merge
#[derive(Clone, Debug, Default)]
pub struct MergeReport {
    /// Glyphs copied for a requested codepoint
    pub copied: Vec<GlyphRecord>,
    /// Glyphs copied only as composite components
    pub components: Vec<GlyphRecord>,
    /// Requested codepoints the source font does not map
    pub unresolved: Vec<Codepoint>,
    /// Glyphs whose copy failed
    pub failed: Vec<GlyphRecord>,
    pub removed_tables: Vec<Tag>,
    pub renamed: Option<FamilyNames>,
}

impl MergeReport {
    /// Requested codepoints that did not make it into the destination
    pub fn skipped(&self) -> usize {
        self.unresolved.len() + self.failed.iter().filter(|r| !r.is_component()).count()
    }
}

/// Copies codepoint glyphs, with their composite components, between fonts
#[derive(Default)]
pub struct GlyphSetMerger {
    options: Options,
}

impl GlyphSetMerger {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Copy the glyphs of `codepoints` from `source` into `dest`.
    ///
    /// Per-glyph failures are reported through `observer` and the merge goes
    /// on; the returned error is reserved for problems with the fonts as a
    /// whole.
    pub fn merge(
        &self,
        source: &FontModel,
        dest: &mut FontModel,
        codepoints: &[Codepoint],
        observer: &mut impl MergeObserver,
    ) -> Result<MergeReport> {
        let plan = MergePlan::new(&source.cmap, &source.outlines, &dest.outlines, codepoints);
        let mut report = MergeReport::default();

        for &codepoint in &plan.unresolved {
            debug!("{codepoint} is not mapped in the source font");
            observer.on_event(MergeEvent::CodepointSkipped { codepoint });
        }
        report.unresolved = plan.unresolved.clone();

        for record in &plan.records {
            match self.copy_glyph(source, dest, &plan, record) {
                Ok(()) => {
                    debug!("Copied '{}' as '{}'", record.source, record.dest);
                    observer.on_event(MergeEvent::GlyphCopied { record });
                    if record.is_component() {
                        report.components.push(record.clone());
                    } else {
                        report.copied.push(record.clone());
                    }
                }
                Err(error) => {
                    warn!("Failed to copy glyph '{}': {error}", record.source);
                    observer.on_event(MergeEvent::GlyphFailed { record, error: &error });
                    report.failed.push(record.clone());
                }
            }
        }

        if !report.copied.is_empty() || !report.components.is_empty() {
            dest.raise_limits(source)?;
        }

        if let Some(family) = &self.options.family_name {
            match dest.names.as_mut() {
                Some(names) => {
                    let renamed = rename_family(names, family);
                    info!("Renamed family to {renamed}");
                    observer.on_event(MergeEvent::FamilyRenamed { names: &renamed });
                    report.renamed = Some(renamed);
                }
                None => {
                    warn!("Destination font has no name table; family name left unchanged");
                    observer.on_event(MergeEvent::RenameSkipped);
                }
            }
        }

        let mut removed = dest.remove_tables(VARIATION_TABLES);
        if dest.outlines.is_modified() {
            removed.extend(dest.remove_tables(GLYPH_COUNT_TABLES));
        }
        for &tag in &removed {
            warn!("Dropped table '{tag}'");
            observer.on_event(MergeEvent::TableRemoved { tag });
        }
        report.removed_tables = removed;

        info!(
            "Copied {} glyphs and {} components, skipped {}",
            report.copied.len(),
            report.components.len(),
            report.skipped()
        );

        Ok(report)
    }

    fn copy_glyph(
        &self,
        source: &FontModel,
        dest: &mut FontModel,
        plan: &MergePlan,
        record: &GlyphRecord,
    ) -> Result<()> {
        let mut outline = source.outlines.outline(&record.source)?;

        if let Some(missing) = outline.component_names().find(|c| plan.dest_name(c).is_none()) {
            return Err(MergeError::MissingComponent {
                glyph: record.source.clone(),
                component: missing.clone(),
            });
        }
        outline.rename_components(|component| plan.dest_name(component).cloned());

        if !self.options.keep_hinting {
            outline.strip_instructions();
        }

        dest.outlines.insert(record.dest.clone(), outline)?;

        if let (Some(from), Some(to)) = (&source.hmtx, &mut dest.hmtx)
            && let Some(metric) = from.metric(&record.source)
        {
            to.set_metric(&record.dest, metric);
        }
        if let (Some(from), Some(to)) = (&source.vmtx, &mut dest.vmtx)
            && let Some(metric) = from.metric(&record.source)
        {
            to.set_metric(&record.dest, metric);
        }

        if let Some(codepoint) = record.codepoint {
            dest.cmap.install(codepoint, &record.dest);
        }

        Ok(())
    }
}
