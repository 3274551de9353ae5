use ros_export_core::{ConfigDocument, Line, LineEnding, Section};
use serde::Serialize;
use tracing::info;

use crate::profile::Profile;
use crate::synthesize::SynthesizedRouting;

mod dedup;

pub use dedup::dedup;

/// What the merge did to each section path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    /// Existing sections whose body was replaced in place.
    pub replaced: Vec<String>,
    /// Synthesized sections added because no section with their path existed.
    pub appended: Vec<String>,
    /// Superseded sections removed (legacy routing paths, repeated synthesized paths).
    pub dropped: Vec<String>,
    /// Preserved sections moved to the end of the document.
    pub relocated: Vec<String>,
}

/// Merge synthesized sections into `doc` for `target`.
///
/// Each synthesized section replaces the body of the first existing section
/// with the same path; repeats of that path are removed. A missing section is
/// placed directly after the previous section of its block, else ahead of a
/// later section of the block that already exists, else at the end. Running
/// the merge again on its own output changes nothing.
pub fn merge(
    mut doc: ConfigDocument,
    synthesized: &SynthesizedRouting,
    target: &Profile,
) -> (ConfigDocument, MergeOutcome) {
    let mut outcome = MergeOutcome::default();
    let ending = doc.line_ending();

    if !synthesized.is_empty() {
        drop_superseded(&mut doc, synthesized, target, &mut outcome);
        for block in synthesized.blocks() {
            place_block(&mut doc, block, ending, &mut outcome);
        }
    }
    relocate_trailing(
        &mut doc,
        &target.preserve.trailing_prefixes,
        ending,
        &mut outcome,
    );

    info!(
        replaced = outcome.replaced.len(),
        appended = outcome.appended.len(),
        dropped = outcome.dropped.len(),
        relocated = outcome.relocated.len(),
        "merged synthesized sections"
    );
    (doc, outcome)
}

/// Remove sections under the replaced prefixes that no synthesized section
/// takes over (RouterOS v6 `network`, `peer` and similar blocks).
fn drop_superseded(
    doc: &mut ConfigDocument,
    synthesized: &SynthesizedRouting,
    target: &Profile,
    outcome: &mut MergeOutcome,
) {
    let prefixes = &target.routing.replaced_prefixes;
    let paths: Vec<&str> = synthesized.paths().collect();
    doc.sections.retain(|section| {
        let superseded = prefixes.iter().any(|p| section.is_under(p))
            && !paths.contains(&section.path());
        if superseded {
            outcome.dropped.push(section.path().to_string());
        }
        !superseded
    });
}

fn place_block(
    doc: &mut ConfigDocument,
    block: &[Section],
    ending: LineEnding,
    outcome: &mut MergeOutcome,
) {
    // Index of the section of this block placed by the previous step.
    let mut anchor: Option<usize> = None;
    for (step, synthesized) in block.iter().enumerate() {
        let path = synthesized.path();
        if let Some(idx) = doc.position(path) {
            replace_body(&mut doc.sections[idx], synthesized, ending);
            remove_repeats(doc, idx, outcome);
            outcome.replaced.push(path.to_string());
            anchor = Some(idx);
            continue;
        }

        let insert_at = match anchor {
            Some(idx) => {
                doc.sections[idx].terminate(ending);
                Some(idx + 1)
            }
            // Keep dependencies ahead of a later section of the block that already exists.
            None => block[step + 1..]
                .iter()
                .find_map(|later| doc.position(later.path())),
        };
        let mut placed = synthesized.clone();
        placed.set_ending(ending);
        match insert_at {
            Some(idx) => {
                doc.sections.insert(idx, placed);
                anchor = Some(idx);
            }
            None => {
                doc.push_section(placed);
                anchor = Some(doc.sections.len() - 1);
            }
        }
        outcome.appended.push(path.to_string());
    }
}

/// Swap in the synthesized statements, keeping the old section's trailing
/// blank separators and its line ending style.
fn replace_body(existing: &mut Section, synthesized: &Section, doc_ending: LineEnding) {
    let trailing_blanks = existing
        .lines
        .iter()
        .rev()
        .take_while(|line| line.is_blank())
        .count();
    let kept: Vec<Line> = existing
        .lines
        .split_off(existing.lines.len() - trailing_blanks);
    if existing.header.ending == LineEnding::None {
        existing.header.ending = doc_ending;
    }
    let ending = existing.header.ending;
    existing.lines = synthesized
        .lines
        .iter()
        .cloned()
        .map(|mut line| {
            line.ending = ending;
            line
        })
        .chain(kept)
        .collect();
}

fn remove_repeats(doc: &mut ConfigDocument, first: usize, outcome: &mut MergeOutcome) {
    let path = doc.sections[first].path().to_string();
    let mut idx = 0;
    doc.sections.retain(|section| {
        let keep = idx <= first || section.path() != path;
        idx += 1;
        if !keep {
            outcome.dropped.push(path.clone());
        }
        keep
    });
}

/// Move preserved sections to the end, consolidating repeats of the same path
/// into one section, in first-appearance order.
fn relocate_trailing(
    doc: &mut ConfigDocument,
    prefixes: &[String],
    ending: LineEnding,
    outcome: &mut MergeOutcome,
) {
    if prefixes.is_empty() {
        return;
    }
    let (moved, kept): (Vec<Section>, Vec<Section>) = std::mem::take(&mut doc.sections)
        .into_iter()
        .partition(|section| prefixes.iter().any(|p| section.is_under(p)));
    doc.sections = kept;

    let mut consolidated: Vec<Section> = Vec::new();
    for section in moved {
        match consolidated.iter_mut().find(|s| s.path() == section.path()) {
            Some(existing) => {
                existing.terminate(ending);
                existing.lines.extend(section.lines);
            }
            None => consolidated.push(section),
        }
    }
    for section in consolidated {
        outcome.relocated.push(section.path().to_string());
        doc.push_section(section);
    }
}
