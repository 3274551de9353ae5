use std::collections::HashSet;

use ros_export_core::{ConfigDocument, Line, Statement};

#[derive(PartialEq, Eq, Hash)]
enum LineKey<'a> {
    Statement(&'a Statement),
    Raw(&'a str),
}

/// Remove repeated lines within each section, keeping the first occurrence.
/// Statements compare by verb and tokens, so spacing and continuation
/// differences do not hide a repeat. Blank lines are never removed.
/// Returns the number of lines removed.
pub fn dedup(doc: &mut ConfigDocument) -> usize {
    doc.sections
        .iter_mut()
        .map(|section| dedup_lines(&mut section.lines))
        .sum()
}

fn dedup_lines(lines: &mut Vec<Line>) -> usize {
    let keep: Vec<bool> = {
        let mut seen = HashSet::new();
        lines
            .iter()
            .map(|line| {
                if line.is_blank() {
                    return true;
                }
                let key = match line.as_statement() {
                    Some(stmt) => LineKey::Statement(stmt),
                    None => LineKey::Raw(line.raw.trim_end()),
                };
                seen.insert(key)
            })
            .collect()
    };
    let before = lines.len();
    let mut flags = keep.into_iter();
    lines.retain(|_| flags.next().unwrap_or(true));
    before - lines.len()
}
