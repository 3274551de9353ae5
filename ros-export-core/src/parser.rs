use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::document::{ConfigDocument, Section};
use crate::line::{Line, LineEnding, LineKind};

/// Errors that can occur while reading export text into a [`ConfigDocument`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input bytes were not valid UTF-8.
    #[error("export is not valid UTF-8 text: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// Failed to read input file.
    #[error("failed to read export file: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse export text. Never fails: unrecognized lines are kept as
/// [`LineKind::Other`].
pub fn parse(text: &str) -> ConfigDocument {
    let mut doc = ConfigDocument::new();
    let mut pending: Option<(String, LineEnding)> = None;

    for (content, ending) in physical_lines(text) {
        let raw = match pending.take() {
            Some((mut acc, previous)) => {
                acc.push_str(previous.as_str());
                acc.push_str(content);
                acc
            }
            None => content.to_string(),
        };
        if ending != LineEnding::None && continues(content) && !raw.trim_start().starts_with('#')
        {
            pending = Some((raw, ending));
            continue;
        }
        push_line(&mut doc, Line::from_raw(raw, ending));
    }
    // Input ended right after a continuation.
    if let Some((raw, ending)) = pending {
        push_line(&mut doc, Line::from_raw(raw, ending));
    }
    doc
}

/// Decode bytes as UTF-8 and parse them.
pub fn parse_bytes(bytes: &[u8]) -> Result<ConfigDocument, ParseError> {
    let text = std::str::from_utf8(bytes)?;
    Ok(parse(text))
}

/// Read and parse an export file.
pub fn parse_file(path: &Path) -> Result<ConfigDocument, ParseError> {
    let bytes = fs::read(path)?;
    parse_bytes(&bytes)
}

fn push_line(doc: &mut ConfigDocument, line: Line) {
    if matches!(line.kind, LineKind::Path(_)) {
        doc.sections.push(Section::from_header(line));
        return;
    }
    match doc.sections.last_mut() {
        Some(section) => section.lines.push(line),
        None => doc.preamble.push(line),
    }
}

fn physical_lines(text: &str) -> impl Iterator<Item = (&str, LineEnding)> {
    text.split_inclusive('\n').map(|piece| {
        if let Some(content) = piece.strip_suffix("\r\n") {
            (content, LineEnding::CrLf)
        } else if let Some(content) = piece.strip_suffix('\n') {
            (content, LineEnding::Lf)
        } else {
            (piece, LineEnding::None)
        }
    })
}

/// An odd number of trailing backslashes marks a continuation; an even number
/// is an escaped backslash at the end of a value.
fn continues(content: &str) -> bool {
    let trailing = content.chars().rev().take_while(|c| *c == '\\').count();
    trailing % 2 == 1
}
