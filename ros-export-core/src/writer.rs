use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::document::ConfigDocument;

/// Errors that can occur while writing a [`ConfigDocument`].
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to write output file.
    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

/// Render a document back to export text.
pub fn render(doc: &ConfigDocument) -> String {
    let mut out = String::new();
    for line in doc.lines() {
        out.push_str(&line.raw);
        out.push_str(line.ending.as_str());
    }
    out
}

/// Render a document and write it to `path`.
pub fn write_file(doc: &ConfigDocument, path: &Path) -> Result<(), WriteError> {
    fs::write(path, render(doc))?;
    Ok(())
}
