use serde::Serialize;

use crate::statement::{Statement, STATEMENT_VERBS};

/// Line terminator as found in the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    /// Final line without a terminator.
    None,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::None => "",
        }
    }
}

/// Structural classification of a logical line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LineKind {
    Blank,
    Comment,
    /// Section path, normalized to single spaces (`/routing ospf instance`).
    Path(String),
    Statement(Statement),
    /// Scripting or commands the model does not interpret (`remove`, `:delay`).
    Other,
}

/// One logical line. `raw` may span several physical lines joined by `\`
/// continuations and never includes the final terminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub raw: String,
    pub kind: LineKind,
    pub ending: LineEnding,
}

/// Words that end the path part of a path line carrying an inline command.
const COMMAND_WORDS: &[&str] = &[
    "add", "set", "remove", "print", "export", "edit", "enable", "disable", "comment", "move",
    "unset", "reset",
];

impl Line {
    /// Classify raw text as read from the input.
    pub fn from_raw(raw: String, ending: LineEnding) -> Self {
        let logical = logical_text(&raw);
        let trimmed = logical.trim();
        let kind = if trimmed.is_empty() {
            LineKind::Blank
        } else if trimmed.starts_with('#') {
            LineKind::Comment
        } else if trimmed.starts_with('/') {
            LineKind::Path(normalize_path(trimmed))
        } else if let Some(stmt) = Statement::parse(trimmed) {
            LineKind::Statement(stmt)
        } else {
            LineKind::Other
        };
        Self { raw, kind, ending }
    }

    /// A freshly generated path line.
    pub fn path(path: &str) -> Self {
        let normalized = normalize_path(path);
        Self {
            raw: normalized.clone(),
            kind: LineKind::Path(normalized),
            ending: LineEnding::Lf,
        }
    }

    /// A freshly generated statement line, rendered on a single physical line.
    pub fn statement(stmt: Statement) -> Self {
        Self {
            raw: stmt.to_string(),
            kind: LineKind::Statement(stmt),
            ending: LineEnding::Lf,
        }
    }

    /// Replace the statement carried by this line, keeping its terminator.
    pub fn with_statement(&self, stmt: Statement) -> Self {
        Self {
            ending: self.ending,
            ..Self::statement(stmt)
        }
    }

    pub fn as_statement(&self) -> Option<&Statement> {
        match &self.kind {
            LineKind::Statement(stmt) => Some(stmt),
            _ => None,
        }
    }

    pub fn path_name(&self) -> Option<&str> {
        match &self.kind {
            LineKind::Path(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.kind == LineKind::Blank
    }

    /// Command written on a path line itself (`/ip address add ...`).
    /// The line keeps it as raw text; this parses a copy for inspection.
    pub fn inline_statement(&self) -> Option<Statement> {
        self.path_name()?;
        let logical = logical_text(&self.raw);
        let text = logical.trim();
        let start = STATEMENT_VERBS
            .iter()
            .filter_map(|verb| text.find(&format!(" {verb} ")))
            .min()?;
        Statement::parse(&text[start + 1..])
    }
}

/// Join `\`-continued physical lines into one logical line.
///
/// The trailing backslash and the indentation of the next physical line are
/// dropped; RouterOS may wrap in the middle of a value, so nothing is inserted.
pub fn logical_text(raw: &str) -> String {
    if !raw.contains('\n') {
        return raw.to_string();
    }
    let parts: Vec<&str> = raw.split('\n').collect();
    let last = parts.len() - 1;
    let mut out = String::with_capacity(raw.len());
    for (idx, part) in parts.iter().enumerate() {
        let mut piece = *part;
        if idx > 0 {
            piece = piece.trim_start();
        }
        if idx < last {
            piece = piece.trim_end_matches('\r');
            piece = piece.strip_suffix('\\').unwrap_or(piece);
        }
        out.push_str(piece);
    }
    out
}

fn normalize_path(text: &str) -> String {
    text.split_whitespace()
        .take_while(|word| !word.contains('=') && !COMMAND_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}
