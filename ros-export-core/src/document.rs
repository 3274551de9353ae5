use crate::line::{Line, LineEnding};
use crate::statement::Statement;

/// A path line and every line up to the next path line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// The path line itself. Always of kind [`crate::LineKind::Path`].
    pub header: Line,
    /// Statements, comments and blank separators in document order.
    pub lines: Vec<Line>,
}

impl Section {
    /// Create an empty section with a generated path line.
    pub fn new(path: &str) -> Self {
        Self {
            header: Line::path(path),
            lines: Vec::new(),
        }
    }

    /// Create a section from a parsed path line.
    pub fn from_header(header: Line) -> Self {
        Self {
            header,
            lines: Vec::new(),
        }
    }

    /// Normalized path of the section.
    pub fn path(&self) -> &str {
        self.header.path_name().unwrap_or_default()
    }

    /// Whether this section lives at or below `prefix`.
    pub fn is_under(&self, prefix: &str) -> bool {
        path_has_prefix(self.path(), prefix)
    }

    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.lines.iter().filter_map(Line::as_statement)
    }

    pub fn push_statement(&mut self, stmt: Statement) {
        self.lines.push(Line::statement(stmt));
    }

    /// Give the section's final line a terminator so content can follow it.
    pub fn terminate(&mut self, ending: LineEnding) {
        let last = self.lines.last_mut().unwrap_or(&mut self.header);
        if last.ending == LineEnding::None {
            last.ending = ending;
        }
    }

    /// Terminate every line, header included, with `ending`.
    pub fn set_ending(&mut self, ending: LineEnding) {
        for line in std::iter::once(&mut self.header).chain(self.lines.iter_mut()) {
            line.ending = ending;
        }
    }
}

/// Whether `path` equals `prefix` or continues it with further path words.
pub fn path_has_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with(' '),
        None => false,
    }
}

/// A parsed RouterOS export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    /// Lines before the first path line (the export banner comments).
    pub preamble: Vec<Line>,
    pub sections: Vec<Section>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// First section with exactly `path`.
    pub fn section(&self, path: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.path() == path)
    }

    pub fn position(&self, path: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.path() == path)
    }

    /// Every line in document order, path lines included.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.preamble.iter().chain(
            self.sections
                .iter()
                .flat_map(|s| std::iter::once(&s.header).chain(s.lines.iter())),
        )
    }

    /// Every statement in document order, including any before the first path line.
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.lines().filter_map(Line::as_statement)
    }

    /// Terminator used by the document: the ending of its first terminated
    /// line, or LF when no line is terminated.
    pub fn line_ending(&self) -> LineEnding {
        self.lines()
            .map(|line| line.ending)
            .find(|ending| *ending != LineEnding::None)
            .unwrap_or_default()
    }

    /// Append a section, terminating the current last line if needed.
    pub fn push_section(&mut self, section: Section) {
        self.terminate_last_line();
        self.sections.push(section);
    }

    /// Give the final line a terminator so content can follow it.
    pub fn terminate_last_line(&mut self) {
        let ending = self.line_ending();
        if let Some(section) = self.sections.last_mut() {
            section.terminate(ending);
        } else if let Some(line) = self.preamble.last_mut() {
            if line.ending == LineEnding::None {
                line.ending = ending;
            }
        }
    }
}
