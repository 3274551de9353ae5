use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// One whitespace-separated element of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Token {
    /// `key=value`. The value is kept exactly as written, quotes included.
    Pair { key: String, value: String },
    /// Anything without a leading `key=` part (`[`, `find`, `default`, `passive`).
    Word(String),
}

impl Token {
    pub fn pair(key: impl Into<String>, value: impl Into<String>) -> Self {
        Token::Pair {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn word(word: impl Into<String>) -> Self {
        Token::Word(word.into())
    }

    /// Key of a pair token.
    pub fn key(&self) -> Option<&str> {
        match self {
            Token::Pair { key, .. } => Some(key),
            Token::Word(_) => None,
        }
    }

    /// Raw value of a pair token.
    pub fn value(&self) -> Option<&str> {
        match self {
            Token::Pair { value, .. } => Some(value),
            Token::Word(_) => None,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Token::Pair { key, value } => write!(f, "{key}={value}"),
            Token::Word(word) => write!(f, "{word}"),
        }
    }
}

/// Split a logical statement line into tokens.
///
/// Whitespace inside double quotes does not split, and a backslash inside
/// quotes escapes the following character (`comment="a \"b\" c"`).
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for ch in text.chars() {
        if escaped {
            current.push(ch);
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quotes => {
                current.push(ch);
                escaped = true;
            }
            '"' => {
                current.push(ch);
                in_quotes = !in_quotes;
            }
            c if c.is_whitespace() && !in_quotes => flush(&mut out, &mut current),
            c => current.push(c),
        }
    }
    flush(&mut out, &mut current);
    out
}

fn flush(out: &mut Vec<Token>, current: &mut String) {
    if current.is_empty() {
        return;
    }
    let raw = std::mem::take(current);
    out.push(classify(raw));
}

fn classify(raw: String) -> Token {
    // The key ends at the first `=`; a quote before it means the `=` belongs
    // to a quoted word rather than a key.
    match raw.find('=') {
        Some(idx) if idx > 0 && !raw[..idx].contains('"') => Token::Pair {
            key: raw[..idx].to_string(),
            value: raw[idx + 1..].to_string(),
        },
        _ => Token::Word(raw),
    }
}

/// Strip one pair of surrounding double quotes, if present.
pub fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
