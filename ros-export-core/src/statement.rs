use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::token::{tokenize, Token};

/// Commands that introduce a statement line.
pub const STATEMENT_VERBS: &[&str] = &["add", "set"];

/// An `add`/`set` command line with its tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Statement {
    pub verb: String,
    pub tokens: Vec<Token>,
}

impl Statement {
    pub fn new(verb: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            verb: verb.into(),
            tokens,
        }
    }

    /// Parse a logical line. Returns `None` unless it starts with a statement verb.
    pub fn parse(text: &str) -> Option<Self> {
        let mut tokens = tokenize(text);
        let verb = match tokens.first() {
            Some(Token::Word(word)) if STATEMENT_VERBS.contains(&word.as_str()) => word.clone(),
            _ => return None,
        };
        tokens.remove(0);
        Some(Self { verb, tokens })
    }

    /// Raw value of the first pair with `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Whether any pair matches `key` with a value equal to `value` ignoring ASCII case.
    pub fn has_value_ignore_case(&self, key: &str, value: &str) -> bool {
        self.pairs()
            .any(|(k, v)| k == key && v.eq_ignore_ascii_case(value))
    }

    /// All `key=value` pairs in order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tokens.iter().filter_map(|token| match token {
            Token::Pair { key, value } => Some((key.as_str(), value.as_str())),
            Token::Word(_) => None,
        })
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.verb)?;
        for token in &self.tokens {
            write!(f, " {token}")?;
        }
        Ok(())
    }
}
