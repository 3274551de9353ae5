//! Lossless parsing and writing primitives for RouterOS export text.
//!
//! A RouterOS `/export` is a flat list of lines: path lines (`/ip address`)
//! open a section, `add`/`set` statements carry `key=value` tokens, and long
//! statements are wrapped with trailing `\` continuations. The types here keep
//! every byte of the input so that `render(&parse(text)) == text`, while still
//! exposing the structure higher-level tools need to rewrite individual
//! statements.

pub mod document;
pub mod line;
pub mod parser;
pub mod statement;
pub mod token;
pub mod writer;

pub use document::{path_has_prefix, ConfigDocument, Section};
pub use line::{Line, LineEnding, LineKind};
pub use parser::{parse, parse_bytes, parse_file, ParseError};
pub use statement::Statement;
pub use token::{tokenize, unquote, Token};
pub use writer::{render, write_file, WriteError};
