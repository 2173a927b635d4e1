//! Line-oriented parser for gettext-style translation documents.
//!
//! Recognized lines:
//! - `# ...` comments
//! - `msgid "<literal>"` opens an entry
//! - `msgstr "<literal>"` closes it with the most recently declared key
//!
//! Anything else is skipped, unless strict mode is enabled.

use thiserror::Error;

use crate::input::literal::{
    LiteralError,
    decode_literal,
};
use crate::types::SourcePosition;

/// Keyword that declares a message key.
const KEY_KEYWORD: &str = "msgid";
/// Keyword that declares a translated value.
const VALUE_KEYWORD: &str = "msgstr";
/// Prefix of comment lines.
const COMMENT_MARKER: char = '#';

/// One `(key, value)` pair in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
    /// Position of the `msgstr` line that produced this entry.
    pub position: SourcePosition,
}

/// Parser behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject lines that are neither comments, blank, nor declarations.
    pub strict: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("'msgstr' without a preceding 'msgid'")]
    MissingKey,

    #[error("invalid string literal: {0}")]
    Literal(#[from] LiteralError),

    #[error("unrecognized line '{0}'")]
    UnrecognizedLine(String),
}

/// A malformed entry in a translation document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{position}: malformed entry: {kind}")]
pub struct ParseError {
    pub position: SourcePosition,
    pub kind: ParseErrorKind,
}

impl ParseError {
    #[must_use]
    pub const fn new(position: SourcePosition, kind: ParseErrorKind) -> Self {
        Self { position, kind }
    }
}

/// Parses one translation document into ordered entries.
///
/// # Examples
/// ```
/// use lang_table_gen::parser::{ParseOptions, parse_document};
///
/// let text = "# greeting\nmsgid \"HELLO\"\nmsgstr \"Hello\"\n";
/// let entries = parse_document(text, ParseOptions::default()).unwrap();
///
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].key, "HELLO");
/// assert_eq!(entries[0].value, "Hello");
/// ```
///
/// # Errors
/// Returns [`ParseError`] when a `msgstr` has no preceding `msgid`, when a
/// literal fails to decode, or (in strict mode) on unrecognized lines.
pub fn parse_document(text: &str, options: ParseOptions) -> Result<Vec<Entry>, ParseError> {
    let mut entries = Vec::new();
    let mut pending_key: Option<String> = None;

    for (line_number, line) in text.lines().enumerate() {
        let position = SourcePosition::line_start(line_number);

        if line.starts_with(COMMENT_MARKER) || line.trim().is_empty() {
            continue;
        }

        let Some((keyword, payload)) = line.split_once(' ') else {
            if options.strict {
                return Err(unrecognized(line, position));
            }
            tracing::trace!(%position, "Skipping line without declaration");
            continue;
        };
        let payload_offset = keyword.len() + 1;

        match keyword.trim() {
            KEY_KEYWORD => {
                let key = decode_payload(line, payload, payload_offset, position)?;
                if let Some(previous) = pending_key.replace(key) {
                    tracing::trace!(%position, key = %previous, "Key superseded by a new msgid");
                }
            }
            VALUE_KEYWORD => {
                let Some(key) = &pending_key else {
                    return Err(ParseError::new(position, ParseErrorKind::MissingKey));
                };
                let value = decode_payload(line, payload, payload_offset, position)?;
                entries.push(Entry { key: key.clone(), value, position });
            }
            _ if options.strict => return Err(unrecognized(line, position)),
            _ => {
                tracing::trace!(%position, "Skipping unrecognized declaration");
            }
        }
    }

    Ok(entries)
}

fn unrecognized(line: &str, position: SourcePosition) -> ParseError {
    ParseError::new(position, ParseErrorKind::UnrecognizedLine(line.to_string()))
}

/// Decodes a declaration payload, mapping literal offsets back onto the line.
fn decode_payload(
    line: &str,
    payload: &str,
    payload_offset: usize,
    position: SourcePosition,
) -> Result<String, ParseError> {
    decode_literal(payload).map_err(|error| {
        let byte_offset = payload_offset + error.offset().unwrap_or_default();
        let column = line.get(..byte_offset).map_or(payload_offset, |prefix| prefix.chars().count());
        ParseError::new(position.offset_by(column), error.into())
    })
}
