//! Quoted string literal decoding for translation documents.
//!
//! Accepts one or more adjacent quoted literals (`"..."` or `'...'`),
//! optionally separated by whitespace, and concatenates their decoded
//! contents.

use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

/// Errors raised while decoding a literal.
///
/// Offsets are byte offsets into the text passed to [`decode_literal`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    #[error("expected a quoted string, found nothing")]
    Empty,

    #[error("expected a quoted string at offset {offset}")]
    MissingQuote { offset: usize },

    #[error("unterminated string literal starting at offset {offset}")]
    Unterminated { offset: usize },

    #[error("invalid escape sequence '{escape}' at offset {offset}")]
    InvalidEscape { escape: String, offset: usize },

    #[error("escape at offset {offset} encodes invalid code point U+{value:X}")]
    InvalidCodePoint { value: u32, offset: usize },

    #[error("unexpected characters after string literal at offset {offset}")]
    TrailingCharacters { offset: usize },
}

impl LiteralError {
    /// Byte offset of the error, if it points at a specific character.
    #[must_use]
    pub const fn offset(&self) -> Option<usize> {
        match self {
            Self::Empty => None,
            Self::MissingQuote { offset }
            | Self::Unterminated { offset }
            | Self::InvalidEscape { offset, .. }
            | Self::InvalidCodePoint { offset, .. }
            | Self::TrailingCharacters { offset } => Some(*offset),
        }
    }
}

/// Character cursor over the literal text.
type Cursor<'a> = Peekable<CharIndices<'a>>;

/// Decodes a quoted literal into its string value.
///
/// # Examples
/// ```
/// use lang_table_gen::input::literal::decode_literal;
///
/// assert_eq!(decode_literal(r#""Hello\n""#).unwrap(), "Hello\n");
/// assert_eq!(decode_literal(r#""a" 'b'"#).unwrap(), "ab");
/// assert_eq!(decode_literal(r#""\u00e9""#).unwrap(), "é");
/// ```
///
/// # Errors
/// Returns [`LiteralError`] for missing quotes, unterminated literals,
/// unknown escapes, invalid code points and trailing garbage.
pub fn decode_literal(text: &str) -> Result<String, LiteralError> {
    let mut cursor = text.char_indices().peekable();
    let mut decoded = String::new();
    let mut literals = 0_usize;

    loop {
        while cursor.next_if(|(_, ch)| ch.is_whitespace()).is_some() {}

        let Some((offset, quote)) = cursor.next() else {
            break;
        };
        if quote != '"' && quote != '\'' {
            return Err(if literals == 0 {
                LiteralError::MissingQuote { offset }
            } else {
                LiteralError::TrailingCharacters { offset }
            });
        }

        read_quoted(&mut cursor, quote, offset, &mut decoded)?;
        literals += 1;
    }

    if literals == 0 {
        return Err(LiteralError::Empty);
    }
    Ok(decoded)
}

/// Reads the body of one literal up to and including its closing quote.
fn read_quoted(
    cursor: &mut Cursor<'_>,
    quote: char,
    start: usize,
    out: &mut String,
) -> Result<(), LiteralError> {
    loop {
        let Some((offset, ch)) = cursor.next() else {
            return Err(LiteralError::Unterminated { offset: start });
        };
        match ch {
            c if c == quote => return Ok(()),
            '\\' => out.push(read_escape(cursor, start, offset)?),
            c => out.push(c),
        }
    }
}

/// Decodes the escape sequence following a backslash at `offset`.
fn read_escape(cursor: &mut Cursor<'_>, start: usize, offset: usize) -> Result<char, LiteralError> {
    let Some((_, ch)) = cursor.next() else {
        return Err(LiteralError::Unterminated { offset: start });
    };

    match ch {
        '\\' => Ok('\\'),
        '\'' => Ok('\''),
        '"' => Ok('"'),
        'n' => Ok('\n'),
        't' => Ok('\t'),
        'r' => Ok('\r'),
        'a' => Ok('\u{07}'),
        'b' => Ok('\u{08}'),
        'f' => Ok('\u{0C}'),
        'v' => Ok('\u{0B}'),
        'x' => read_code_point(cursor, 'x', 2, offset),
        'u' => read_code_point(cursor, 'u', 4, offset),
        'U' => read_code_point(cursor, 'U', 8, offset),
        '0'..='7' => {
            let mut value = octal_digit(ch);
            for _ in 0..2 {
                let Some((_, digit)) = cursor.next_if(|(_, c)| matches!(c, '0'..='7')) else {
                    break;
                };
                value = value * 8 + octal_digit(digit);
            }
            char::from_u32(value).ok_or(LiteralError::InvalidCodePoint { value, offset })
        }
        other => Err(LiteralError::InvalidEscape { escape: format!("\\{other}"), offset }),
    }
}

/// Value of an ASCII octal digit. Callers guarantee `'0'..='7'`.
fn octal_digit(ch: char) -> u32 {
    u32::from(ch) - u32::from('0')
}

/// Reads exactly `digits` hex digits and converts them to a `char`.
fn read_code_point(
    cursor: &mut Cursor<'_>,
    marker: char,
    digits: usize,
    offset: usize,
) -> Result<char, LiteralError> {
    let mut escape = format!("\\{marker}");
    let mut value: u32 = 0;

    for _ in 0..digits {
        let Some((_, digit)) = cursor.next_if(|(_, c)| c.is_ascii_hexdigit()) else {
            return Err(LiteralError::InvalidEscape { escape, offset });
        };
        escape.push(digit);
        value = value * 16 + digit.to_digit(16).unwrap_or(0);
    }

    char::from_u32(value).ok_or(LiteralError::InvalidCodePoint { value, offset })
}
