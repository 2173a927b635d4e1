//! Core types used throughout the project.

use std::fmt;

use serde::Serialize;

/// A position in a translation document (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourcePosition {
    pub line: u32,
    pub character: u32,
}

impl SourcePosition {
    #[must_use]
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }

    /// Position of the first character of the given 0-based line.
    #[must_use]
    pub fn line_start(line: usize) -> Self {
        Self { line: u32::try_from(line).unwrap_or(u32::MAX), character: 0 }
    }

    /// Returns the same line shifted right by `offset` characters.
    #[must_use]
    pub fn offset_by(self, offset: usize) -> Self {
        let offset = u32::try_from(offset).unwrap_or(u32::MAX);
        Self { line: self.line, character: self.character.saturating_add(offset) }
    }
}

/// Displays as the 1-based `line:column` pair editors expect.
impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line.saturating_add(1), self.character.saturating_add(1))
    }
}

/// Numeric index assigned to a message key.
pub type KeyId = usize;

/// Handle of one distinct string in the string pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Slot(usize);

impl Slot {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
