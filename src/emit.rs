//! Rendering of string tables into output artifacts.

pub mod c;
pub mod json;

use thiserror::Error;

use crate::table::StringTable;

pub use c::CEmitter;
pub use json::JsonEmitter;

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("Key '{key}' cannot be used in a symbol name; use letters, digits and '_'")]
    InvalidKeyName { key: String },

    #[error("Languages '{first}' and '{second}' both map to symbol '{symbol}'")]
    SymbolCollision { symbol: String, first: String, second: String },

    #[error("Failed to serialize table: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to format output: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Rendered output, held in memory until every artifact succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// String storage and per-language arrays.
    pub data: String,
    /// Key constants and array declarations, for formats that split them.
    pub declarations: Option<String>,
}

/// Renders a [`StringTable`] into a target format.
pub trait Emitter {
    /// # Errors
    /// Returns [`EmitError`] when the table cannot be expressed in the format.
    fn emit(&self, table: &StringTable) -> Result<Artifacts, EmitError>;
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// C data file plus header.
    #[default]
    C,
    /// Single JSON document.
    Json,
}

impl OutputFormat {
    /// Whether the format writes a separate declarations artifact.
    #[must_use]
    pub const fn has_declarations(self) -> bool {
        matches!(self, Self::C)
    }
}
