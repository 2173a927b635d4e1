//! lang-table-gen
//!
//! Compiles gettext-style translation documents into a compact string table:
//! numeric key indices, deduplicated string storage and one index-ordered
//! array per language with fallback to the default language.

pub mod config;
pub mod emit;
pub mod generator;
pub mod input;
pub mod parser;
pub mod table;
pub mod types;

pub use generator::{
    GenerateError,
    Generator,
    OutputPaths,
    Summary,
};
