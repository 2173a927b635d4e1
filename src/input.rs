//! Translation document input.

pub mod document;
pub mod literal;
