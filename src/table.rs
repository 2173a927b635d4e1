//! Indexed, deduplicated string tables.

mod builder;
mod error;
mod index;
mod pool;

pub use builder::{
    Catalog,
    LanguageTable,
    StringTable,
    build_tables,
};
pub use error::TableError;
pub use index::{
    KeyIndex,
    UnknownKey,
};
pub use pool::StringPool;
