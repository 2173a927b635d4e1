use thiserror::Error;

/// Integrity errors raised while building string tables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A non-default document translates a key the default language never declared.
    #[error("Key '{key}' in language '{language}' is not declared by the default language")]
    UnknownKey { language: String, key: String },

    /// An indexed key has no default-language value.
    #[error("Key '{key}' has no default-language translation")]
    MissingDefaultTranslation { key: String },
}
