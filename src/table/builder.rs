//! Per-language table construction.

use std::collections::HashMap;

use super::{
    KeyIndex,
    StringPool,
    TableError,
};
use crate::input::document::TranslationDocument;
use crate::types::{
    KeyId,
    Slot,
};

/// All translation entries of one run, keyed by language and key index.
///
/// The default language assigns indices; every other language may only
/// reference keys that already have one, so default-language documents must
/// be added first.
#[derive(Debug, Clone)]
pub struct Catalog {
    default_language: String,
    index: KeyIndex,
    /// Observed languages in the order they were first added.
    languages: Vec<String>,
    /// language -> key index -> value
    translations: HashMap<String, HashMap<KeyId, String>>,
}

impl Catalog {
    #[must_use]
    pub fn new(default_language: impl Into<String>) -> Self {
        Self {
            default_language: default_language.into(),
            index: KeyIndex::new(),
            languages: Vec::new(),
            translations: HashMap::new(),
        }
    }

    /// Adds every entry of a parsed document.
    ///
    /// # Errors
    /// Returns [`TableError::UnknownKey`] if a non-default document uses a
    /// key that the default language has not declared.
    pub fn add_document(&mut self, document: &TranslationDocument) -> Result<(), TableError> {
        tracing::debug!(
            path = %document.path.display(),
            language = %document.language,
            "Adding document to catalog"
        );
        self.add_entries(
            &document.language,
            document.entries.iter().map(|entry| (entry.key.as_str(), entry.value.as_str())),
        )
    }

    /// Adds `(key, value)` pairs for `language`.
    ///
    /// A repeated key keeps its index; its value is replaced.
    ///
    /// # Errors
    /// Returns [`TableError::UnknownKey`] if a non-default language uses a
    /// key that the default language has not declared.
    pub fn add_entries<'a>(
        &mut self,
        language: &str,
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<(), TableError> {
        if !self.translations.contains_key(language) {
            self.languages.push(language.to_string());
        }
        let is_default = language == self.default_language;
        let values = self.translations.entry(language.to_string()).or_default();

        for (key, value) in entries {
            let id = if is_default {
                self.index.assign(key)
            } else {
                self.index.index_of(key).map_err(|unknown| TableError::UnknownKey {
                    language: language.to_string(),
                    key: unknown.0,
                })?
            };

            if values.insert(id, value.to_string()).is_some() {
                tracing::warn!(language, key, "Duplicate translation, keeping the last value");
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    #[must_use]
    pub const fn index(&self) -> &KeyIndex {
        &self.index
    }

    /// Languages in the order they were first added.
    #[must_use]
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Explicit translation of key `id` in `language`, without fallback.
    #[must_use]
    pub fn translation(&self, language: &str, id: KeyId) -> Option<&str> {
        self.translations.get(language)?.get(&id).map(String::as_str)
    }
}

/// One language's resolved strings, in key index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTable {
    pub language: String,
    pub slots: Vec<Slot>,
}

impl LanguageTable {
    /// Resolved text for key `id`.
    #[must_use]
    pub fn resolve<'p>(&self, id: KeyId, pool: &'p StringPool) -> Option<&'p str> {
        self.slots.get(id).and_then(|&slot| pool.get(slot))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Builds one table per observed language, interning resolved values.
///
/// Each table has exactly `N` slots in key index order. A missing
/// translation resolves to the default language's value.
///
/// # Errors
/// Returns [`TableError::MissingDefaultTranslation`] if an indexed key has no
/// default-language value.
pub fn build_tables(
    catalog: &Catalog,
    pool: &mut StringPool,
) -> Result<Vec<LanguageTable>, TableError> {
    let index = catalog.index();
    let default_language = catalog.default_language();

    catalog
        .languages()
        .iter()
        .map(|language| -> Result<LanguageTable, TableError> {
            let mut slots = Vec::with_capacity(index.len());
            let mut fallbacks = 0_usize;

            for (id, key) in index.iter() {
                let value = match catalog.translation(language, id) {
                    Some(value) => value,
                    None => {
                        fallbacks += 1;
                        catalog.translation(default_language, id).ok_or_else(|| {
                            TableError::MissingDefaultTranslation { key: key.to_string() }
                        })?
                    }
                };
                slots.push(pool.intern(value));
            }

            tracing::debug!(language = %language, fallbacks, "Built language table");
            Ok(LanguageTable { language: language.clone(), slots })
        })
        .collect()
}

/// The complete generated table: key index, string pool and language tables.
#[derive(Debug, Clone)]
pub struct StringTable {
    pub default_language: String,
    pub index: KeyIndex,
    pub pool: StringPool,
    pub tables: Vec<LanguageTable>,
}

impl StringTable {
    /// Builds all language tables from a catalog.
    ///
    /// # Errors
    /// See [`build_tables`].
    pub fn build(catalog: Catalog) -> Result<Self, TableError> {
        let mut pool = StringPool::new();
        let tables = build_tables(&catalog, &mut pool)?;

        Ok(Self {
            default_language: catalog.default_language,
            index: catalog.index,
            pool,
            tables,
        })
    }

    #[must_use]
    pub fn table(&self, language: &str) -> Option<&LanguageTable> {
        self.tables.iter().find(|table| table.language == language)
    }

    /// Runtime-style lookup: `table[language][index_of(key)]`.
    #[must_use]
    pub fn lookup(&self, language: &str, key: &str) -> Option<&str> {
        let id = self.index.index_of(key).ok()?;
        self.table(language)?.resolve(id, &self.pool)
    }
}
