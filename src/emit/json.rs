//! JSON manifest emitter.

use serde::Serialize;

use super::{
    Artifacts,
    EmitError,
    Emitter,
};
use crate::table::StringTable;
use crate::types::Slot;

/// Emits the whole table as one pretty-printed JSON document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEmitter;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest<'a> {
    default_language: &'a str,
    total: usize,
    keys: Vec<KeyRecord<'a>>,
    strings: Vec<&'a str>,
    languages: Vec<LanguageRecord<'a>>,
}

#[derive(Serialize)]
struct KeyRecord<'a> {
    name: &'a str,
    index: usize,
}

#[derive(Serialize)]
struct LanguageRecord<'a> {
    language: &'a str,
    slots: &'a [Slot],
}

impl Emitter for JsonEmitter {
    fn emit(&self, table: &StringTable) -> Result<Artifacts, EmitError> {
        let manifest = Manifest {
            default_language: &table.default_language,
            total: table.index.len(),
            keys: table.index.iter().map(|(index, name)| KeyRecord { name, index }).collect(),
            strings: table.pool.iter().map(|(_, value)| value).collect(),
            languages: table
                .tables
                .iter()
                .map(|t| LanguageRecord { language: &t.language, slots: &t.slots })
                .collect(),
        };

        let mut data = serde_json::to_string_pretty(&manifest)?;
        data.push('\n');
        Ok(Artifacts { data, declarations: None })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::{
        Value,
        json,
    };

    use super::*;
    use crate::table::Catalog;

    #[rstest]
    fn test_manifest_contents() {
        let mut catalog = Catalog::new("en");
        catalog.add_entries("en", [("HELLO", "Hello"), ("BYE", "Bye")]).unwrap();
        catalog.add_entries("es", [("HELLO", "Hola")]).unwrap();
        let table = StringTable::build(catalog).unwrap();

        let artifacts = JsonEmitter.emit(&table).unwrap();

        let value: Value = serde_json::from_str(&artifacts.data).unwrap();
        assert_eq!(
            value,
            json!({
                "defaultLanguage": "en",
                "total": 2,
                "keys": [{"name": "HELLO", "index": 0}, {"name": "BYE", "index": 1}],
                "strings": ["Hello", "Bye", "Hola"],
                "languages": [
                    {"language": "en", "slots": [0, 1]},
                    {"language": "es", "slots": [2, 1]}
                ]
            })
        );
        assert_that!(artifacts.declarations, none());
    }

    #[rstest]
    fn test_manifest_accepts_any_key_text() {
        let mut catalog = Catalog::new("en");
        catalog.add_entries("en", [("menu.title", "Menu")]).unwrap();
        let table = StringTable::build(catalog).unwrap();

        let artifacts = JsonEmitter.emit(&table).unwrap();

        assert_that!(artifacts.data, contains_substring("\"menu.title\""));
    }
}
