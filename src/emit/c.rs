//! C header and data file emitter.
//!
//! The header declares one `#define` per key, a total count and one
//! `extern` array per language. The data file defines every pooled string
//! once and the per-language pointer arrays that reference them.

use std::collections::HashMap;
use std::fmt::{
    self,
    Write as _,
};

use super::{
    Artifacts,
    EmitError,
    Emitter,
};
use crate::config::OutputConfig;
use crate::table::StringTable;

/// First line of every generated file.
const BANNER: &str = "// Auto-generated file. Please do not edit directly.";

/// Emits a `.c`/`.h` pair.
#[derive(Debug, Clone)]
pub struct CEmitter {
    /// File name of the header (no directories), used for `#include` and
    /// the include guard.
    header_name: String,
    output: OutputConfig,
}

impl CEmitter {
    #[must_use]
    pub fn new(header_name: impl Into<String>, output: OutputConfig) -> Self {
        Self { header_name: header_name.into(), output }
    }

    /// Include guard derived from the header file name.
    fn include_guard(&self) -> String {
        format!("__{}__", sanitize_symbol(&self.header_name).to_uppercase())
    }

    /// `const char <q>*` with an optional qualifier.
    fn pointer_type(&self) -> String {
        match self.output.pointer_qualifier.as_str() {
            "" => "const char*".to_string(),
            qualifier => format!("const char {qualifier}*"),
        }
    }

    /// `const <q>` applied to the array itself.
    fn array_constness(&self) -> String {
        match self.output.pointer_qualifier.as_str() {
            "" => "const".to_string(),
            qualifier => format!("const {qualifier}"),
        }
    }

    /// Element type of pooled string definitions.
    fn entry_type(&self) -> String {
        match self.output.pointer_qualifier.as_str() {
            "" => "const char".to_string(),
            qualifier => format!("const char {qualifier}"),
        }
    }

    fn render_header(
        &self,
        table: &StringTable,
        arrays: &[(String, &str)],
    ) -> Result<String, EmitError> {
        let guard = self.include_guard();
        let total = table.index.len();
        let mut out = String::new();

        writeln!(out, "{BANNER}\n")?;
        writeln!(out, "#ifndef {guard}\n#define {guard}\n")?;
        for (id, key) in table.index.iter() {
            writeln!(out, "#define {}{key} {id}", self.output.key_prefix)?;
        }
        writeln!(out, "#define {}TOTAL {total}\n", self.output.key_prefix)?;
        for (symbol, _) in arrays {
            writeln!(
                out,
                "extern {} {} {symbol}[{total}];",
                self.pointer_type(),
                self.array_constness()
            )?;
        }
        writeln!(out, "\n#endif")?;

        Ok(out)
    }

    fn render_data(
        &self,
        table: &StringTable,
        arrays: &[(String, &str)],
    ) -> Result<String, EmitError> {
        let mut out = String::new();
        let prefix = &self.output.entry_prefix;

        writeln!(out, "{BANNER}\n")?;
        writeln!(out, "#include <stdint.h>\n#include \"{}\"\n", self.header_name)?;
        for (slot, value) in table.pool.iter() {
            let escaped = escape_c_string(value)?;
            writeln!(out, "{} {prefix}{slot}[] = \"{escaped}\";", self.entry_type())?;
        }

        for (symbol, language) in arrays {
            let Some(language_table) = table.table(language) else {
                continue;
            };
            writeln!(
                out,
                "\n{} {} {symbol}[] = {{",
                self.pointer_type(),
                self.array_constness()
            )?;
            for ((_, key), slot) in table.index.iter().zip(&language_table.slots) {
                writeln!(out, "\t{prefix}{slot}, // {key}")?;
            }
            writeln!(out, "}};")?;
        }

        Ok(out)
    }

    /// Array symbol per language, checked for collisions.
    fn array_symbols<'t>(&self, table: &'t StringTable) -> Result<Vec<(String, &'t str)>, EmitError> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        let mut symbols = Vec::with_capacity(table.tables.len());

        for language_table in &table.tables {
            let language = language_table.language.as_str();
            let symbol = format!("{}{}", self.output.array_prefix, sanitize_symbol(language));
            if let Some(first) = seen.insert(symbol.clone(), language) {
                return Err(EmitError::SymbolCollision {
                    symbol,
                    first: first.to_string(),
                    second: language.to_string(),
                });
            }
            symbols.push((symbol, language));
        }

        Ok(symbols)
    }
}

impl Emitter for CEmitter {
    fn emit(&self, table: &StringTable) -> Result<Artifacts, EmitError> {
        if let Some((_, key)) = table.index.iter().find(|(_, key)| !is_symbol_suffix(key)) {
            return Err(EmitError::InvalidKeyName { key: key.to_string() });
        }

        let arrays = self.array_symbols(table)?;
        let declarations = self.render_header(table, &arrays)?;
        let data = self.render_data(table, &arrays)?;

        Ok(Artifacts { data, declarations: Some(declarations) })
    }
}

/// Replaces every character outside `[A-Za-z0-9_]` with `_`.
#[must_use]
pub fn sanitize_symbol(text: &str) -> String {
    text.chars().map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' }).collect()
}

/// Keys are appended to an identifier prefix, so they only need valid characters.
fn is_symbol_suffix(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Escapes `value` for use inside a C string literal.
///
/// Printable ASCII is kept. Controls use short escapes or three-digit octal.
/// Non-ASCII characters use universal character names, except C1 controls
/// which C does not allow as UCNs and are written as octal UTF-8 bytes.
///
/// # Errors
/// Propagates [`fmt::Error`] from the underlying writer.
pub fn escape_c_string(value: &str) -> Result<String, fmt::Error> {
    let mut out = String::with_capacity(value.len() + 2);
    let mut previous = '\0';

    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // "??x" would start a trigraph
            '?' if previous == '?' => out.push_str("\\?"),
            ' '..='~' => out.push(ch),
            '\u{80}'..='\u{9F}' => {
                let mut buffer = [0_u8; 4];
                for byte in ch.encode_utf8(&mut buffer).bytes() {
                    push_octal(&mut out, byte)?;
                }
            }
            '\0'..='\u{1F}' | '\u{7F}' => {
                if let Ok(byte) = u8::try_from(ch) {
                    push_octal(&mut out, byte)?;
                }
            }
            c if u32::from(c) <= 0xFFFF => {
                write!(out, "\\u{:04x}", u32::from(c))?;
            }
            c => {
                write!(out, "\\U{:08x}", u32::from(c))?;
            }
        }
        previous = ch;
    }

    Ok(out)
}

fn push_octal(out: &mut String, byte: u8) -> fmt::Result {
    write!(out, "\\{byte:03o}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::table::Catalog;

    fn sample_table() -> StringTable {
        let mut catalog = Catalog::new("en");
        catalog.add_entries("en", [("HELLO", "Hello"), ("BYE", "Bye")]).unwrap();
        catalog.add_entries("es", [("HELLO", "Hola")]).unwrap();
        StringTable::build(catalog).unwrap()
    }

    fn emitter() -> CEmitter {
        CEmitter::new("lang_gen.h", OutputConfig::default())
    }

    #[rstest]
    fn test_header_matches_expected_layout() {
        let artifacts = emitter().emit(&sample_table()).unwrap();

        let expected = "\
// Auto-generated file. Please do not edit directly.

#ifndef __LANG_GEN_H__
#define __LANG_GEN_H__

#define LK_HELLO 0
#define LK_BYE 1
#define LK_TOTAL 2

extern const char __far* const __far lang_keys_en[2];
extern const char __far* const __far lang_keys_es[2];

#endif
";
        assert_that!(artifacts.declarations, some(eq(expected)));
    }

    #[rstest]
    fn test_data_matches_expected_layout() {
        let artifacts = emitter().emit(&sample_table()).unwrap();

        let expected = "\
// Auto-generated file. Please do not edit directly.

#include <stdint.h>
#include \"lang_gen.h\"

const char __far lk_entry_0[] = \"Hello\";
const char __far lk_entry_1[] = \"Bye\";
const char __far lk_entry_2[] = \"Hola\";

const char __far* const __far lang_keys_en[] = {
\tlk_entry_0, // HELLO
\tlk_entry_1, // BYE
};

const char __far* const __far lang_keys_es[] = {
\tlk_entry_2, // HELLO
\tlk_entry_1, // BYE
};
";
        assert_that!(artifacts.data, eq(expected));
    }

    #[rstest]
    fn test_empty_qualifier_and_custom_prefixes() {
        let output = OutputConfig {
            key_prefix: "MSG_".to_string(),
            array_prefix: "strings_".to_string(),
            entry_prefix: "s".to_string(),
            pointer_qualifier: String::new(),
        };

        let artifacts = CEmitter::new("strings.h", output).emit(&sample_table()).unwrap();

        let header = artifacts.declarations.unwrap();
        assert_that!(header, contains_substring("#ifndef __STRINGS_H__"));
        assert_that!(header, contains_substring("#define MSG_BYE 1"));
        assert_that!(header, contains_substring("#define MSG_TOTAL 2"));
        assert_that!(header, contains_substring("extern const char* const strings_es[2];"));
        assert_that!(artifacts.data, contains_substring("const char s0[] = \"Hello\";"));
        assert_that!(artifacts.data, contains_substring("const char* const strings_en[] = {"));
    }

    #[rstest]
    fn test_language_tags_are_sanitized() {
        let mut catalog = Catalog::new("en");
        catalog.add_entries("en", [("OK", "OK")]).unwrap();
        catalog.add_entries("pt-BR", []).unwrap();

        let artifacts = emitter().emit(&StringTable::build(catalog).unwrap()).unwrap();

        assert_that!(artifacts.declarations.unwrap(), contains_substring("lang_keys_pt_BR[1];"));
    }

    #[rstest]
    fn test_symbol_collision_is_rejected() {
        let mut catalog = Catalog::new("en");
        catalog.add_entries("en", [("OK", "OK")]).unwrap();
        catalog.add_entries("pt-BR", []).unwrap();
        catalog.add_entries("pt_BR", []).unwrap();

        let result = emitter().emit(&StringTable::build(catalog).unwrap());

        assert!(matches!(
            result,
            Err(EmitError::SymbolCollision { ref symbol, .. }) if symbol == "lang_keys_pt_BR"
        ));
    }

    #[rstest]
    #[case::space("HELLO WORLD")]
    #[case::dot("menu.title")]
    #[case::empty("")]
    fn test_invalid_key_name_is_rejected(#[case] key: &str) {
        let mut catalog = Catalog::new("en");
        catalog.add_entries("en", [(key, "value")]).unwrap();

        let result = emitter().emit(&StringTable::build(catalog).unwrap());

        assert!(matches!(result, Err(EmitError::InvalidKeyName { .. })));
    }

    #[rstest]
    #[case::plain("Hello", "Hello")]
    #[case::quote_and_backslash("say \"hi\" \\o/", "say \\\"hi\\\" \\\\o/")]
    #[case::whitespace_escapes("a\nb\tc\r", "a\\nb\\tc\\r")]
    #[case::control("bell\u{7}", "bell\\007")]
    #[case::nul("a\0b", "a\\000b")]
    #[case::printf_format("%d%%", "%d%%")]
    #[case::trigraph("??=", "?\\?=")]
    #[case::latin("café", "caf\\u00e9")]
    #[case::cjk("日本", "\\u65e5\\u672c")]
    #[case::astral("\u{1F600}", "\\U0001f600")]
    #[case::c1_control("\u{85}", "\\302\\205")]
    fn test_escape_c_string(#[case] input: &str, #[case] expected: &str) {
        assert_that!(escape_c_string(input), ok(eq(expected)));
    }

    #[rstest]
    #[case("lang_gen.h", "lang_gen_h")]
    #[case("pt-BR", "pt_BR")]
    #[case("zh_Hant.TW", "zh_Hant_TW")]
    fn test_sanitize_symbol(#[case] input: &str, #[case] expected: &str) {
        assert_that!(sanitize_symbol(input), eq(expected));
    }
}
