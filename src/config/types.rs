use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "translationFiles.includePatterns[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Settings read from `.lang-table.json`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorSettings {
    pub translation_files: TranslationFilesConfig,

    /// Language tag of the canonical document.
    pub default_language: String,

    /// File stem that denotes the default-language document
    /// regardless of `default_language`.
    pub global_document: String,

    /// Reject unrecognized lines instead of skipping them.
    pub strict_lines: bool,

    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationFilesConfig {
    /// Glob patterns relative to the workspace root.
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

/// Symbol naming for the generated C artifacts.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputConfig {
    pub key_prefix: String,
    pub array_prefix: String,
    pub entry_prefix: String,
    /// Pointer qualifier such as `__far`. May be empty.
    pub pointer_qualifier: String,
}

impl GeneratorSettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Symbol prefix is not a C identifier
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.default_language.trim().is_empty() {
            errors.push(ValidationError::new(
                "defaultLanguage",
                "The default language cannot be empty. Example: \"en\"",
            ));
        }

        if self.global_document.trim().is_empty() {
            errors.push(ValidationError::new(
                "globalDocument",
                "The global document name cannot be empty. Example: \"_global\"",
            ));
        }

        if self.translation_files.include_patterns.is_empty() {
            errors.push(ValidationError::new(
                "translationFiles.includePatterns",
                "At least one pattern is required. Example: [\"lang/*.po\"]",
            ));
        }

        for (index, pattern) in self.translation_files.include_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("translationFiles.includePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        for (index, pattern) in self.translation_files.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("translationFiles.excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        for (field, prefix) in [
            ("output.keyPrefix", &self.output.key_prefix),
            ("output.arrayPrefix", &self.output.array_prefix),
            ("output.entryPrefix", &self.output.entry_prefix),
        ] {
            if !is_identifier_prefix(prefix) {
                errors.push(ValidationError::new(
                    field,
                    format!(
                        "'{prefix}' is not a valid C identifier prefix. Use letters, digits and '_', not starting with a digit"
                    ),
                ));
            }
        }

        if !self.output.pointer_qualifier.is_empty()
            && !is_identifier_prefix(&self.output.pointer_qualifier)
        {
            errors.push(ValidationError::new(
                "output.pointerQualifier",
                format!(
                    "'{}' is not a valid qualifier. Use an identifier such as \"__far\", or \"\" for none",
                    self.output.pointer_qualifier
                ),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Non-empty, ASCII alphanumeric or `_`, and not starting with a digit.
fn is_identifier_prefix(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(|first| first == '_' || first.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

impl Default for TranslationFilesConfig {
    fn default() -> Self {
        Self { include_patterns: vec!["lang/*.po".to_string()], exclude_patterns: Vec::new() }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            key_prefix: "LK_".to_string(),
            array_prefix: "lang_keys_".to_string(),
            entry_prefix: "lk_entry_".to_string(),
            pointer_qualifier: "__far".to_string(),
        }
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            translation_files: TranslationFilesConfig::default(),
            default_language: "en".to_string(),
            global_document: "_global".to_string(),
            strict_lines: false,
            output: OutputConfig::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn test_validate_valid_settings() {
        let settings = GeneratorSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn test_deserialize_partial_settings() {
        let json = r#"{"defaultLanguage": "ja", "output": {"pointerQualifier": ""}}"#;

        let settings: GeneratorSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.default_language, eq("ja"));
        assert_that!(settings.global_document, eq("_global"));
        assert_that!(settings.output.pointer_qualifier, eq(""));
        assert_that!(settings.output.key_prefix, eq("LK_"));
        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn test_deserialize_empty_settings() {
        let json = "{}";

        let settings: GeneratorSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.default_language, eq("en"));
        assert_that!(settings.strict_lines, eq(false));
        assert_that!(settings.translation_files.include_patterns, elements_are![eq("lang/*.po")]);
        assert_that!(settings.translation_files.exclude_patterns, is_empty());
        assert_that!(settings.output.array_prefix, eq("lang_keys_"));
        assert_that!(settings.output.entry_prefix, eq("lk_entry_"));
    }

    #[rstest]
    fn test_validate_invalid_default_language_empty() {
        let settings =
            GeneratorSettings { default_language: String::new(), ..GeneratorSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("defaultLanguage")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    fn test_validate_invalid_global_document_empty() {
        let settings =
            GeneratorSettings { global_document: " ".to_string(), ..GeneratorSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![field!(ValidationError.field_path, eq("globalDocument"))])
        );
    }

    #[rstest]
    fn test_validate_invalid_include_patterns_empty() {
        let settings = GeneratorSettings {
            translation_files: TranslationFilesConfig {
                include_patterns: vec![],
                exclude_patterns: vec![],
            },
            ..GeneratorSettings::default()
        };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("translationFiles.includePatterns")),
                field!(ValidationError.message, contains_substring("At least one pattern"))
            ]])
        );
    }

    #[rstest]
    fn test_validate_invalid_exclude_pattern_invalid_glob() {
        let settings = GeneratorSettings {
            translation_files: TranslationFilesConfig {
                include_patterns: vec!["lang/*.po".to_string()],
                exclude_patterns: vec!["lang/old/**".to_string(), "invalid[pattern".to_string()],
            },
            ..GeneratorSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("translationFiles.excludePatterns[1]")),
                field!(ValidationError.message, contains_substring("Invalid glob pattern")),
                field!(ValidationError.message, contains_substring("invalid[pattern"))
            ]])
        );
    }

    #[rstest]
    #[case::empty("")]
    #[case::leading_digit("1abc")]
    #[case::dash("lang-keys-")]
    fn test_validate_invalid_key_prefix(#[case] prefix: &str) {
        let settings = GeneratorSettings {
            output: OutputConfig { key_prefix: prefix.to_string(), ..OutputConfig::default() },
            ..GeneratorSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("output.keyPrefix")),
                field!(ValidationError.message, contains_substring("not a valid C identifier"))
            ]])
        );
    }

    #[rstest]
    fn test_validate_invalid_pointer_qualifier() {
        let settings = GeneratorSettings {
            output: OutputConfig {
                pointer_qualifier: "far *".to_string(),
                ..OutputConfig::default()
            },
            ..GeneratorSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![field!(ValidationError.field_path, eq("output.pointerQualifier"))])
        );
    }

    #[rstest]
    fn test_config_error_validation_errors_format() {
        let settings = GeneratorSettings {
            default_language: String::new(),
            global_document: String::new(),
            ..GeneratorSettings::default()
        };

        let validation_result = settings.validate();
        let errors = validation_result.unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. defaultLanguage"));
        assert_that!(error_message, contains_substring("2. globalDocument"));
        assert_that!(error_message, contains_substring("cannot be empty"));
    }
}
