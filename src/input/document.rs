//! Translation document discovery and loading.

use std::cmp::Ordering;
use std::path::{
    Path,
    PathBuf,
};

use ignore::WalkBuilder;
use thiserror::Error;

use crate::config::{
    FileMatcher,
    GeneratorSettings,
};
use crate::parser::{
    Entry,
    ParseError,
    ParseOptions,
    parse_document,
};

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read translation document {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Cannot derive a language tag from {}", .0.display())]
    UnnamedDocument(PathBuf),
}

/// Language a document contributes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLanguage {
    pub tag: String,
    /// The document is the global one, aliased to the default language.
    pub is_global: bool,
}

/// One parsed translation document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationDocument {
    pub language: String,
    pub path: PathBuf,
    pub entries: Vec<Entry>,
}

impl TranslationDocument {
    /// Parses document text that was obtained elsewhere.
    ///
    /// # Errors
    /// Returns [`DocumentError::Parse`] for malformed entries.
    pub fn from_text(
        path: impl Into<PathBuf>,
        language: impl Into<String>,
        text: &str,
        options: ParseOptions,
    ) -> Result<Self, DocumentError> {
        let path = path.into();
        match parse_document(text, options) {
            Ok(entries) => Ok(Self { language: language.into(), path, entries }),
            Err(source) => Err(DocumentError::Parse { path, source }),
        }
    }
}

/// Detects the language of a document from its file stem.
///
/// # Examples
/// - `lang/_global.po` -> default language, global
/// - `lang/ja.po` -> `ja`
/// - `lang/pt-BR.po` -> `pt-BR`
#[must_use]
pub fn detect_language(path: &Path, settings: &GeneratorSettings) -> Option<DocumentLanguage> {
    let stem = path.file_stem()?.to_string_lossy();
    if stem.is_empty() {
        return None;
    }

    if stem == settings.global_document.as_str() {
        return Some(DocumentLanguage { tag: settings.default_language.clone(), is_global: true });
    }

    Some(DocumentLanguage { tag: stem.into_owned(), is_global: false })
}

/// Reads and parses one document from disk.
///
/// # Errors
/// - File name without a usable stem
/// - File read error
/// - Malformed entry
pub fn load_document(
    path: &Path,
    settings: &GeneratorSettings,
) -> Result<TranslationDocument, DocumentError> {
    let language = detect_language(path, settings)
        .ok_or_else(|| DocumentError::UnnamedDocument(path.to_path_buf()))?;

    let text = std::fs::read_to_string(path)
        .map_err(|source| DocumentError::Io { path: path.to_path_buf(), source })?;

    let options = ParseOptions { strict: settings.strict_lines };
    let document = TranslationDocument::from_text(path, language.tag, &text, options)?;

    tracing::debug!(
        path = %path.display(),
        language = %document.language,
        entries = document.entries.len(),
        "Loaded translation document"
    );
    Ok(document)
}

/// Finds translation documents under the matcher's workspace root.
///
/// The result is ordered for building: the global document first, then the
/// other default-language documents, then everything else by path.
#[must_use]
pub fn discover_documents(matcher: &FileMatcher, settings: &GeneratorSettings) -> Vec<PathBuf> {
    let workspace_path = matcher.workspace_root();
    tracing::debug!(workspace_path = %workspace_path.display(), "Discovering translation documents");

    let mut found_files = Vec::new();
    for result in WalkBuilder::new(workspace_path)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .follow_links(false)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        if !matcher.is_translation_file(entry.path()) {
            continue;
        }

        found_files.push(entry.into_path());
    }

    order_documents(&mut found_files, settings);
    tracing::debug!(count = found_files.len(), "Discovered translation documents");
    found_files
}

/// Sorts paths so that default-language documents come first.
pub fn order_documents(paths: &mut [PathBuf], settings: &GeneratorSettings) {
    paths.sort_by(|a, b| match rank(a, settings).cmp(&rank(b, settings)) {
        Ordering::Equal => a.cmp(b),
        other => other,
    });
}

/// 0 for the global document, 1 for other default-language documents, 2 otherwise.
fn rank(path: &Path, settings: &GeneratorSettings) -> u8 {
    match detect_language(path, settings) {
        Some(language) if language.is_global => 0,
        Some(language) if language.tag == settings.default_language => 1,
        _ => 2,
    }
}
