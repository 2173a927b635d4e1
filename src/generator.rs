//! End-to-end generation: discover, parse, build, emit, write.

use std::io::Write as _;
use std::path::{
    Path,
    PathBuf,
};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::config::{
    ConfigError,
    FileMatcher,
    GeneratorSettings,
    MatcherError,
};
use crate::emit::{
    Artifacts,
    CEmitter,
    EmitError,
    Emitter,
    JsonEmitter,
    OutputFormat,
};
use crate::input::document::{
    DocumentError,
    TranslationDocument,
    discover_documents,
    load_document,
};
use crate::table::{
    Catalog,
    StringTable,
    TableError,
};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Matcher(#[from] MatcherError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error("No translation document for default language '{language}' was found")]
    NoDefaultDocument { language: String },

    #[error("The {0:?} format needs a declarations output path")]
    MissingDeclarationsPath(OutputFormat),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where generated artifacts go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub data: PathBuf,
    pub declarations: Option<PathBuf>,
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub keys: usize,
    pub strings: usize,
    pub languages: Vec<String>,
    /// Outputs whose content changed and were rewritten.
    pub written: Vec<PathBuf>,
}

/// One generator run over a workspace.
#[derive(Debug, Clone)]
pub struct Generator {
    workspace_root: PathBuf,
    settings: GeneratorSettings,
}

impl Generator {
    #[must_use]
    pub const fn new(workspace_root: PathBuf, settings: GeneratorSettings) -> Self {
        Self { workspace_root, settings }
    }

    /// Paths of all translation documents, default language first.
    ///
    /// # Errors
    /// Returns [`GenerateError::Matcher`] for invalid glob patterns.
    pub fn discover(&self) -> Result<Vec<PathBuf>, GenerateError> {
        let matcher = FileMatcher::new(self.workspace_root.clone(), &self.settings)?;
        Ok(discover_documents(&matcher, &self.settings))
    }

    /// Builds the string table from already parsed documents.
    ///
    /// Documents must be ordered with the default language first, as
    /// [`Self::discover`] returns them.
    ///
    /// # Errors
    /// - No document for the default language
    /// - A key unknown to the default language
    pub fn build(&self, documents: &[TranslationDocument]) -> Result<StringTable, GenerateError> {
        let default_language = &self.settings.default_language;
        if !documents.iter().any(|document| &document.language == default_language) {
            return Err(GenerateError::NoDefaultDocument { language: default_language.clone() });
        }

        let mut catalog = Catalog::new(default_language.clone());
        for document in documents {
            catalog.add_document(document)?;
        }

        let table = StringTable::build(catalog)?;
        tracing::info!(
            keys = table.index.len(),
            strings = table.pool.len(),
            languages = table.tables.len(),
            "Built string table"
        );
        Ok(table)
    }

    /// Discovers, loads and builds in one step.
    ///
    /// # Errors
    /// Any discovery, parse or integrity error.
    pub fn load_and_build(&self) -> Result<StringTable, GenerateError> {
        let documents = self
            .discover()?
            .iter()
            .map(|path| load_document(path, &self.settings))
            .collect::<Result<Vec<_>, _>>()?;

        self.build(&documents)
    }

    /// Renders the table without touching the file system.
    ///
    /// # Errors
    /// Returns [`GenerateError::MissingDeclarationsPath`] when the format
    /// needs a header path that was not given, or any emitter error.
    pub fn render(
        &self,
        table: &StringTable,
        format: OutputFormat,
        outputs: &OutputPaths,
    ) -> Result<Artifacts, GenerateError> {
        let artifacts = match format {
            OutputFormat::C => {
                let header = outputs
                    .declarations
                    .as_deref()
                    .ok_or(GenerateError::MissingDeclarationsPath(format))?;
                let header_name = header
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                CEmitter::new(header_name, self.settings.output.clone()).emit(table)?
            }
            OutputFormat::Json => JsonEmitter.emit(table)?,
        };
        Ok(artifacts)
    }

    /// Full run: build, render everything in memory, then write.
    ///
    /// Nothing is written unless every step before writing succeeded, and
    /// outputs are replaced together: if any of them cannot be written, the
    /// ones already replaced are restored.
    ///
    /// # Errors
    /// Any error of [`Self::load_and_build`], [`Self::render`], or a write failure.
    pub fn run(&self, format: OutputFormat, outputs: &OutputPaths) -> Result<Summary, GenerateError> {
        if format.has_declarations() && outputs.declarations.is_none() {
            return Err(GenerateError::MissingDeclarationsPath(format));
        }

        let table = self.load_and_build()?;
        let artifacts = self.render(&table, format, outputs)?;

        let mut pending = vec![(outputs.data.as_path(), artifacts.data.as_str())];
        if let (Some(path), Some(contents)) = (&outputs.declarations, &artifacts.declarations) {
            pending.push((path.as_path(), contents.as_str()));
        }
        let written = write_outputs(&pending)?;

        Ok(Summary {
            keys: table.index.len(),
            strings: table.pool.len(),
            languages: table.tables.iter().map(|t| t.language.clone()).collect(),
            written,
        })
    }
}

/// New contents written to a temporary file next to its target.
#[derive(Debug)]
struct StagedOutput {
    /// Final location.
    path: PathBuf,
    /// Fully written temporary file in the target's directory.
    file: NamedTempFile,
    /// Contents of the target before this run, if it existed.
    previous: Option<Vec<u8>>,
}

/// Writes every output whose contents changed, all or nothing.
///
/// Returns the paths that were rewritten.
fn write_outputs(outputs: &[(&Path, &str)]) -> Result<Vec<PathBuf>, GenerateError> {
    let mut staged = Vec::with_capacity(outputs.len());
    for (path, contents) in outputs {
        if let Some(output) = stage_output(path, contents)? {
            staged.push(output);
        }
    }

    let mut committed: Vec<(PathBuf, Option<Vec<u8>>)> = Vec::with_capacity(staged.len());
    for StagedOutput { path, file, previous } in staged {
        if let Err(err) = file.persist(&path) {
            roll_back(&committed);
            return Err(GenerateError::Write { path, source: err.error });
        }
        tracing::debug!(path = %path.display(), "Wrote output");
        committed.push((path, previous));
    }

    Ok(committed.into_iter().map(|(path, _)| path).collect())
}

/// Stages `contents` for `path`, or returns `None` if the file already holds exactly that.
fn stage_output(path: &Path, contents: &str) -> Result<Option<StagedOutput>, GenerateError> {
    let previous = std::fs::read(path).ok();
    if previous.as_deref() == Some(contents.as_bytes()) {
        tracing::debug!(path = %path.display(), "Output unchanged, not rewriting");
        return Ok(None);
    }

    let write_error =
        |source: std::io::Error| GenerateError::Write { path: path.to_path_buf(), source };
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    let builder = builder.prefix(".lang-table-gen");
    #[cfg(unix)]
    let builder = {
        use std::os::unix::fs::PermissionsExt as _;
        builder.permissions(std::fs::Permissions::from_mode(0o644))
    };
    let mut file = builder.tempfile_in(directory).map_err(write_error)?;
    file.write_all(contents.as_bytes()).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;

    tracing::trace!(path = %path.display(), bytes = contents.len(), "Staged output");
    Ok(Some(StagedOutput { path: path.to_path_buf(), file, previous }))
}

/// Restores outputs replaced earlier in a failed write, newest first.
fn roll_back(committed: &[(PathBuf, Option<Vec<u8>>)]) {
    for (path, previous) in committed.iter().rev() {
        let result = match previous {
            Some(contents) => std::fs::write(path, contents),
            None => std::fs::remove_file(path),
        };
        match result {
            Ok(()) => tracing::debug!(path = %path.display(), "Rolled back output"),
            Err(err) => tracing::warn!(path = %path.display(), %err, "Failed to roll back output"),
        }
    }
}
