//! File pattern matcher for translation documents.

use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};

use super::GeneratorSettings;

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Invalid translation file pattern '{pattern}': {source}")]
    InvalidTranslationPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),
}

/// Matches files against the configured translation file globs.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    workspace_root: PathBuf,
    translation_set: GlobSet,
    translation_exclude_set: GlobSet,
}

impl FileMatcher {
    /// Creates a new matcher from settings.
    ///
    /// # Errors
    /// Returns [`MatcherError`] for invalid glob patterns.
    pub fn new(workspace_root: PathBuf, settings: &GeneratorSettings) -> Result<Self, MatcherError> {
        let translation_set = Self::build_glob_set(
            &settings.translation_files.include_patterns,
            |pattern, source| MatcherError::InvalidTranslationPattern { pattern, source },
        )?;

        let translation_exclude_set = Self::build_glob_set(
            &settings.translation_files.exclude_patterns,
            |pattern, source| MatcherError::InvalidExcludePattern { pattern, source },
        )?;

        Ok(Self { workspace_root, translation_set, translation_exclude_set })
    }

    fn build_glob_set<F>(patterns: &[String], make_error: F) -> Result<GlobSet, MatcherError>
    where
        F: Fn(String, globset::Error) -> MatcherError,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| make_error(pattern.clone(), e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }

    #[must_use]
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Returns true if the path matches `translationFiles.includePatterns`
    /// but not `translationFiles.excludePatterns`.
    ///
    /// The path must be absolute and under the workspace root.
    #[must_use]
    pub fn is_translation_file(&self, absolute_path: &Path) -> bool {
        let Ok(relative_path) = absolute_path.strip_prefix(&self.workspace_root) else {
            return false;
        };

        self.translation_set.is_match(relative_path)
            && !self.translation_exclude_set.is_match(relative_path)
    }
}
