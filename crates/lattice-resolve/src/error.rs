use thiserror::Error;
use miette::{Diagnostic, SourceSpan};

use lattice_source::{FetchError, ModulePath};
use lattice_syntax::SyntaxError;

/// Errors that can occur while resolving imports.
///
/// Failures below the entry document are collected rather than returned, so
/// most of these end up in [`crate::Resolution::errors`]. Only the `Entry*`
/// variants abort a resolution outright.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The fetch collaborator could not provide an imported module.
    #[error("Failed to fetch `{path}` imported from `{importer}`")]
    #[diagnostic(
        code(lattice_resolve::import_fetch_failed),
        help("The import is left unresolved; its local names stay as written")
    )]
    ImportFetchFailed {
        path: ModulePath,
        importer: ModulePath,
        #[source]
        source: FetchError,
    },

    /// An imported module was fetched but is not a valid stylesheet.
    #[error("Failed to parse `{path}`: {reason}")]
    #[diagnostic(code(lattice_resolve::import_parse_failed))]
    ImportParseFailed {
        path: ModulePath,
        reason: String,
        #[source_code]
        source_text: String,
        #[label("{reason}")]
        span: SourceSpan,
        #[source]
        source: SyntaxError,
    },

    /// A binding referenced an export the imported module does not define.
    #[error("`{path}` has no export named `{name}` (imported by `{importer}`)")]
    #[diagnostic(
        code(lattice_resolve::missing_export),
        help("Add `{name}` to the `:export` block of `{path}`")
    )]
    MissingExport {
        name: String,
        path: ModulePath,
        importer: ModulePath,
    },

    #[error("Failed to fetch entry `{path}`")]
    #[diagnostic(code(lattice_resolve::entry_fetch_failed))]
    EntryFetchFailed {
        path: ModulePath,
        #[source]
        source: FetchError,
    },

    #[error("Failed to parse entry `{path}`: {reason}")]
    #[diagnostic(code(lattice_resolve::entry_parse_failed))]
    EntryParseFailed {
        path: ModulePath,
        reason: String,
        #[source_code]
        source_text: String,
        #[label("{reason}")]
        span: SourceSpan,
        #[source]
        source: SyntaxError,
    },

    /// Produced by [`crate::Resolution::into_result`] when any import failed.
    #[error("{count} import failure(s) during resolution")]
    #[diagnostic(
        code(lattice_resolve::unresolved),
        help("Run without strict mode to accept the partially resolved output")
    )]
    Unresolved {
        count: usize,
        #[related]
        errors: Vec<ResolveError>,
    },
}

impl ResolveError {
    pub(crate) fn import_parse(path: ModulePath, source_text: &str, source: SyntaxError) -> Self {
        ResolveError::ImportParseFailed {
            path,
            reason: source.to_string(),
            source_text: source_text.to_string(),
            span: source.span(),
            source,
        }
    }

    pub(crate) fn entry_parse(path: ModulePath, source_text: &str, source: SyntaxError) -> Self {
        ResolveError::EntryParseFailed {
            path,
            reason: source.to_string(),
            source_text: source_text.to_string(),
            span: source.span(),
            source,
        }
    }

    /// The module the failure is about.
    pub fn path(&self) -> Option<&ModulePath> {
        match self {
            ResolveError::ImportFetchFailed { path, .. }
            | ResolveError::ImportParseFailed { path, .. }
            | ResolveError::MissingExport { path, .. }
            | ResolveError::EntryFetchFailed { path, .. }
            | ResolveError::EntryParseFailed { path, .. } => Some(path),
            ResolveError::Unresolved { .. } => None,
        }
    }

    /// True for failures that abort the whole resolution.
    pub fn is_entry_failure(&self) -> bool {
        matches!(
            self,
            ResolveError::EntryFetchFailed { .. } | ResolveError::EntryParseFailed { .. }
        )
    }
}
