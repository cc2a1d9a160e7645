// Top-level entry points: one fresh context per resolution.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lattice_source::{Fetch, FetchRequest, ModulePath, SourceFile};
use lattice_syntax::{parse, Binding, ExportRule};
use miette::SourceSpan;

use crate::context::ExportTokens;
use crate::error::ResolveError;
use crate::imports::{ImportResolver, Session};
use crate::trace::TraceKey;

/// The main resolver struct.
///
/// Holds the fetch collaborator and the root directory that module paths are
/// relative to. Each call to [`Resolver::resolve_entry`] or
/// [`Resolver::resolve_source`] runs against a fresh
/// [`crate::ResolutionContext`], so nothing is cached between calls.
pub struct Resolver {
    fetcher: Arc<dyn Fetch>,
    root: PathBuf,
}

/// The result of resolving an entry document.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Every reachable module's resolved text, dependencies first.
    pub source: String,
    /// The entry document's own export table.
    pub exports: ExportTokens,
    /// Modules in the order their text appears in `source`.
    pub order: Vec<ModulePath>,
    /// Import failures below the entry, in the order they happened.
    pub errors: Vec<ResolveError>,
}

impl Resolver {
    /// Creates a new `Resolver`.
    ///
    /// # Arguments
    ///
    /// * `fetcher`: Provides module text for every import.
    /// * `root`: The directory the module path `/` refers to. It is passed
    ///   through to the fetcher untouched.
    pub fn new(fetcher: Arc<dyn Fetch>, root: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fetches the entry document through the fetcher and resolves it.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::EntryFetchFailed`] or
    /// [`ResolveError::EntryParseFailed`] when the entry itself cannot be
    /// loaded. Failures of its imports are collected in
    /// [`Resolution::errors`] instead.
    pub async fn resolve_entry(&self, specifier: &str) -> Result<Resolution, ResolveError> {
        let importer = ModulePath::root();
        let path = importer.resolve(specifier);
        let text = self
            .fetcher
            .fetch(FetchRequest::new(specifier, &importer, &self.root))
            .await
            .map_err(|source| ResolveError::EntryFetchFailed {
                path: path.clone(),
                source,
            })?;
        self.resolve_source(path, text).await
    }

    /// Resolves `contents` as the entry document at `path`.
    ///
    /// The entry is resolved with the empty trace key, so its own text comes
    /// last in [`Resolution::source`], after everything it imports.
    pub async fn resolve_source(
        &self,
        path: ModulePath,
        contents: impl Into<String>,
    ) -> Result<Resolution, ResolveError> {
        let file = SourceFile::new(path, contents);
        let sheet = parse(file.contents())
            .map_err(|err| ResolveError::entry_parse(file.path().clone(), file.contents(), err))?;

        log::info!("Resolving `{}`", file.path());
        let session = Arc::new(Session::new(self.fetcher.clone(), self.root.clone()));
        let resolver = ImportResolver::new(session.clone(), file.path().clone(), TraceKey::root());
        let (sheet, exports) = resolver.resolve(sheet).await;

        let context = &session.context;
        context.record_entry(file.path(), sheet.to_string());
        let assembled = context.assemble();
        let errors = context.take_errors();
        log::info!(
            "Resolved `{}`: {} module(s), {} failure(s)",
            file.path(),
            assembled.order.len(),
            errors.len()
        );

        Ok(Resolution {
            source: assembled.source,
            exports,
            order: assembled.order,
            errors,
        })
    }
}

impl Resolution {
    /// True when every import resolved.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fails with [`ResolveError::Unresolved`] if any import failed.
    pub fn into_result(self) -> Result<Self, ResolveError> {
        if self.errors.is_empty() {
            return Ok(self);
        }
        Err(ResolveError::Unresolved {
            count: self.errors.len(),
            errors: self.errors,
        })
    }

    /// The entry's exports printed as an `:export` block, or an empty string
    /// when it exports nothing.
    pub fn exports_block(&self) -> String {
        if self.exports.is_empty() {
            return String::new();
        }
        let bindings = self
            .exports
            .iter()
            .map(|(name, value)| Binding {
                name: name.clone(),
                value: value.clone(),
                span: SourceSpan::from(0..0),
            })
            .collect();
        ExportRule::new(bindings).to_string()
    }
}
