//! Fetch collaborators: turn an import specifier into raw stylesheet text.
//!
//! The resolver only ever talks to the [`Fetch`] trait. Two implementations
//! ship with the crate:
//!
//! - [`FileSystemFetcher`] reads modules below the resolution root with
//!   `tokio::fs` and therefore has to be polled inside a tokio runtime;
//! - [`MemoryFetcher`] serves modules from an in-memory map and counts how
//!   often each one was requested.

use std::path::Path;

use futures::future::{self, BoxFuture, FutureExt};
use fxhash::FxHashMap;
use parking_lot::Mutex;

use crate::{FetchError, ModulePath};

/// One request to a fetch collaborator.
#[derive(Debug, Clone, Copy)]
pub struct FetchRequest<'a> {
    /// The specifier exactly as written inside `:import(...)`, quotes stripped.
    pub specifier: &'a str,
    /// The module containing the import.
    pub importer: &'a ModulePath,
    /// The resolution root on disk.
    pub root: &'a Path,
}

impl<'a> FetchRequest<'a> {
    pub fn new(specifier: &'a str, importer: &'a ModulePath, root: &'a Path) -> Self {
        Self { specifier, importer, root }
    }

    /// The normalized module path the specifier refers to.
    pub fn target(&self) -> ModulePath {
        self.importer.resolve(self.specifier)
    }
}

/// Asynchronously loads module text.
///
/// A rejected fetch is not fatal: the resolver records the error and leaves
/// the import unresolved.
pub trait Fetch: Send + Sync {
    fn fetch<'a>(&'a self, request: FetchRequest<'a>) -> BoxFuture<'a, Result<String, FetchError>>;
}

/// Reads modules from disk, relative to the request's root directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemFetcher;

impl Fetch for FileSystemFetcher {
    fn fetch<'a>(&'a self, request: FetchRequest<'a>) -> BoxFuture<'a, Result<String, FetchError>> {
        let target = request.target();
        let fs_path = target.to_fs_path(request.root);
        async move {
            log::debug!("Reading {} from {}", target, fs_path.display());
            tokio::fs::read_to_string(&fs_path)
                .await
                .map_err(|err| FetchError::from_io(target, err))
        }
        .boxed()
    }
}

/// Serves modules from memory.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    files: FxHashMap<ModulePath, String>,
    fetches: Mutex<FxHashMap<ModulePath, usize>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`MemoryFetcher::insert`].
    pub fn with_file(mut self, path: &str, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: &str, contents: impl Into<String>) {
        self.files.insert(ModulePath::new(path), contents.into());
    }

    /// How many times `path` was requested, whether or not it existed.
    pub fn fetch_count(&self, path: &str) -> usize {
        self.fetches
            .lock()
            .get(&ModulePath::new(path))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().values().sum()
    }
}

impl Fetch for MemoryFetcher {
    fn fetch<'a>(&'a self, request: FetchRequest<'a>) -> BoxFuture<'a, Result<String, FetchError>> {
        let target = request.target();
        *self.fetches.lock().entry(target.clone()).or_insert(0) += 1;
        let result = match self.files.get(&target) {
            Some(contents) => Ok(contents.clone()),
            None => Err(FetchError::NotFound { path: target }),
        };
        future::ready(result).boxed()
    }
}
