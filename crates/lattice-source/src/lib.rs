//! Source management for the Lattice stylesheet resolver.
//!
//! This crate is responsible for:
//! - Normalizing module paths (`ModulePath`) so every file has one identity
//! - Fetching module text through the `Fetch` collaborator trait
//! - Loading `lattice.toml` configuration
//!
//! Nothing in here knows about stylesheet syntax; parsing lives in
//! `lattice-syntax` and the import algorithm in `lattice-resolve`.

mod config;
mod error;
mod fetch;
mod file;
mod path;

pub use config::{default_root, LatticeConfig, OutputSection, ResolveSection, CONFIG_FILE_NAME};
pub use error::{ConfigError, FetchError};
pub use fetch::{Fetch, FetchRequest, FileSystemFetcher, MemoryFetcher};
pub use file::SourceFile;
pub use path::ModulePath;
