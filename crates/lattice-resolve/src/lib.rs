//! Import resolution for Lattice stylesheets.
//!
//! Starting from an entry document, every `:import("path") { local: name; }`
//! directive is resolved by fetching and recursively resolving the referenced
//! module, and the imported values are substituted for their local names.
//! The resolved text of every reachable module is then concatenated,
//! dependencies first.
//!
//! - [`core`]: the [`Resolver`] entry points and the [`Resolution`] result
//! - [`imports`]: the per-document resolution pipeline
//! - [`context`]: state shared across one resolution, including the
//!   compute-once export cache
//! - [`trace`]: [`TraceKey`] and its output ordering
//! - [`assemble`]: concatenation of resolved sources in trace order
//!
//! ```
//! use std::sync::Arc;
//! use futures::executor::block_on;
//! use lattice_resolve::Resolver;
//! use lattice_source::MemoryFetcher;
//!
//! let fetcher = MemoryFetcher::new()
//!     .with_file("/a.css", ":import(\"./b.css\") { localB: exportedB; } .x { color: localB; }")
//!     .with_file("/b.css", ":export { exportedB: red; }");
//! let resolver = Resolver::new(Arc::new(fetcher), ".");
//!
//! let resolution = block_on(resolver.resolve_entry("a.css")).unwrap();
//! assert_eq!(resolution.source, ".x { color: red; }");
//! ```

pub mod assemble;
pub mod context;
pub mod core;
pub mod error;
pub mod imports;
pub mod trace;

pub use assemble::{assemble, Assembled};
pub use context::{ExportTokens, ResolutionContext};
pub use self::core::{Resolution, Resolver};
pub use error::ResolveError;
pub use imports::ImportResolver;
pub use trace::TraceKey;
