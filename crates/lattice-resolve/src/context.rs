//! State shared by every import resolver of one resolution.
//!
//! All bookkeeping sits behind a single [`parking_lot::Mutex`]. The lock is
//! only ever taken for short synchronous updates and never held across an
//! `.await`, so resolvers running on different threads can share one context.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use fxhash::FxHashMap;
use indexmap::IndexMap;
use parking_lot::Mutex;

use lattice_source::ModulePath;

use crate::assemble::{assemble, Assembled};
use crate::error::ResolveError;
use crate::trace::TraceKey;

/// Exported name to resolved value, in declaration order.
pub type ExportTokens = IndexMap<String, String>;

/// A module's export computation, awaitable by every importer.
///
/// Resolves to `None` when the module failed to load; the failure itself is
/// recorded in the context.
pub(crate) type SharedExports = Shared<BoxFuture<'static, Option<Arc<ExportTokens>>>>;

enum TokenSlot {
    /// First load in progress. `traces` collects the key of every importer
    /// that reached the module before it finished.
    Pending {
        exports: SharedExports,
        traces: Vec<TraceKey>,
    },
    Ready(Arc<ExportTokens>),
}

/// Outcome of [`ResolutionContext::claim`].
pub(crate) enum Claim {
    Ready(Arc<ExportTokens>),
    Pending(SharedExports),
}

#[derive(Default)]
struct ContextState {
    sources: FxHashMap<ModulePath, String>,
    traces: BTreeMap<TraceKey, ModulePath>,
    tokens: FxHashMap<ModulePath, TokenSlot>,
    errors: Vec<ResolveError>,
}

#[derive(Default)]
pub struct ResolutionContext {
    state: Mutex<ContextState>,
}

impl ResolutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the exports of `path` on behalf of the importer at `trace`.
    ///
    /// Finished exports are returned directly and `trace` is recorded at
    /// once. A pending load is joined and `trace` is queued for it. Otherwise the
    /// future built by `start` is installed as the module's one and only
    /// load, with `trace` as its first key.
    pub(crate) fn claim<F>(&self, path: &ModulePath, trace: TraceKey, start: F) -> Claim
    where
        F: FnOnce() -> BoxFuture<'static, Option<Arc<ExportTokens>>>,
    {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        match state.tokens.get_mut(path) {
            Some(TokenSlot::Ready(exports)) => {
                log::debug!("Cache hit for `{}` at {}", path, trace);
                state.traces.insert(trace, path.clone());
                Claim::Ready(exports.clone())
            }
            Some(TokenSlot::Pending { exports, traces }) => {
                log::debug!("Joining pending load of `{}` at {}", path, trace);
                traces.push(trace);
                Claim::Pending(exports.clone())
            }
            None => {
                log::debug!("Cache miss for `{}` at {}", path, trace);
                let exports = start().shared();
                state.tokens.insert(
                    path.clone(),
                    TokenSlot::Pending {
                        exports: exports.clone(),
                        traces: vec![trace],
                    },
                );
                Claim::Pending(exports)
            }
        }
    }

    /// Records a finished load: its printed source, a trace entry for every
    /// key queued while it was pending, and its exports.
    pub(crate) fn commit(&self, path: &ModulePath, source: String, exports: Arc<ExportTokens>) {
        let mut state = self.state.lock();
        let traces = match state.tokens.remove(path) {
            Some(TokenSlot::Pending { traces, .. }) => traces,
            _ => Vec::new(),
        };
        for trace in traces {
            log::debug!("Recording trace {} -> `{}`", trace, path);
            state.traces.insert(trace, path.clone());
        }
        state.sources.insert(path.clone(), source);
        state.tokens.insert(path.clone(), TokenSlot::Ready(exports));
    }

    /// Records a failed load. The slot is cleared so a later import retries.
    pub(crate) fn abandon(&self, path: &ModulePath, error: ResolveError) {
        let mut state = self.state.lock();
        state.tokens.remove(path);
        state.errors.push(error);
    }

    pub(crate) fn report(&self, error: ResolveError) {
        self.state.lock().errors.push(error);
    }

    /// Records the entry document under the empty trace key.
    pub(crate) fn record_entry(&self, path: &ModulePath, source: String) {
        let mut state = self.state.lock();
        state.sources.insert(path.clone(), source);
        state.traces.insert(TraceKey::root(), path.clone());
    }

    pub(crate) fn take_errors(&self) -> Vec<ResolveError> {
        std::mem::take(&mut self.state.lock().errors)
    }

    /// Concatenates every recorded source in trace order.
    pub fn assemble(&self) -> Assembled {
        let state = self.state.lock();
        assemble(&state.traces, &state.sources)
    }

    /// The resolved source recorded for `path`, if it loaded.
    pub fn source(&self, path: &ModulePath) -> Option<String> {
        self.state.lock().sources.get(path).cloned()
    }

    /// The finished exports of `path`, if it loaded.
    pub fn exports(&self, path: &ModulePath) -> Option<Arc<ExportTokens>> {
        match self.state.lock().tokens.get(path) {
            Some(TokenSlot::Ready(exports)) => Some(exports.clone()),
            _ => None,
        }
    }

    /// All recorded traces in key order.
    pub fn traces(&self) -> Vec<(TraceKey, ModulePath)> {
        self.state
            .lock()
            .traces
            .iter()
            .map(|(key, path)| (key.clone(), path.clone()))
            .collect()
    }
}
