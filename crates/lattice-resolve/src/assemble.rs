//! Concatenation of resolved module sources into the final output.

use std::collections::BTreeMap;

use fxhash::{FxHashMap, FxHashSet};
use lattice_source::ModulePath;

use crate::trace::TraceKey;

/// The assembled output of one resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembled {
    pub source: String,
    /// Modules in the order their sources were written.
    pub order: Vec<ModulePath>,
}

/// Walks `traces` in key order and writes each module's source once.
///
/// A module reached through several traces is written at its earliest key.
/// Traces for modules without a recorded source are skipped.
pub fn assemble(
    traces: &BTreeMap<TraceKey, ModulePath>,
    sources: &FxHashMap<ModulePath, String>,
) -> Assembled {
    let mut written = FxHashSet::default();
    let mut assembled = Assembled::default();

    for (trace, path) in traces {
        if written.contains(path) {
            log::trace!("Skipping `{}` at {}, already written", path, trace);
            continue;
        }
        let Some(source) = sources.get(path) else {
            log::debug!("No source recorded for `{}` at {}", path, trace);
            continue;
        };
        written.insert(path.clone());
        assembled.source.push_str(source);
        assembled.order.push(path.clone());
    }

    assembled
}
