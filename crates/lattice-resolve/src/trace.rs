//! Trace keys locate a module within the import tree.
//!
//! A key holds one index per import hop from the entry document, so the entry
//! itself has the empty key and its second import's first import is `[1, 0]`.
//! Keys sort in output order: dependencies before the documents that import
//! them, and earlier siblings before later ones.

use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TraceKey(Vec<u32>);

impl TraceKey {
    /// The key of the entry document.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// The key of this document's `index`-th import.
    pub fn child(&self, index: u32) -> Self {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Self(indices)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

impl From<Vec<u32>> for TraceKey {
    fn from(indices: Vec<u32>) -> Self {
        Self(indices)
    }
}

impl From<&[u32]> for TraceKey {
    fn from(indices: &[u32]) -> Self {
        Self(indices.to_vec())
    }
}

impl Ord for TraceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(&other.0) {
            match a.cmp(b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        // One key is a prefix of the other: the descendant comes first.
        other.0.len().cmp(&self.0.len())
    }
}

impl PartialOrd for TraceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TraceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<entry>");
        }
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", index)?;
        }
        Ok(())
    }
}
