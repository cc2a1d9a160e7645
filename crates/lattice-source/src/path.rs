use std::fmt;
use std::path::{Path, PathBuf};

/// A normalized, root-relative module path such as `/components/button.css`.
///
/// Module paths always start with `/` and never contain `.` or `..`
/// segments. Two spellings of the same file (`./a.css` from `/x/b.css` and
/// `../x/a.css` from `/y/c.css`) therefore compare equal, which is what the
/// resolver's token cache is keyed on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModulePath(String);

impl ModulePath {
    /// The resolution root itself.
    pub fn root() -> Self {
        ModulePath("/".to_string())
    }

    /// Normalizes `path` as if it were given relative to the root.
    pub fn new(path: &str) -> Self {
        let mut segments = Vec::new();
        push_segments(&mut segments, path);
        Self::from_segments(&segments)
    }

    /// Resolves an import specifier against this (importing) file.
    ///
    /// Relative specifiers are joined with the importer's directory; a
    /// specifier starting with `/` is taken relative to the root. `..`
    /// never climbs above the root.
    pub fn resolve(&self, specifier: &str) -> Self {
        let mut segments = Vec::new();
        if !specifier.starts_with('/') {
            push_segments(&mut segments, self.dir());
        }
        push_segments(&mut segments, specifier);
        Self::from_segments(&segments)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The directory containing this file.
    pub fn parent(&self) -> ModulePath {
        ModulePath::new(self.dir())
    }

    pub fn file_name(&self) -> Option<&str> {
        self.0.split('/').filter(|s| !s.is_empty()).last()
    }

    pub fn segments(&self) -> Vec<&str> {
        self.0.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Maps this module onto the filesystem below `root`.
    pub fn to_fs_path(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        for segment in self.segments() {
            path.push(segment);
        }
        path
    }

    fn dir(&self) -> &str {
        match self.0.rfind('/') {
            Some(0) | None => "/",
            Some(idx) => &self.0[..idx],
        }
    }

    fn from_segments(segments: &[&str]) -> Self {
        ModulePath(format!("/{}", segments.join("/")))
    }
}

fn push_segments<'a>(segments: &mut Vec<&'a str>, path: &'a str) {
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModulePath {
    fn from(path: &str) -> Self {
        ModulePath::new(path)
    }
}
