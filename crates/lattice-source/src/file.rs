use crate::ModulePath;

/// A stylesheet's text together with the module path it was loaded from.
///
/// # Example
///
/// ```rust
/// use lattice_source::{ModulePath, SourceFile};
///
/// let file = SourceFile::new(ModulePath::new("/a.css"), ".a { color: red; }");
/// assert_eq!(file.path().as_str(), "/a.css");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: ModulePath,
    contents: String,
}

impl SourceFile {
    pub fn new(path: ModulePath, contents: impl Into<String>) -> Self {
        Self { path, contents: contents.into() }
    }

    pub fn path(&self) -> &ModulePath {
        &self.path
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }
}
