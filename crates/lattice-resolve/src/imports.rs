//! Per-document import resolution.
//!
//! An [`ImportResolver`] handles one document: it loads every `:import`
//! concurrently, substitutes the imported values into the document and
//! pulls out the document's own `:export` table. Loading an import runs a
//! new resolver over the imported document, so the whole tree is resolved
//! recursively against one shared [`ResolutionContext`].

use std::path::PathBuf;
use std::sync::Arc;

use futures::future::{join_all, BoxFuture, FutureExt};

use lattice_source::{Fetch, FetchRequest, ModulePath, SourceFile};
use lattice_syntax::{parse, replace_symbols, replace_value_symbols, ImportRule, Rule, Stylesheet, Translations};

use crate::context::{Claim, ExportTokens, ResolutionContext};
use crate::error::ResolveError;
use crate::trace::TraceKey;

/// Collaborators and state shared by every resolver in one resolution.
pub(crate) struct Session {
    pub(crate) fetcher: Arc<dyn Fetch>,
    pub(crate) root: PathBuf,
    pub(crate) context: ResolutionContext,
}

impl Session {
    pub(crate) fn new(fetcher: Arc<dyn Fetch>, root: PathBuf) -> Self {
        Self {
            fetcher,
            root,
            context: ResolutionContext::new(),
        }
    }

    /// Fetches, parses and resolves one imported module, returning its
    /// printed source and exports.
    async fn load(
        self: Arc<Self>,
        specifier: String,
        importer: ModulePath,
        path: ModulePath,
        trace: TraceKey,
    ) -> Result<(String, ExportTokens), ResolveError> {
        let request = FetchRequest::new(&specifier, &importer, &self.root);
        let text = self
            .fetcher
            .fetch(request)
            .await
            .map_err(|source| ResolveError::ImportFetchFailed {
                path: path.clone(),
                importer: importer.clone(),
                source,
            })?;

        let file = SourceFile::new(path.clone(), text);
        let sheet = parse(file.contents())
            .map_err(|err| ResolveError::import_parse(path.clone(), file.contents(), err))?;

        let resolver = ImportResolver::new(self.clone(), path, trace);
        let (sheet, exports) = resolver.resolve(sheet).await;
        Ok((sheet.to_string(), exports))
    }
}

/// The compute-once load of one module, installed into the context on a
/// cache miss and shared by every importer that reaches the module before it
/// finishes.
fn load_module(
    session: Arc<Session>,
    specifier: String,
    importer: ModulePath,
    path: ModulePath,
    trace: TraceKey,
) -> BoxFuture<'static, Option<Arc<ExportTokens>>> {
    async move {
        match session.clone().load(specifier, importer, path.clone(), trace).await {
            Ok((source, exports)) => {
                let exports = Arc::new(exports);
                session.context.commit(&path, source, exports.clone());
                Some(exports)
            }
            Err(err) => {
                log::warn!("{}", err);
                session.context.abandon(&path, err);
                None
            }
        }
    }
    .boxed()
}

/// Resolves the imports and exports of a single document.
pub struct ImportResolver {
    session: Arc<Session>,
    file: ModulePath,
    trace: TraceKey,
}

impl ImportResolver {
    pub(crate) fn new(session: Arc<Session>, file: ModulePath, trace: TraceKey) -> Self {
        Self { session, file, trace }
    }

    /// Runs the resolution pipeline over `sheet`.
    ///
    /// Resolved `:import` rules are removed and every `:export` rule is
    /// consumed into the returned table. Imports that fail to load keep
    /// their rule, and their local names are left as written.
    ///
    /// # Returns
    ///
    /// The rewritten document together with its export table.
    pub fn resolve(self, mut sheet: Stylesheet) -> BoxFuture<'static, (Stylesheet, ExportTokens)> {
        async move {
            let imports: Vec<(usize, ImportRule)> = sheet
                .rules
                .iter()
                .enumerate()
                .filter_map(|(position, rule)| match rule {
                    Rule::Import(import) => Some((position, import.clone())),
                    _ => None,
                })
                .collect();

            let loads = imports
                .iter()
                .enumerate()
                .map(|(index, (_, import))| self.load_import(import, index as u32));
            let loaded = join_all(loads).await;

            // Bindings are applied in declaration order once every load has
            // settled, whatever order the loads finished in.
            let mut translations = Translations::default();
            let mut resolved = vec![false; sheet.rules.len()];
            for ((position, import), exports) in imports.iter().zip(loaded) {
                let Some(exports) = exports else {
                    continue;
                };
                self.bind(import, &exports, &mut translations);
                resolved[*position] = true;
            }

            sheet.remove_rules(|position, _| resolved[position]);

            replace_symbols(&mut sheet, &translations);
            let exports = extract_exports(&mut sheet, &translations);
            log::debug!(
                "Resolved `{}`: {} translation(s), {} export(s)",
                self.file,
                translations.len(),
                exports.len()
            );

            (sheet, exports)
        }
        .boxed()
    }

    async fn load_import(&self, import: &ImportRule, index: u32) -> Option<Arc<ExportTokens>> {
        let trace = self.trace.child(index);
        let path = self.file.resolve(&import.source);

        let claim = self.session.context.claim(&path, trace.clone(), || {
            load_module(
                self.session.clone(),
                import.source.clone(),
                self.file.clone(),
                path.clone(),
                trace,
            )
        });

        match claim {
            Claim::Ready(exports) => Some(exports),
            Claim::Pending(exports) => exports.await,
        }
    }

    fn bind(&self, import: &ImportRule, exports: &ExportTokens, translations: &mut Translations) {
        let path = self.file.resolve(&import.source);
        for binding in &import.bindings {
            match exports.get(&binding.value) {
                Some(value) => {
                    log::trace!("Binding `{}` to `{}` from `{}`", binding.name, value, path);
                    translations.insert(binding.name.clone(), value.clone());
                }
                None => {
                    let err = ResolveError::MissingExport {
                        name: binding.value.clone(),
                        path: path.clone(),
                        importer: self.file.clone(),
                    };
                    log::warn!("{}", err);
                    self.session.context.report(err);
                }
            }
        }
    }
}

/// Removes every `:export` rule from `sheet`, translating each value.
fn extract_exports(sheet: &mut Stylesheet, translations: &Translations) -> ExportTokens {
    let mut exports = ExportTokens::new();
    for export in sheet.take_exports() {
        for binding in export.bindings {
            let value = replace_value_symbols(&binding.value, translations);
            exports.insert(binding.name, value);
        }
    }
    exports
}
