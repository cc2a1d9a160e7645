use std::sync::Arc;

use lattice_resolve::Resolver;
use lattice_source::FileSystemFetcher;
use miette::Report;

use crate::error::CliError;
use crate::io::write_output;
use crate::utils::BuildSettings;

/// Resolves the entry stylesheet and writes the bundle.
///
/// Import failures are reported as warnings and the partial bundle is still
/// written, unless `strict` is set, in which case nothing is written.
pub async fn handle_build(settings: BuildSettings) -> Result<(), CliError> {
    log::info!("Building `{}` from {}", settings.entry, settings.root.display());

    let resolver = Resolver::new(Arc::new(FileSystemFetcher), settings.root.clone());
    let resolution = resolver.resolve_entry(&settings.entry).await?;

    let resolution = if settings.strict {
        resolution.into_result()?
    } else {
        for error in &resolution.errors {
            eprintln!("{:?}", Report::new(error.clone()));
        }
        resolution
    };

    let mut bundle = resolution.source.clone();
    if settings.print_exports && !resolution.exports.is_empty() {
        if !bundle.is_empty() && !bundle.ends_with('\n') {
            bundle.push('\n');
        }
        bundle.push_str(&resolution.exports_block());
    }
    write_output(settings.output.as_deref(), &bundle)?;

    log::info!(
        "Bundled {} module(s) with {} unresolved import(s)",
        resolution.order.len(),
        resolution.errors.len()
    );
    Ok(())
}
