use std::io::Write;
use std::path::Path;

use crate::error::{convert_io_error, CliError};

/// Writes `text` to `path`, or to standard output when no path is given.
pub fn write_output(path: Option<&Path>, text: &str) -> Result<(), CliError> {
    match path {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)
                    .map_err(|e| convert_io_error(e, dir.to_path_buf(), "creating"))?;
            }
            std::fs::write(path, text).map_err(|e| convert_io_error(e, path.to_path_buf(), "writing"))?;
            log::info!("Wrote {} bytes to {}", text.len(), path.display());
            Ok(())
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|e| convert_io_error(e, "<stdout>".into(), "writing"))
        }
    }
}
