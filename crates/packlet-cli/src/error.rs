//! Error conversion utilities for CLI.
//!
//! Converts packlet-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use packlet_core::PackError;
use std::path::Path;

/// Converts `PackError` to user-friendly anyhow error with context
pub fn convert_pack_error(err: PackError, output: &Path) -> anyhow::Error {
    match err {
        PackError::RequiredRootMissing { path } => {
            anyhow!(
                "Required source not found: {}\n\
                 HINT: Run from the project directory, or pass it explicitly. \
                 Nothing was written to '{}'.",
                path.display(),
                output.display()
            )
        }
        PackError::OutputRemoval { path, source } => {
            anyhow!(
                "Cannot remove existing archive '{}': {}\n\
                 HINT: Check that the path is a file and that it is not open in another program.",
                path.display(),
                source
            )
        }
        PackError::OutputCreate { path, source } => {
            anyhow!(
                "Cannot create archive '{}': {}\n\
                 HINT: Check that the parent directory exists and is writable.",
                path.display(),
                source
            )
        }
        PackError::InvalidCompressionLevel { level } => {
            anyhow!(
                "Invalid compression level {level}\n\
                 HINT: Use a level between 1 (fastest) and 9 (smallest)."
            )
        }
        PackError::ArchiveWrite { reason } => {
            anyhow!(
                "Failed writing archive '{}': {}\n\
                 HINT: The disk may be full. The partial archive should be deleted.",
                output.display(),
                reason
            )
        }
        PackError::Io(io_err) => {
            anyhow!(
                "I/O error while building '{}': {}",
                output.display(),
                io_err
            )
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error building archive '{}'", output.display())),
    }
}

/// Adds context to a core result about the archive being built
pub fn add_archive_context<T>(
    result: Result<T, PackError>,
    output: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_pack_error(e, output))
}
