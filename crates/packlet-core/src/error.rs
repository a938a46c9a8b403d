//! Error types for archive building operations.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `PackError`.
pub type Result<T> = std::result::Result<T, PackError>;

/// Errors that can occur while building an archive.
///
/// Variants fall into two groups. Setup failures (stale output removal,
/// output creation, missing required roots, invalid configuration) abort the
/// run. Entry failures (an unreadable file, a name that cannot be encoded, a
/// name already taken) are absorbed by the builder and turned into warnings.
#[derive(Error, Debug)]
pub enum PackError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A root marked as required does not exist.
    #[error("required source not found: {path}")]
    RequiredRootMissing {
        /// The missing root path.
        path: PathBuf,
    },

    /// A pre-existing file at the output path could not be removed.
    #[error("cannot remove existing archive {path}: {source}")]
    OutputRemoval {
        /// The output path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be created.
    #[error("cannot create archive {path}: {source}")]
    OutputCreate {
        /// The output path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The archive writer rejected an operation.
    #[error("archive write failed: {reason}")]
    ArchiveWrite {
        /// Description reported by the writer.
        reason: String,
    },

    /// A single source entry could not be read into the archive.
    #[error("cannot read {path}: {source}")]
    EntryUnreadable {
        /// The source path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A source path cannot be represented as an archive name.
    #[error("cannot encode archive name for {path}")]
    InvalidEntryName {
        /// The offending path.
        path: PathBuf,
    },

    /// Another source already wrote an entry under the same archive name.
    #[error("duplicate archive entry {archive_name} from {path}")]
    DuplicateEntry {
        /// The source path that lost.
        path: PathBuf,
        /// The archive name already taken.
        archive_name: String,
    },

    /// Invalid compression level.
    #[error("invalid compression level {level}, must be 1-9")]
    InvalidCompressionLevel {
        /// The invalid level.
        level: u8,
    },

    /// Builder configuration is incomplete or inconsistent.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Reason for the rejection.
        reason: String,
    },
}

impl PackError {
    /// Returns `true` if the builder can skip the affected entry and continue.
    ///
    /// # Examples
    ///
    /// ```
    /// use packlet_core::PackError;
    /// use std::path::PathBuf;
    ///
    /// let err = PackError::InvalidEntryName {
    ///     path: PathBuf::from("bad"),
    /// };
    /// assert!(err.is_recoverable());
    ///
    /// let err = PackError::RequiredRootMissing {
    ///     path: PathBuf::from("package.json"),
    /// };
    /// assert!(!err.is_recoverable());
    /// ```
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::EntryUnreadable { .. }
                | Self::InvalidEntryName { .. }
                | Self::DuplicateEntry { .. }
        )
    }

    /// Returns `true` if this error happened before any entry was written.
    #[must_use]
    pub const fn is_setup_failure(&self) -> bool {
        matches!(
            self,
            Self::RequiredRootMissing { .. }
                | Self::OutputRemoval { .. }
                | Self::OutputCreate { .. }
                | Self::InvalidCompressionLevel { .. }
                | Self::InvalidConfiguration { .. }
        )
    }

    /// Returns the filesystem path this error refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::RequiredRootMissing { path }
            | Self::OutputRemoval { path, .. }
            | Self::OutputCreate { path, .. }
            | Self::EntryUnreadable { path, .. }
            | Self::InvalidEntryName { path }
            | Self::DuplicateEntry { path, .. } => Some(path),
            _ => None,
        }
    }

    pub(crate) fn archive_write(err: impl std::fmt::Display) -> Self {
        Self::ArchiveWrite {
            reason: err.to_string(),
        }
    }
}
