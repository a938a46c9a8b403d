//! Filtered ZIP bundle builder for deployable artifacts.
//!
//! `packlet-core` walks a set of source roots (single files or directory
//! trees), applies path-fragment and suffix rules to every entry, and streams
//! the surviving files into one deflate-compressed ZIP archive. Excluded
//! directories are pruned during the walk, so large ignored trees cost
//! nothing.
//!
//! # Examples
//!
//! ```no_run
//! use packlet_core::bundle::ArchiveBuilder;
//! use packlet_core::bundle::SourceRoot;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let summary = ArchiveBuilder::new()
//!     .output("lambda-package.zip")
//!     .root(SourceRoot::file("lambda-handler.js", "lambda-handler.js"))
//!     .root(SourceRoot::file("package.json", "package.json").required())
//!     .root(SourceRoot::directory("node_modules", "node_modules"))
//!     .exclude_fragment("node_modules/.cache")
//!     .exclude_suffix(".env")
//!     .build()?;
//! println!("Added {} files ({:.2} MB)", summary.files_added, summary.size_mb());
//! # Ok(())
//! # }
//! ```
//!
//! For the common Node.js Lambda layout see [`preset::LambdaLayout`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod bundle;
pub mod copy;
pub mod error;
pub mod preset;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export main API types
pub use bundle::ArchiveBuilder;
pub use bundle::BuildConfig;
pub use bundle::InclusionRules;
pub use bundle::RunSummary;
pub use bundle::SourceRoot;
pub use bundle::build_archive;
pub use error::PackError;
pub use error::Result;
pub use preset::LambdaLayout;
