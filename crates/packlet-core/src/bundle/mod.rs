//! Filtered archive building.
//!
//! Source roots (single files or directory trees) are walked in order, every
//! entry's archive name is tested against a set of [`InclusionRules`], and
//! the surviving files are streamed into one deflate-compressed ZIP.

pub mod rules;
pub mod walker;

pub mod builder;
pub mod config;
pub mod progress;
pub mod report;
pub mod root;
pub mod zip;

// Re-exports for public API
pub use builder::ArchiveBuilder;
pub use config::BuildConfig;
pub use progress::NoopProgress;
pub use progress::ProgressCallback;
pub use report::GroupCount;
pub use report::RunSummary;
pub use root::RootKind;
pub use root::SourceRoot;
pub use rules::CaseMatching;
pub use rules::InclusionRules;
pub use walker::FileEntry;
pub use walker::FilteredWalker;
pub use self::zip::build_archive;
pub use self::zip::write_archive;
