//! Progress reporting for archive building.
//!
//! The builder never prints. Everything an operator might want to see goes
//! through [`ProgressCallback`]; the CLI decides how to render it.

use crate::bundle::report::RunSummary;
use std::path::Path;

/// Callback trait for progress reporting during an archive build.
///
/// Every method has an empty default so implementors only override what they
/// render.
///
/// # Examples
///
/// ```
/// use packlet_core::bundle::ProgressCallback;
///
/// struct Milestones(Vec<usize>);
///
/// impl ProgressCallback for Milestones {
///     fn on_milestone(&mut self, count: usize) {
///         self.0.push(count);
///     }
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called when the builder starts on a root.
    ///
    /// # Arguments
    ///
    /// * `group` - Group label of the root
    /// * `path` - Filesystem path of the root
    fn on_root_start(&mut self, _group: &str, _path: &Path) {}

    /// Called when an optional root does not exist and is skipped.
    fn on_root_missing(&mut self, _group: &str, _path: &Path) {}

    /// Called after a file has been written into the archive.
    ///
    /// # Arguments
    ///
    /// * `archive_name` - Name of the new entry
    /// * `count` - Files added so far across all roots
    fn on_file_added(&mut self, _archive_name: &str, _count: usize) {}

    /// Called when the added-file count reaches a multiple of the configured
    /// progress interval.
    fn on_milestone(&mut self, _count: usize) {}

    /// Called when an entry could not be read and was left out.
    fn on_entry_skipped(&mut self, _path: &Path, _reason: &str) {}

    /// Called after every file of a root has been processed.
    ///
    /// # Arguments
    ///
    /// * `group` - Group label of the root
    /// * `files` - Files this root contributed
    fn on_group_complete(&mut self, _group: &str, _files: usize) {}

    /// Called once after the archive has been finalized.
    fn on_complete(&mut self, _summary: &RunSummary) {}
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {}
