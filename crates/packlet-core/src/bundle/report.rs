//! Archive build reporting.

use std::time::Duration;

/// Number of files one root group contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    /// Group label (for example `handler`, `source`, `dependencies`).
    pub name: String,
    /// Files added from this group.
    pub files: usize,
}

/// Summary of one archive build.
///
/// # Examples
///
/// ```
/// use packlet_core::bundle::RunSummary;
///
/// let mut summary = RunSummary::default();
/// summary.record_file("source");
/// summary.record_file("source");
/// summary.record_file("dependencies");
///
/// assert_eq!(summary.files_added, 3);
/// assert_eq!(summary.group_files("source"), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of files written into the archive.
    pub files_added: usize,

    /// Per-group breakdown, in the order groups were first seen.
    pub groups: Vec<GroupCount>,

    /// Number of entries skipped because they could not be read.
    pub files_skipped: usize,

    /// Uncompressed bytes streamed into the archive.
    pub bytes_read: u64,

    /// Size of the finished archive on disk.
    pub archive_size: u64,

    /// Duration of the build.
    pub duration: Duration,

    /// Warnings generated for skipped entries.
    pub warnings: Vec<String>,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one added file against `group`.
    pub fn record_file(&mut self, group: &str) {
        self.files_added += 1;
        self.group_entry(group).files += 1;
    }

    /// Registers `group` with zero files if it has not been seen yet.
    pub fn touch_group(&mut self, group: &str) {
        let _ = self.group_entry(group);
    }

    fn group_entry(&mut self, group: &str) -> &mut GroupCount {
        let idx = match self.groups.iter().position(|g| g.name == group) {
            Some(idx) => idx,
            None => {
                self.groups.push(GroupCount {
                    name: group.to_string(),
                    files: 0,
                });
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx]
    }

    /// Files added from `group`; zero for an unknown group.
    #[must_use]
    pub fn group_files(&self, group: &str) -> usize {
        self.groups
            .iter()
            .find(|g| g.name == group)
            .map_or(0, |g| g.files)
    }

    /// Records a skipped entry and its reason.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.files_skipped += 1;
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Archive size in KiB.
    #[must_use]
    pub fn size_kb(&self) -> f64 {
        self.archive_size as f64 / 1024.0
    }

    /// Archive size in MiB.
    #[must_use]
    pub fn size_mb(&self) -> f64 {
        self.archive_size as f64 / (1024.0 * 1024.0)
    }

    /// Returns the compression percentage (space saved).
    ///
    /// Returns 0.0 if nothing was read or the archive is larger than its
    /// input.
    ///
    /// # Examples
    ///
    /// ```
    /// use packlet_core::bundle::RunSummary;
    ///
    /// let mut summary = RunSummary::new();
    /// summary.bytes_read = 1000;
    /// summary.archive_size = 250;
    /// assert_eq!(summary.compression_percentage(), 75.0);
    /// ```
    #[must_use]
    pub fn compression_percentage(&self) -> f64 {
        if self.bytes_read == 0 {
            return 0.0;
        }
        let saved = self.bytes_read.saturating_sub(self.archive_size);
        (saved as f64 / self.bytes_read as f64) * 100.0
    }
}
