//! Configuration for archive building operations.

use crate::PackError;
use crate::Result;

/// Configuration for archive building.
///
/// Controls compression, permission handling and progress milestones.
/// Inclusion rules live in [`InclusionRules`](crate::bundle::InclusionRules)
/// because a root may override them.
///
/// # Examples
///
/// ```
/// use packlet_core::bundle::BuildConfig;
///
/// let config = BuildConfig::default()
///     .with_compression_level(9)
///     .with_progress_interval(Some(500));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Deflate level (1-9).
    ///
    /// `None` uses the writer's default.
    ///
    /// Default: `Some(6)` (balanced).
    pub compression_level: Option<u8>,

    /// Emit a milestone notification after every N added files.
    ///
    /// Default: `None` (no milestones).
    pub progress_interval: Option<usize>,

    /// Store Unix permission bits of each file in the archive.
    ///
    /// Default: `true`.
    pub preserve_permissions: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            compression_level: Some(6),
            progress_interval: None,
            preserve_permissions: true,
        }
    }
}

impl BuildConfig {
    /// Creates a new `BuildConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level.
    ///
    /// # Panics
    ///
    /// Panics if the compression level is not in the range 1-9.
    /// Use `validate()` for non-panicking validation.
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        assert!((1..=9).contains(&level), "compression level must be 1-9");
        self.compression_level = Some(level);
        self
    }

    /// Sets the milestone interval.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: Option<usize>) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Sets whether to preserve permissions.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Compression level is set but not in range 1-9
    /// - Progress interval is set to zero
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && !(1..=9).contains(&level)
        {
            return Err(PackError::InvalidCompressionLevel { level });
        }
        if self.progress_interval == Some(0) {
            return Err(PackError::InvalidConfiguration {
                reason: "progress interval must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Returns `true` when `count` hits a milestone.
    #[must_use]
    pub fn is_milestone(&self, count: usize) -> bool {
        self.progress_interval
            .is_some_and(|interval| interval > 0 && count > 0 && count % interval == 0)
    }
}
