//! Builder for assembling archives with a fluent API.

use std::path::Path;
use std::path::PathBuf;

use crate::bundle::config::BuildConfig;
use crate::bundle::progress::NoopProgress;
use crate::bundle::progress::ProgressCallback;
use crate::bundle::report::RunSummary;
use crate::bundle::root::SourceRoot;
use crate::bundle::rules::CaseMatching;
use crate::bundle::rules::InclusionRules;
use crate::error::PackError;
use crate::error::Result;

/// Builder for creating archives with fluent API.
///
/// # Examples
///
/// ```no_run
/// use packlet_core::bundle::ArchiveBuilder;
/// use packlet_core::bundle::SourceRoot;
///
/// let summary = ArchiveBuilder::new()
///     .output("lambda-package.zip")
///     .root(SourceRoot::file("package.json", "package.json").required())
///     .root(SourceRoot::directory("node_modules", "node_modules"))
///     .exclude_fragment("/test/")
///     .exclude_suffix(".env")
///     .compression_level(9)
///     .build()?;
///
/// println!("Added {} files", summary.files_added);
/// # Ok::<(), packlet_core::PackError>(())
/// ```
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    output_path: Option<PathBuf>,
    roots: Vec<SourceRoot>,
    rules: InclusionRules,
    config: BuildConfig,
}

impl ArchiveBuilder {
    /// Creates a new `ArchiveBuilder` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output archive path.
    #[must_use]
    pub fn output<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Adds a source root.
    ///
    /// Roots are processed in the order they are added.
    #[must_use]
    pub fn root(mut self, root: SourceRoot) -> Self {
        self.roots.push(root);
        self
    }

    /// Adds multiple source roots.
    #[must_use]
    pub fn roots<I: IntoIterator<Item = SourceRoot>>(mut self, roots: I) -> Self {
        self.roots.extend(roots);
        self
    }

    /// Replaces the default inclusion rules.
    #[must_use]
    pub fn rules(mut self, rules: InclusionRules) -> Self {
        self.rules = rules;
        self
    }

    /// Adds an excluded path fragment to the default rules.
    ///
    /// # Examples
    ///
    /// ```
    /// use packlet_core::bundle::ArchiveBuilder;
    ///
    /// let builder = ArchiveBuilder::new().exclude_fragment(".git").exclude_fragment("/tests/");
    /// ```
    #[must_use]
    pub fn exclude_fragment<S: Into<String>>(mut self, fragment: S) -> Self {
        self.rules.excluded_path_fragments.push(fragment.into());
        self
    }

    /// Adds an excluded suffix to the default rules.
    #[must_use]
    pub fn exclude_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.rules.excluded_suffixes.push(suffix.into());
        self
    }

    /// Adds a required file suffix to the default rules.
    #[must_use]
    pub fn include_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.rules.included_suffixes.push(suffix.into());
        self
    }

    /// Sets case handling for the default rules.
    #[must_use]
    pub fn case(mut self, case: CaseMatching) -> Self {
        self.rules.case = case;
        self
    }

    /// Sets the full configuration.
    #[must_use]
    pub fn config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the compression level (1-9).
    ///
    /// Out-of-range values are reported by [`build`](Self::build).
    #[must_use]
    pub fn compression_level(mut self, level: u8) -> Self {
        self.config.compression_level = Some(level);
        self
    }

    /// Emits a milestone every `interval` added files.
    #[must_use]
    pub fn progress_interval(mut self, interval: usize) -> Self {
        self.config.progress_interval = Some(interval);
        self
    }

    /// Sets whether Unix permission bits are stored.
    #[must_use]
    pub fn preserve_permissions(mut self, preserve: bool) -> Self {
        self.config.preserve_permissions = preserve;
        self
    }

    /// Builds the archive without progress reporting.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Output path not set
    /// - No roots provided
    /// - Invalid configuration (e.g., invalid compression level)
    /// - A required root is missing
    /// - I/O errors while writing the archive
    pub fn build(self) -> Result<RunSummary> {
        self.build_with_progress(&mut NoopProgress)
    }

    /// Builds the archive, reporting progress to `progress`.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build).
    pub fn build_with_progress(self, progress: &mut dyn ProgressCallback) -> Result<RunSummary> {
        let output_path = self
            .output_path
            .ok_or_else(|| PackError::InvalidConfiguration {
                reason: "output path not set".to_string(),
            })?;

        if self.roots.is_empty() {
            return Err(PackError::InvalidConfiguration {
                reason: "no source roots provided".to_string(),
            });
        }

        crate::bundle::zip::build_archive(&output_path, &self.roots, &self.rules, &self.config, progress)
    }
}
