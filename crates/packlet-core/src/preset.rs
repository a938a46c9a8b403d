//! Ready-made layouts for common bundle shapes.
//!
//! [`LambdaLayout`] describes a Node.js AWS Lambda project: handler scripts at
//! the project root, JavaScript sources under `src/`, the `package.json`
//! manifest and the installed `node_modules` tree.

use std::path::Path;
use std::path::PathBuf;

use crate::bundle::BuildConfig;
use crate::bundle::CaseMatching;
use crate::bundle::InclusionRules;
use crate::bundle::ProgressCallback;
use crate::bundle::RunSummary;
use crate::bundle::SourceRoot;
use crate::bundle::build_archive;
use crate::error::Result;

/// Default archive file name.
pub const DEFAULT_OUTPUT: &str = "lambda-package.zip";

/// Default milestone interval for dependency-heavy bundles.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 500;

/// Handler scripts picked up from the project root.
pub const DEFAULT_HANDLERS: &[&str] = &["lambda-handler.js", "lambda-worker.js"];

/// Source directories picked up from the project root.
pub const DEFAULT_SOURCE_DIRS: &[&str] = &["src"];

/// Path fragments excluded by default.
///
/// Test folders are matched as whole components (`/test/`, `/tests/`), not as
/// bare `test`/`tests` substrings, so files such as `node_modules/pkg/test.js`
/// or packages like `test-utils` are kept. Pass `"test"` through
/// [`LambdaLayout::with_extra_exclusions`] for the broader match.
pub const DEFAULT_EXCLUDED_FRAGMENTS: &[&str] = &[
    "node_modules/.cache",
    "lambda-temp",
    ".git",
    "__pycache__",
    "/test/",
    "/tests/",
];

/// File suffixes excluded by default.
///
/// Covers previous bundle outputs and files holding secrets that are
/// provisioned separately.
pub const DEFAULT_EXCLUDED_SUFFIXES: &[&str] = &[
    "deploy.zip",
    "deploy-base.zip",
    "lambda-package.zip",
    ".env",
    "credentials.json",
    "gmail-token.json",
];

const MANIFEST: &str = "package.json";
const DEPENDENCIES: &str = "node_modules";

/// Root and rule layout of a Node.js Lambda project.
///
/// # Examples
///
/// ```no_run
/// use packlet_core::bundle::NoopProgress;
/// use packlet_core::preset::LambdaLayout;
///
/// let summary = LambdaLayout::new("my-function")
///     .with_extra_exclusions(["docs/"])
///     .build(&mut NoopProgress)?;
///
/// println!("{} files", summary.files_added);
/// # Ok::<(), packlet_core::PackError>(())
/// ```
#[derive(Debug, Clone)]
pub struct LambdaLayout {
    project_dir: PathBuf,
    output: PathBuf,
    handlers: Vec<String>,
    source_dirs: Vec<String>,
    manifest: Option<String>,
    dependencies: Option<String>,
    excluded_fragments: Vec<String>,
    excluded_suffixes: Vec<String>,
    case: CaseMatching,
    config: BuildConfig,
}

impl LambdaLayout {
    /// Creates the default layout rooted at `project_dir`.
    ///
    /// The archive is written to `lambda-package.zip` inside the project.
    #[must_use]
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        let project_dir = project_dir.as_ref().to_path_buf();
        Self {
            output: project_dir.join(DEFAULT_OUTPUT),
            project_dir,
            handlers: to_strings(DEFAULT_HANDLERS),
            source_dirs: to_strings(DEFAULT_SOURCE_DIRS),
            manifest: Some(MANIFEST.to_string()),
            dependencies: Some(DEPENDENCIES.to_string()),
            excluded_fragments: to_strings(DEFAULT_EXCLUDED_FRAGMENTS),
            excluded_suffixes: to_strings(DEFAULT_EXCLUDED_SUFFIXES),
            case: CaseMatching::Sensitive,
            config: BuildConfig::default().with_progress_interval(Some(DEFAULT_PROGRESS_INTERVAL)),
        }
    }

    /// Sets the output archive path.
    #[must_use]
    pub fn with_output(mut self, output: impl AsRef<Path>) -> Self {
        self.output = output.as_ref().to_path_buf();
        self
    }

    /// Replaces the handler script list.
    #[must_use]
    pub fn with_handlers<I, S>(mut self, handlers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.handlers = handlers.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the source directory list.
    #[must_use]
    pub fn with_source_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the manifest file; `None` leaves it out.
    #[must_use]
    pub fn with_manifest(mut self, manifest: Option<String>) -> Self {
        self.manifest = manifest;
        self
    }

    /// Sets the dependency directory; `None` leaves it out.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: Option<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Adds path fragments to the default exclusions.
    #[must_use]
    pub fn with_extra_exclusions<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_fragments
            .extend(fragments.into_iter().map(Into::into));
        self
    }

    /// Adds suffixes to the default exclusions.
    #[must_use]
    pub fn with_extra_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_suffixes
            .extend(suffixes.into_iter().map(Into::into));
        self
    }

    /// Sets case handling for every rule set.
    #[must_use]
    pub fn with_case(mut self, case: CaseMatching) -> Self {
        self.case = case;
        self
    }

    /// Replaces the build configuration.
    #[must_use]
    pub fn with_config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    /// Project directory.
    #[must_use]
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Output archive path.
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Build configuration.
    #[must_use]
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Source roots in archive order: handlers, sources, manifest,
    /// dependencies.
    #[must_use]
    pub fn roots(&self) -> Vec<SourceRoot> {
        let mut roots = Vec::new();

        for handler in &self.handlers {
            roots.push(SourceRoot::file(self.project_dir.join(handler), handler).group("handler"));
        }

        for dir in &self.source_dirs {
            roots.push(
                SourceRoot::directory(self.project_dir.join(dir), dir)
                    .group("source")
                    .with_rules(self.source_rules()),
            );
        }

        if let Some(manifest) = &self.manifest {
            roots.push(
                SourceRoot::file(self.project_dir.join(manifest), manifest)
                    .required()
                    .group("manifest"),
            );
        }

        if let Some(dependencies) = &self.dependencies {
            roots.push(
                SourceRoot::directory(self.project_dir.join(dependencies), dependencies)
                    .group("dependencies"),
            );
        }

        roots
    }

    /// Exclusion rules applied to the dependency tree.
    #[must_use]
    pub fn rules(&self) -> InclusionRules {
        InclusionRules::new()
            .exclude_fragments(self.excluded_fragments.iter().cloned())
            .exclude_suffixes(self.excluded_suffixes.iter().cloned())
            .with_case(self.case)
    }

    /// Source directories only keep JavaScript files.
    fn source_rules(&self) -> InclusionRules {
        InclusionRules::new()
            .include_suffix(".js")
            .with_case(self.case)
    }

    /// Builds the archive.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest is missing or the archive cannot be
    /// written. See [`build_archive`].
    pub fn build(&self, progress: &mut dyn ProgressCallback) -> Result<RunSummary> {
        build_archive(&self.output, &self.roots(), &self.rules(), &self.config, progress)
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}
