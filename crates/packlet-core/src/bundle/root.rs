//! Source roots traversed by the archive builder.

use crate::bundle::rules::InclusionRules;
use crate::bundle::rules::normalize_prefix;
use std::path::Path;
use std::path::PathBuf;

/// How a root is turned into archive entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    /// A single file written under a fixed archive name.
    File,
    /// A directory walked recursively; entries are named `prefix/relative`.
    Directory,
}

/// One input of the archive builder.
///
/// # Examples
///
/// ```
/// use packlet_core::bundle::SourceRoot;
///
/// let manifest = SourceRoot::file("project/package.json", "package.json").required();
/// let deps = SourceRoot::directory("project/node_modules", "node_modules").group("dependencies");
///
/// assert!(manifest.is_required());
/// assert_eq!(deps.group_name(), "dependencies");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRoot {
    path: PathBuf,
    archive_prefix: String,
    kind: RootKind,
    required: bool,
    group: Option<String>,
    rules: Option<InclusionRules>,
}

impl SourceRoot {
    /// Creates a file root stored as `archive_name`.
    #[must_use]
    pub fn file(path: impl AsRef<Path>, archive_name: impl AsRef<str>) -> Self {
        Self::with_kind(path, archive_name.as_ref(), RootKind::File)
    }

    /// Creates a directory root whose entries are placed under `archive_prefix`.
    ///
    /// An empty prefix places the directory's contents at the archive root.
    #[must_use]
    pub fn directory(path: impl AsRef<Path>, archive_prefix: impl AsRef<str>) -> Self {
        Self::with_kind(path, archive_prefix.as_ref(), RootKind::Directory)
    }

    fn with_kind(path: impl AsRef<Path>, prefix: &str, kind: RootKind) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            archive_prefix: normalize_prefix(prefix),
            kind,
            required: false,
            group: None,
            rules: None,
        }
    }

    /// Marks the root as required: the run fails if it is missing.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the group label used in the run summary.
    #[must_use]
    pub fn group(mut self, name: impl Into<String>) -> Self {
        self.group = Some(name.into());
        self
    }

    /// Replaces the builder-wide rules for this root only.
    #[must_use]
    pub fn with_rules(mut self, rules: InclusionRules) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Filesystem path of the root.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Normalized archive prefix (or fixed name for file roots).
    #[must_use]
    pub fn archive_prefix(&self) -> &str {
        &self.archive_prefix
    }

    /// Root kind.
    #[must_use]
    pub const fn kind(&self) -> RootKind {
        self.kind
    }

    /// Whether a missing root aborts the run.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Group label, defaulting to the archive prefix or the file name.
    #[must_use]
    pub fn group_name(&self) -> &str {
        if let Some(group) = &self.group {
            return group;
        }
        if !self.archive_prefix.is_empty() {
            return &self.archive_prefix;
        }
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(".")
    }

    /// Rules that apply to this root, given the builder-wide default.
    #[must_use]
    pub fn effective_rules<'a>(&'a self, default: &'a InclusionRules) -> &'a InclusionRules {
        self.rules.as_ref().unwrap_or(default)
    }

    /// Whether the root currently exists with the expected kind.
    #[must_use]
    pub fn exists(&self) -> bool {
        match self.kind {
            RootKind::File => self.path.is_file(),
            RootKind::Directory => self.path.is_dir(),
        }
    }
}
