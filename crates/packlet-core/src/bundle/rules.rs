//! Inclusion rules and archive name computation.
//!
//! Rules are plain string checks over the normalized archive name: a name is
//! excluded when it contains an excluded fragment anywhere or ends with an
//! excluded suffix. No glob or regex semantics are applied, so a fragment such
//! as `test` also matches `latest.js`.

use crate::PackError;
use crate::Result;
use std::borrow::Cow;
use std::path::Component;
use std::path::Path;

/// Case handling for rule matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaseMatching {
    /// Compare names and patterns byte for byte.
    #[default]
    Sensitive,
    /// Lower-case both the name and every pattern before comparing.
    Insensitive,
}

/// Set of rules deciding which entries end up in the archive.
///
/// # Examples
///
/// ```
/// use packlet_core::bundle::InclusionRules;
/// use packlet_core::bundle::rules;
///
/// let rules = InclusionRules::new()
///     .exclude_fragment(".git")
///     .exclude_suffix(".map");
///
/// assert!(rules::is_included("src/index.js", &rules));
/// assert!(!rules::is_included("src/index.js.map", &rules));
/// assert!(!rules::is_included("node_modules/pkg/.github/ci.yml", &rules));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InclusionRules {
    /// Substrings that exclude any name containing them.
    pub excluded_path_fragments: Vec<String>,

    /// Suffixes that exclude any name ending with them.
    pub excluded_suffixes: Vec<String>,

    /// When non-empty, a file is kept only if its name ends with one of these.
    ///
    /// Directories are never tested against this list.
    pub included_suffixes: Vec<String>,

    /// Optional allow-list of top-level components.
    ///
    /// When set, an entry whose first path component is not listed is
    /// excluded regardless of the other rules.
    pub allowed_top_level: Option<Vec<String>>,

    /// Case handling. Default: [`CaseMatching::Sensitive`].
    pub case: CaseMatching,
}

impl InclusionRules {
    /// Creates an empty rule set that includes everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an excluded path fragment.
    #[must_use]
    pub fn exclude_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.excluded_path_fragments.push(fragment.into());
        self
    }

    /// Adds several excluded path fragments.
    #[must_use]
    pub fn exclude_fragments<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_path_fragments
            .extend(fragments.into_iter().map(Into::into));
        self
    }

    /// Adds an excluded suffix.
    #[must_use]
    pub fn exclude_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.excluded_suffixes.push(suffix.into());
        self
    }

    /// Adds several excluded suffixes.
    #[must_use]
    pub fn exclude_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_suffixes
            .extend(suffixes.into_iter().map(Into::into));
        self
    }

    /// Adds a suffix that files must carry to be kept.
    #[must_use]
    pub fn include_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.included_suffixes.push(suffix.into());
        self
    }

    /// Adds a top-level component to the allow-list, enabling it if unset.
    #[must_use]
    pub fn allow_top_level(mut self, name: impl Into<String>) -> Self {
        self.allowed_top_level
            .get_or_insert_with(Vec::new)
            .push(name.into());
        self
    }

    /// Sets case handling.
    #[must_use]
    pub fn with_case(mut self, case: CaseMatching) -> Self {
        self.case = case;
        self
    }

    fn fold<'a>(&self, s: &'a str) -> Cow<'a, str> {
        match self.case {
            CaseMatching::Sensitive => Cow::Borrowed(s),
            CaseMatching::Insensitive => Cow::Owned(s.to_lowercase()),
        }
    }
}

/// Checks whether an archive name passes the exclusion rules.
///
/// Used for directories (to decide pruning) and as the first half of the file
/// check. The empty name, which a directory root with no prefix produces for
/// itself, is always included.
#[must_use]
pub fn is_included(name: &str, rules: &InclusionRules) -> bool {
    if name.is_empty() {
        return true;
    }

    let name = rules.fold(name);

    if rules
        .excluded_path_fragments
        .iter()
        .any(|fragment| !fragment.is_empty() && name.contains(&*rules.fold(fragment)))
    {
        return false;
    }

    if rules
        .excluded_suffixes
        .iter()
        .any(|suffix| !suffix.is_empty() && name.ends_with(&*rules.fold(suffix)))
    {
        return false;
    }

    if let Some(allowed) = &rules.allowed_top_level {
        let top = top_level_component(&name);
        if !allowed.iter().any(|a| rules.fold(a) == top) {
            return false;
        }
    }

    true
}

/// Checks whether a file's archive name should be written.
///
/// Applies [`is_included`] and then the `included_suffixes` filter.
///
/// # Examples
///
/// ```
/// use packlet_core::bundle::InclusionRules;
/// use packlet_core::bundle::rules;
///
/// let rules = InclusionRules::new().include_suffix(".js");
/// assert!(rules::is_file_included("src/app.js", &rules));
/// assert!(!rules::is_file_included("src/README.md", &rules));
/// ```
#[must_use]
pub fn is_file_included(name: &str, rules: &InclusionRules) -> bool {
    if !is_included(name, rules) {
        return false;
    }

    if rules.included_suffixes.is_empty() {
        return true;
    }

    let name = rules.fold(name);
    rules
        .included_suffixes
        .iter()
        .any(|suffix| name.ends_with(&*rules.fold(suffix)))
}

/// Returns the first `/`-separated component of an archive name.
#[must_use]
pub fn top_level_component(name: &str) -> &str {
    name.split('/').next().unwrap_or(name)
}

/// Normalizes an archive prefix: backslashes become `/`, and leading or
/// trailing separators are dropped.
///
/// # Examples
///
/// ```
/// use packlet_core::bundle::rules::normalize_prefix;
///
/// assert_eq!(normalize_prefix("node_modules/"), "node_modules");
/// assert_eq!(normalize_prefix("lib\\vendor"), "lib/vendor");
/// assert_eq!(normalize_prefix(""), "");
/// ```
#[must_use]
pub fn normalize_prefix(prefix: &str) -> String {
    prefix
        .replace('\\', "/")
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Computes the archive name for a path relative to its root.
///
/// The normalized `prefix` and every normal component of `relative` are joined
/// with `/`, whatever the platform separator. Current-directory components are
/// dropped.
///
/// # Errors
///
/// Returns [`PackError::InvalidEntryName`] if a component is not valid UTF-8
/// or is a parent (`..`) or root component.
///
/// # Examples
///
/// ```
/// use packlet_core::bundle::rules::archive_name;
/// use std::path::Path;
///
/// let name = archive_name("node_modules", Path::new("pkg/index.js")).unwrap();
/// assert_eq!(name, "node_modules/pkg/index.js");
///
/// let name = archive_name("", Path::new("index.js")).unwrap();
/// assert_eq!(name, "index.js");
/// ```
pub fn archive_name(prefix: &str, relative: &Path) -> Result<String> {
    let mut name = normalize_prefix(prefix);

    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(|| PackError::InvalidEntryName {
                    path: relative.to_path_buf(),
                })?;
                // A literal backslash in a Unix file name still becomes a separator.
                let part = part.replace('\\', "/");
                if !name.is_empty() {
                    name.push('/');
                }
                name.push_str(&part);
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(PackError::InvalidEntryName {
                    path: relative.to_path_buf(),
                });
            }
        }
    }

    Ok(name)
}
