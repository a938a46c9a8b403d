//! Directory tree walking with pruning.
//!
//! Directories are tested against the inclusion rules as they are reached; an
//! excluded directory is never descended into. Files are tested by name only,
//! so an excluded file is never opened.

use crate::PackError;
use crate::Result;
use crate::bundle::rules;
use crate::bundle::rules::InclusionRules;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use walkdir::DirEntry;
use walkdir::WalkDir;

/// A file selected for the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Full filesystem path.
    pub path: PathBuf,

    /// Normalized archive name (`/`-separated, prefix applied).
    pub archive_name: String,
}

/// Walks one directory root, yielding the files that pass the rules.
///
/// Traversal is depth-first with each directory yielded before its children,
/// in filesystem enumeration order. Symbolic links are not followed into
/// directories; a link to a file is archived as the file it points to.
///
/// # Examples
///
/// ```no_run
/// use packlet_core::bundle::InclusionRules;
/// use packlet_core::bundle::walker::FilteredWalker;
/// use std::path::Path;
///
/// let rules = InclusionRules::new().exclude_fragment("/test/");
/// let walker = FilteredWalker::new(Path::new("node_modules"), "node_modules", &rules);
///
/// for entry in walker.walk() {
///     match entry {
///         Ok(file) => println!("would add: {}", file.archive_name),
///         Err(e) => eprintln!("skipping: {e}"),
///     }
/// }
/// ```
pub struct FilteredWalker<'a> {
    root: &'a Path,
    prefix: &'a str,
    rules: &'a InclusionRules,
}

impl<'a> FilteredWalker<'a> {
    /// Creates a walker for `root` whose entries are named under `prefix`.
    #[must_use]
    pub fn new(root: &'a Path, prefix: &'a str, rules: &'a InclusionRules) -> Self {
        Self {
            root,
            prefix,
            rules,
        }
    }

    /// Returns an iterator over the files to archive.
    ///
    /// `Err` items are per-entry failures (unreadable directory, dangling
    /// symlink, undecodable name); callers skip them and keep iterating.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry>> + '_ {
        WalkDir::new(self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(move |entry| self.should_descend(entry))
            .filter_map(move |entry| match entry {
                Ok(entry) => self.file_entry(&entry).transpose(),
                Err(err) => Some(Err(walk_error(err))),
            })
    }

    /// Archive name for a path under the root.
    fn name_for(&self, path: &Path) -> Result<String> {
        let relative = path
            .strip_prefix(self.root)
            .map_err(|_| PackError::InvalidEntryName {
                path: path.to_path_buf(),
            })?;
        rules::archive_name(self.prefix, relative)
    }

    /// Pruning decision; non-directories always pass.
    fn should_descend(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return true;
        }
        // An undecodable directory name is kept so that its files surface as
        // individual warnings instead of vanishing.
        self.name_for(entry.path())
            .map_or(true, |name| rules::is_included(&name, self.rules))
    }

    fn file_entry(&self, entry: &DirEntry) -> Result<Option<FileEntry>> {
        let file_type = entry.file_type();
        if file_type.is_dir() {
            return Ok(None);
        }

        let path = entry.path();
        let archive_name = self.name_for(path)?;
        if !rules::is_file_included(&archive_name, self.rules) {
            return Ok(None);
        }

        if file_type.is_symlink() {
            let target = std::fs::metadata(path).map_err(|source| PackError::EntryUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
            if target.is_dir() {
                return Ok(None);
            }
            if !target.is_file() {
                return Err(not_regular(path));
            }
        } else if !file_type.is_file() {
            return Err(not_regular(path));
        }

        Ok(Some(FileEntry {
            path: path.to_path_buf(),
            archive_name,
        }))
    }
}

fn not_regular(path: &Path) -> PackError {
    PackError::EntryUnreadable {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
    }
}

fn walk_error(err: walkdir::Error) -> PackError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    PackError::EntryUnreadable {
        path,
        source: io::Error::from(err),
    }
}
