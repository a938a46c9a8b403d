//! ZIP archive building.
//!
//! Entries are deflate-compressed and always written with Zip64 extensions, so
//! archives holding more than 65 535 entries or members larger than 4 GiB need
//! no special handling.

use crate::PackError;
use crate::Result;
use crate::bundle::config::BuildConfig;
use crate::bundle::progress::ProgressCallback;
use crate::bundle::report::RunSummary;
use crate::bundle::root::RootKind;
use crate::bundle::root::SourceRoot;
use crate::bundle::rules::InclusionRules;
use crate::bundle::walker::FileEntry;
use crate::bundle::walker::FilteredWalker;
use crate::copy::CopyBuffer;
use crate::copy::CopyFailure;
use crate::copy::copy_with_buffer;
use std::collections::HashSet;
use std::fs;
use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Builds a ZIP archive at `output` from `roots`.
///
/// Any file already at `output` is removed first. Required roots are checked
/// before the output path is touched, so a missing manifest leaves a previous
/// archive in place.
///
/// Per-entry failures (unreadable file, dangling symlink, undecodable name)
/// are recorded as warnings in the returned summary and do not abort the run.
///
/// # Examples
///
/// ```no_run
/// use packlet_core::bundle::BuildConfig;
/// use packlet_core::bundle::InclusionRules;
/// use packlet_core::bundle::NoopProgress;
/// use packlet_core::bundle::SourceRoot;
/// use packlet_core::bundle::zip::build_archive;
///
/// let roots = [
///     SourceRoot::file("package.json", "package.json").required(),
///     SourceRoot::directory("node_modules", "node_modules"),
/// ];
/// let rules = InclusionRules::new().exclude_fragment("/test/");
///
/// let summary = build_archive(
///     "lambda-package.zip",
///     &roots,
///     &rules,
///     &BuildConfig::default(),
///     &mut NoopProgress,
/// )?;
/// println!("{} files, {:.2} MB", summary.files_added, summary.size_mb());
/// # Ok::<(), packlet_core::PackError>(())
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid
/// - A required root does not exist
/// - A stale output file cannot be removed
/// - The output file cannot be created
/// - The archive writer fails (disk full, finalization error)
pub fn build_archive<P: AsRef<Path>>(
    output: P,
    roots: &[SourceRoot],
    rules: &InclusionRules,
    config: &BuildConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<RunSummary> {
    let output = output.as_ref();
    let start = Instant::now();

    preflight(roots, config)?;
    remove_stale_output(output)?;

    let file = File::create(output).map_err(|source| PackError::OutputCreate {
        path: output.to_path_buf(),
        source,
    })?;

    let (writer, mut summary) = write_entries(BufWriter::new(file), roots, rules, config, progress)?;
    let file = writer.into_inner().map_err(|e| PackError::Io(e.into_error()))?;
    file.sync_all()?;
    drop(file);

    summary.archive_size = fs::metadata(output)?.len();
    summary.duration = start.elapsed();

    progress.on_complete(&summary);

    Ok(summary)
}

/// Builds a ZIP archive into an arbitrary writer.
///
/// Same traversal and error policy as [`build_archive`], without the output
/// file handling. `archive_size` in the summary is the writer's final stream
/// position.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, a required root is
/// missing, or the writer fails.
pub fn write_archive<W: Write + Seek>(
    writer: W,
    roots: &[SourceRoot],
    rules: &InclusionRules,
    config: &BuildConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<(W, RunSummary)> {
    let start = Instant::now();

    preflight(roots, config)?;

    let (mut writer, mut summary) = write_entries(writer, roots, rules, config, progress)?;
    summary.archive_size = writer.stream_position()?;
    summary.duration = start.elapsed();

    progress.on_complete(&summary);

    Ok((writer, summary))
}

/// Checks everything that must hold before the output is touched.
fn preflight(roots: &[SourceRoot], config: &BuildConfig) -> Result<()> {
    config.validate()?;

    for root in roots {
        if root.kind() == RootKind::File && root.archive_prefix().is_empty() {
            return Err(PackError::InvalidConfiguration {
                reason: format!("file root {} has an empty archive name", root.path().display()),
            });
        }
    }

    if let Some(missing) = roots.iter().find(|r| r.is_required() && !r.exists()) {
        return Err(PackError::RequiredRootMissing {
            path: missing.path().to_path_buf(),
        });
    }

    Ok(())
}

fn remove_stale_output(output: &Path) -> Result<()> {
    match fs::remove_file(output) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(PackError::OutputRemoval {
            path: output.to_path_buf(),
            source,
        }),
    }
}

fn write_entries<W: Write + Seek>(
    writer: W,
    roots: &[SourceRoot],
    rules: &InclusionRules,
    config: &BuildConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<(W, RunSummary)> {
    let mut sink = ArchiveSink::new(writer, config, progress);

    for root in roots {
        sink.add_root(root, rules)?;
    }

    sink.finish()
}

/// Archive writer plus the running state of one build.
struct ArchiveSink<'a, W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
    buffer: CopyBuffer,
    config: &'a BuildConfig,
    summary: RunSummary,
    written: HashSet<String>,
    progress: &'a mut dyn ProgressCallback,
}

impl<'a, W: Write + Seek> ArchiveSink<'a, W> {
    fn new(writer: W, config: &'a BuildConfig, progress: &'a mut dyn ProgressCallback) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(config.compression_level.map(i64::from))
            .large_file(true);

        Self {
            zip: ZipWriter::new(writer),
            options,
            buffer: CopyBuffer::new(),
            config,
            summary: RunSummary::new(),
            written: HashSet::new(),
            progress,
        }
    }

    fn add_root(&mut self, root: &SourceRoot, default_rules: &InclusionRules) -> Result<()> {
        let group = root.group_name();
        self.summary.touch_group(group);

        if !root.exists() {
            self.progress.on_root_missing(group, root.path());
            return Ok(());
        }

        self.progress.on_root_start(group, root.path());
        let before = self.summary.group_files(group);

        match root.kind() {
            RootKind::File => {
                let entry = FileEntry {
                    path: root.path().to_path_buf(),
                    archive_name: root.archive_prefix().to_string(),
                };
                self.add_file(group, &entry)?;
            }
            RootKind::Directory => {
                let rules = root.effective_rules(default_rules);
                let walker = FilteredWalker::new(root.path(), root.archive_prefix(), rules);
                for entry in walker.walk() {
                    match entry {
                        Ok(entry) => self.add_file(group, &entry)?,
                        Err(err) => self.skip(&err),
                    }
                }
            }
        }

        let added = self.summary.group_files(group) - before;
        self.progress.on_group_complete(group, added);
        Ok(())
    }

    /// Streams one file into the archive.
    ///
    /// Source-side failures and names already written skip the entry;
    /// writer-side failures are fatal.
    fn add_file(&mut self, group: &str, entry: &FileEntry) -> Result<()> {
        if self.written.contains(&entry.archive_name) {
            self.skip(&PackError::DuplicateEntry {
                path: entry.path.clone(),
                archive_name: entry.archive_name.clone(),
            });
            return Ok(());
        }

        let unreadable = |source| PackError::EntryUnreadable {
            path: entry.path.clone(),
            source,
        };

        let mut file = match File::open(&entry.path) {
            Ok(file) => file,
            Err(source) => {
                self.skip(&unreadable(source));
                return Ok(());
            }
        };

        let metadata = match file.metadata() {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => {
                let source = io::Error::new(io::ErrorKind::InvalidInput, "not a regular file");
                self.skip(&unreadable(source));
                return Ok(());
            }
            Err(source) => {
                self.skip(&unreadable(source));
                return Ok(());
            }
        };

        let options = self.entry_options(&metadata);
        self.zip
            .start_file(entry.archive_name.as_str(), options)
            .map_err(PackError::archive_write)?;

        match copy_with_buffer(&mut file, &mut self.zip, &mut self.buffer) {
            Ok(bytes) => self.summary.bytes_read += bytes,
            Err(CopyFailure::Read(source)) => {
                self.zip.abort_file().map_err(PackError::archive_write)?;
                self.skip(&unreadable(source));
                return Ok(());
            }
            Err(CopyFailure::Write(e)) => return Err(PackError::Io(e)),
        }

        self.written.insert(entry.archive_name.clone());
        self.summary.record_file(group);
        let count = self.summary.files_added;
        self.progress.on_file_added(&entry.archive_name, count);
        if self.config.is_milestone(count) {
            self.progress.on_milestone(count);
        }

        Ok(())
    }

    #[cfg(unix)]
    fn entry_options(&self, metadata: &fs::Metadata) -> SimpleFileOptions {
        use std::os::unix::fs::PermissionsExt;

        if self.config.preserve_permissions {
            self.options.unix_permissions(metadata.permissions().mode())
        } else {
            self.options
        }
    }

    #[cfg(not(unix))]
    fn entry_options(&self, _metadata: &fs::Metadata) -> SimpleFileOptions {
        self.options
    }

    fn skip(&mut self, err: &PackError) {
        let path = err.path().unwrap_or_else(|| Path::new(""));
        let reason = err.to_string();
        self.progress.on_entry_skipped(path, &reason);
        self.summary.add_warning(reason);
    }

    fn finish(self) -> Result<(W, RunSummary)> {
        let writer = self.zip.finish().map_err(PackError::archive_write)?;
        Ok((writer, self.summary))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::bundle::progress::NoopProgress;
    use crate::bundle::progress::recording::RecordingProgress;
    use crate::test_utils::archive_names;
    use crate::test_utils::read_entry;
    use crate::test_utils::write_tree;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn build(output: &Path, roots: &[SourceRoot], rules: &InclusionRules) -> Result<RunSummary> {
        build_archive(output, roots, rules, &BuildConfig::default(), &mut NoopProgress)
    }

    #[test]
    fn test_scenario_suffix_exclusion() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[("src/a.js", "a"), ("src/b.txt", "b")]);
        let output = temp.path().join("out.zip");

        let rules = InclusionRules::new().exclude_suffix(".txt");
        let roots = [SourceRoot::directory(temp.path().join("src"), "src")];
        let summary = build(&output, &roots, &rules).unwrap();

        assert_eq!(archive_names(&output), vec!["src/a.js"]);
        assert_eq!(summary.files_added, 1);
    }

    #[test]
    fn test_scenario_fragment_exclusion() {
        let temp = TempDir::new().unwrap();
        write_tree(
            temp.path(),
            &[
                ("node_modules/pkg/test/spec.js", "spec"),
                ("node_modules/pkg/index.js", "index"),
            ],
        );
        let output = temp.path().join("out.zip");

        let rules = InclusionRules::new().exclude_fragment("test");
        let roots = [SourceRoot::directory(temp.path().join("node_modules"), "node_modules")];
        build(&output, &roots, &rules).unwrap();

        assert_eq!(archive_names(&output), vec!["node_modules/pkg/index.js"]);
    }

    #[test]
    fn test_scenario_missing_required_root() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("out.zip");

        let roots = [SourceRoot::file(temp.path().join("manifest.json"), "manifest.json").required()];
        let err = build(&output, &roots, &InclusionRules::new()).unwrap_err();

        assert!(matches!(err, PackError::RequiredRootMissing { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_required_root_keeps_previous_archive() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("out.zip");
        fs::write(&output, b"previous").unwrap();

        let roots = [SourceRoot::file(temp.path().join("manifest.json"), "manifest.json").required()];
        assert!(build(&output, &roots, &InclusionRules::new()).is_err());

        assert_eq!(fs::read(&output).unwrap(), b"previous");
    }

    #[test]
    fn test_scenario_stale_archive_replaced() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[("v1/old.js", "old"), ("v2/new.js", "new")]);
        let output = temp.path().join("out.zip");
        let rules = InclusionRules::new();

        build(&output, &[SourceRoot::directory(temp.path().join("v1"), "app")], &rules).unwrap();
        assert_eq!(archive_names(&output), vec!["app/old.js"]);

        build(&output, &[SourceRoot::directory(temp.path().join("v2"), "app")], &rules).unwrap();
        assert_eq!(archive_names(&output), vec!["app/new.js"]);
    }

    #[test]
    fn test_optional_roots_are_skipped() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[("package.json", "{}")]);
        let output = temp.path().join("out.zip");

        let roots = [
            SourceRoot::file(temp.path().join("lambda-handler.js"), "lambda-handler.js").group("handler"),
            SourceRoot::directory(temp.path().join("src"), "src").group("source"),
            SourceRoot::file(temp.path().join("package.json"), "package.json").required(),
        ];
        let mut progress = RecordingProgress::default();
        let summary =
            build_archive(&output, &roots, &InclusionRules::new(), &BuildConfig::default(), &mut progress)
                .unwrap();

        assert_eq!(archive_names(&output), vec!["package.json"]);
        assert_eq!(progress.missing, vec!["handler", "source"]);
        assert!(!summary.has_warnings());
        assert_eq!(summary.group_files("handler"), 0);
    }

    #[test]
    fn test_file_root_uses_fixed_name() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[("build/handler.js", "exports.handler = 1;")]);
        let output = temp.path().join("out.zip");

        let roots = [SourceRoot::file(temp.path().join("build/handler.js"), "index.js")];
        build(&output, &roots, &InclusionRules::new()).unwrap();

        assert_eq!(archive_names(&output), vec!["index.js"]);
        assert_eq!(read_entry(&output, "index.js"), b"exports.handler = 1;");
    }

    #[test]
    fn test_file_roots_ignore_rules() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[("notes.txt", "n")]);
        let output = temp.path().join("out.zip");

        let rules = InclusionRules::new().exclude_suffix(".txt");
        let roots = [SourceRoot::file(temp.path().join("notes.txt"), "notes.txt")];
        build(&output, &roots, &rules).unwrap();

        assert_eq!(archive_names(&output), vec!["notes.txt"]);
    }

    #[test]
    fn test_per_root_rules_override() {
        let temp = TempDir::new().unwrap();
        write_tree(
            temp.path(),
            &[
                ("src/app.js", "a"),
                ("src/README.md", "r"),
                ("node_modules/pkg/README.md", "r"),
            ],
        );
        let output = temp.path().join("out.zip");

        let roots = [
            SourceRoot::directory(temp.path().join("src"), "src")
                .with_rules(InclusionRules::new().include_suffix(".js")),
            SourceRoot::directory(temp.path().join("node_modules"), "node_modules"),
        ];
        build(&output, &roots, &InclusionRules::new()).unwrap();

        assert_eq!(
            archive_names(&output),
            vec!["node_modules/pkg/README.md", "src/app.js"]
        );
    }

    #[test]
    fn test_milestones_and_groups() {
        let temp = TempDir::new().unwrap();
        let files: Vec<(String, &str)> = (0..7).map(|i| (format!("deps/f{i}.js"), "x")).collect();
        let borrowed: Vec<(&str, &str)> = files.iter().map(|(p, c)| (p.as_str(), *c)).collect();
        write_tree(temp.path(), &borrowed);
        write_tree(temp.path(), &[("handler.js", "h")]);
        let output = temp.path().join("out.zip");

        let roots = [
            SourceRoot::file(temp.path().join("handler.js"), "handler.js").group("handler"),
            SourceRoot::directory(temp.path().join("deps"), "node_modules").group("dependencies"),
        ];
        let config = BuildConfig::default().with_progress_interval(Some(3));
        let mut progress = RecordingProgress::default();
        let summary =
            build_archive(&output, &roots, &InclusionRules::new(), &config, &mut progress).unwrap();

        assert_eq!(summary.files_added, 8);
        assert_eq!(progress.milestones, vec![3, 6]);
        assert_eq!(
            progress.groups,
            vec![("handler".to_string(), 1), ("dependencies".to_string(), 7)]
        );
        assert_eq!(summary.group_files("dependencies"), 7);
        assert!(progress.completed);
    }

    #[test]
    fn test_archive_size_matches_file() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[("src/a.js", &"console.log(1);\n".repeat(200))]);
        let output = temp.path().join("out.zip");

        let roots = [SourceRoot::directory(temp.path().join("src"), "src")];
        let summary = build(&output, &roots, &InclusionRules::new()).unwrap();

        assert_eq!(summary.archive_size, fs::metadata(&output).unwrap().len());
        assert_eq!(summary.bytes_read, 16 * 200);
        assert!(summary.archive_size < summary.bytes_read);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_entry_does_not_abort() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[("deps/good.js", "good")]);
        std::os::unix::fs::symlink(
            temp.path().join("deps/nowhere.js"),
            temp.path().join("deps/broken.js"),
        )
        .unwrap();
        let output = temp.path().join("out.zip");

        let roots = [SourceRoot::directory(temp.path().join("deps"), "node_modules")];
        let summary = build(&output, &roots, &InclusionRules::new()).unwrap();

        assert_eq!(archive_names(&output), vec!["node_modules/good.js"]);
        assert_eq!(summary.files_added, 1);
        assert_eq!(summary.files_skipped, 1);
        assert!(summary.warnings[0].contains("broken.js"));
    }

    #[test]
    fn test_duplicate_archive_name_is_skipped() {
        let temp = TempDir::new().unwrap();
        write_tree(
            temp.path(),
            &[("a/index.js", "first"), ("a/util.js", "u"), ("b/index.js", "second")],
        );
        let output = temp.path().join("out.zip");

        let roots = [
            SourceRoot::directory(temp.path().join("a"), ""),
            SourceRoot::directory(temp.path().join("b"), ""),
        ];
        let mut progress = RecordingProgress::default();
        let summary =
            build_archive(&output, &roots, &InclusionRules::new(), &BuildConfig::default(), &mut progress)
                .unwrap();

        assert_eq!(archive_names(&output), vec!["index.js", "util.js"]);
        assert_eq!(read_entry(&output, "index.js"), b"first");
        assert_eq!(summary.files_added, 2);
        assert_eq!(summary.files_skipped, 1);
        assert!(summary.warnings[0].contains("duplicate archive entry index.js"));
        assert!(progress.completed);
    }

    #[test]
    fn test_file_root_inside_directory_root_is_written_once() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[("src/handler.js", "h"), ("src/lib.js", "l")]);
        let output = temp.path().join("out.zip");

        let roots = [
            SourceRoot::file(temp.path().join("src/handler.js"), "src/handler.js"),
            SourceRoot::directory(temp.path().join("src"), "src"),
        ];
        let summary = build(&output, &roots, &InclusionRules::new()).unwrap();

        assert_eq!(archive_names(&output), vec!["src/handler.js", "src/lib.js"]);
        assert_eq!(summary.files_added, 2);
        assert_eq!(summary.files_skipped, 1);
    }

    #[test]
    fn test_output_creation_failure_is_fatal() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[("a.js", "a")]);
        let output = temp.path().join("no-such-dir/out.zip");

        let roots = [SourceRoot::file(temp.path().join("a.js"), "a.js")];
        let err = build(&output, &roots, &InclusionRules::new()).unwrap_err();

        assert!(matches!(err, PackError::OutputCreate { .. }));
    }

    #[test]
    fn test_output_removal_failure_is_fatal() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[("a.js", "a"), ("out.zip/keep", "k")]);
        let output = temp.path().join("out.zip");

        let roots = [SourceRoot::file(temp.path().join("a.js"), "a.js")];
        let err = build(&output, &roots, &InclusionRules::new()).unwrap_err();

        assert!(matches!(err, PackError::OutputRemoval { .. }));
        assert!(output.join("keep").exists());
    }

    #[test]
    fn test_empty_file_root_name_rejected() {
        let temp = TempDir::new().unwrap();
        let roots = [SourceRoot::file(temp.path().join("a.js"), "")];
        let err = build(&temp.path().join("o.zip"), &roots, &InclusionRules::new()).unwrap_err();
        assert!(matches!(err, PackError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_write_archive_in_memory() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[("src/a.js", "a"), ("src/b.js", "b")]);

        let roots = [SourceRoot::directory(temp.path().join("src"), "src")];
        let (cursor, summary) = write_archive(
            Cursor::new(Vec::new()),
            &roots,
            &InclusionRules::new(),
            &BuildConfig::default(),
            &mut NoopProgress,
        )
        .unwrap();

        let bytes = cursor.into_inner();
        assert_eq!(summary.archive_size, bytes.len() as u64);

        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), summary.files_added);
    }

    #[test]
    fn test_directories_are_not_written() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[("src/lib/deep/a.js", "a")]);
        fs::create_dir_all(temp.path().join("src/empty")).unwrap();
        let output = temp.path().join("out.zip");

        let roots = [SourceRoot::directory(temp.path().join("src"), "src")];
        build(&output, &roots, &InclusionRules::new()).unwrap();

        assert_eq!(archive_names(&output), vec!["src/lib/deep/a.js"]);
    }
}
