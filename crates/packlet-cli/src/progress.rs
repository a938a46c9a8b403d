//! Progress reporting for CLI builds.

use console::Term;
use console::style;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use packlet_core::bundle::NoopProgress;
use packlet_core::bundle::ProgressCallback;
use packlet_core::bundle::RunSummary;
use std::path::Path;
use std::time::Duration;

/// CLI progress reporter implementing `ProgressCallback`.
///
/// In a TTY a spinner shows the running file count; otherwise milestone
/// lines are printed. Per-group completion lines are printed in both cases.
/// Automatically cleans up on drop.
pub struct CliProgress {
    bar: Option<ProgressBar>,
    term: Term,
    verbose: bool,
    use_colors: bool,
    captured: Option<Vec<String>>,
}

impl CliProgress {
    /// Creates a reporter; the spinner is only shown on a terminal.
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        let bar = Self::should_show().then(|| {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {msg} {pos} files ({elapsed})")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        });

        Self {
            bar,
            term: Term::stdout(),
            verbose,
            use_colors: console::colors_enabled(),
            captured: None,
        }
    }

    /// Reporter that keeps its lines in memory instead of printing them.
    #[cfg(test)]
    fn recording(verbose: bool) -> Self {
        Self {
            bar: None,
            term: Term::stdout(),
            verbose,
            use_colors: false,
            captured: Some(Vec::new()),
        }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stdout().is_term()
    }

    fn line(&mut self, text: String) {
        if let Some(captured) = &mut self.captured {
            captured.push(text);
        } else if let Some(bar) = &self.bar {
            bar.println(text);
        } else {
            let _ = self.term.write_line(&text);
        }
    }

    fn check_mark(&self) -> String {
        if self.use_colors {
            style("✓").green().bold().to_string()
        } else {
            "+".to_string()
        }
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl ProgressCallback for CliProgress {
    fn on_root_start(&mut self, group: &str, _path: &Path) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("Adding {group}"));
        }
    }

    fn on_root_missing(&mut self, group: &str, path: &Path) {
        if self.verbose {
            self.line(format!("  - {group}: {} not found, skipped", path.display()));
        }
    }

    fn on_file_added(&mut self, _archive_name: &str, count: usize) {
        if let Some(bar) = &self.bar {
            bar.set_position(count as u64);
        }
    }

    fn on_milestone(&mut self, count: usize) {
        // The spinner already shows the count.
        if self.bar.is_none() {
            self.line(format!("    {count} files..."));
        }
    }

    fn on_entry_skipped(&mut self, path: &Path, reason: &str) {
        if self.verbose {
            self.line(format!("  ! skipped {}: {reason}", path.display()));
        }
    }

    fn on_group_complete(&mut self, group: &str, files: usize) {
        let mark = self.check_mark();
        self.line(format!("  {mark} {group} ({files} files)"));
    }

    fn on_complete(&mut self, _summary: &RunSummary) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

/// Picks the progress reporter for the current output mode.
pub fn for_output(json: bool, quiet: bool, verbose: bool) -> Box<dyn ProgressCallback> {
    if json || quiet {
        Box::new(NoopProgress)
    } else {
        Box::new(CliProgress::new(verbose))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(progress: &CliProgress) -> Vec<String> {
        progress.captured.clone().unwrap_or_default()
    }

    #[test]
    fn test_group_lines() {
        let mut progress = CliProgress::recording(false);
        progress.on_root_start("handler", Path::new("lambda-handler.js"));
        progress.on_file_added("lambda-handler.js", 1);
        progress.on_group_complete("handler", 1);
        progress.on_root_missing("source", Path::new("src"));

        assert_eq!(lines(&progress), vec!["  + handler (1 files)"]);
    }

    #[test]
    fn test_milestone_lines_without_spinner() {
        let mut progress = CliProgress::recording(false);
        progress.on_milestone(500);
        progress.on_milestone(1000);

        assert_eq!(lines(&progress), vec!["    500 files...", "    1000 files..."]);
    }

    #[test]
    fn test_verbose_reports_skips_and_missing_roots() {
        let mut progress = CliProgress::recording(true);
        progress.on_root_missing("source", Path::new("src"));
        progress.on_entry_skipped(Path::new("node_modules/x/broken.js"), "cannot read");

        let lines = lines(&progress);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("src not found"));
        assert!(lines[1].contains("broken.js"));
    }

    #[test]
    fn test_for_output_selects_noop() {
        // Smoke test: both variants accept events.
        let mut quiet = for_output(false, true, false);
        quiet.on_milestone(10);
        let mut json = for_output(true, false, false);
        json.on_group_complete("source", 3);
    }
}
