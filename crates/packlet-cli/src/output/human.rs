//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use packlet_core::RunSummary;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    /// Archive size in KB below one megabyte, MB above.
    fn format_archive_size(summary: &RunSummary) -> String {
        if summary.archive_size >= 1024 * 1024 {
            format!("{:.2} MB", summary.size_mb())
        } else {
            format!("{:.2} KB", summary.size_kb())
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn build_lines(&self, output_path: &Path, summary: &RunSummary) -> Vec<String> {
        let mut lines = Vec::new();

        let headline = format!(
            "Package created: {} ({})",
            output_path.display(),
            Self::format_archive_size(summary)
        );
        if self.use_colors {
            lines.push(format!("{} {headline}", style("✓").green().bold()));
        } else {
            lines.push(headline);
        }

        lines.push(format!(
            "  Total files:      {}",
            Self::format_number(summary.files_added)
        ));
        for group in &summary.groups {
            let label = format!("{}:", group.name);
            lines.push(format!(
                "    {label:<16}{}",
                Self::format_number(group.files)
            ));
        }

        if summary.files_skipped > 0 {
            lines.push(format!(
                "  Files skipped:    {}",
                Self::format_number(summary.files_skipped)
            ));
        }

        if self.verbose {
            lines.push(format!(
                "  Compression:      {:.1}%",
                summary.compression_percentage()
            ));
            lines.push(format!("  Duration:         {:?}", summary.duration));
            for warning in &summary.warnings {
                lines.push(format!("  skipped: {warning}"));
            }
        }

        lines
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_build_result(&self, output_path: &Path, summary: &RunSummary) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for line in self.build_lines(output_path, summary) {
            self.term.write_line(&line)?;
        }

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = term.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_success(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(message);
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.term.write_line(&format!("WARNING: {message}"));
        }
    }
}
