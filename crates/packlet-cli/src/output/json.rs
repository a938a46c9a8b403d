//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use packlet_core::RunSummary;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

#[derive(Serialize)]
struct GroupOutput {
    name: String,
    files: usize,
}

#[derive(Serialize)]
struct BuildOutput {
    output_path: String,
    files_added: usize,
    groups: Vec<GroupOutput>,
    files_skipped: usize,
    bytes_read: u64,
    archive_size: u64,
    size_kb: f64,
    size_mb: f64,
    compression_percentage: f64,
    duration_ms: u128,
    warnings: Vec<String>,
}

impl BuildOutput {
    fn new(output_path: &Path, summary: &RunSummary) -> Self {
        Self {
            output_path: output_path.display().to_string(),
            files_added: summary.files_added,
            groups: summary
                .groups
                .iter()
                .map(|g| GroupOutput {
                    name: g.name.clone(),
                    files: g.files,
                })
                .collect(),
            files_skipped: summary.files_skipped,
            bytes_read: summary.bytes_read,
            archive_size: summary.archive_size,
            size_kb: summary.size_kb(),
            size_mb: summary.size_mb(),
            compression_percentage: summary.compression_percentage(),
            duration_ms: summary.duration.as_millis(),
            warnings: summary.warnings.clone(),
        }
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_build_result(&self, output_path: &Path, summary: &RunSummary) -> Result<()> {
        let output = JsonOutput::success("build", BuildOutput::new(output_path, summary));
        Self::output(&output)
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::error("build", format!("{error:#}"));
        let _ = Self::output(&output);
    }

    fn format_success(&self, message: &str) {
        #[derive(Serialize)]
        struct SuccessData {
            message: String,
        }

        let output = JsonOutput::success(
            "message",
            SuccessData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_build_output_structure() {
        let mut summary = RunSummary::new();
        summary.record_file("manifest");
        summary.record_file("dependencies");
        summary.archive_size = 2048;
        summary.add_warning("cannot read node_modules/x/broken.js");

        let output = JsonOutput::success("build", BuildOutput::new(Path::new("out.zip"), &summary));
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["operation"], "build");
        assert_eq!(value["status"], "success");
        assert_eq!(value["data"]["files_added"], 2);
        assert_eq!(value["data"]["groups"][1]["name"], "dependencies");
        assert_eq!(value["data"]["size_kb"], 2.0);
        assert_eq!(value["data"]["files_skipped"], 1);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_error_output_structure() {
        let output = JsonOutput::error("build", "required source not found");
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["status"], "error");
        assert_eq!(value["error"], "required source not found");
        assert!(value.get("data").is_none());
    }
}
