//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "packlet")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a ZIP archive from files and directories
    Create(CreateArgs),
    /// Package a Node.js AWS Lambda project
    Lambda(LambdaArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

/// Rule and compression flags shared by every build command.
#[derive(clap::Args)]
pub struct RuleArgs {
    /// Exclude entries whose path contains FRAGMENT (can be repeated)
    #[arg(long = "exclude", short = 'x', value_name = "FRAGMENT")]
    pub exclude: Vec<String>,

    /// Exclude entries whose path ends with SUFFIX (can be repeated)
    #[arg(long = "exclude-suffix", value_name = "SUFFIX")]
    pub exclude_suffix: Vec<String>,

    /// Match fragments and suffixes case-insensitively
    #[arg(long)]
    pub ignore_case: bool,

    /// Compression level (1-9)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub compression_level: Option<u8>,

    /// Report progress every N added files
    #[arg(long, value_name = "N", value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub progress_interval: Option<usize>,
}

#[derive(clap::Args)]
pub struct CreateArgs {
    /// Output archive file path
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Source files or directories to archive (missing ones are skipped)
    #[arg(value_name = "SOURCE", required = true)]
    pub sources: Vec<PathBuf>,

    #[command(flatten)]
    pub rules: RuleArgs,

    /// Keep only files whose path ends with SUFFIX (can be repeated)
    #[arg(long = "include-suffix", value_name = "SUFFIX")]
    pub include_suffix: Vec<String>,

    /// Keep only entries under top-level NAME (can be repeated)
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,

    /// Store directory contents at the archive root
    #[arg(long)]
    pub flatten: bool,

    /// Fail before writing anything if PATH does not exist (can be repeated)
    #[arg(long = "require", value_name = "PATH")]
    pub require: Vec<PathBuf>,
}

#[derive(clap::Args)]
pub struct LambdaArgs {
    /// Project directory (default: current directory)
    #[arg(value_name = "PROJECT_DIR")]
    pub project_dir: Option<PathBuf>,

    /// Output archive path (default: PROJECT_DIR/lambda-package.zip)
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Handler script to include (replaces the defaults, can be repeated)
    #[arg(long = "handler", value_name = "FILE")]
    pub handlers: Vec<String>,

    /// Source directory to include (replaces the defaults, can be repeated)
    #[arg(long = "source-dir", value_name = "DIR")]
    pub source_dirs: Vec<String>,

    /// Manifest file that must exist
    #[arg(long, value_name = "FILE", default_value = "package.json")]
    pub manifest: String,

    /// Dependency directory
    #[arg(long, value_name = "DIR", default_value = "node_modules")]
    pub dependencies: String,

    #[command(flatten)]
    pub rules: RuleArgs,

    /// Run `npm install --production` before packaging
    #[arg(long)]
    pub install: bool,

    /// Program used by --install
    #[arg(long, value_name = "PROGRAM", default_value = "npm")]
    pub npm: String,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_name = "SHELL", value_enum)]
    pub shell: Shell,
}
