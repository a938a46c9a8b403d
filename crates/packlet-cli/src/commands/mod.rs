//! Subcommand implementations.

pub mod completion;
pub mod create;
pub mod lambda;

use crate::cli::RuleArgs;
use packlet_core::BuildConfig;
use packlet_core::InclusionRules;
use packlet_core::bundle::CaseMatching;
use std::path::Path;

/// Applies the shared exclusion flags on top of `rules`.
fn apply_rule_args(rules: InclusionRules, args: &RuleArgs) -> InclusionRules {
    let case = if args.ignore_case {
        CaseMatching::Insensitive
    } else {
        CaseMatching::Sensitive
    };

    rules
        .exclude_fragments(args.exclude.iter().cloned())
        .exclude_suffixes(args.exclude_suffix.iter().cloned())
        .with_case(case)
}

/// Applies the shared compression and progress flags on top of `config`.
fn apply_config_args(mut config: BuildConfig, args: &RuleArgs) -> BuildConfig {
    if let Some(level) = args.compression_level {
        config.compression_level = Some(level);
    }
    if args.progress_interval.is_some() {
        config.progress_interval = args.progress_interval;
    }
    config
}

/// File name of `output`, used to keep a previous archive out of the next one.
fn output_suffix(output: &Path) -> Option<String> {
    output
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
