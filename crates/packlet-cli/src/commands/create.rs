//! Create command implementation.

use super::apply_config_args;
use super::apply_rule_args;
use super::output_suffix;
use crate::cli::CreateArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use packlet_core::BuildConfig;
use packlet_core::InclusionRules;
use packlet_core::SourceRoot;
use packlet_core::build_archive;
use packlet_core::bundle::ProgressCallback;
use std::path::Path;

pub fn execute(
    args: &CreateArgs,
    formatter: &dyn OutputFormatter,
    progress: &mut dyn ProgressCallback,
) -> Result<()> {
    let roots = collect_roots(args);
    let rules = build_rules(args);
    let config = apply_config_args(BuildConfig::default(), &args.rules);

    let summary = add_archive_context(
        build_archive(&args.output, &roots, &rules, &config, progress),
        &args.output,
    )?;

    formatter.format_build_result(&args.output, &summary)?;

    Ok(())
}

/// One root per SOURCE, then any `--require` path not already listed.
fn collect_roots(args: &CreateArgs) -> Vec<SourceRoot> {
    let mut roots: Vec<SourceRoot> = args
        .sources
        .iter()
        .map(|source| source_root(source, args.flatten))
        .collect();

    for required in &args.require {
        match roots.iter_mut().find(|root| root.path() == required) {
            Some(root) => *root = root.clone().required(),
            None => roots.push(source_root(required, args.flatten).required()),
        }
    }

    roots
}

fn build_rules(args: &CreateArgs) -> InclusionRules {
    let mut rules = apply_rule_args(InclusionRules::new(), &args.rules);

    for suffix in &args.include_suffix {
        rules = rules.include_suffix(suffix.clone());
    }
    for name in &args.only {
        rules = rules.allow_top_level(name.clone());
    }
    if let Some(suffix) = output_suffix(&args.output) {
        rules = rules.exclude_suffix(suffix);
    }

    rules
}

/// Directories are stored under their own name unless flattened; anything
/// else is treated as a file stored under its file name.
fn source_root(path: &Path, flatten: bool) -> SourceRoot {
    if path.is_dir() {
        let prefix = if flatten {
            String::new()
        } else {
            directory_name(path)
        };
        SourceRoot::directory(path, prefix)
    } else {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        SourceRoot::file(path, name)
    }
}

fn directory_name(path: &Path) -> String {
    if let Some(name) = path.file_name() {
        return name.to_string_lossy().into_owned();
    }
    // "." and ".." have no final component of their own.
    path.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_default()
}
