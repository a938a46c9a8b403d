//! Lambda command implementation.

use super::apply_config_args;
use super::apply_rule_args;
use super::output_suffix;
use crate::cli::LambdaArgs;
use crate::error::add_archive_context;
use crate::install::install_dependencies;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use packlet_core::InclusionRules;
use packlet_core::LambdaLayout;
use packlet_core::bundle::ProgressCallback;
use std::env;

pub fn execute(
    args: &LambdaArgs,
    formatter: &dyn OutputFormatter,
    progress: &mut dyn ProgressCallback,
) -> Result<()> {
    let project_dir = match &args.project_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    if args.install {
        install_dependencies(&args.npm, &project_dir)?;
        formatter.format_success("Production dependencies installed");
    }

    let layout = layout_from_args(LambdaLayout::new(&project_dir), args);

    let summary = add_archive_context(layout.build(progress), layout.output())?;

    formatter.format_build_result(layout.output(), &summary)?;

    Ok(())
}

fn layout_from_args(mut layout: LambdaLayout, args: &LambdaArgs) -> LambdaLayout {
    if !args.handlers.is_empty() {
        layout = layout.with_handlers(args.handlers.iter().cloned());
    }
    if !args.source_dirs.is_empty() {
        layout = layout.with_source_dirs(args.source_dirs.iter().cloned());
    }
    if let Some(output) = &args.output {
        layout = layout.with_output(output);
        if let Some(suffix) = output_suffix(output) {
            layout = layout.with_extra_suffixes([suffix]);
        }
    }

    let extra = apply_rule_args(InclusionRules::new(), &args.rules);
    let config = apply_config_args(layout.config().clone(), &args.rules);

    layout
        .with_manifest(Some(args.manifest.clone()))
        .with_dependencies(Some(args.dependencies.clone()))
        .with_extra_exclusions(extra.excluded_path_fragments)
        .with_extra_suffixes(extra.excluded_suffixes)
        .with_case(extra.case)
        .with_config(config)
}
