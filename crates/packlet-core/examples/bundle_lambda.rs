//! Example: Bundling a Lambda project with packlet-core
//!
//! Run with: `cargo run --example bundle_lambda -- path/to/project`

use packlet_core::bundle::ArchiveBuilder;
use packlet_core::bundle::NoopProgress;
use packlet_core::bundle::SourceRoot;
use packlet_core::preset::LambdaLayout;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let project = std::env::args().nth(1).map_or_else(|| PathBuf::from("."), PathBuf::from);

    // Example 1: Preset layout
    println!("Example 1: Lambda preset");
    let layout = LambdaLayout::new(&project);
    let summary = layout.build(&mut NoopProgress)?;
    println!("  Created {} with {} files", layout.output().display(), summary.files_added);
    for group in &summary.groups {
        println!("    {}: {}", group.name, group.files);
    }
    println!("  Size: {:.2} MB", summary.size_mb());

    // Example 2: Builder pattern with explicit roots
    println!("\nExample 2: Builder pattern");
    let output = project.join("sources-only.zip");
    let summary = ArchiveBuilder::new()
        .output(&output)
        .root(SourceRoot::directory(project.join("src"), "src"))
        .include_suffix(".js")
        .compression_level(9)
        .build()?;
    println!("  Created ZIP with {} files", summary.files_added);

    std::fs::remove_file(&output)?;

    println!("\nExamples completed successfully!");
    Ok(())
}
