//! Resources command implementation
//!
//! Loads the resource bundle the deployed function would see and prints
//! where each value came from. Fallbacks are reported, never fatal.

use std::path::PathBuf;

use console::Style;

use crate::cli::ResourcesArgs;
use crate::commands::helpers::resolve_workspace_path;
use crate::config::PackageConfig;
use crate::error::Result;
use crate::resources::{Origin, Resource, ResourceBundle};

/// Run resources command
pub fn run(workspace: Option<PathBuf>, args: ResourcesArgs) -> Result<()> {
    let workspace = resolve_workspace_path(workspace)?;
    let data_dir = match args.data_dir {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => workspace.join(dir),
        None => workspace.join(PackageConfig::load(&workspace)?.data_dir),
    };

    let bundle = ResourceBundle::load(&data_dir);

    println!(
        "{} {}",
        Style::new().bold().apply_to("Data directory:"),
        data_dir.display()
    );
    println!("{} {}", Style::new().bold().apply_to("Name:"), bundle.name());
    display_resource("Document", &bundle.document, |v| format!("{} chars", v.chars().count()));
    display_resource("Summary", &bundle.summary, |v| format!("{} chars", v.chars().count()));
    display_resource("Style", &bundle.style, |v| format!("{} chars", v.chars().count()));
    display_resource("Facts", &bundle.facts, |v| format!("{} keys", v.len()));

    Ok(())
}

fn display_resource<T>(label: &str, resource: &Resource<T>, size: impl Fn(&T) -> String) {
    let status = match &resource.origin {
        Origin::Loaded => Style::new()
            .green()
            .apply_to(format!("loaded ({})", size(&resource.value))),
        Origin::Fallback(reason) => Style::new()
            .yellow()
            .apply_to(format!("fallback ({reason})")),
    };
    println!(
        "  {} {}",
        Style::new().bold().apply_to(format!("{label}:")),
        status
    );
}
