//! Package command implementation
//!
//! Builds `lambda-deployment.zip` (or the configured archive) for the
//! workspace. This is also what runs when no subcommand is given.

use std::path::PathBuf;

use crate::commands::helpers::resolve_workspace_path;
use crate::config::PackageConfig;
use crate::error::Result;
use crate::package::Packager;
use crate::process::SystemRunner;
use crate::ui;

/// Run package command
pub fn run(workspace: Option<PathBuf>, verbose: bool) -> Result<()> {
    let workspace = resolve_workspace_path(workspace)?;
    let config = PackageConfig::load(&workspace)?;
    let runner = SystemRunner::new(&workspace, verbose);

    let outcome = Packager::new(&workspace, &config, &runner)
        .verbose(verbose)
        .build_package()?;

    if verbose {
        ui::note(&format!("Dependencies installed with {}", outcome.strategy));
        ui::note(&format!("Archive: {}", outcome.archive.path.display()));
    }

    Ok(())
}
