//! Deployment package build
//!
//! The run is strictly linear:
//! 1. Remove the staging directory and archive of a previous run
//! 2. Create an empty staging directory
//! 3. Probe for an installer and install the dependency manifest
//! 4. Copy the application allowlist and the optional data directory
//! 5. Preflight the copied data directory with the resource loader
//! 6. Compress the staging tree into the archive and report its size

use std::path::Path;

use crate::archive::{self, ArchiveReport};
use crate::config::PackageConfig;
use crate::error::Result;
use crate::install::Installer;
use crate::probe::{Prober, Strategy};
use crate::process::CommandRunner;
use crate::resources::ResourceBundle;
use crate::staging;
use crate::ui;

/// Outcome of a successful build
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub archive: ArchiveReport,
    /// Strategy that actually installed the dependencies
    pub strategy: Strategy,
    /// Allowlisted files that were not present
    pub skipped_files: Vec<String>,
}

/// Builds the deployment archive for one workspace
pub struct Packager<'a> {
    workspace: &'a Path,
    config: &'a PackageConfig,
    runner: &'a dyn CommandRunner,
    verbose: bool,
}

impl<'a> Packager<'a> {
    pub fn new(workspace: &'a Path, config: &'a PackageConfig, runner: &'a dyn CommandRunner) -> Self {
        Self {
            workspace,
            config,
            runner,
            verbose: false,
        }
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn build_package(&self) -> Result<BuildOutcome> {
        ui::step("Creating Lambda deployment package...");

        let staging_dir = self.workspace.join(&self.config.staging_dir);
        let archive_path = self.workspace.join(&self.config.archive);

        staging::clean_previous(&staging_dir, &archive_path)?;
        staging::create_staging(&staging_dir)?;

        let strategy = Prober::new(self.runner, self.config).probe_installer();
        let strategy = Installer::new(self.runner, self.config, self.workspace).install(strategy)?;

        ui::step("Copying application files...");
        let skipped_files =
            staging::copy_app_files(self.workspace, &staging_dir, &self.config.app_files)?;
        if self.verbose {
            for name in &skipped_files {
                ui::note(&format!("skipped {name} (not present)"));
            }
        }

        if let Some(data_copy) =
            staging::copy_data_dir(self.workspace, &staging_dir, &self.config.data_dir)?
        {
            self.preflight_resources(&data_copy);
        }

        ui::step("Creating zip file...");
        let report = archive::write_archive(&staging_dir, &archive_path)?;

        let archive_name = self.config.archive.display();
        ui::success(&format!(
            "Created {archive_name} ({}, {} files)",
            report.human_size(),
            report.entries
        ));
        ui::note(&report.digest);

        Ok(BuildOutcome {
            archive: report,
            strategy,
            skipped_files,
        })
    }

    /// Warn about resources the deployed function would replace with fallbacks
    fn preflight_resources(&self, data_copy: &Path) {
        let bundle = ResourceBundle::load(data_copy);
        let fallbacks = bundle.fallbacks();
        if fallbacks.is_empty() {
            if self.verbose {
                ui::note(&format!("Resources loaded for {}", bundle.name()));
            }
            return;
        }
        ui::warn(&format!(
            "{} resource file(s) will use fallback values at runtime",
            fallbacks.len()
        ));
    }
}
