//! Dependency installation into the staging directory
//!
//! The containerized path runs `pip` inside the Lambda runtime image so that
//! compiled wheels match the deployment OS and CPU. If it fails, the run falls
//! back once to the host package manager.

use std::path::Path;

use crate::config::{PackageConfig, slash_path};
use crate::error::{DeployError, Result};
use crate::probe::{Prober, Strategy};
use crate::process::{CommandRunner, Invocation};
use crate::ui;

/// Installs the dependency manifest with a chosen strategy
pub struct Installer<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a PackageConfig,
    workspace: &'a Path,
}

impl<'a> Installer<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        config: &'a PackageConfig,
        workspace: &'a Path,
    ) -> Self {
        Self {
            runner,
            config,
            workspace,
        }
    }

    /// Install dependencies; returns the strategy that actually succeeded
    pub fn install(&self, strategy: Strategy) -> Result<Strategy> {
        let manifest = self.workspace.join(&self.config.requirements);
        if !manifest.is_file() {
            return Err(DeployError::ManifestNotFound {
                path: manifest.display().to_string(),
            });
        }

        match strategy {
            Strategy::Containerized => match self.install_containerized() {
                Ok(()) => Ok(Strategy::Containerized),
                Err(e) => {
                    ui::error(&format!("Docker command failed: {e}"));
                    ui::warn("Falling back to local pip installation...");
                    let local = Prober::new(self.runner, self.config).probe_local();
                    self.install_local(local)?;
                    Ok(local)
                }
            },
            Strategy::LocalPrimary | Strategy::LocalFallback => {
                ui::warn("Docker is not available or not running.");
                ui::note("Attempting to use local pip installation instead.");
                ui::note("For best Lambda compatibility, start Docker and try again.");
                self.install_local(strategy)?;
                Ok(strategy)
            }
        }
    }

    fn install_containerized(&self) -> Result<()> {
        ui::step("Installing dependencies for Lambda runtime using Docker...");
        let inv = container_invocation(self.config, self.workspace);
        self.runner.run(&inv)
    }

    fn install_local(&self, strategy: Strategy) -> Result<()> {
        ui::step("Installing dependencies using local pip (fallback method)...");
        ui::warn("This may not guarantee Lambda runtime compatibility.");
        ui::note("For best results, use Docker when available.");

        let inv = local_invocation(self.config, strategy);
        match strategy {
            Strategy::LocalPrimary => ui::note("Using uv pip..."),
            _ => ui::note("Using system pip..."),
        }
        self.runner.run(&inv)
    }
}

/// `docker run` invocation installing into the mounted staging directory
pub fn container_invocation(config: &PackageConfig, workspace: &Path) -> Invocation {
    let container = &config.container;
    let mount_source = dunce::canonicalize(workspace).unwrap_or_else(|_| workspace.to_path_buf());
    let pip = format!(
        "pip install --target {} -r {} --platform {} --only-binary=:all: --upgrade",
        config.container_staging_dir(),
        config.container_requirements(),
        container.pip_platform,
    );

    Invocation::new(
        container.program.clone(),
        [
            "run".to_string(),
            "--rm".to_string(),
            "-v".to_string(),
            format!(
                "{}:{}",
                mount_source.display(),
                crate::config::CONTAINER_TASK_ROOT
            ),
            "--platform".to_string(),
            container.platform.clone(),
            "--entrypoint".to_string(),
            String::new(),
            container.image.clone(),
            "/bin/sh".to_string(),
            "-c".to_string(),
            pip,
        ],
    )
}

/// Host install invocation for `uv pip` or `python -m pip`
pub fn local_invocation(config: &PackageConfig, strategy: Strategy) -> Invocation {
    let tail = [
        "install".to_string(),
        "--target".to_string(),
        slash_path(&config.staging_dir),
        "-r".to_string(),
        slash_path(&config.requirements),
        "--upgrade".to_string(),
    ];

    match strategy {
        Strategy::LocalPrimary => {
            Invocation::new(config.uv.clone(), std::iter::once("pip".to_string()).chain(tail))
        }
        _ => Invocation::new(
            config.python.clone(),
            ["-m".to_string(), "pip".to_string()].into_iter().chain(tail),
        ),
    }
}
