//! Packaging configuration
//!
//! Defaults reproduce the layout the deployment workflow has always used
//! (`requirements.txt`, `lambda-package/`, `lambda-deployment.zip`, the
//! Python 3.12 Lambda image). A `lambda-deploy.yaml` in the workspace can
//! override any field; `LAMBDA_DEPLOY_PYTHON` overrides the fallback
//! interpreter.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{DeployError, Result};

/// Name of the optional configuration file in the workspace root
pub const CONFIG_FILE: &str = "lambda-deploy.yaml";

/// Environment variable overriding the interpreter used for `-m pip`
pub const PYTHON_ENV: &str = "LAMBDA_DEPLOY_PYTHON";

/// Mount point of the workspace inside the build container
pub const CONTAINER_TASK_ROOT: &str = "/var/task";

/// Settings for the containerized installer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContainerConfig {
    /// Container runtime executable
    pub program: String,
    /// Image matching the deployment runtime
    pub image: String,
    /// Platform passed to `docker run --platform`
    pub platform: String,
    /// Wheel platform tag passed to `pip install --platform`
    pub pip_platform: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            program: "docker".to_string(),
            image: "public.ecr.aws/lambda/python:3.12".to_string(),
            platform: "linux/amd64".to_string(),
            pip_platform: "manylinux2014_x86_64".to_string(),
        }
    }
}

/// Full packaging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageConfig {
    /// Staging directory, relative to the workspace
    pub staging_dir: PathBuf,
    /// Output archive, relative to the workspace
    pub archive: PathBuf,
    /// Dependency manifest, relative to the workspace
    pub requirements: PathBuf,
    /// Application files copied into the staging root when present
    pub app_files: Vec<String>,
    /// Optional data directory copied recursively
    pub data_dir: PathBuf,
    /// Upper bound for each availability probe
    pub probe_timeout_secs: u64,
    /// Primary local package manager executable
    pub uv: String,
    /// Interpreter for the last-resort `python -m pip` install
    pub python: String,
    pub container: ContainerConfig,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            staging_dir: PathBuf::from("lambda-package"),
            archive: PathBuf::from("lambda-deployment.zip"),
            requirements: PathBuf::from("requirements.txt"),
            app_files: ["server.py", "lambda_handler.py", "context.py", "resources.py"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            data_dir: PathBuf::from("data"),
            probe_timeout_secs: 5,
            uv: "uv".to_string(),
            python: default_python().to_string(),
            container: ContainerConfig::default(),
        }
    }
}

fn default_python() -> &'static str {
    if cfg!(windows) { "python" } else { "python3" }
}

impl PackageConfig {
    /// Load configuration for a workspace
    ///
    /// Reads `lambda-deploy.yaml` when it exists, applies environment
    /// overrides and validates the result.
    pub fn load(workspace: &Path) -> Result<Self> {
        let path = workspace.join(CONFIG_FILE);
        let mut config = if path.is_file() {
            let content =
                std::fs::read_to_string(&path).map_err(|e| DeployError::ConfigReadFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
            Self::from_yaml(&content, &path)?
        } else {
            Self::default()
        };

        if let Ok(python) = std::env::var(PYTHON_ENV) {
            if !python.trim().is_empty() {
                config.python = python.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML document; missing keys keep their defaults
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| DeployError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Check that every workspace path stays inside the workspace
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("staging_dir", &self.staging_dir),
            ("archive", &self.archive),
            ("requirements", &self.requirements),
            ("data_dir", &self.data_dir),
        ] {
            if !is_contained_relative(value) {
                return Err(DeployError::ConfigInvalid {
                    message: format!(
                        "{key} must be a relative path inside the workspace, got '{}'",
                        value.display()
                    ),
                });
            }
        }

        if self.probe_timeout_secs == 0 {
            return Err(DeployError::ConfigInvalid {
                message: "probe_timeout_secs must be greater than zero".to_string(),
            });
        }

        if let Some(file) = self
            .app_files
            .iter()
            .find(|f| !is_contained_relative(Path::new(f)))
        {
            return Err(DeployError::ConfigInvalid {
                message: format!("app_files entry '{file}' must be a relative path"),
            });
        }

        self.validate_staging_overlap()
    }

    /// The staging directory is wiped on every run, so it must not hold any input
    fn validate_staging_overlap(&self) -> Result<()> {
        let staging = normalized(&self.staging_dir);

        if normalized(&self.archive) == staging {
            return Err(DeployError::ConfigInvalid {
                message: "staging_dir and archive must differ".to_string(),
            });
        }

        let inputs = [
            ("archive", self.archive.clone()),
            ("requirements", self.requirements.clone()),
            ("data_dir", self.data_dir.clone()),
        ]
        .into_iter()
        .chain(
            self.app_files
                .iter()
                .map(|f| ("app_files entry", PathBuf::from(f))),
        );

        for (key, path) in inputs {
            if normalized(&path).starts_with(&staging) {
                return Err(DeployError::ConfigInvalid {
                    message: format!(
                        "{key} '{}' is inside staging_dir '{}', which is removed on every run",
                        path.display(),
                        self.staging_dir.display()
                    ),
                });
            }
        }

        if staging.starts_with(normalized(&self.data_dir)) {
            return Err(DeployError::ConfigInvalid {
                message: format!(
                    "staging_dir '{}' must not be inside data_dir '{}'",
                    self.staging_dir.display(),
                    self.data_dir.display()
                ),
            });
        }

        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Staging directory as seen from inside the build container
    pub fn container_staging_dir(&self) -> String {
        format!("{CONTAINER_TASK_ROOT}/{}", slash_path(&self.staging_dir))
    }

    /// Dependency manifest as seen from inside the build container
    pub fn container_requirements(&self) -> String {
        format!("{CONTAINER_TASK_ROOT}/{}", slash_path(&self.requirements))
    }
}

/// Join path components with `/` regardless of host platform
pub fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// `path` with `.` components dropped, for prefix comparisons
fn normalized(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}

fn is_contained_relative(path: &Path) -> bool {
    let mut components = path.components().peekable();
    if components.peek().is_none() {
        return false;
    }
    components.all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && path.components().any(|c| matches!(c, Component::Normal(_)))
}
