//! Common test utilities for lambda-deploy integration tests
//!
//! Tests run the real binary inside a temporary function directory. Docker,
//! uv and python are replaced by shell scripts in a private `bin/` directory
//! that is put first on `PATH`; every script appends its invocation to
//! `tools.log` in the workspace.

#![allow(dead_code)]

use std::fs::File;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// Log file written by the fake tools, relative to the workspace
pub const TOOLS_LOG: &str = "tools.log";

/// Shared tail of the fake installers: create one package under `--target`
const INSTALL_INTO_TARGET: &str = r#"
target=""
while [ $# -gt 0 ]; do
  if [ "$1" = "--target" ]; then
    shift
    target="$1"
  fi
  shift
done
if [ -z "$target" ]; then
  exit 2
fi
mkdir -p "$target/requests"
echo installed > "$target/requests/__init__.py"
"#;

/// How the fake docker behaves
#[derive(Clone, Copy)]
pub enum Docker {
    /// `docker info` fails
    Down,
    /// `docker info` succeeds, `docker run` installs
    Working,
    /// `docker info` succeeds, `docker run` exits non-zero
    RunFails,
}

/// How the fake uv behaves
#[derive(Clone, Copy)]
pub enum Uv {
    /// `uv --version` fails as if uv were not installed
    Missing,
    Working,
    InstallFails,
}

/// A test function directory with fake tools
pub struct TestWorkspace {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
    bin: PathBuf,
}

impl TestWorkspace {
    /// Create a workspace with a manifest and two of the allowlisted files
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("function");
        let bin = temp.path().join("bin");
        std::fs::create_dir_all(&path).expect("Failed to create workspace");
        std::fs::create_dir_all(&bin).expect("Failed to create bin directory");

        let workspace = Self { temp, path, bin };
        workspace.write_file("requirements.txt", "requests\n");
        workspace.write_file("server.py", "app = None\n");
        workspace.write_file("lambda_handler.py", "def handler(event, context):\n    return {}\n");
        workspace
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    pub fn remove_file(&self, path: &str) {
        std::fs::remove_file(self.path.join(path)).expect("Failed to remove file");
    }

    /// Lines the fake tools logged, in call order
    pub fn tool_calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.path.join(TOOLS_LOG))
            .unwrap_or_default()
            .lines()
            .map(ToString::to_string)
            .collect()
    }

    /// Sorted entry names of the produced archive
    pub fn archive_entries(&self) -> Vec<String> {
        let file = File::open(self.path.join("lambda-deployment.zip")).expect("Archive missing");
        let zip = zip::ZipArchive::new(file).expect("Archive unreadable");
        let mut names: Vec<String> = zip.file_names().map(ToString::to_string).collect();
        names.sort();
        names
    }

    /// Install fake docker, uv and python scripts
    pub fn install_tools(&self, docker: Docker, uv: Uv) {
        let docker_body = match docker {
            Docker::Down => "exit 1\n".to_string(),
            Docker::Working => "if [ \"$1\" = \"info\" ]; then exit 0; fi\n\
                 mkdir -p lambda-package/docker_built\n\
                 echo built > lambda-package/docker_built/__init__.py\n"
                .to_string(),
            Docker::RunFails => "if [ \"$1\" = \"info\" ]; then exit 0; fi\nexit 125\n".to_string(),
        };
        self.write_tool("docker", &docker_body);

        let uv_body = match uv {
            Uv::Missing => "exit 127\n".to_string(),
            Uv::Working => format!(
                "if [ \"$1\" = \"--version\" ]; then exit 0; fi\n{INSTALL_INTO_TARGET}"
            ),
            Uv::InstallFails => "if [ \"$1\" = \"--version\" ]; then exit 0; fi\nexit 1\n".to_string(),
        };
        self.write_tool("uv", &uv_body);

        self.write_tool("python", INSTALL_INTO_TARGET);
    }

    fn write_tool(&self, name: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = self.bin.join(name);
        let script = format!("#!/bin/sh\necho \"{name} $*\" >> {TOOLS_LOG}\n{body}");
        std::fs::write(&path, script).expect("Failed to write fake tool");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake tool executable");
    }

    fn fake_python(&self) -> PathBuf {
        self.bin.join("python")
    }

    /// Command running the binary against this workspace with the fake tools
    pub fn cmd(&self) -> Command {
        let mut cmd = lambda_deploy_cmd();
        let path = std::env::var("PATH").unwrap_or_default();
        cmd.current_dir(&self.path)
            .env("PATH", format!("{}:{path}", self.bin.display()))
            .env("LAMBDA_DEPLOY_PYTHON", self.fake_python())
            .env_remove("LAMBDA_DEPLOY_WORKSPACE");
        cmd
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn lambda_deploy_cmd() -> Command {
    Command::cargo_bin("lambda-deploy").expect("Binary not built")
}
