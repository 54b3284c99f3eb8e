//! External process invocation
//!
//! Every tool the packager talks to (docker, uv, python) goes through the
//! [`CommandRunner`] trait so the probing and install logic can be driven by
//! a scripted runner in tests.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use console::Style;

use crate::error::{DeployError, Result};

/// Poll interval while waiting on a probe with a deadline
const PROBE_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A program plus its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Why a probed tool counts as unavailable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// The executable does not exist on `PATH`
    NotFound,
    /// The executable exists but could not be started (permissions, ...)
    SpawnFailed(String),
    /// The tool did not answer before the deadline and was killed
    TimedOut,
    /// The tool ran but reported failure
    Exited(Option<i32>),
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::SpawnFailed(reason) => write!(f, "could not be started: {reason}"),
            Self::TimedOut => write!(f, "timed out"),
            Self::Exited(Some(code)) => write!(f, "exited with code {code}"),
            Self::Exited(None) => write!(f, "terminated by signal"),
        }
    }
}

/// Result of probing a tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable(ProbeFailure),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

/// Runs external tools
pub trait CommandRunner {
    /// Run a diagnostic command with its output discarded, bounded by `timeout`
    fn probe(&self, invocation: &Invocation, timeout: Duration) -> Availability;

    /// Run a command to completion with inherited stdio
    ///
    /// Non-zero exit is reported as [`DeployError::CommandFailed`].
    fn run(&self, invocation: &Invocation) -> Result<()>;
}

/// Runner backed by `std::process::Command`, rooted at the workspace
pub struct SystemRunner {
    workdir: PathBuf,
    verbose: bool,
}

impl SystemRunner {
    pub fn new(workdir: &Path, verbose: bool) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
            verbose,
        }
    }

    fn command(&self, invocation: &Invocation) -> Command {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args).current_dir(&self.workdir);
        cmd
    }

    fn echo(&self, invocation: &Invocation) {
        if self.verbose {
            eprintln!("{}", Style::new().dim().apply_to(format!("+ {invocation}")));
        }
    }
}

impl CommandRunner for SystemRunner {
    fn probe(&self, invocation: &Invocation, timeout: Duration) -> Availability {
        self.echo(invocation);
        let child = self
            .command(invocation)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        let mut child = match child {
            Ok(child) => child,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Availability::Unavailable(ProbeFailure::NotFound);
            }
            Err(e) => return Availability::Unavailable(ProbeFailure::SpawnFailed(e.to_string())),
        };

        match wait_with_deadline(&mut child, timeout) {
            Ok(Some(status)) if status.success() => Availability::Available,
            Ok(Some(status)) => Availability::Unavailable(ProbeFailure::Exited(status.code())),
            Ok(None) => Availability::Unavailable(ProbeFailure::TimedOut),
            Err(_) => Availability::Unavailable(ProbeFailure::Exited(None)),
        }
    }

    fn run(&self, invocation: &Invocation) -> Result<()> {
        self.echo(invocation);
        let status = self
            .command(invocation)
            .status()
            .map_err(|e| DeployError::CommandSpawnFailed {
                program: invocation.program.clone(),
                reason: if e.kind() == ErrorKind::NotFound {
                    "command not found".to_string()
                } else {
                    e.to_string()
                },
            })?;

        check_status(invocation, status)
    }
}

fn check_status(invocation: &Invocation, status: ExitStatus) -> Result<()> {
    if status.success() {
        Ok(())
    } else {
        Err(DeployError::CommandFailed {
            command: invocation.to_string(),
            status: status.to_string(),
        })
    }
}

/// Wait for `child` up to `timeout`; kill it and return `None` past the deadline
fn wait_with_deadline(
    child: &mut std::process::Child,
    timeout: Duration,
) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) if Instant::now() >= deadline => {
                reap(child);
                return Ok(None);
            }
            Ok(None) => thread::sleep(PROBE_POLL_INTERVAL),
            Err(e) => {
                reap(child);
                return Err(e);
            }
        }
    }
}

/// Kill and wait so no probe process outlives its deadline
fn reap(child: &mut std::process::Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_invocation_display_quotes_empty_and_spaced_args() {
        let inv = Invocation::new("docker", ["run", "--entrypoint", "", "/bin/sh", "-c", "pip install x"]);
        assert_eq!(
            inv.to_string(),
            "docker run --entrypoint \"\" /bin/sh -c \"pip install x\""
        );
    }

    #[test]
    fn test_probe_failure_display() {
        assert_eq!(ProbeFailure::NotFound.to_string(), "not found");
        assert_eq!(ProbeFailure::TimedOut.to_string(), "timed out");
        assert_eq!(
            ProbeFailure::SpawnFailed("permission denied".to_string()).to_string(),
            "could not be started: permission denied"
        );
        assert_eq!(
            ProbeFailure::Exited(Some(3)).to_string(),
            "exited with code 3"
        );
    }

    #[test]
    fn test_probe_missing_program_is_not_found() {
        let temp = TempDir::new().unwrap();
        let runner = SystemRunner::new(temp.path(), false);
        let inv = Invocation::new("lambda-deploy-definitely-missing-tool", ["--version"]);
        assert_eq!(
            runner.probe(&inv, Duration::from_secs(1)),
            Availability::Unavailable(ProbeFailure::NotFound)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_non_executable_is_not_reported_missing() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let tool = temp.path().join("docker");
        std::fs::write(&tool, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o644)).unwrap();

        let runner = SystemRunner::new(temp.path(), false);
        let inv = Invocation::new(tool.display().to_string(), ["info"]);
        match runner.probe(&inv, Duration::from_secs(1)) {
            Availability::Unavailable(ProbeFailure::SpawnFailed(reason)) => {
                assert!(!reason.is_empty());
            }
            other => panic!("Expected spawn failure, got {other:?}"),
        }
    }

    #[test]
    fn test_run_missing_program_is_spawn_failure() {
        let temp = TempDir::new().unwrap();
        let runner = SystemRunner::new(temp.path(), false);
        let inv = Invocation::new("lambda-deploy-definitely-missing-tool", ["install"]);
        assert!(matches!(
            runner.run(&inv),
            Err(DeployError::CommandSpawnFailed { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_exit_codes() {
        let temp = TempDir::new().unwrap();
        let runner = SystemRunner::new(temp.path(), false);

        let ok = Invocation::new("sh", ["-c", "exit 0"]);
        assert!(runner.probe(&ok, Duration::from_secs(5)).is_available());

        let failing = Invocation::new("sh", ["-c", "exit 7"]);
        assert_eq!(
            runner.probe(&failing, Duration::from_secs(5)),
            Availability::Unavailable(ProbeFailure::Exited(Some(7)))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_timeout_kills_hanging_tool() {
        let temp = TempDir::new().unwrap();
        let runner = SystemRunner::new(temp.path(), false);
        let hanging = Invocation::new("sleep", ["10"]);

        let started = Instant::now();
        let result = runner.probe(&hanging, Duration::from_millis(200));
        assert_eq!(result, Availability::Unavailable(ProbeFailure::TimedOut));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_reports_non_zero_exit() {
        let temp = TempDir::new().unwrap();
        let runner = SystemRunner::new(temp.path(), false);

        assert!(runner.run(&Invocation::new("sh", ["-c", "exit 0"])).is_ok());

        let err = runner
            .run(&Invocation::new("sh", ["-c", "exit 2"]))
            .unwrap_err();
        assert!(matches!(err, DeployError::CommandFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_uses_workdir() {
        let temp = TempDir::new().unwrap();
        let runner = SystemRunner::new(temp.path(), false);
        runner
            .run(&Invocation::new("sh", ["-c", "touch marker"]))
            .unwrap();
        assert!(temp.path().join("marker").exists());
    }
}
