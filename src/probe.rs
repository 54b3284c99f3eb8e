//! Installation strategy detection
//!
//! Priority is fixed: containerized install, then `uv pip`, then
//! `python -m pip`. The last one is never probed; if it is missing the
//! install step fails on its own.

use std::fmt;

use crate::config::PackageConfig;
use crate::process::{Availability, CommandRunner, Invocation};
use crate::ui;

/// How dependencies get installed for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `pip` inside the Lambda runtime image
    Containerized,
    /// `uv pip` on the host
    LocalPrimary,
    /// `python -m pip` on the host
    LocalFallback,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Containerized => write!(f, "docker"),
            Self::LocalPrimary => write!(f, "uv pip"),
            Self::LocalFallback => write!(f, "python -m pip"),
        }
    }
}

/// Probes the tools available on this machine
pub struct Prober<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a PackageConfig,
}

impl<'a> Prober<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &'a PackageConfig) -> Self {
        Self { runner, config }
    }

    /// `docker info` succeeds only when the daemon is reachable
    pub fn container_availability(&self) -> Availability {
        let inv = Invocation::new(self.config.container.program.clone(), ["info"]);
        self.probe(&inv)
    }

    pub fn uv_availability(&self) -> Availability {
        let inv = Invocation::new(self.config.uv.clone(), ["--version"]);
        self.probe(&inv)
    }

    fn probe(&self, inv: &Invocation) -> Availability {
        let availability = self.runner.probe(inv, self.config.probe_timeout());
        if let Availability::Unavailable(failure) = &availability {
            ui::note(&format!("`{inv}` {failure}"));
        }
        availability
    }

    /// Pick the best strategy
    pub fn probe_installer(&self) -> Strategy {
        if self.container_availability().is_available() {
            Strategy::Containerized
        } else {
            self.probe_local()
        }
    }

    /// Pick the best host-only strategy
    pub fn probe_local(&self) -> Strategy {
        if self.uv_availability().is_available() {
            Strategy::LocalPrimary
        } else {
            Strategy::LocalFallback
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeRunner;
    use super::*;
    use crate::process::ProbeFailure;

    #[test]
    fn test_container_preferred_when_available() {
        let config = PackageConfig::default();
        let runner = FakeRunner::new().available("docker").available("uv");
        let strategy = Prober::new(&runner, &config).probe_installer();

        assert_eq!(strategy, Strategy::Containerized);
        // uv is not consulted once docker answers
        assert_eq!(runner.probed_programs(), vec!["docker".to_string()]);
    }

    #[test]
    fn test_uv_when_docker_not_running() {
        let config = PackageConfig::default();
        let runner = FakeRunner::new()
            .unavailable("docker", ProbeFailure::Exited(Some(1)))
            .available("uv");
        let strategy = Prober::new(&runner, &config).probe_installer();

        assert_eq!(strategy, Strategy::LocalPrimary);
        assert_eq!(
            runner.probed_programs(),
            vec!["docker".to_string(), "uv".to_string()]
        );
    }

    #[test]
    fn test_fallback_when_nothing_available() {
        let config = PackageConfig::default();
        let runner = FakeRunner::new()
            .unavailable("docker", ProbeFailure::NotFound)
            .unavailable("uv", ProbeFailure::NotFound);
        let strategy = Prober::new(&runner, &config).probe_installer();

        assert_eq!(strategy, Strategy::LocalFallback);
        // The interpreter itself is never probed
        assert!(!runner.probed_programs().contains(&config.python));
    }

    #[test]
    fn test_timeout_treated_as_unavailable() {
        let config = PackageConfig::default();
        let runner = FakeRunner::new()
            .unavailable("docker", ProbeFailure::TimedOut)
            .unavailable("uv", ProbeFailure::TimedOut);
        assert_eq!(
            Prober::new(&runner, &config).probe_installer(),
            Strategy::LocalFallback
        );
    }

    #[test]
    fn test_probe_commands() {
        let config = PackageConfig::default();
        let runner = FakeRunner::new();
        let prober = Prober::new(&runner, &config);
        prober.probe_installer();

        let probed = runner.probed.borrow();
        assert_eq!(probed[0], Invocation::new("docker", ["info"]));
        assert_eq!(probed[1], Invocation::new("uv", ["--version"]));
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(Strategy::Containerized.to_string(), "docker");
        assert_eq!(Strategy::LocalPrimary.to_string(), "uv pip");
        assert_eq!(Strategy::LocalFallback.to_string(), "python -m pip");
    }
}
