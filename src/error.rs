//! Error types and handling for lambda-deploy
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//! Probe failures and resource fallbacks are plain values elsewhere; only the
//! conditions that stop a packaging run live here.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for lambda-deploy operations
#[derive(Error, Diagnostic, Debug)]
pub enum DeployError {
    // Configuration errors
    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(lambda_deploy::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(
        code(lambda_deploy::config::parse_failed),
        help("Check lambda-deploy.yaml against the documented keys")
    )]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(lambda_deploy::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Workspace not found at: {path}")]
    #[diagnostic(
        code(lambda_deploy::workspace::not_found),
        help("Pass an existing directory with --workspace or run from the function directory")
    )]
    WorkspaceNotFound { path: String },

    // Installation errors
    #[error("Dependency manifest not found: {path}")]
    #[diagnostic(
        code(lambda_deploy::install::manifest_not_found),
        help("Create a requirements.txt listing the function's runtime dependencies")
    )]
    ManifestNotFound { path: String },

    #[error("Failed to start '{program}': {reason}")]
    #[diagnostic(
        code(lambda_deploy::install::spawn_failed),
        help("Make sure the tool is installed and on PATH")
    )]
    CommandSpawnFailed { program: String, reason: String },

    #[error("Command failed ({status}): {command}")]
    #[diagnostic(code(lambda_deploy::install::command_failed))]
    CommandFailed { command: String, status: String },

    // File system errors
    #[error("Failed to remove {path}: {reason}")]
    #[diagnostic(code(lambda_deploy::fs::remove_failed))]
    RemoveFailed { path: String, reason: String },

    #[error("Failed to create directory {path}: {reason}")]
    #[diagnostic(code(lambda_deploy::fs::create_dir_failed))]
    CreateDirFailed { path: String, reason: String },

    #[error("Failed to copy {from} to {to}: {reason}")]
    #[diagnostic(code(lambda_deploy::fs::copy_failed))]
    CopyFailed {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Failed to read file: {path}")]
    #[diagnostic(code(lambda_deploy::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    // Archive errors
    #[error("Failed to write archive {path}: {reason}")]
    #[diagnostic(code(lambda_deploy::archive::write_failed))]
    ArchiveWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(lambda_deploy::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for DeployError {
    fn from(err: std::io::Error) -> Self {
        DeployError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, DeployError>;
