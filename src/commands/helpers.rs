//! Command helper utilities

use std::path::PathBuf;

use crate::error::{DeployError, Result};

/// Resolve workspace path from optional argument
///
/// If a workspace path is provided, it must be an existing directory.
/// Otherwise, resolve to the current directory.
pub fn resolve_workspace_path(workspace: Option<PathBuf>) -> Result<PathBuf> {
    let path = match workspace {
        Some(path) => path,
        None => std::env::current_dir().map_err(|e| DeployError::IoError {
            message: format!("Failed to get current directory: {e}"),
        })?,
    };

    if !path.is_dir() {
        return Err(DeployError::WorkspaceNotFound {
            path: path.display().to_string(),
        });
    }

    Ok(path)
}
