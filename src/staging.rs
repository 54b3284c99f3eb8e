//! Staging directory preparation
//!
//! The staging directory is rebuilt from scratch on every run: leftovers from
//! a previous run (staging tree or archive) are removed before anything is
//! installed, so the archive only ever reflects the current inputs.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DeployError, Result};

/// Remove the staging directory and archive left by a previous run
pub fn clean_previous(staging: &Path, archive: &Path) -> Result<()> {
    if staging.exists() {
        fs::remove_dir_all(staging).map_err(|e| DeployError::RemoveFailed {
            path: staging.display().to_string(),
            reason: e.to_string(),
        })?;
    }
    if archive.exists() {
        fs::remove_file(archive).map_err(|e| DeployError::RemoveFailed {
            path: archive.display().to_string(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

pub fn create_staging(staging: &Path) -> Result<()> {
    fs::create_dir_all(staging).map_err(|e| DeployError::CreateDirFailed {
        path: staging.display().to_string(),
        reason: e.to_string(),
    })
}

/// Copy the application allowlist into the staging root
///
/// Missing files are skipped. Returns the names that were skipped.
pub fn copy_app_files(workspace: &Path, staging: &Path, files: &[String]) -> Result<Vec<String>> {
    let mut skipped = Vec::new();

    for name in files {
        let src = workspace.join(name);
        if !src.exists() {
            skipped.push(name.clone());
            continue;
        }

        let file_name = src
            .file_name()
            .map_or_else(|| PathBuf::from(name), PathBuf::from);
        let dst = staging.join(file_name);
        fs::copy(&src, &dst).map_err(|e| copy_error(&src, &dst, &e))?;
    }

    Ok(skipped)
}

/// Copy the data directory into `<staging>/<name>` when it exists
///
/// Returns the destination if anything was copied.
pub fn copy_data_dir(workspace: &Path, staging: &Path, data_dir: &Path) -> Result<Option<PathBuf>> {
    let src = workspace.join(data_dir);
    if !src.is_dir() {
        return Ok(None);
    }

    let dst = staging.join(data_dir);
    copy_dir_recursive(&src, &dst)?;
    Ok(Some(dst))
}

/// Copy a directory recursively, preserving relative structure
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    if !dst.exists() {
        fs::create_dir_all(dst).map_err(|e| DeployError::CreateDirFailed {
            path: dst.display().to_string(),
            reason: e.to_string(),
        })?;
    }

    let entries = fs::read_dir(src).map_err(|e| DeployError::FileReadFailed {
        path: src.display().to_string(),
        reason: e.to_string(),
    })?;

    for entry in entries {
        let entry = entry?;
        let entry_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if entry_path.is_dir() {
            copy_dir_recursive(&entry_path, &dst_path)?;
        } else {
            fs::copy(&entry_path, &dst_path).map_err(|e| copy_error(&entry_path, &dst_path, &e))?;
        }
    }

    Ok(())
}

fn copy_error(from: &Path, to: &Path, err: &std::io::Error) -> DeployError {
    DeployError::CopyFailed {
        from: from.display().to_string(),
        to: to.display().to_string(),
        reason: err.to_string(),
    }
}
