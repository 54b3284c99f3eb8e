//! Zip archive writing
//!
//! Every regular file under the staging root becomes one deflated entry named
//! by its path relative to that root, so the archive layout mirrors the
//! staging tree with no staging-directory prefix.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use indicatif::HumanBytes;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::slash_path;
use crate::error::{DeployError, Result};
use crate::hash;
use crate::progress::ArchiveProgress;

/// Summary of a written archive
#[derive(Debug, Clone)]
pub struct ArchiveReport {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub entries: usize,
    pub digest: String,
}

impl ArchiveReport {
    /// Size in binary units, e.g. `12.34 MiB`
    pub fn human_size(&self) -> String {
        HumanBytes(self.size_bytes).to_string()
    }
}

/// A file to archive and its entry name
struct ArchiveEntry {
    source: PathBuf,
    name: String,
}

/// List every file under `root` in sorted walk order
fn collect_entries(root: &Path) -> Result<Vec<ArchiveEntry>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| DeployError::FileReadFailed {
            path: e
                .path()
                .map_or_else(|| root.display().to_string(), |p| p.display().to_string()),
            reason: e.to_string(),
        })?;

        // Symlinked files are archived by content
        if !entry.path().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        entries.push(ArchiveEntry {
            source: entry.path().to_path_buf(),
            name: slash_path(relative),
        });
    }

    Ok(entries)
}

/// Compress `staging` into a new archive at `archive`
pub fn write_archive(staging: &Path, archive: &Path) -> Result<ArchiveReport> {
    let entries = collect_entries(staging)?;
    let progress = ArchiveProgress::new(entries.len() as u64);

    match write_entries(&entries, archive, &progress) {
        Ok(()) => progress.finish(),
        Err(e) => {
            progress.abandon();
            return Err(e);
        }
    }

    let size_bytes = fs::metadata(archive)
        .map_err(|e| write_error(archive, &e))?
        .len();

    Ok(ArchiveReport {
        path: archive.to_path_buf(),
        size_bytes,
        entries: entries.len(),
        digest: hash::archive_digest(archive)?,
    })
}

fn write_entries(entries: &[ArchiveEntry], archive: &Path, progress: &ArchiveProgress) -> Result<()> {
    if let Some(parent) = archive.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| DeployError::CreateDirFailed {
            path: parent.display().to_string(),
            reason: e.to_string(),
        })?;
    }

    let file = File::create(archive).map_err(|e| write_error(archive, &e))?;
    let mut zip = ZipWriter::new(file);

    for entry in entries {
        let metadata = fs::metadata(&entry.source).map_err(|e| DeployError::FileReadFailed {
            path: entry.source.display().to_string(),
            reason: e.to_string(),
        })?;

        zip.start_file(entry.name.as_str(), entry_options(&metadata))
            .map_err(|e| write_error(archive, &e))?;

        let mut source = File::open(&entry.source).map_err(|e| DeployError::FileReadFailed {
            path: entry.source.display().to_string(),
            reason: e.to_string(),
        })?;
        io::copy(&mut source, &mut zip).map_err(|e| write_error(archive, &e))?;

        progress.update_file(&entry.name);
    }

    zip.finish().map_err(|e| write_error(archive, &e))?;
    Ok(())
}

fn entry_options(metadata: &fs::Metadata) -> SimpleFileOptions {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .large_file(metadata.len() >= u64::from(u32::MAX));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        options.unix_permissions(metadata.permissions().mode() & 0o7777)
    }
    #[cfg(not(unix))]
    {
        options
    }
}

fn write_error(archive: &Path, err: &dyn std::fmt::Display) -> DeployError {
    DeployError::ArchiveWriteFailed {
        path: archive.display().to_string(),
        reason: err.to_string(),
    }
}
