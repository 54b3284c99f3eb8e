//! BLAKE3 fingerprint of the produced archive
//!
//! The digest is printed after every build so two packages can be compared
//! without unzipping them.

use std::fs::File;
use std::path::Path;

use crate::error::{DeployError, Result};

/// Prefix naming the algorithm in a printed digest
pub const DIGEST_PREFIX: &str = "blake3:";

/// Digest of a written archive, e.g. `blake3:af13…`
pub fn archive_digest(archive: &Path) -> Result<String> {
    let read_failed = |e: std::io::Error| DeployError::FileReadFailed {
        path: archive.display().to_string(),
        reason: e.to_string(),
    };

    let file = File::open(archive).map_err(read_failed)?;
    let mut hasher = blake3::Hasher::new();
    hasher.update_reader(file).map_err(read_failed)?;

    Ok(format!("{DIGEST_PREFIX}{}", hasher.finalize().to_hex()))
}
