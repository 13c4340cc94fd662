use std::{
    fs::{self, Metadata},
    io,
    path::{Path, PathBuf},
};

use crate::{FatalManifestError, UnikitResult};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Resolves a host path under the target root, if one is set.
///
/// The target root points at an alternative root filesystem (e.g. an
/// extracted image) that manifest entries are validated against instead of
/// the real `/`.
pub fn resolve_under_root(target_root: Option<&Path>, host_path: &Path) -> PathBuf {
    match target_root {
        Some(root) => root.join(host_path.strip_prefix("/").unwrap_or(host_path)),
        None => host_path.to_path_buf(),
    }
}

/// Looks up a host file referenced by a manifest entry.
///
/// A missing file is a [`FatalManifestError::MissingHostFile`]: an image
/// referencing content it cannot read is unusable, so the build must stop.
/// Other lookup failures propagate as ordinary I/O errors.
pub fn lookup_file(target_root: Option<&Path>, host_path: &Path) -> UnikitResult<Metadata> {
    let resolved = resolve_under_root(target_root, host_path);
    match fs::metadata(&resolved) {
        Ok(metadata) => Ok(metadata),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(FatalManifestError::MissingHostFile(resolved).into())
        }
        Err(e) => Err(e.into()),
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
