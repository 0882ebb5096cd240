use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

pub fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Resolves `path` against `base_dir`, unless it is already absolute.
pub fn resolve_in(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Checks that `base_dir` exists and is a directory.
pub fn check_base_dir(base_dir: &Path) -> Result<()> {
    if !base_dir.exists() {
        bail!("Base directory '{}' does not exist.", path_to_string(base_dir));
    } else if !base_dir.is_dir() {
        bail!("Base directory '{}' is not a directory.", path_to_string(base_dir));
    }
    Ok(())
}
