use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use anyhow::Context;

/// `cover.img` + `dds` becomes `cover.img.dds`.
pub fn with_appended_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Reads an intermediate file left behind by an external tool, then deletes it.
pub fn take_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    remove_intermediate(path);
    Ok(data)
}

pub fn remove_intermediate(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        warn!("Failed to remove {}: {e}", path.display());
    }
}
