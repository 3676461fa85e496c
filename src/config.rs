use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Locations of the external texture tools.
///
/// Every entry may be a bare executable name resolved through `PATH`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    /// Compressor and decompressor for DDS and PVR textures
    pub pvrtextool: PathBuf,
    /// DDS to GTX converter
    pub texconv2: PathBuf,
    /// TEX0 encoder and decoder
    pub wimgt: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            pvrtextool: "PVRTexToolCLI".into(),
            texconv2: "TexConv2".into(),
            wimgt: "wimgt".into(),
        }
    }
}

impl ToolPaths {
    pub const DEFAULT_FILE: &'static str = "ghimg.json";

    /// Loads the given config file, or `ghimg.json` from the working directory if it exists.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let fallback = PathBuf::from(Self::DEFAULT_FILE);
                if !fallback.is_file() {
                    debug!("No {} found, using default tool paths", Self::DEFAULT_FILE);
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let data = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let paths = Self::from_json(&data)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        debug!("Loaded tool paths from {}: {paths:?}", path.display());

        Ok(paths)
    }

    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }
}
