//! The external programs that produce and consume native texture containers.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::Context;
use ghimg_texture::{Tex0Format, TextureFormat};

use crate::config::ToolPaths;

#[derive(Debug, Clone)]
pub struct CompressRequest<'a> {
    pub source: &'a Path,
    pub dest: &'a Path,
    /// Compressor format name, e.g. `BC1` or `PVRTC1_4_RGB`
    pub format: &'a str,
    pub resize: Option<(u32, u32)>,
    pub mip_count: u32,
    pub flip: bool,
}

pub trait Toolchain {
    /// Compresses an ordinary image into a native container (DDS or PVR, picked by `dest`).
    fn compress(&self, request: &CompressRequest) -> anyhow::Result<()>;

    /// Decompresses a native container back into an ordinary image.
    fn decompress(&self, source: &Path, dest: &Path) -> anyhow::Result<()>;

    fn dds_to_gtx(&self, source: &Path, dest: &Path) -> anyhow::Result<()>;

    fn tex0_encode(
        &self,
        source: &Path,
        dest: &Path,
        format: Tex0Format,
        mip_count: u32,
    ) -> anyhow::Result<()>;

    fn tex0_decode(&self, source: &Path, dest: &Path) -> anyhow::Result<()>;
}

pub struct ExternalTools {
    paths: ToolPaths,
}

impl ExternalTools {
    pub fn new(paths: ToolPaths) -> Self {
        Self { paths }
    }

    pub fn compress_command(&self, request: &CompressRequest) -> Command {
        let mut cmd = Command::new(&self.paths.pvrtextool);
        cmd.arg("-i")
            .arg(request.source)
            .arg("-o")
            .arg(request.dest)
            .arg("-f")
            .arg(request.format)
            .arg("-m")
            .arg(request.mip_count.to_string());
        if let Some((width, height)) = request.resize {
            cmd.arg("-r").arg(format!("{width},{height}"));
        }
        if request.flip {
            cmd.args(["-flip", "y"]);
        }
        cmd
    }

    pub fn decompress_command(&self, source: &Path, dest: &Path) -> Command {
        let mut cmd = Command::new(&self.paths.pvrtextool);
        cmd.arg("-i").arg(source).arg("-d").arg(dest);
        cmd
    }

    pub fn gtx_command(&self, source: &Path, dest: &Path) -> Command {
        let mut cmd = Command::new(&self.paths.texconv2);
        cmd.arg("-i").arg(source).arg("-o").arg(dest);
        cmd
    }

    pub fn tex0_encode_command(
        &self,
        source: &Path,
        dest: &Path,
        format: Tex0Format,
        mip_count: u32,
    ) -> Command {
        let mut cmd = Command::new(&self.paths.wimgt);
        cmd.arg("encode")
            .arg(source)
            .arg("-d")
            .arg(dest)
            .arg("-x")
            .arg(format!("TEX.{}", format.name()))
            // wimgt counts mipmaps without the base level
            .arg(format!("--n-mm={}", mip_count.saturating_sub(1)))
            .arg("-o");
        cmd
    }

    pub fn tex0_decode_command(&self, source: &Path, dest: &Path) -> Command {
        let mut cmd = Command::new(&self.paths.wimgt);
        cmd.arg("decode").arg(source).arg("-d").arg(dest).arg("-o");
        cmd
    }

    fn run(&self, mut cmd: Command) -> anyhow::Result<()> {
        let program = PathBuf::from(cmd.get_program());
        debug!("Running {cmd:?}");

        let output = cmd
            .output()
            .with_context(|| format!("Failed to run {}", program.display()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "{} exited with {}: {}",
                program.display(),
                output.status,
                stderr.trim()
            );
        }

        Ok(())
    }
}

impl Toolchain for ExternalTools {
    fn compress(&self, request: &CompressRequest) -> anyhow::Result<()> {
        self.run(self.compress_command(request))
    }

    fn decompress(&self, source: &Path, dest: &Path) -> anyhow::Result<()> {
        self.run(self.decompress_command(source, dest))
    }

    fn dds_to_gtx(&self, source: &Path, dest: &Path) -> anyhow::Result<()> {
        self.run(self.gtx_command(source, dest))
    }

    fn tex0_encode(
        &self,
        source: &Path,
        dest: &Path,
        format: Tex0Format,
        mip_count: u32,
    ) -> anyhow::Result<()> {
        self.run(self.tex0_encode_command(source, dest, format, mip_count))
    }

    fn tex0_decode(&self, source: &Path, dest: &Path) -> anyhow::Result<()> {
        self.run(self.tex0_decode_command(source, dest))
    }
}
