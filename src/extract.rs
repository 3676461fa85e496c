//! IMG to image extraction.

use std::path::{Path, PathBuf};

use anyhow::Context;
use ghimg_format::{ImgError, ImgInfo, Payload, Platform};
use ghimg_texture::{dds, swap, tex0, Texture};

use crate::{filetype::FileType, io, tools::Toolchain};

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Resolves headers whose discriminator is shared by several platforms
    pub platform_hint: Option<Platform>,
    /// Stop after writing the native container
    pub native_only: bool,
}

#[derive(Debug, Clone)]
pub struct ExtractReport {
    pub info: ImgInfo,
    pub output: PathBuf,
}

pub fn inspect(
    bytes: &[u8],
    platform_hint: Option<Platform>,
) -> Result<ImgInfo, ImgError> {
    ImgInfo::parse(bytes, platform_hint)
}

/// Rebuilds the file an external decoder understands from an IMG file.
pub fn native_container(
    info: &ImgInfo,
    bytes: &[u8],
) -> Result<(FileType, Vec<u8>), ImgError> {
    let platform = info.platform();
    let payload = info.payload(bytes);

    match (platform.payload(), info.texture) {
        (Payload::Dds, Texture::Dds(format)) => {
            let mut data =
                dds::build_dds_header(info.width, info.height, info.mip_count, format)?;
            let start = data.len();
            data.extend_from_slice(payload);

            let pixels = &mut data[start..];
            if platform.swaps_16_bit() {
                swap::swap_bytes_16(pixels);
            }
            if platform.reverses_channels(info.texture) {
                swap::reverse_channels(pixels);
            }
            Ok((FileType::Dds, data))
        }
        (Payload::Tex0, Texture::Tex0(format)) => {
            let mut data =
                tex0::build_tex0_header(info.width, info.height, info.mip_count, format)?;
            data.extend_from_slice(payload);
            Ok((FileType::Tex0, data))
        }
        (Payload::Pvr, _) => Ok((FileType::Pvr, payload.to_vec())),
        (Payload::Gtx, _) => Err(ImgError::UnsupportedPlatform(platform)),
        (_, texture) => Err(ImgError::IncompatibleTexture { texture, platform }),
    }
}

/// Extracts `source` into the image `dest`.
///
/// With `native_only` the container is written next to `dest` with its own
/// extension and no decoder runs.
pub fn extract(
    tools: &dyn Toolchain,
    source: &Path,
    dest: &Path,
    options: ExtractOptions,
) -> anyhow::Result<ExtractReport> {
    let bytes =
        std::fs::read(source).with_context(|| format!("Failed to read {}", source.display()))?;
    let info = inspect(&bytes, options.platform_hint)?;
    debug!(
        "{}: {} {}x{}, {} mips, {}",
        source.display(),
        info.format,
        info.width,
        info.height,
        info.mip_count,
        info.texture
    );

    let (kind, native) = native_container(&info, &bytes)?;

    let output = if options.native_only {
        let native_path = dest.with_extension(kind.extension());
        std::fs::write(&native_path, &native)
            .with_context(|| format!("Failed to write {}", native_path.display()))?;
        native_path
    } else {
        let native_path = io::with_appended_extension(dest, kind.extension());
        std::fs::write(&native_path, &native)
            .with_context(|| format!("Failed to write {}", native_path.display()))?;

        let decoded = match kind {
            FileType::Tex0 => tools.tex0_decode(&native_path, dest),
            _ => tools.decompress(&native_path, dest),
        };
        io::remove_intermediate(&native_path);
        decoded.with_context(|| format!("Failed to decode {}", source.display()))?;
        dest.to_path_buf()
    };

    info!("Extracted {} to {}", source.display(), output.display());
    Ok(ExtractReport { info, output })
}
