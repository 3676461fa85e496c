//! Image to IMG conversion.
//!
//! An external tool produces the native container, which is then reframed:
//! DDS headers are replaced, GTX block headers are dropped, PVR metadata is
//! trimmed and TEX0 headers are folded into the 64 byte Wii header.

use std::path::{Path, PathBuf};

use anyhow::Context;
use ghimg_format::{ImgError, ImgFormat, Payload, Platform};
use ghimg_texture::{
    dds::DdsHeader, gtx, pvr, swap, tex0, ContainerFormat, DdsFormat, Tex0Format, Texture,
};

use crate::{
    filetype::FileType,
    io,
    tools::{CompressRequest, Toolchain},
};

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub format: ImgFormat,
    /// Texture format, or the platform default when unset.
    /// On Wii U a DDS format selects the intermediate DDS encoding.
    pub texture: Option<Texture>,
    pub mip_count: u32,
    pub resize: Option<(u32, u32)>,
    pub flip: bool,
}

#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub options: ConvertOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertReport {
    pub dest: PathBuf,
    pub width: u32,
    pub height: u32,
    pub mip_count: u32,
    pub texture: Texture,
    pub size: usize,
}

/// Picks the texture recorded in the header.
pub fn resolve_texture(
    platform: Platform,
    requested: Option<Texture>,
) -> Result<Texture, ImgError> {
    match (platform.payload(), requested) {
        (Payload::Gtx, Some(Texture::Dds(_))) => Ok(Texture::Container(ContainerFormat::Gtx)),
        (_, Some(texture)) if platform.accepts(texture) => Ok(texture),
        (_, Some(texture)) => Err(ImgError::IncompatibleTexture { texture, platform }),
        (_, None) => Ok(platform
            .default_texture()
            .unwrap_or(Texture::Dds(DdsFormat::Bc1))),
    }
}

pub fn convert(tools: &dyn Toolchain, request: &ConvertRequest) -> anyhow::Result<ConvertReport> {
    let options = &request.options;
    let platform = options.format.platform();
    if options.mip_count == 0 {
        return Err(ImgError::InvalidMipCount(0).into());
    }

    let texture = resolve_texture(platform, options.texture)?;
    debug!(
        "Converting {} to {} as {texture}",
        request.source.display(),
        options.format
    );

    let (data, (width, height)) = match (platform.payload(), texture) {
        (Payload::Dds, Texture::Dds(format)) => convert_dds(tools, request, texture, format)?,
        (Payload::Gtx, _) => {
            let intermediate = match options.texture {
                Some(Texture::Dds(format)) => format,
                _ => DdsFormat::Bc1,
            };
            convert_gtx(tools, request, texture, intermediate)?
        }
        (Payload::Pvr, _) => convert_pvr(tools, request, texture)?,
        (Payload::Tex0, Texture::Tex0(format)) => convert_tex0(tools, request, texture, format)?,
        _ => return Err(ImgError::IncompatibleTexture { texture, platform }.into()),
    };

    std::fs::write(&request.dest, &data)
        .with_context(|| format!("Failed to write {}", request.dest.display()))?;
    info!(
        "Wrote {} ({}, {width}x{height}, {} mips, {texture})",
        request.dest.display(),
        options.format,
        options.mip_count
    );

    Ok(ConvertReport {
        dest: request.dest.clone(),
        width,
        height,
        mip_count: options.mip_count,
        texture,
        size: data.len(),
    })
}

fn compress(
    tools: &dyn Toolchain,
    request: &ConvertRequest,
    dest: &Path,
    format: &str,
) -> anyhow::Result<Vec<u8>> {
    let options = &request.options;
    tools
        .compress(&CompressRequest {
            source: &request.source,
            dest,
            format,
            resize: options.resize,
            mip_count: options.mip_count,
            flip: options.flip,
        })
        .with_context(|| format!("Failed to compress {}", request.source.display()))?;

    io::take_file(dest)
}

fn convert_dds(
    tools: &dyn Toolchain,
    request: &ConvertRequest,
    texture: Texture,
    format: DdsFormat,
) -> anyhow::Result<(Vec<u8>, (u32, u32))> {
    let options = &request.options;
    let platform = options.format.platform();

    let native_path = io::with_appended_extension(&request.dest, FileType::Dds.extension());
    let blob = compress(tools, request, &native_path, format.compressor_name())?;
    let dds = DdsHeader::read(&blob)?;
    let size = options
        .resize
        .unwrap_or((dds.preamble.width, dds.preamble.height));

    let mut payload = blob[dds.size()..].to_vec();
    if platform.reverses_channels(texture) {
        swap::reverse_channels(&mut payload);
    }
    if platform.swaps_16_bit() {
        swap::swap_bytes_16(&mut payload);
    }

    let mut data = options
        .format
        .build_header(size.0, size.1, texture, options.mip_count)?;
    data.extend_from_slice(&payload);
    Ok((data, size))
}

fn convert_gtx(
    tools: &dyn Toolchain,
    request: &ConvertRequest,
    texture: Texture,
    intermediate: DdsFormat,
) -> anyhow::Result<(Vec<u8>, (u32, u32))> {
    let options = &request.options;

    let dds_path = io::with_appended_extension(&request.dest, FileType::Dds.extension());
    let gtx_path = io::with_appended_extension(&request.dest, FileType::Gtx.extension());
    tools
        .compress(&CompressRequest {
            source: &request.source,
            dest: &dds_path,
            format: intermediate.compressor_name(),
            resize: options.resize,
            mip_count: options.mip_count,
            flip: options.flip,
        })
        .with_context(|| format!("Failed to compress {}", request.source.display()))?;
    let dds_blob = std::fs::read(&dds_path)
        .with_context(|| format!("Failed to read {}", dds_path.display()))?;
    let dds = DdsHeader::read(&dds_blob)?;

    let encoded = tools.dds_to_gtx(&dds_path, &gtx_path);
    io::remove_intermediate(&dds_path);
    encoded.with_context(|| format!("Failed to convert {} to GTX", dds_path.display()))?;

    let size = options
        .resize
        .unwrap_or((dds.preamble.width, dds.preamble.height));
    let mut data = gtx::strip_blocks(&io::take_file(&gtx_path)?)?;
    let header = options
        .format
        .build_header(size.0, size.1, texture, options.mip_count)?;
    // The IMG header replaces the start of the GX2 file header
    data[..header.len()].copy_from_slice(&header);
    Ok((data, size))
}

fn convert_pvr(
    tools: &dyn Toolchain,
    request: &ConvertRequest,
    texture: Texture,
) -> anyhow::Result<(Vec<u8>, (u32, u32))> {
    let options = &request.options;
    let native_path = io::with_appended_extension(&request.dest, FileType::Pvr.extension());
    let blob = compress(tools, request, &native_path, ContainerFormat::PVR_COMPRESSOR)?;
    let size = match options.resize {
        Some(size) => size,
        None => pvr::read_pvr_size(&blob)?,
    };

    let mut data = options
        .format
        .build_header(size.0, size.1, texture, options.mip_count)?;
    data.extend_from_slice(&pvr::strip_metadata(&blob)?);
    Ok((data, size))
}

fn convert_tex0(
    tools: &dyn Toolchain,
    request: &ConvertRequest,
    texture: Texture,
    format: Tex0Format,
) -> anyhow::Result<(Vec<u8>, (u32, u32))> {
    let options = &request.options;
    if options.resize.is_some() || options.flip {
        warn!(
            "TEX0 encoding ignores resize and flip, encoding {} as is",
            request.source.display()
        );
    }

    let native_path = io::with_appended_extension(&request.dest, FileType::Tex0.extension());
    tools
        .tex0_encode(&request.source, &native_path, format, options.mip_count)
        .with_context(|| format!("Failed to encode {}", request.source.display()))?;
    let mut blob = io::take_file(&native_path)?;

    let (width, height) = tex0::read_tex0_size(&blob)?;
    tex0::truncate_payload(&mut blob, width, height, options.mip_count, format)?;

    let mut data =
        options
            .format
            .build_container_header(width, height, texture, options.mip_count)?;
    data.extend_from_slice(&blob[tex0::HEADER_SIZE..]);
    Ok((data, (width, height)))
}
