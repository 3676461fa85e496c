//! Wii TEX0 texture chunks.

use std::io::Cursor;

use binrw::{binrw, BinRead, BinWrite};

use crate::{
    error::{Result, TextureError},
    format::{BlockTextureFormat, Tex0Format},
};

pub const HEADER_SIZE: usize = 64;

const VERSION: u32 = 3;

#[binrw]
#[brw(big, magic = b"TEX0")]
#[derive(Debug, Clone, PartialEq)]
pub struct Tex0Header {
    /// Header and payload
    pub size: u32,
    pub version: u32,
    pub reserved0: u32,
    pub data_offset: u32,
    pub size_copy: u32,
    pub reserved1: u32,
    pub width: u16,
    pub height: u16,
    /// GX format id
    pub format: u32,
    pub mip_count: u32,
    pub reserved2: u32,
    pub max_lod: f32,
    pub reserved3: [u8; 16],
}

impl Tex0Header {
    pub fn new(width: u32, height: u32, mip_count: u32, format: Tex0Format) -> Result<Self> {
        let total = HEADER_SIZE as u128 + format.mip_chain_size(width, height, mip_count)? as u128;
        let size = u32::try_from(total).map_err(|_| TextureError::TooLarge {
            field: "TEX0 size",
            value: total,
        })?;

        Ok(Self {
            size,
            version: VERSION,
            reserved0: 0,
            data_offset: HEADER_SIZE as u32,
            size_copy: size,
            reserved1: 0,
            width: dimension(width, "TEX0 width")?,
            height: dimension(height, "TEX0 height")?,
            format: format.gx_id(),
            mip_count,
            reserved2: 0,
            max_lod: mip_count as f32 - 1.0,
            reserved3: [0; 16],
        })
    }

    pub fn read(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(TextureError::truncated("TEX0", HEADER_SIZE, bytes.len()));
        }

        Ok(Self::read_be(&mut Cursor::new(bytes))?)
    }

    pub fn texture_format(&self) -> Result<Tex0Format> {
        Tex0Format::from_gx_id(self.format)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut c = Cursor::new(Vec::with_capacity(HEADER_SIZE));
        self.write_be(&mut c)?;
        Ok(c.into_inner())
    }
}

fn dimension(value: u32, field: &'static str) -> Result<u16> {
    u16::try_from(value).map_err(|_| TextureError::TooLarge {
        field,
        value: value.into(),
    })
}

pub fn build_tex0_header(
    width: u32,
    height: u32,
    mip_count: u32,
    format: Tex0Format,
) -> Result<Vec<u8>> {
    Tex0Header::new(width, height, mip_count, format)?.to_bytes()
}

/// Reads `(width, height)` from a TEX0 header.
pub fn read_tex0_size(bytes: &[u8]) -> Result<(u32, u32)> {
    let header = Tex0Header::read(bytes)?;
    Ok((header.width as u32, header.height as u32))
}

/// Drops anything an encoder left after the pixel data, such as name tables.
pub fn truncate_payload(
    blob: &mut Vec<u8>,
    width: u32,
    height: u32,
    mip_count: u32,
    format: Tex0Format,
) -> Result<()> {
    let expected = HEADER_SIZE as u128 + format.mip_chain_size(width, height, mip_count)? as u128;
    let expected = usize::try_from(expected).map_err(|_| TextureError::TooLarge {
        field: "TEX0 size",
        value: expected,
    })?;
    if blob.len() < expected {
        return Err(TextureError::truncated("TEX0", expected, blob.len()));
    }

    if blob.len() > expected {
        tracing::trace!("Dropping {} trailing TEX0 bytes", blob.len() - expected);
    }
    blob.truncate(expected);
    Ok(())
}
