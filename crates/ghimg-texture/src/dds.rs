//! DirectDraw Surface headers.
//!
//! A DDS header is an 84 byte preamble shared by every format, followed by a
//! format specific trailer: the FourCC and the rest of the pixel format, the
//! caps words and, for formats without a legacy FourCC, a DX10 extension header.

use std::io::Cursor;

use binrw::{binrw, BinRead, BinWrite};

use crate::{
    error::{Result, TextureError},
    format::{BlockTextureFormat, DdsFormat},
};

pub const PREAMBLE_SIZE: usize = 84;

const HEADER_STRUCT_SIZE: u32 = 124;
const PIXEL_FORMAT_SIZE: u32 = 32;

const DDSD_CAPS: u32 = 0x1;
const DDSD_HEIGHT: u32 = 0x2;
const DDSD_WIDTH: u32 = 0x4;
const DDSD_PITCH: u32 = 0x8;
const DDSD_PIXELFORMAT: u32 = 0x1000;
const DDSD_MIPMAPCOUNT: u32 = 0x20000;
const DDSD_LINEARSIZE: u32 = 0x80000;

const DDPF_FOURCC: u32 = 0x4;

const DDSCAPS_COMPLEX: u32 = 0x8;
const DDSCAPS_TEXTURE: u32 = 0x1000;
const DDSCAPS_MIPMAP: u32 = 0x400000;

pub const CAPS_TEXTURE: u32 = DDSCAPS_TEXTURE;
pub const CAPS_MIPMAPPED: u32 = DDSCAPS_COMPLEX | DDSCAPS_TEXTURE | DDSCAPS_MIPMAP;

const D3D10_RESOURCE_DIMENSION_TEXTURE2D: u32 = 3;

#[binrw]
#[brw(little, magic = b"DDS ")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdsPreamble {
    pub size: u32,
    pub flags: u32,
    pub height: u32,
    pub width: u32,
    pub pitch_or_linear_size: u32,
    pub depth: u32,
    pub mip_map_count: u32,
    pub reserved1: [u32; 11],
    pub pixel_format_size: u32,
    pub pixel_format_flags: u32,
}

#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdsTrailer {
    pub four_cc: [u8; 4],
    pub rgb_bit_count: u32,
    /// R, G, B and A masks
    pub bit_masks: [u32; 4],
    pub caps: u32,
    /// caps2, caps3 and caps4
    pub extra_caps: [u32; 3],
    pub reserved2: u32,

    #[br(if(four_cc == *b"DX10"))]
    pub dx10: Option<Dx10Header>,
}

impl DdsTrailer {
    pub const BASE_SIZE: usize = 44;

    fn for_format(format: DdsFormat, mip_count: u32) -> Self {
        Self {
            four_cc: format.four_cc(),
            rgb_bit_count: 0,
            bit_masks: [0; 4],
            caps: if mip_count > 1 {
                CAPS_MIPMAPPED
            } else {
                CAPS_TEXTURE
            },
            extra_caps: [0; 3],
            reserved2: 0,
            dx10: format.dxgi_format().map(|dxgi_format| Dx10Header {
                dxgi_format,
                resource_dimension: D3D10_RESOURCE_DIMENSION_TEXTURE2D,
                misc_flag: 0,
                array_size: 1,
                misc_flags2: 0,
            }),
        }
    }

    pub fn size(&self) -> usize {
        Self::BASE_SIZE + self.dx10.as_ref().map_or(0, |_| Dx10Header::SIZE)
    }
}

#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dx10Header {
    pub dxgi_format: u32,
    pub resource_dimension: u32,
    pub misc_flag: u32,
    pub array_size: u32,
    pub misc_flags2: u32,
}

impl Dx10Header {
    pub const SIZE: usize = 20;
}

#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdsHeader {
    pub preamble: DdsPreamble,
    pub trailer: DdsTrailer,
}

impl DdsHeader {
    pub fn new(width: u32, height: u32, mip_count: u32, format: DdsFormat) -> Result<Self> {
        let pitch_or_linear_size = if format.is_compressed() {
            format.mip_chain_size(width, height, mip_count)?
        } else {
            format.pitch(width)
        };
        let pitch_or_linear_size =
            u32::try_from(pitch_or_linear_size).map_err(|_| TextureError::TooLarge {
                field: "DDS pitch/linear size",
                value: pitch_or_linear_size.into(),
            })?;

        Ok(Self {
            preamble: DdsPreamble {
                size: HEADER_STRUCT_SIZE,
                flags: header_flags(format, mip_count),
                height,
                width,
                pitch_or_linear_size,
                depth: 1,
                mip_map_count: mip_count,
                reserved1: [0; 11],
                pixel_format_size: PIXEL_FORMAT_SIZE,
                pixel_format_flags: DDPF_FOURCC,
            },
            trailer: DdsTrailer::for_format(format, mip_count),
        })
    }

    pub fn size(&self) -> usize {
        PREAMBLE_SIZE + self.trailer.size()
    }

    pub fn read(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < PREAMBLE_SIZE + DdsTrailer::BASE_SIZE {
            return Err(TextureError::truncated(
                "DDS",
                PREAMBLE_SIZE + DdsTrailer::BASE_SIZE,
                bytes.len(),
            ));
        }

        Ok(Self::read_le(&mut Cursor::new(bytes))?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut c = Cursor::new(Vec::with_capacity(self.size()));
        self.write_le(&mut c)?;
        Ok(c.into_inner())
    }
}

fn header_flags(format: DdsFormat, mip_count: u32) -> u32 {
    let mut flags = DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT;
    flags |= if format.is_compressed() {
        DDSD_LINEARSIZE
    } else {
        DDSD_PITCH
    };
    if mip_count > 1 {
        flags |= DDSD_MIPMAPCOUNT;
    }
    flags
}

/// Length of the header [`build_dds_header`] produces for `format`.
pub fn header_size(format: DdsFormat) -> usize {
    PREAMBLE_SIZE
        + DdsTrailer::BASE_SIZE
        + format.dxgi_format().map_or(0, |_| Dx10Header::SIZE)
}

pub fn build_dds_header(
    width: u32,
    height: u32,
    mip_count: u32,
    format: DdsFormat,
) -> Result<Vec<u8>> {
    DdsHeader::new(width, height, mip_count, format)?.to_bytes()
}

/// Reads `(width, height)` from the preamble of a DDS file.
pub fn read_dds_size(bytes: &[u8]) -> Result<(u32, u32)> {
    if bytes.len() < PREAMBLE_SIZE {
        return Err(TextureError::truncated("DDS", PREAMBLE_SIZE, bytes.len()));
    }

    let preamble = DdsPreamble::read_le(&mut Cursor::new(bytes))?;
    Ok((preamble.width, preamble.height))
}
