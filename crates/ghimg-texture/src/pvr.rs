//! PowerVR (v3) containers, as produced for iOS.

use std::io::Cursor;

use binrw::{binrw, BinRead, BinWrite};

use crate::error::{Result, TextureError};

pub const HEADER_SIZE: usize = 52;

/// Metadata bytes the games expect after the header.
pub const KEPT_METADATA_SIZE: u32 = 15;
/// Metadata the compressor writes that has to go.
const DROPPED_METADATA: std::ops::Range<usize> = 67..91;

#[binrw]
#[brw(little, magic = b"PVR\x03")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PvrHeader {
    pub flags: u32,
    pub pixel_format: u64,
    pub colour_space: u32,
    pub channel_type: u32,
    pub height: u32,
    pub width: u32,
    pub depth: u32,
    pub surfaces: u32,
    pub faces: u32,
    pub mip_count: u32,
    pub metadata_size: u32,
}

impl PvrHeader {
    pub fn read(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(TextureError::truncated("PVR", HEADER_SIZE, bytes.len()));
        }

        Ok(Self::read_le(&mut Cursor::new(bytes))?)
    }
}

pub fn read_pvr_size(bytes: &[u8]) -> Result<(u32, u32)> {
    let header = PvrHeader::read(bytes)?;
    Ok((header.width, header.height))
}

/// Trims compressor metadata so that only the 15 byte block the games read is left.
pub fn strip_metadata(blob: &[u8]) -> Result<Vec<u8>> {
    if blob.len() < DROPPED_METADATA.end {
        return Err(TextureError::truncated(
            "PVR",
            DROPPED_METADATA.end,
            blob.len(),
        ));
    }

    let mut header = PvrHeader::read(blob)?;
    header.metadata_size = KEPT_METADATA_SIZE;

    let mut c = Cursor::new(Vec::with_capacity(blob.len() - DROPPED_METADATA.len()));
    header.write_le(&mut c)?;
    let mut out = c.into_inner();
    out.extend_from_slice(&blob[HEADER_SIZE..DROPPED_METADATA.start]);
    out.extend_from_slice(&blob[DROPPED_METADATA.end..]);
    Ok(out)
}
