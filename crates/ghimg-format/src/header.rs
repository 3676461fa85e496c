use std::io::Cursor;

use binrw::{binrw, BinRead, BinWrite, Endian};

use crate::error::{ImgError, Result};

/// The normalized IMG header.
///
/// Multi-byte fields use the byte order of the owning platform. The 6 byte
/// discriminator occupies bytes 14..20, but its middle two bytes always hold
/// the stored mip count, so only its first and last pairs survive on disk.
#[binrw]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImgHeader {
    pub width: u16,
    pub height: u16,
    pub depth: u16,
    /// Always equal to the width
    pub pitch: u16,
    pub format_tag: u32,
    pub alpha_tag: u16,
    pub tag_prefix: [u8; 2],
    /// Mip count minus the platform's mip bias
    pub stored_mip_count: u16,
    pub tag_suffix: [u8; 2],
}

impl ImgHeader {
    pub const SIZE: usize = 20;

    pub fn read(bytes: &[u8], endian: Endian) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(ImgError::Truncated {
                expected: Self::SIZE,
                actual: bytes.len(),
            });
        }

        Ok(Self::read_options(&mut Cursor::new(bytes), endian, ())?)
    }

    pub fn to_bytes(&self, endian: Endian) -> Result<Vec<u8>> {
        let mut c = Cursor::new(Vec::with_capacity(Self::SIZE));
        self.write_options(&mut c, endian, ())?;
        Ok(c.into_inner())
    }
}
