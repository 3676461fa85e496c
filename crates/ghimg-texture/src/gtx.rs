//! Wii U GX2 (GTX) containers.
//!
//! Only the block framing is touched here, the surface itself stays tiled
//! exactly as the encoder produced it.

use crate::error::{Result, TextureError};

pub const FILE_HEADER_SIZE: usize = 32;
pub const BLOCK_HEADER_SIZE: usize = 32;
/// Start and end of the GX2 surface description, right after the first block header.
const SURFACE_INFO: std::ops::Range<usize> = 64..220;

const FILE_MAGIC: &[u8; 4] = b"Gfx2";
const BLOCK_MAGIC: &[u8; 4] = b"BLK{";

/// Removes the surface info block header and the end-of-file block.
///
/// The surface info ends up at offset 32, directly after the file header.
pub fn strip_blocks(blob: &[u8]) -> Result<Vec<u8>> {
    let minimum = SURFACE_INFO.end + BLOCK_HEADER_SIZE;
    if blob.len() < minimum {
        return Err(TextureError::truncated("GTX", minimum, blob.len()));
    }

    expect_magic(blob, 0, FILE_MAGIC)?;
    expect_magic(blob, FILE_HEADER_SIZE, BLOCK_MAGIC)?;
    let eof_block = blob.len() - BLOCK_HEADER_SIZE;
    expect_magic(blob, eof_block, BLOCK_MAGIC)?;

    let mut out = Vec::with_capacity(blob.len() - 2 * BLOCK_HEADER_SIZE);
    out.extend_from_slice(&blob[..FILE_HEADER_SIZE]);
    out.extend_from_slice(&blob[SURFACE_INFO.start..eof_block]);
    Ok(out)
}

fn expect_magic(blob: &[u8], offset: usize, magic: &[u8; 4]) -> Result<()> {
    let found = &blob[offset..offset + 4];
    if found != magic {
        return Err(TextureError::UnknownFormat(format!(
            "GTX block at 0x{offset:X} starts with {found:02X?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_gtx(payload: &[u8]) -> Vec<u8> {
        let mut blob = vec![];
        blob.extend_from_slice(FILE_MAGIC);
        blob.resize(FILE_HEADER_SIZE, 0x01);
        blob.extend_from_slice(BLOCK_MAGIC);
        blob.resize(64, 0x02);
        blob.resize(SURFACE_INFO.end, 0x03);
        blob.extend_from_slice(BLOCK_MAGIC);
        blob.resize(SURFACE_INFO.end + BLOCK_HEADER_SIZE, 0x04);
        blob.extend_from_slice(payload);
        blob.extend_from_slice(BLOCK_MAGIC);
        blob.resize(blob.len() + BLOCK_HEADER_SIZE - 4, 0x05);
        blob
    }

    #[test]
    fn surface_info_moves_to_offset_32() {
        let payload = [0xAB; 64];
        let blob = sample_gtx(&payload);
        let stripped = strip_blocks(&blob).unwrap();

        assert_eq!(stripped.len(), blob.len() - 64);
        assert_eq!(&stripped[..4], FILE_MAGIC);
        assert!(stripped[32..188].iter().all(|b| *b == 0x03));
        assert_eq!(&stripped[188..192], BLOCK_MAGIC);
        assert!(stripped.ends_with(&payload));
        assert!(!stripped.contains(&0x05));
    }

    #[test]
    fn rejects_other_containers() {
        let mut blob = sample_gtx(&[0; 16]);
        blob[0..4].copy_from_slice(b"DDS ");
        assert!(matches!(
            strip_blocks(&blob),
            Err(TextureError::UnknownFormat(_))
        ));
        assert!(strip_blocks(&blob[..100]).is_err());
    }
}
