#![allow(dead_code)]

use std::{cell::RefCell, path::Path};

use ghimg::{
    texture::{dds, tex0, BlockTextureFormat, DdsFormat, Tex0Format},
    tools::{CompressRequest, Toolchain},
};

/// Writes canned native containers instead of running the real tools.
pub struct FakeTools {
    pub width: u32,
    pub height: u32,
    pub calls: RefCell<Vec<String>>,
}

impl FakeTools {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            calls: RefCell::new(vec![]),
        }
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 % 251) as u8).collect()
}

pub fn fake_dds(width: u32, height: u32, mip_count: u32, format: DdsFormat) -> Vec<u8> {
    let mut blob = dds::build_dds_header(width, height, mip_count, format).unwrap();
    blob.extend(pattern(
        format.mip_chain_size(width, height, mip_count).unwrap() as usize,
    ));
    blob
}

/// A PVR v3 file carrying 39 bytes of metadata, like the compressor writes.
pub fn fake_pvr(width: u32, height: u32, mip_count: u32) -> Vec<u8> {
    let mut blob = b"PVR\x03".to_vec();
    blob.extend(0u32.to_le_bytes()); // flags
    blob.extend(2u64.to_le_bytes()); // PVRTC 4bpp RGB
    blob.extend(0u32.to_le_bytes()); // colour space
    blob.extend(0u32.to_le_bytes()); // channel type
    blob.extend(height.to_le_bytes());
    blob.extend(width.to_le_bytes());
    blob.extend(1u32.to_le_bytes()); // depth
    blob.extend(1u32.to_le_bytes()); // surfaces
    blob.extend(1u32.to_le_bytes()); // faces
    blob.extend(mip_count.to_le_bytes());
    blob.extend(39u32.to_le_bytes());
    blob.extend([0xEE; 39]);
    blob.extend(pattern((width * height / 2) as usize));
    blob
}

/// A GX2 file: file header, surface info block, image block, end block.
pub fn fake_gtx(surface: &[u8]) -> Vec<u8> {
    let mut blob = b"Gfx2".to_vec();
    blob.resize(32, 0x11);
    blob.extend(b"BLK{");
    blob.resize(64, 0x22);
    blob.resize(220, 0x33);
    blob.extend(b"BLK{");
    blob.resize(252, 0x44);
    blob.extend(surface);
    blob.extend(b"BLK{");
    blob.resize(blob.len() + 28, 0x55);
    blob
}

pub fn fake_tex0(width: u32, height: u32, mip_count: u32, format: Tex0Format) -> Vec<u8> {
    let mut blob = tex0::build_tex0_header(width, height, mip_count, format).unwrap();
    blob.extend(pattern(
        format.mip_chain_size(width, height, mip_count).unwrap() as usize,
    ));
    // wimgt appends a string pool
    blob.extend(b"\0\0\0\x05cover\0\0");
    blob
}

impl Toolchain for FakeTools {
    fn compress(&self, request: &CompressRequest) -> anyhow::Result<()> {
        self.record(format!("compress {}", request.format));
        let (width, height) = request.resize.unwrap_or((self.width, self.height));

        let is_pvr = request.dest.extension().is_some_and(|e| e == "pvr");
        let blob = if is_pvr {
            fake_pvr(width, height, request.mip_count)
        } else {
            let format = DdsFormat::ALL
                .into_iter()
                .find(|f| f.compressor_name() == request.format)
                .ok_or_else(|| anyhow::anyhow!("unexpected format {}", request.format))?;
            fake_dds(width, height, request.mip_count, format)
        };

        std::fs::write(request.dest, blob)?;
        Ok(())
    }

    fn decompress(&self, source: &Path, dest: &Path) -> anyhow::Result<()> {
        self.record("decompress".to_string());
        let mut image = b"\x89PNG".to_vec();
        image.extend(std::fs::read(source)?);
        std::fs::write(dest, image)?;
        Ok(())
    }

    fn dds_to_gtx(&self, source: &Path, dest: &Path) -> anyhow::Result<()> {
        self.record("dds_to_gtx".to_string());
        let dds = std::fs::read(source)?;
        std::fs::write(dest, fake_gtx(&dds[128..]))?;
        Ok(())
    }

    fn tex0_encode(
        &self,
        _source: &Path,
        dest: &Path,
        format: Tex0Format,
        mip_count: u32,
    ) -> anyhow::Result<()> {
        self.record(format!("tex0_encode {mip_count}"));
        std::fs::write(
            dest,
            fake_tex0(self.width, self.height, mip_count, format),
        )?;
        Ok(())
    }

    fn tex0_decode(&self, source: &Path, dest: &Path) -> anyhow::Result<()> {
        self.record("tex0_decode".to_string());
        let mut image = b"\x89PNG".to_vec();
        image.extend(std::fs::read(source)?);
        std::fs::write(dest, image)?;
        Ok(())
    }
}
