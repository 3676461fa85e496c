use std::{fmt, sync::LazyLock};

use hashbrown::HashMap;

use crate::error::{Result, TextureError};

/// The pair of tags a texture format contributes to an IMG header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureTags {
    pub format: u32,
    pub alpha: u16,
}

impl TextureTags {
    pub const fn new(format: u32, alpha: u16) -> Self {
        Self { format, alpha }
    }
}

/// Geometry of a single encoded block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    pub width: u32,
    pub height: u32,
    /// Bytes per block
    pub size: u32,
}

impl BlockLayout {
    pub const fn new(width: u32, height: u32, size: u32) -> Self {
        Self {
            width,
            height,
            size,
        }
    }

    /// Size of a single surface. Every surface occupies at least one block in each dimension.
    pub fn size_of(&self, width: u32, height: u32) -> Result<u64> {
        fit_u64(self.surface_bytes(width, height), "surface size")
    }

    /// Size of a full mip chain. Dimensions are halved with floor division and may reach 0.
    pub fn mip_chain_size(&self, width: u32, height: u32, mip_count: u32) -> Result<u64> {
        let shifted = mip_count.min(u32::BITS);
        let mut total: u128 = (0..shifted)
            .map(|level| self.surface_bytes(width >> level, height >> level))
            .sum();
        // every level past the 32nd is down to a single block
        total += (mip_count - shifted) as u128 * self.size as u128;
        fit_u64(total, "mip chain size")
    }

    fn surface_bytes(&self, width: u32, height: u32) -> u128 {
        let blocks_x = width.div_ceil(self.width).max(1) as u128;
        let blocks_y = height.div_ceil(self.height).max(1) as u128;
        blocks_x * blocks_y * self.size as u128
    }
}

fn fit_u64(value: u128, field: &'static str) -> Result<u64> {
    u64::try_from(value).map_err(|_| TextureError::TooLarge { field, value })
}

pub trait TextureFormat {
    /// Name used on the command line.
    fn name(&self) -> &'static str;
    fn tags(&self) -> TextureTags;
}

pub trait BlockTextureFormat: TextureFormat {
    fn block(&self) -> BlockLayout;

    fn size_of(&self, width: u32, height: u32) -> Result<u64> {
        self.block().size_of(width, height)
    }

    fn mip_chain_size(&self, width: u32, height: u32, mip_count: u32) -> Result<u64> {
        self.block().mip_chain_size(width, height, mip_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DdsFormat {
    /// DXT1
    Bc1,
    /// DXT3
    Bc2,
    /// DXT5
    Bc3,
    R8G8B8A8,
}

impl DdsFormat {
    pub const ALL: [DdsFormat; 4] = [Self::Bc1, Self::Bc2, Self::Bc3, Self::R8G8B8A8];

    pub fn is_compressed(&self) -> bool {
        !matches!(self, Self::R8G8B8A8)
    }

    pub fn four_cc(&self) -> [u8; 4] {
        match self {
            Self::Bc1 => *b"DXT1",
            Self::Bc2 => *b"DXT3",
            Self::Bc3 => *b"DXT5",
            Self::R8G8B8A8 => *b"DX10",
        }
    }

    /// DXGI format written to the DX10 extension header, for formats that need one.
    pub fn dxgi_format(&self) -> Option<u32> {
        match self {
            Self::R8G8B8A8 => Some(28), // DXGI_FORMAT_R8G8B8A8_UNORM
            _ => None,
        }
    }

    /// Format name understood by the external compressor.
    pub fn compressor_name(&self) -> &'static str {
        match self {
            Self::Bc1 => "BC1",
            Self::Bc2 => "BC2",
            Self::Bc3 => "BC3",
            Self::R8G8B8A8 => "r8g8b8a8",
        }
    }

    /// Row pitch of an uncompressed surface. The block size doubles as bits per pixel here.
    pub fn pitch(&self, width: u32) -> u64 {
        (width as u64 * self.block().size as u64).div_ceil(8)
    }

    pub fn from_tag(tag: u32) -> Result<Self> {
        DDS_BY_TAG
            .get(&tag)
            .copied()
            .ok_or_else(|| TextureError::UnknownFormat(format!("DDS format tag 0x{tag:08X}")))
    }
}

impl TextureFormat for DdsFormat {
    fn name(&self) -> &'static str {
        match self {
            Self::Bc1 => "BC1",
            Self::Bc2 => "BC2",
            Self::Bc3 => "BC3",
            Self::R8G8B8A8 => "R8G8B8A8",
        }
    }

    fn tags(&self) -> TextureTags {
        match self {
            Self::Bc1 => TextureTags::new(0x05, 0x0000),
            Self::Bc2 => TextureTags::new(0x07, 0x00FF),
            Self::Bc3 => TextureTags::new(0x09, 0x00FF),
            Self::R8G8B8A8 => TextureTags::new(0x03, 0x0000),
        }
    }
}

impl BlockTextureFormat for DdsFormat {
    fn block(&self) -> BlockLayout {
        match self {
            Self::Bc1 => BlockLayout::new(4, 4, 8),
            Self::Bc2 | Self::Bc3 => BlockLayout::new(4, 4, 16),
            Self::R8G8B8A8 => BlockLayout::new(4, 4, 32),
        }
    }
}

/// Wii texture formats, stored in TEX0 containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tex0Format {
    Cmpr,
    Rgb5a3,
    Ia4,
}

impl Tex0Format {
    pub const ALL: [Tex0Format; 3] = [Self::Cmpr, Self::Rgb5a3, Self::Ia4];

    /// GX texture format id, as stored inside the TEX0 header.
    pub fn gx_id(&self) -> u32 {
        match self {
            Self::Ia4 => 0x02,
            Self::Rgb5a3 => 0x05,
            Self::Cmpr => 0x0E,
        }
    }

    pub fn from_gx_id(id: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.gx_id() == id)
            .ok_or_else(|| TextureError::UnknownFormat(format!("GX format id 0x{id:02X}")))
    }

    pub fn from_tag(tag: u32) -> Result<Self> {
        TEX0_BY_TAG
            .get(&tag)
            .copied()
            .ok_or_else(|| TextureError::UnknownFormat(format!("TEX0 format tag 0x{tag:08X}")))
    }
}

impl TextureFormat for Tex0Format {
    fn name(&self) -> &'static str {
        match self {
            Self::Cmpr => "CMPR",
            Self::Rgb5a3 => "RGB5A3",
            Self::Ia4 => "IA4",
        }
    }

    fn tags(&self) -> TextureTags {
        match self {
            Self::Cmpr => TextureTags::new(0x0E, 0x0000),
            Self::Rgb5a3 => TextureTags::new(0x05, 0x00FF),
            Self::Ia4 => TextureTags::new(0x02, 0x00FF),
        }
    }
}

impl BlockTextureFormat for Tex0Format {
    fn block(&self) -> BlockLayout {
        match self {
            Self::Cmpr => BlockLayout::new(8, 8, 32),
            Self::Rgb5a3 => BlockLayout::new(4, 4, 32),
            Self::Ia4 => BlockLayout::new(8, 4, 32),
        }
    }
}

/// Formats whose pixel layout is owned entirely by an external tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerFormat {
    /// iOS PowerVR container
    Pvr,
    /// Wii U GX2 container
    Gtx,
}

impl ContainerFormat {
    /// Compressor format the PVR container is always encoded with
    pub const PVR_COMPRESSOR: &'static str = "PVRTC1_4_RGB";

    pub fn compressor_name(&self) -> Option<&'static str> {
        match self {
            Self::Pvr => Some(Self::PVR_COMPRESSOR),
            // GTX files are produced from an intermediate DDS
            Self::Gtx => None,
        }
    }
}

impl TextureFormat for ContainerFormat {
    fn name(&self) -> &'static str {
        match self {
            Self::Pvr => "PVR",
            Self::Gtx => "GTX",
        }
    }

    fn tags(&self) -> TextureTags {
        match self {
            Self::Pvr => TextureTags::new(0x00, 0x0000),
            Self::Gtx => TextureTags::new(0x05, 0x0000),
        }
    }
}

/// Any texture format an IMG file can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Texture {
    Dds(DdsFormat),
    Tex0(Tex0Format),
    Container(ContainerFormat),
}

impl Texture {
    pub fn from_name(name: &str) -> Result<Self> {
        TEXTURES_BY_NAME
            .get(name.to_ascii_uppercase().as_str())
            .copied()
            .ok_or_else(|| TextureError::UnknownFormat(name.to_string()))
    }

    pub fn as_block(&self) -> Option<&dyn BlockTextureFormat> {
        match self {
            Self::Dds(f) => Some(f as &dyn BlockTextureFormat),
            Self::Tex0(f) => Some(f as &dyn BlockTextureFormat),
            Self::Container(_) => None,
        }
    }
}

impl TextureFormat for Texture {
    fn name(&self) -> &'static str {
        match self {
            Self::Dds(f) => f.name(),
            Self::Tex0(f) => f.name(),
            Self::Container(f) => f.name(),
        }
    }

    fn tags(&self) -> TextureTags {
        match self {
            Self::Dds(f) => f.tags(),
            Self::Tex0(f) => f.tags(),
            Self::Container(f) => f.tags(),
        }
    }
}

impl fmt::Display for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<DdsFormat> for Texture {
    fn from(value: DdsFormat) -> Self {
        Self::Dds(value)
    }
}

impl From<Tex0Format> for Texture {
    fn from(value: Tex0Format) -> Self {
        Self::Tex0(value)
    }
}

impl From<ContainerFormat> for Texture {
    fn from(value: ContainerFormat) -> Self {
        Self::Container(value)
    }
}

static DDS_BY_TAG: LazyLock<HashMap<u32, DdsFormat>> =
    LazyLock::new(|| DdsFormat::ALL.into_iter().map(|f| (f.tags().format, f)).collect());

static TEX0_BY_TAG: LazyLock<HashMap<u32, Tex0Format>> =
    LazyLock::new(|| Tex0Format::ALL.into_iter().map(|f| (f.tags().format, f)).collect());

static TEXTURES_BY_NAME: LazyLock<HashMap<&'static str, Texture>> = LazyLock::new(|| {
    DdsFormat::ALL
        .into_iter()
        .map(Texture::from)
        .chain(Tex0Format::ALL.into_iter().map(Texture::from))
        .chain([ContainerFormat::Pvr, ContainerFormat::Gtx].map(Texture::from))
        .map(|t| (t.name(), t))
        .collect()
});
