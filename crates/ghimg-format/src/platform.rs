use std::fmt;

use binrw::Endian;
use ghimg_texture::{
    ContainerFormat, DdsFormat, Tex0Format, Texture, TextureError, TextureFormat,
};

use crate::{
    error::{ImgError, Result},
    header::ImgHeader,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    X360,
    Ps3,
    Pc,
    X1,
    WiiU,
    Wii,
    Ios,
}

/// How the texture data following an IMG header is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// DDS surface data, header stripped
    Dds,
    /// GX2 surface, with its own surface description
    Gtx,
    /// TEX0 surface data, preceded by a 64 byte header
    Tex0,
    /// PVR file minus compressor metadata
    Pvr,
}

impl Platform {
    pub const ALL: [Platform; 7] = [
        Self::X360,
        Self::Ps3,
        Self::Pc,
        Self::X1,
        Self::WiiU,
        Self::Wii,
        Self::Ios,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::X360 => "x360",
            Self::Ps3 => "ps3",
            Self::Pc => "pc",
            Self::X1 => "x1",
            Self::WiiU => "wiiu",
            Self::Wii => "wii",
            Self::Ios => "ios",
        }
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            Self::X360 => "Xbox 360",
            Self::Ps3 => "PlayStation 3",
            Self::Pc => "PC",
            Self::X1 => "Xbox One",
            Self::WiiU => "Wii U",
            Self::Wii => "Wii",
            Self::Ios => "iOS",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ImgError::UnknownFormat(format!("platform '{name}'")))
    }

    pub fn endian(&self) -> Endian {
        match self {
            Self::Pc | Self::X1 | Self::Ios => Endian::Little,
            Self::X360 | Self::Ps3 | Self::WiiU | Self::Wii => Endian::Big,
        }
    }

    /// Difference between the real mip count and the one stored in the header.
    pub fn mip_bias(&self) -> u32 {
        match self {
            Self::Ios => 0,
            _ => 1,
        }
    }

    pub fn default_texture(&self) -> Option<Texture> {
        match self {
            Self::WiiU => Some(Texture::Container(ContainerFormat::Gtx)),
            Self::Ios => Some(Texture::Container(ContainerFormat::Pvr)),
            Self::Wii => Some(Texture::Tex0(Tex0Format::Cmpr)),
            Self::X360 | Self::Ps3 | Self::Pc | Self::X1 => None,
        }
    }

    pub fn payload(&self) -> Payload {
        match self {
            Self::X360 | Self::Ps3 | Self::Pc | Self::X1 => Payload::Dds,
            Self::WiiU => Payload::Gtx,
            Self::Wii => Payload::Tex0,
            Self::Ios => Payload::Pvr,
        }
    }

    /// Size of the IMG header, including any native header embedded in it.
    pub fn header_size(&self) -> usize {
        match self {
            Self::Wii => ghimg_texture::tex0::HEADER_SIZE,
            _ => ImgHeader::SIZE,
        }
    }

    /// Xbox 360 payloads are stored as 16-bit big endian units.
    pub fn swaps_16_bit(&self) -> bool {
        matches!(self, Self::X360)
    }

    /// Uncompressed DDS pixels are stored as ABGR.
    pub fn reverses_channels(&self, texture: Texture) -> bool {
        self.payload() == Payload::Dds && texture == Texture::Dds(DdsFormat::R8G8B8A8)
    }

    pub fn accepts(&self, texture: Texture) -> bool {
        matches!(
            (self.payload(), texture),
            (Payload::Dds, Texture::Dds(_))
                | (Payload::Gtx, Texture::Container(ContainerFormat::Gtx))
                | (Payload::Tex0, Texture::Tex0(_))
                | (Payload::Pvr, Texture::Container(ContainerFormat::Pvr))
        )
    }

    pub fn read_header(&self, bytes: &[u8]) -> Result<ImgHeader> {
        ImgHeader::read(bytes, self.endian())
    }

    pub fn width(&self, header: &ImgHeader) -> u32 {
        header.width as u32
    }

    pub fn height(&self, header: &ImgHeader) -> u32 {
        header.height as u32
    }

    pub fn mip_count(&self, header: &ImgHeader) -> u32 {
        header.stored_mip_count as u32 + self.mip_bias()
    }

    /// Resolves the format word found at bytes 8..12 of a header.
    pub fn texture_for_word(&self, word: u32) -> Result<Texture> {
        let texture = match self.payload() {
            Payload::Dds => Texture::Dds(DdsFormat::from_tag(word)?),
            Payload::Tex0 => Texture::Tex0(Tex0Format::from_tag(word)?),
            Payload::Gtx | Payload::Pvr => {
                let texture = self
                    .default_texture()
                    .ok_or(ImgError::UnsupportedPlatform(*self))?;
                if texture.tags().format != word {
                    return Err(TextureError::UnknownFormat(format!(
                        "{} format tag 0x{word:08X}",
                        self.full_name()
                    ))
                    .into());
                }
                texture
            }
        };

        Ok(texture)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Game {
    Ghl,
    Djh,
    Djh2,
}

impl Game {
    pub const ALL: [Game; 3] = [Self::Ghl, Self::Djh, Self::Djh2];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ghl => "ghl",
            Self::Djh => "djh",
            Self::Djh2 => "djh2",
        }
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            Self::Ghl => "Guitar Hero Live",
            Self::Djh => "DJ Hero",
            Self::Djh2 => "DJ Hero 2",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|g| g.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ImgError::UnknownFormat(format!("game '{name}'")))
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name())
    }
}
