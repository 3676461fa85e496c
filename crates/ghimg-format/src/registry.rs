use std::{fmt, sync::LazyLock};

use ghimg_texture::{tex0, Texture, TextureFormat};
use hashbrown::HashMap;

use crate::{
    error::{ImgError, Result},
    header::ImgHeader,
    platform::{Game, Platform},
};

/// A supported combination of platform and game.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImgFormat {
    platform: Platform,
    game: Game,
    discriminator: [u8; 6],
}

const fn entry(platform: Platform, game: Game, discriminator: [u8; 6]) -> ImgFormat {
    ImgFormat {
        platform,
        game,
        discriminator,
    }
}

const DJH_DISCRIMINATOR: [u8; 6] = [0x00, 0x01, 0x00, 0x00, 0x00, 0x00];

/// Every known format. Order matters when several entries share a discriminator:
/// header detection picks the first one.
pub const REGISTRY: [ImgFormat; 12] = [
    entry(Platform::X360, Game::Ghl, [0x01, 0x00, 0x00, 0x00, 0x03, 0x00]),
    entry(Platform::Ps3, Game::Ghl, [0x01, 0x00, 0x00, 0x00, 0x03, 0x01]),
    entry(Platform::Pc, Game::Ghl, [0x00, 0x00, 0x00, 0x00, 0x03, 0x03]),
    entry(Platform::WiiU, Game::Ghl, [0x01, 0x00, 0x00, 0x00, 0x03, 0x04]),
    entry(Platform::X1, Game::Ghl, [0x00, 0x00, 0x00, 0x00, 0x03, 0x05]),
    entry(Platform::Ios, Game::Ghl, [0x00, 0x00, 0x01, 0x00, 0x00, 0x06]),
    entry(Platform::X360, Game::Djh, DJH_DISCRIMINATOR),
    entry(Platform::Ps3, Game::Djh, DJH_DISCRIMINATOR),
    entry(Platform::Wii, Game::Djh, DJH_DISCRIMINATOR),
    entry(Platform::X360, Game::Djh2, DJH_DISCRIMINATOR),
    entry(Platform::Ps3, Game::Djh2, DJH_DISCRIMINATOR),
    entry(Platform::Wii, Game::Djh2, DJH_DISCRIMINATOR),
];

static BY_PLATFORM_AND_GAME: LazyLock<HashMap<(Platform, Game), ImgFormat>> =
    LazyLock::new(|| REGISTRY.iter().map(|f| ((f.platform, f.game), *f)).collect());

/// Entries sharing the same discriminator suffix, in registry order.
static BY_SUFFIX: LazyLock<HashMap<[u8; 2], Vec<ImgFormat>>> = LazyLock::new(|| {
    let mut map: HashMap<[u8; 2], Vec<ImgFormat>> = HashMap::new();
    for format in REGISTRY {
        map.entry(format.discriminator_suffix())
            .or_default()
            .push(format);
    }
    map
});

impl ImgFormat {
    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn game(&self) -> Game {
        self.game
    }

    pub fn discriminator(&self) -> [u8; 6] {
        self.discriminator
    }

    /// The two bytes that identify a format when reading a header.
    pub fn discriminator_suffix(&self) -> [u8; 2] {
        [self.discriminator[4], self.discriminator[5]]
    }

    pub fn from_platform_and_game(platform: Platform, game: Game) -> Result<Self> {
        BY_PLATFORM_AND_GAME
            .get(&(platform, game))
            .copied()
            .ok_or_else(|| {
                ImgError::UnknownFormat(format!("{} on {}", game.full_name(), platform))
            })
    }

    /// Identifies the format of an IMG header from its last two bytes.
    ///
    /// DJ Hero and DJ Hero 2 share one discriminator across all of their
    /// platforms, so those headers always resolve to the first DJ Hero entry.
    /// Use [`ImgFormat::from_header_with_hint`] when the platform is known.
    pub fn from_header(header: &[u8]) -> Result<Self> {
        Self::from_header_with_hint(header, None)
    }

    pub fn from_header_with_hint(header: &[u8], platform: Option<Platform>) -> Result<Self> {
        if header.len() < ImgHeader::SIZE {
            return Err(ImgError::Truncated {
                expected: ImgHeader::SIZE,
                actual: header.len(),
            });
        }

        let suffix = [header[18], header[19]];
        let candidates = BY_SUFFIX.get(&suffix).ok_or_else(|| {
            ImgError::UnknownFormat(format!("discriminator {}", hex::encode(suffix)))
        })?;

        let hinted = platform.and_then(|p| candidates.iter().find(|f| f.platform == p));
        if platform.is_some() && hinted.is_none() {
            tracing::warn!(
                "Discriminator {} is not registered for {}, ignoring the platform hint",
                hex::encode(suffix),
                platform.map_or("", |p| p.full_name()),
            );
        }

        // candidates are never empty, every key was inserted along with a format
        hinted.or(candidates.first()).copied().ok_or_else(|| {
            ImgError::UnknownFormat(format!("discriminator {}", hex::encode(suffix)))
        })
    }

    pub fn header_record(
        &self,
        width: u32,
        height: u32,
        texture: Texture,
        mip_count: u32,
    ) -> Result<ImgHeader> {
        if !self.platform.accepts(texture) {
            return Err(ImgError::IncompatibleTexture {
                texture,
                platform: self.platform,
            });
        }

        let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(ImgError::DimensionTooLarge { width, height });
        };

        let stored_mip_count = mip_count
            .checked_sub(self.platform.mip_bias())
            .filter(|_| mip_count > 0)
            .and_then(|m| u16::try_from(m).ok())
            .ok_or(ImgError::InvalidMipCount(mip_count))?;

        let tags = texture.tags();
        Ok(ImgHeader {
            width: w,
            height: h,
            depth: 1,
            pitch: w,
            format_tag: tags.format,
            alpha_tag: tags.alpha,
            tag_prefix: [self.discriminator[0], self.discriminator[1]],
            stored_mip_count,
            tag_suffix: self.discriminator_suffix(),
        })
    }

    /// Builds the 20 byte normalized header.
    pub fn build_header(
        &self,
        width: u32,
        height: u32,
        texture: Texture,
        mip_count: u32,
    ) -> Result<Vec<u8>> {
        self.header_record(width, height, texture, mip_count)?
            .to_bytes(self.platform.endian())
    }

    /// Builds the complete header that precedes the payload, 64 bytes on Wii.
    pub fn build_container_header(
        &self,
        width: u32,
        height: u32,
        texture: Texture,
        mip_count: u32,
    ) -> Result<Vec<u8>> {
        let mut header = self.build_header(width, height, texture, mip_count)?;

        if let Texture::Tex0(format) = texture {
            let tex0_header = tex0::build_tex0_header(width, height, mip_count, format)?;
            header.extend_from_slice(&tex0_header[ImgHeader::SIZE..]);
        }

        debug_assert_eq!(header.len(), self.platform.header_size());
        Ok(header)
    }
}

impl fmt::Debug for ImgFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImgFormat")
            .field("platform", &self.platform)
            .field("game", &self.game)
            .field("discriminator", &hex::encode(self.discriminator))
            .finish()
    }
}

impl fmt::Display for ImgFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.game.full_name(), self.platform.full_name())
    }
}

/// Everything a header says about the texture behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImgInfo {
    pub format: ImgFormat,
    pub header: ImgHeader,
    pub width: u32,
    pub height: u32,
    pub mip_count: u32,
    pub texture: Texture,
}

impl ImgInfo {
    pub fn parse(bytes: &[u8], platform_hint: Option<Platform>) -> Result<Self> {
        let format = ImgFormat::from_header_with_hint(bytes, platform_hint)?;
        let platform = format.platform();
        if bytes.len() < platform.header_size() {
            return Err(ImgError::Truncated {
                expected: platform.header_size(),
                actual: bytes.len(),
            });
        }

        let header = platform.read_header(bytes)?;
        let texture = platform.texture_for_word(header.format_tag)?;
        tracing::debug!(
            "Detected {format} with format word {}",
            hex::encode(header.format_tag.to_be_bytes())
        );

        Ok(Self {
            format,
            width: platform.width(&header),
            height: platform.height(&header),
            mip_count: platform.mip_count(&header),
            header,
            texture,
        })
    }

    pub fn platform(&self) -> Platform {
        self.format.platform()
    }

    /// The texture data following the header.
    pub fn payload<'a>(&self, bytes: &'a [u8]) -> &'a [u8] {
        &bytes[self.platform().header_size()..]
    }
}
