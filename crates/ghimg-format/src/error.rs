use ghimg_texture::{Texture, TextureError};
use thiserror::Error;

use crate::platform::Platform;

#[derive(Debug, Error)]
pub enum ImgError {
    #[error("unknown IMG format: {0}. This platform and/or game may not be supported")]
    UnknownFormat(String),

    #[error("{} IMG files are not supported here", .0.full_name())]
    UnsupportedPlatform(Platform),

    #[error("{texture} textures cannot be stored in {} IMG files", .platform.full_name())]
    IncompatibleTexture { texture: Texture, platform: Platform },

    #[error("invalid mip count {0}")]
    InvalidMipCount(u32),

    #[error("{width}x{height} does not fit in an IMG header")]
    DimensionTooLarge { width: u32, height: u32 },

    #[error("truncated IMG header: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error(transparent)]
    Binrw(#[from] binrw::Error),
}

impl ImgError {
    /// Whether the input is simply not something we can identify.
    ///
    /// Batch runs skip files failing this way and abort on anything else.
    pub fn is_format_detection(&self) -> bool {
        match self {
            Self::UnknownFormat(_) | Self::Truncated { .. } => true,
            Self::Texture(e) => e.is_format_detection(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ImgError>;
