use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("unknown texture format: {0}")]
    UnknownFormat(String),

    #[error("truncated {container} data: expected at least {expected} bytes, got {actual}")]
    Truncated {
        container: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A computed field does not fit the width of its on-disk slot.
    #[error("{field} value {value} does not fit in the header")]
    TooLarge { field: &'static str, value: u128 },

    #[error(transparent)]
    Binrw(#[from] binrw::Error),
}

impl TextureError {
    pub fn truncated(container: &'static str, expected: usize, actual: usize) -> Self {
        Self::Truncated {
            container,
            expected,
            actual,
        }
    }

    /// Whether the input simply isn't the container it was expected to be.
    pub fn is_format_detection(&self) -> bool {
        match self {
            Self::UnknownFormat(_) | Self::Truncated { .. } => true,
            Self::Binrw(e) => matches!(e, binrw::Error::BadMagic { .. }) || e.is_eof(),
            Self::TooLarge { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, TextureError>;
