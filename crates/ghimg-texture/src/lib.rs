pub mod dds;
pub mod error;
pub mod format;
pub mod gtx;
pub mod pvr;
pub mod swap;
pub mod tex0;

pub use error::TextureError;
pub use format::{
    BlockLayout, BlockTextureFormat, ContainerFormat, DdsFormat, Tex0Format, Texture,
    TextureFormat, TextureTags,
};
