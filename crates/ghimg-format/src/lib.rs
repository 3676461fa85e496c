pub mod error;
pub mod header;
pub mod platform;
pub mod registry;

pub use error::ImgError;
pub use header::ImgHeader;
pub use platform::{Game, Payload, Platform};
pub use registry::{ImgFormat, ImgInfo, REGISTRY};
