#[macro_use]
extern crate tracing;

pub mod batch;
pub mod config;
pub mod convert;
pub mod extract;
pub mod filetype;
pub mod io;
pub mod tools;

pub use ghimg_format as format;
pub use ghimg_texture as texture;
