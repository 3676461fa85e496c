use std::path::Path;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FileType {
    /// Ordinary image that an external compressor can read
    Image,
    Img,

    // Native containers
    Dds,
    Tex0,
    Pvr,
    Gtx,
}

impl FileType {
    pub fn guess_from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_string_lossy().to_ascii_lowercase();
        match extension.as_str() {
            "png" | "jpg" | "jpeg" | "bmp" | "tga" | "tif" | "tiff" | "gif" => Some(Self::Image),
            "img" => Some(Self::Img),
            "dds" => Some(Self::Dds),
            "tex0" => Some(Self::Tex0),
            "pvr" => Some(Self::Pvr),
            "gtx" => Some(Self::Gtx),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Image => "png",
            Self::Img => "img",
            Self::Dds => "dds",
            Self::Tex0 => "tex0",
            Self::Pvr => "pvr",
            Self::Gtx => "gtx",
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Dds | Self::Tex0 | Self::Pvr | Self::Gtx)
    }
}
