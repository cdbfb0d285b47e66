//! Output format resolution
//!
//! The encoder is chosen from the destination file name alone. Matching is
//! case-sensitive on the text after the last `.`; anything unrecognized,
//! including a missing extension, falls back to PNG. A file named
//! `photo.JPG` is therefore written as PNG.

use std::path::Path;

/// Image file formats understood by the codec layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFileFormat {
    /// PNG format (also the fallback)
    #[default]
    Png,
    /// JFIF JPEG format
    Jpg,
    /// Windows bitmap
    Bmp,
    /// Truevision TGA
    Tga,
}

impl ImageFileFormat {
    /// All formats, in dispatch order.
    pub const ALL: [ImageFileFormat; 4] = [Self::Png, Self::Jpg, Self::Bmp, Self::Tga];

    /// Get the file extension for this format (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Bmp => "bmp",
            Self::Tga => "tga",
        }
    }

    /// Match a dotted extension such as `".png"`, case-sensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            ".png" => Some(Self::Png),
            ".jpg" => Some(Self::Jpg),
            ".bmp" => Some(Self::Bmp),
            ".tga" => Some(Self::Tga),
            _ => None,
        }
    }

    /// Human readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpg => "JPEG",
            Self::Bmp => "BMP",
            Self::Tga => "TGA",
        }
    }
}

/// Resolve the output format for a file name.
///
/// The suffix starting at the last `.` anywhere in the path is compared
/// against `.png`, `.jpg`, `.bmp` and `.tga`. No match yields
/// [`ImageFileFormat::Png`].
pub fn resolve_format<P: AsRef<Path>>(path: P) -> ImageFileFormat {
    let name = path.as_ref().to_string_lossy();
    name.rfind('.')
        .and_then(|dot| ImageFileFormat::from_extension(&name[dot..]))
        .unwrap_or_default()
}
