//! Image formats a slide can embed.

use crate::ooxml::opc::constants::content_type as ct;

/// Raster formats accepted for slide pictures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
}

impl ImageFormat {
    /// Content type of the media part.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => ct::PNG,
            Self::Jpeg => ct::JPEG,
            Self::Gif => ct::GIF,
            Self::Bmp => ct::BMP,
            Self::Tiff => ct::TIFF,
        }
    }

    /// Extension used for `/ppt/media/imageN.<ext>` partnames.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    /// Sniff the format from the leading magic bytes.
    pub fn detect_from_bytes(bytes: &[u8]) -> Option<Self> {
        const SIGNATURES: [(&[u8], ImageFormat); 6] = [
            (&[0x89, b'P', b'N', b'G'], ImageFormat::Png),
            (&[0xFF, 0xD8, 0xFF], ImageFormat::Jpeg),
            (b"GIF8", ImageFormat::Gif),
            (b"BM", ImageFormat::Bmp),
            (&[b'I', b'I', 0x2A, 0x00], ImageFormat::Tiff),
            (&[b'M', b'M', 0x00, 0x2A], ImageFormat::Tiff),
        ];

        if bytes.len() < 4 {
            return None;
        }
        SIGNATURES
            .iter()
            .find(|(magic, _)| bytes.starts_with(magic))
            .map(|(_, format)| *format)
    }
}
