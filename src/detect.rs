//! Input image format detection and validation.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Image container formats accepted as pipeline input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// Portable Network Graphics
    Png,
    /// JPEG / JFIF
    Jpeg,
    /// Windows bitmap
    Bmp,
    /// GIF (first frame only)
    Gif,
    /// TIFF, either byte order
    Tiff,
    /// WebP (RIFF container)
    WebP,
}

impl ImageKind {
    /// Canonical lowercase file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpg",
            ImageKind::Bmp => "bmp",
            ImageKind::Gif => "gif",
            ImageKind::Tiff => "tiff",
            ImageKind::WebP => "webp",
        }
    }

    /// MIME type of the format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Bmp => "image/bmp",
            ImageKind::Gif => "image/gif",
            ImageKind::Tiff => "image/tiff",
            ImageKind::WebP => "image/webp",
        }
    }

    /// Matching decoder format of the `image` crate.
    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            ImageKind::Png => image::ImageFormat::Png,
            ImageKind::Jpeg => image::ImageFormat::Jpeg,
            ImageKind::Bmp => image::ImageFormat::Bmp,
            ImageKind::Gif => image::ImageFormat::Gif,
            ImageKind::Tiff => image::ImageFormat::Tiff,
            ImageKind::WebP => image::ImageFormat::WebP,
        }
    }
}

/// Detected image format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFormatInfo {
    /// Container format
    pub kind: ImageKind,
}

impl std::fmt::Display for ImageFormatInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind.extension().to_uppercase())
    }
}

const HEADER_LEN: usize = 12;
const EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"];

/// Detect the image format from a file path.
///
/// # Example
/// ```no_run
/// use img2excalidraw::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("whiteboard.jpg").unwrap();
/// println!("format: {}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<ImageFormatInfo> {
    let mut file = File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_LEN);
    file.by_ref()
        .take(HEADER_LEN as u64)
        .read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the image format from the leading bytes of a file.
///
/// # Returns
/// * `Ok(ImageFormatInfo)` if the magic bytes match a supported format
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<ImageFormatInfo> {
    let kind = if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        ImageKind::Png
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        ImageKind::Jpeg
    } else if data.starts_with(b"BM") && data.len() >= 6 {
        ImageKind::Bmp
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        ImageKind::Gif
    } else if data.starts_with(b"II*\0") || data.starts_with(b"MM\0*") {
        ImageKind::Tiff
    } else if data.len() >= HEADER_LEN && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        ImageKind::WebP
    } else {
        return Err(Error::UnknownFormat);
    };

    Ok(ImageFormatInfo { kind })
}

/// Check if a file is a supported image.
pub fn is_supported_image<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes start with a supported image header.
pub fn is_supported_image_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

/// Check whether a path carries an image file extension (case-insensitive).
pub fn has_image_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_png() {
        let data = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
        let format = detect_format_from_bytes(data).unwrap();
        assert_eq!(format.kind, ImageKind::Png);
        assert_eq!(format.to_string(), "PNG");
    }

    #[test]
    fn test_detect_jpeg() {
        let data = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
        let format = detect_format_from_bytes(&data).unwrap();
        assert_eq!(format.kind, ImageKind::Jpeg);
        assert_eq!(format.kind.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_detect_webp() {
        let data = b"RIFF\x24\0\0\0WEBPVP8 ";
        let format = detect_format_from_bytes(data).unwrap();
        assert_eq!(format.kind, ImageKind::WebP);
    }

    #[test]
    fn test_detect_riff_non_webp() {
        let data = b"RIFF\x24\0\0\0WAVEfmt ";
        assert!(matches!(
            detect_format_from_bytes(data),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_detect_invalid_format() {
        let data = b"%PDF-1.7\n";
        let result = detect_format_from_bytes(data);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_empty() {
        assert!(matches!(
            detect_format_from_bytes(&[]),
            Err(Error::UnknownFormat)
        ));
        assert!(!is_supported_image_bytes(b""));
    }

    #[test]
    fn test_has_image_extension() {
        assert!(has_image_extension("photo.JPG"));
        assert!(has_image_extension("dir/board.jpeg"));
        assert!(has_image_extension("scan.bmp"));
        assert!(!has_image_extension("notes.md"));
        assert!(!has_image_extension("noext"));
    }
}
