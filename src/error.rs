//! Error types for img2excalidraw library.

use std::io;
use thiserror::Error;

/// Result type alias for img2excalidraw operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a diagram image.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Image decoding or encoding failed.
    #[error("Image error: {0}")]
    Image(String),

    /// The input is not a recognized image format.
    #[error("Unknown file format: not a supported image")]
    UnknownFormat,

    /// The image format was recognized but cannot be processed.
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The image has zero width or height.
    #[error("Image is empty (zero width or height)")]
    EmptyImage,

    /// An option value is out of range or inconsistent.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Text recognition failed.
    #[error("OCR error: {0}")]
    Ocr(String),

    /// The requested OCR engine is not installed or not compiled in.
    #[error("OCR engine unavailable: {0}")]
    OcrUnavailable(String),

    /// Error during rendering (Excalidraw, Markdown, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// One or more files of a batch failed.
    #[error("{failed} of {total} images failed to convert")]
    Batch {
        /// Number of failed files
        failed: usize,
        /// Number of files attempted
        total: usize,
    },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Error::Io(e),
            image::ImageError::Unsupported(e) => Error::UnsupportedFormat(e.to_string()),
            _ => Error::Image(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}
