//! Pipeline options and configuration.

use crate::error::Result;
use crate::ocr::OcrOptions;
use crate::preprocess::PreprocessOptions;
use crate::shapes::ShapeOptions;

/// Options for a full image-to-diagram run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Binarization settings
    pub preprocess: PreprocessOptions,

    /// Shape detection settings
    pub shapes: ShapeOptions,

    /// Text recognition settings
    pub ocr: OcrOptions,

    /// Name of the OCR engine to look up (`none` disables OCR)
    pub ocr_engine: String,

    /// Error handling mode
    pub error_mode: ErrorMode,
}

impl PipelineOptions {
    /// Create new pipeline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set preprocessing options.
    pub fn with_preprocess(mut self, options: PreprocessOptions) -> Self {
        self.preprocess = options;
        self
    }

    /// Set shape detection options.
    pub fn with_shapes(mut self, options: ShapeOptions) -> Self {
        self.shapes = options;
        self
    }

    /// Set OCR options.
    pub fn with_ocr(mut self, options: OcrOptions) -> Self {
        self.ocr = options;
        self
    }

    /// Select the OCR engine by name.
    pub fn with_ocr_engine(mut self, name: impl Into<String>) -> Self {
        self.ocr_engine = name.into();
        self
    }

    /// Skip text recognition.
    pub fn without_ocr(mut self) -> Self {
        self.ocr_engine = "none".to_string();
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (OCR failures leave the diagram without text).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Check every stage's options.
    pub fn validate(&self) -> Result<()> {
        self.preprocess.validate()?;
        self.shapes.validate()?;
        Ok(())
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            preprocess: PreprocessOptions::default(),
            shapes: ShapeOptions::default(),
            ocr: OcrOptions::default(),
            ocr_engine: "tesseract".to_string(),
            error_mode: ErrorMode::Strict,
        }
    }
}

/// Error handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Degrade gracefully where a partial result is still useful
    Lenient,
}
