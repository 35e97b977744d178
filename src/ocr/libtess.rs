//! In-process OCR through libtesseract.

use super::tsv::parse_tsv;
use super::{encode_png, OcrOptions, TextRecognizer};
use crate::error::{Error, Result};
use crate::model::TextRegion;
use image::DynamicImage;
use leptess::{LepTess, Variable};

/// Recognizer backed by the `leptess` bindings.
#[derive(Debug, Clone, Default)]
pub struct LeptessRecognizer {
    data_path: Option<String>,
}

impl LeptessRecognizer {
    /// Use the default tessdata location.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific tessdata directory.
    pub fn with_data_path(path: impl Into<String>) -> Self {
        Self {
            data_path: Some(path.into()),
        }
    }

    fn engine(&self, language: &str) -> Result<LepTess> {
        LepTess::new(self.data_path.as_deref(), language).map_err(|e| {
            Error::OcrUnavailable(format!("failed to initialize libtesseract: {}", e))
        })
    }
}

impl TextRecognizer for LeptessRecognizer {
    fn name(&self) -> &str {
        "leptess"
    }

    fn is_available(&self) -> bool {
        self.engine("eng").is_ok()
    }

    fn recognize(&self, image: &DynamicImage, options: &OcrOptions) -> Result<Vec<TextRegion>> {
        let mut tesseract = self.engine(&options.language)?;
        tesseract
            .set_variable(
                Variable::TesseditPagesegMode,
                &options.page_segmentation.to_string(),
            )
            .map_err(|e| Error::Ocr(format!("failed to set page segmentation: {}", e)))?;

        let png = encode_png(image)?;
        tesseract
            .set_image_from_mem(&png)
            .map_err(|e| Error::Ocr(format!("failed to load image: {}", e)))?;

        let tsv = tesseract
            .get_tsv_text(0)
            .map_err(|e| Error::Ocr(format!("failed to read TSV output: {}", e)))?;

        let regions = parse_tsv(&tsv);
        log::info!("libtesseract recognized {} text lines", regions.len());
        Ok(regions)
    }
}
