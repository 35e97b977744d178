//! Text extraction.
//!
//! OCR engines sit behind the [`TextRecognizer`] trait so the pipeline does
//! not care whether text comes from the `tesseract` program, libtesseract or
//! a test double.
//!
//! # Example
//!
//! ```no_run
//! use img2excalidraw::ocr::{extract_text, OcrOptions, RecognizerRegistry};
//!
//! fn main() -> img2excalidraw::Result<()> {
//!     let registry = RecognizerRegistry::with_defaults();
//!     let engine = registry.get("tesseract").expect("registered by default");
//!     let image = image::open("whiteboard.jpg")?;
//!     for region in extract_text(engine.as_ref(), &image, &OcrOptions::default())? {
//!         println!("{:.2} {}", region.confidence, region.text);
//!     }
//!     Ok(())
//! }
//! ```

mod cleanup;
#[cfg(feature = "leptess")]
mod libtess;
mod tesseract;
mod tsv;

pub use cleanup::{CleanupOptions, CleanupPreset, TextCleanup};
#[cfg(feature = "leptess")]
pub use libtess::LeptessRecognizer;
pub use tesseract::{TesseractCli, TESSERACT_PATH_ENV};
pub use tsv::parse_tsv;

use crate::error::Result;
use crate::model::TextRegion;
use image::{DynamicImage, ImageFormat};
use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Arc;

/// Options for text recognition.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrOptions {
    /// Tesseract language code(s), e.g. `eng` or `eng+deu`
    pub language: String,

    /// Tesseract page segmentation mode (11 = sparse text)
    pub page_segmentation: u8,

    /// Regions below this confidence (0.0 - 1.0) are dropped
    pub min_confidence: f32,

    /// Cleanup applied to recognized text (None = keep raw text)
    pub cleanup: Option<CleanupPreset>,
}

impl OcrOptions {
    /// Create new OCR options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the recognition language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the page segmentation mode.
    pub fn with_page_segmentation(mut self, psm: u8) -> Self {
        self.page_segmentation = psm;
        self
    }

    /// Set the minimum confidence.
    pub fn with_min_confidence(mut self, confidence: f32) -> Self {
        self.min_confidence = confidence;
        self
    }

    /// Set the cleanup preset.
    pub fn with_cleanup(mut self, preset: CleanupPreset) -> Self {
        self.cleanup = Some(preset);
        self
    }

    /// Keep text exactly as the engine returned it.
    pub fn without_cleanup(mut self) -> Self {
        self.cleanup = None;
        self
    }
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            page_segmentation: 11,
            min_confidence: 0.0,
            cleanup: Some(CleanupPreset::Standard),
        }
    }
}

/// Trait for OCR engines.
///
/// Implement this trait to plug a new engine into the pipeline.
pub trait TextRecognizer: Send + Sync {
    /// Name of this engine, used for lookup and in diagram metadata.
    fn name(&self) -> &str;

    /// Whether the engine can run on this machine.
    fn is_available(&self) -> bool;

    /// Recognize text in an image.
    ///
    /// Returns raw regions; confidence filtering and cleanup happen in
    /// [`extract_text`].
    fn recognize(&self, image: &DynamicImage, options: &OcrOptions) -> Result<Vec<TextRegion>>;
}

/// Recognizer used when OCR is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecognizer;

impl TextRecognizer for NoopRecognizer {
    fn name(&self) -> &str {
        "none"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn recognize(&self, _image: &DynamicImage, _options: &OcrOptions) -> Result<Vec<TextRegion>> {
        Ok(Vec::new())
    }
}

/// Run a recognizer, then apply confidence filtering and cleanup.
pub fn extract_text(
    recognizer: &dyn TextRecognizer,
    image: &DynamicImage,
    options: &OcrOptions,
) -> Result<Vec<TextRegion>> {
    log::info!("Extracting text with {}", recognizer.name());
    let raw = recognizer.recognize(image, options)?;
    let total = raw.len();

    let confident: Vec<TextRegion> = raw
        .into_iter()
        .filter(|r| r.confidence >= options.min_confidence)
        .collect();

    let regions = match options.cleanup {
        Some(preset) => TextCleanup::from_preset(preset).apply(confident),
        None => confident,
    };

    for region in &regions {
        log::info!(
            "Text: {:?} (confidence {:.2}) at ({}, {})",
            region.text,
            region.confidence,
            region.top_left().x,
            region.top_left().y
        );
    }
    log::info!("Kept {} of {} text regions", regions.len(), total);
    Ok(regions)
}

/// Encode an image as PNG bytes for engines that read from memory.
pub(crate) fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Registry of OCR engines, looked up by name.
pub struct RecognizerRegistry {
    by_name: BTreeMap<String, Arc<dyn TextRecognizer>>,
}

impl RecognizerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            by_name: BTreeMap::new(),
        }
    }

    /// Create a registry with the built-in engines.
    ///
    /// The Tesseract binary honours `$TESSERACT_PATH`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(TesseractCli::from_env()));
        registry.register(Arc::new(NoopRecognizer));
        #[cfg(feature = "leptess")]
        registry.register(Arc::new(LeptessRecognizer::new()));
        registry
    }

    /// Register an engine under its name, replacing any previous one.
    pub fn register(&mut self, recognizer: Arc<dyn TextRecognizer>) {
        self.by_name
            .insert(recognizer.name().to_lowercase(), recognizer);
    }

    /// Get an engine by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn TextRecognizer>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an engine is registered.
    pub fn supports(&self, name: &str) -> bool {
        self.by_name.contains_key(&name.to_lowercase())
    }

    /// Names of all registered engines, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.by_name.keys().map(|s| s.as_str()).collect()
    }

    /// Iterate over registered engines.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn TextRecognizer>> {
        self.by_name.values()
    }
}

impl Default for RecognizerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
