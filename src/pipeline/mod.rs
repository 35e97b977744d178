//! End-to-end analysis of one diagram image.
//!
//! The stages run in a fixed order: binarize, detect shapes on the binary
//! image, recognize text on the original image, then assemble a [`Diagram`].

mod options;

pub use options::{ErrorMode, PipelineOptions};

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use crate::model::Diagram;
use crate::ocr::{extract_text, RecognizerRegistry, TextRecognizer};
use crate::preprocess::{preprocess, Preprocessed};
use crate::shapes::detect_shapes;
use chrono::Utc;
use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;

/// Everything a pipeline run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The assembled diagram
    pub diagram: Diagram,

    /// Intermediate grayscale and binary images
    pub preprocessed: Preprocessed,
}

/// Image-to-diagram pipeline.
///
/// # Example
///
/// ```no_run
/// use img2excalidraw::pipeline::{Pipeline, PipelineOptions};
///
/// let pipeline = Pipeline::new(PipelineOptions::default().lenient());
/// let output = pipeline.run_path("whiteboard.jpg")?;
/// println!("{} shapes", output.diagram.shape_count());
/// # Ok::<(), img2excalidraw::Error>(())
/// ```
#[derive(Clone)]
pub struct Pipeline {
    options: PipelineOptions,
    recognizer: Option<Arc<dyn TextRecognizer>>,
}

impl Pipeline {
    /// Create a pipeline. The OCR engine is looked up by name when it first runs.
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            recognizer: None,
        }
    }

    /// Use a specific recognizer instead of looking one up by name.
    pub fn with_recognizer(mut self, recognizer: Arc<dyn TextRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    /// Pipeline options.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// The recognizer this pipeline will use.
    pub fn recognizer(&self) -> Result<Arc<dyn TextRecognizer>> {
        if let Some(recognizer) = &self.recognizer {
            return Ok(recognizer.clone());
        }
        RecognizerRegistry::with_defaults()
            .get(&self.options.ocr_engine)
            .ok_or_else(|| {
                Error::InvalidOption(format!("unknown OCR engine: {}", self.options.ocr_engine))
            })
    }

    /// Analyse a decoded image.
    pub fn run(&self, image: &DynamicImage, source: Option<&str>) -> Result<PipelineOutput> {
        self.options.validate()?;
        let recognizer = self.recognizer()?;

        log::info!(
            "Processing {} ({}x{})",
            source.unwrap_or("<memory>"),
            image.width(),
            image.height()
        );

        let preprocessed = preprocess(image, &self.options.preprocess)?;
        let shapes = detect_shapes(&preprocessed.binary, &self.options.shapes)?;

        let texts = match extract_text(recognizer.as_ref(), image, &self.options.ocr) {
            Ok(texts) => texts,
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("Text recognition failed, continuing without text: {}", e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let mut diagram = Diagram::new(image.width(), image.height());
        diagram.shapes = shapes;
        diagram.texts = texts;
        diagram.metadata.source = source.map(str::to_string);
        diagram.metadata.threshold_method = preprocessed.method.label();
        diagram.metadata.ocr_engine = Some(recognizer.name().to_string());
        diagram.metadata.created = Some(Utc::now());

        log::info!(
            "Diagram assembled: {} shapes, {} text regions",
            diagram.shape_count(),
            diagram.text_count()
        );

        Ok(PipelineOutput {
            diagram,
            preprocessed,
        })
    }

    /// Load an image from disk and analyse it.
    pub fn run_path<P: AsRef<Path>>(&self, path: P) -> Result<PipelineOutput> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let image = decode_image(&data)?;
        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        self.run(&image, source.as_deref())
    }

    /// Decode an in-memory image and analyse it.
    pub fn run_bytes(&self, data: &[u8], source: Option<&str>) -> Result<PipelineOutput> {
        let image = decode_image(data)?;
        self.run(&image, source)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineOptions::default())
    }
}

/// Decode image bytes after checking their magic number.
pub fn decode_image(data: &[u8]) -> Result<DynamicImage> {
    let format = detect_format_from_bytes(data)?;
    log::info!("Loading {} image ({} bytes)", format, data.len());
    let image = image::load_from_memory_with_format(data, format.kind.image_format())?;
    Ok(image)
}
