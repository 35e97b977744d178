//! # img2excalidraw
//!
//! Turn photographed hand-drawn diagrams into editable Excalidraw drawings.
//!
//! The pipeline binarizes the photo, traces contours into rectangles,
//! circles and polygons, recognizes text with an OCR engine, and emits an
//! Excalidraw scene (plain JSON or an Obsidian Excalidraw Markdown file).
//!
//! ## Quick Start
//!
//! ```no_run
//! use img2excalidraw::{analyze_file, render};
//!
//! fn main() -> img2excalidraw::Result<()> {
//!     // Detect shapes and text
//!     let diagram = analyze_file("whiteboard.jpg")?;
//!
//!     // Convert to an Excalidraw scene
//!     let scene = render::to_scene(&diagram, &render::RenderOptions::default())?;
//!     let json = render::to_json(&scene, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Adaptive binarization**: median blur + local mean threshold for uneven light
//! - **Shape classification**: squares, rectangles, circles, polygons
//! - **Pluggable OCR**: `tesseract` CLI, libtesseract (`leptess` feature), or your own
//! - **Two output formats**: Excalidraw JSON and Obsidian Excalidraw Markdown
//! - **Parallel batches**: Uses Rayon for directories of images

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod ocr;
pub mod pipeline;
pub mod preprocess;
pub mod render;
pub mod shapes;

// Re-export commonly used types
pub use convert::{
    convert_bytes, convert_directory, convert_file, Artifacts, BatchReport, ConvertOptions,
    ConvertReport, ConvertResult, Converter, OutputFormat,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, ImageFormatInfo, ImageKind};
pub use error::{Error, Result};
pub use model::{
    ContourBorder, DetectedShape, Diagram, DiagramMetadata, Point, Polygon, Rect, ShapeKind,
    TextRegion,
};
pub use ocr::{OcrOptions, RecognizerRegistry, TextRecognizer};
pub use pipeline::{ErrorMode, Pipeline, PipelineOptions};
pub use preprocess::{PreprocessOptions, ThresholdMethod};
pub use render::{JsonFormat, PolygonStyle, RenderOptions, Scene};
pub use shapes::{ContourRetrieval, ShapeOptions};

use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;

/// Detect shapes and text in an image file with default options.
///
/// # Example
///
/// ```no_run
/// use img2excalidraw::analyze_file;
///
/// let diagram = analyze_file("whiteboard.jpg").unwrap();
/// println!("Shapes: {}", diagram.shape_count());
/// ```
pub fn analyze_file<P: AsRef<Path>>(path: P) -> Result<Diagram> {
    Ok(Pipeline::default().run_path(path)?.diagram)
}

/// Detect shapes and text in an image file with custom options.
pub fn analyze_file_with_options<P: AsRef<Path>>(
    path: P,
    options: PipelineOptions,
) -> Result<Diagram> {
    Ok(Pipeline::new(options).run_path(path)?.diagram)
}

/// Detect shapes and text in an in-memory image.
pub fn analyze_bytes(data: &[u8]) -> Result<Diagram> {
    Ok(Pipeline::default().run_bytes(data, None)?.diagram)
}

/// Convert an image file to Excalidraw JSON.
///
/// # Example
///
/// ```no_run
/// use img2excalidraw::{to_excalidraw_json, JsonFormat};
///
/// let json = to_excalidraw_json("whiteboard.jpg", JsonFormat::Pretty).unwrap();
/// std::fs::write("whiteboard.excalidraw", json).unwrap();
/// ```
pub fn to_excalidraw_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let diagram = analyze_file(path)?;
    let scene = render::to_scene(&diagram, &RenderOptions::default())?;
    render::to_json(&scene, format)
}

/// Convert an image file to an Obsidian Excalidraw Markdown document.
pub fn to_obsidian_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let diagram = analyze_file(path)?;
    let scene = render::to_scene(&diagram, &RenderOptions::default())?;
    render::to_obsidian_markdown(&scene)
}

/// Builder for analysing images and rendering Excalidraw output.
///
/// # Example
///
/// ```no_run
/// use img2excalidraw::Img2Excalidraw;
///
/// let markdown = Img2Excalidraw::new()
///     .external_contours()
///     .with_language("eng")
///     .with_seed(42)
///     .lenient()
///     .process("whiteboard.jpg")?
///     .to_obsidian_markdown()?;
/// # Ok::<(), img2excalidraw::Error>(())
/// ```
pub struct Img2Excalidraw {
    pipeline_options: PipelineOptions,
    render_options: RenderOptions,
    recognizer: Option<Arc<dyn TextRecognizer>>,
}

impl Img2Excalidraw {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            pipeline_options: PipelineOptions::default(),
            render_options: RenderOptions::default(),
            recognizer: None,
        }
    }

    /// Enable lenient mode (OCR failures are logged, not fatal).
    pub fn lenient(mut self) -> Self {
        self.pipeline_options = self.pipeline_options.lenient();
        self
    }

    /// Set the thresholding method.
    pub fn with_threshold(mut self, method: ThresholdMethod) -> Self {
        self.pipeline_options.preprocess = self.pipeline_options.preprocess.with_method(method);
        self
    }

    /// Skip the morphological cleanup after thresholding.
    pub fn without_morphology(mut self) -> Self {
        self.pipeline_options.preprocess = self.pipeline_options.preprocess.without_morphology();
        self
    }

    /// Only use outermost contours.
    pub fn external_contours(mut self) -> Self {
        self.pipeline_options.shapes = self.pipeline_options.shapes.external_only();
        self
    }

    /// Set the noise area threshold.
    pub fn with_min_area(mut self, area: f32) -> Self {
        self.pipeline_options.shapes = self.pipeline_options.shapes.with_min_area(area);
        self
    }

    /// Select the OCR engine by name.
    pub fn with_ocr_engine(mut self, name: impl Into<String>) -> Self {
        self.pipeline_options = self.pipeline_options.with_ocr_engine(name);
        self
    }

    /// Use a specific OCR engine instance.
    pub fn with_recognizer(mut self, recognizer: Arc<dyn TextRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    /// Set the OCR language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.pipeline_options.ocr = self.pipeline_options.ocr.clone().with_language(language);
        self
    }

    /// Skip text recognition.
    pub fn without_ocr(mut self) -> Self {
        self.pipeline_options = self.pipeline_options.without_ocr();
        self
    }

    /// Make element ids and seeds reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.render_options = self.render_options.with_seed(seed);
        self
    }

    /// Set the polygon rendering style.
    pub fn with_polygon_style(mut self, style: PolygonStyle) -> Self {
        self.render_options = self.render_options.with_polygon_style(style);
        self
    }

    fn pipeline(&self) -> Pipeline {
        let pipeline = Pipeline::new(self.pipeline_options.clone());
        match &self.recognizer {
            Some(recognizer) => pipeline.with_recognizer(recognizer.clone()),
            None => pipeline,
        }
    }

    /// Analyse an image file.
    pub fn process<P: AsRef<Path>>(self, path: P) -> Result<Img2ExcalidrawResult> {
        let output = self.pipeline().run_path(path)?;
        Ok(Img2ExcalidrawResult {
            diagram: output.diagram,
            render_options: self.render_options,
        })
    }

    /// Analyse an in-memory image.
    pub fn process_bytes(self, data: &[u8]) -> Result<Img2ExcalidrawResult> {
        let output = self.pipeline().run_bytes(data, None)?;
        Ok(Img2ExcalidrawResult {
            diagram: output.diagram,
            render_options: self.render_options,
        })
    }

    /// Analyse a decoded image.
    pub fn process_image(self, image: &DynamicImage) -> Result<Img2ExcalidrawResult> {
        let output = self.pipeline().run(image, None)?;
        Ok(Img2ExcalidrawResult {
            diagram: output.diagram,
            render_options: self.render_options,
        })
    }
}

impl Default for Img2Excalidraw {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of analysing an image.
pub struct Img2ExcalidrawResult {
    /// The analysed diagram
    pub diagram: Diagram,
    /// Render options to use
    render_options: RenderOptions,
}

impl Img2ExcalidrawResult {
    /// Build the Excalidraw scene.
    pub fn to_scene(&self) -> Result<Scene> {
        render::to_scene(&self.diagram, &self.render_options)
    }

    /// Convert to Excalidraw JSON.
    pub fn to_excalidraw_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.to_scene()?, format)
    }

    /// Convert to Obsidian Excalidraw Markdown.
    pub fn to_obsidian_markdown(&self) -> Result<String> {
        render::to_obsidian_markdown(&self.to_scene()?)
    }

    /// Convert the detection model to JSON.
    pub fn to_diagram_json(&self, format: JsonFormat) -> Result<String> {
        render::to_diagram_json(&self.diagram, format)
    }

    /// Recognized text in reading order.
    pub fn plain_text(&self) -> String {
        self.diagram.plain_text()
    }

    /// Get the diagram.
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }
}
