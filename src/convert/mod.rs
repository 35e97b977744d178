//! File-level conversion: run the pipeline and write every artifact.
//!
//! One input image produces a directory of numbered files, mirroring the
//! stages of the pipeline:
//!
//! | File | Contents |
//! |------|----------|
//! | `1-gray.png` | grayscale input |
//! | `2-threshold-<method>.png` | binary image |
//! | `3-detected-shapes.png` | shape outlines over the input |
//! | `4-ocr-output.png` | text boxes over the input |
//! | `5-excalidraw.json` | Excalidraw scene |
//! | `6-Drawing-for-Obsidian.excalidraw.md` | Obsidian Excalidraw file |
//! | `diagram.json` | raw detection model (opt-in) |
//!
//! # Example
//!
//! ```no_run
//! use img2excalidraw::convert::{convert_file, ConvertOptions};
//!
//! fn main() -> img2excalidraw::Result<()> {
//!     let report = convert_file("whiteboard.jpg", "out/whiteboard", &ConvertOptions::default())?;
//!     for path in &report.written {
//!         println!("{}", path.display());
//!     }
//!     Ok(())
//! }
//! ```

mod batch;

pub use batch::{
    convert_directory, convert_directory_with_progress, BatchEvent, BatchFailure, BatchReport,
};

use crate::error::{Error, Result};
use crate::model::Diagram;
use crate::ocr::TextRecognizer;
use crate::pipeline::{Pipeline, PipelineOptions, PipelineOutput};
use crate::render::{
    draw_shapes, draw_text_regions, to_diagram_json, to_json, to_obsidian_markdown, to_scene,
    JsonFormat, RenderOptions, SceneStats,
};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const GRAY_FILE: &str = "1-gray.png";
pub const SHAPES_OVERLAY_FILE: &str = "3-detected-shapes.png";
pub const OCR_OVERLAY_FILE: &str = "4-ocr-output.png";
pub const EXCALIDRAW_FILE: &str = "5-excalidraw.json";
pub const OBSIDIAN_FILE: &str = "6-Drawing-for-Obsidian.excalidraw.md";
pub const DIAGRAM_FILE: &str = "diagram.json";

/// File name of the threshold artifact for a method label.
pub fn threshold_file_name(label: &str) -> String {
    format!("2-threshold-{}.png", label)
}

/// Which artifacts [`convert_file`] writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Artifacts {
    /// `1-gray.png`
    pub gray: bool,
    /// `2-threshold-<method>.png`
    pub threshold: bool,
    /// `3-detected-shapes.png`
    pub shapes_overlay: bool,
    /// `4-ocr-output.png`
    pub ocr_overlay: bool,
    /// `5-excalidraw.json`
    pub excalidraw_json: bool,
    /// `6-Drawing-for-Obsidian.excalidraw.md`
    pub obsidian_markdown: bool,
    /// `diagram.json` with the detected model
    pub diagram_json: bool,
}

impl Artifacts {
    /// Every artifact, including the raw diagram model.
    pub fn all() -> Self {
        Self {
            diagram_json: true,
            ..Self::default()
        }
    }

    /// Only the drawing files, no debug images.
    pub fn outputs_only() -> Self {
        Self {
            gray: false,
            threshold: false,
            shapes_overlay: false,
            ocr_overlay: false,
            ..Self::default()
        }
    }

    /// Whether any debug image is enabled.
    pub fn has_debug_images(&self) -> bool {
        self.gray || self.threshold || self.shapes_overlay || self.ocr_overlay
    }
}

impl Default for Artifacts {
    fn default() -> Self {
        Self {
            gray: true,
            threshold: true,
            shapes_overlay: true,
            ocr_overlay: true,
            excalidraw_json: true,
            obsidian_markdown: true,
            diagram_json: false,
        }
    }
}

/// Output format for in-memory conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Excalidraw scene JSON
    #[default]
    Excalidraw,

    /// Obsidian Excalidraw Markdown
    ObsidianMarkdown,

    /// Raw detection model as JSON
    DiagramJson,
}

impl OutputFormat {
    /// MIME type of the output.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Excalidraw => "application/vnd.excalidraw+json",
            OutputFormat::ObsidianMarkdown => "text/markdown",
            OutputFormat::DiagramJson => "application/json",
        }
    }

    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Excalidraw => "excalidraw",
            OutputFormat::ObsidianMarkdown => "excalidraw.md",
            OutputFormat::DiagramJson => "json",
        }
    }
}

/// Options for file conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Pipeline options
    pub pipeline: PipelineOptions,

    /// Rendering options
    pub render: RenderOptions,

    /// Artifacts written by file conversion
    pub artifacts: Artifacts,

    /// Output format for in-memory conversion
    pub format: OutputFormat,

    /// JSON layout for JSON outputs
    pub json_format: JsonFormat,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set pipeline options.
    pub fn with_pipeline(mut self, options: PipelineOptions) -> Self {
        self.pipeline = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Set the artifact selection.
    pub fn with_artifacts(mut self, artifacts: Artifacts) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Skip debug images.
    pub fn without_debug_images(mut self) -> Self {
        self.artifacts = Artifacts {
            excalidraw_json: self.artifacts.excalidraw_json,
            obsidian_markdown: self.artifacts.obsidian_markdown,
            diagram_json: self.artifacts.diagram_json,
            ..Artifacts::outputs_only()
        };
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }
}

/// Result of an in-memory conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Converted content
    pub content: String,

    /// The analysed diagram
    pub diagram: Diagram,

    /// Scene statistics
    pub stats: SceneStats,

    /// MIME type of the output
    pub mime_type: &'static str,
}

impl ConvertResult {
    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Result of converting one file to disk.
#[derive(Debug, Clone)]
pub struct ConvertReport {
    /// Input image
    pub input: PathBuf,

    /// Directory the artifacts were written to
    pub output_dir: PathBuf,

    /// Written files, in stage order
    pub written: Vec<PathBuf>,

    /// The analysed diagram
    pub diagram: Diagram,

    /// Scene statistics
    pub stats: SceneStats,
}

/// Runs conversions with a shared pipeline.
#[derive(Clone)]
pub struct Converter {
    options: ConvertOptions,
    pipeline: Pipeline,
}

impl Converter {
    /// Create a converter.
    pub fn new(options: ConvertOptions) -> Self {
        let pipeline = Pipeline::new(options.pipeline.clone());
        Self { options, pipeline }
    }

    /// Use a specific OCR engine.
    pub fn with_recognizer(mut self, recognizer: Arc<dyn TextRecognizer>) -> Self {
        self.pipeline = self.pipeline.with_recognizer(recognizer);
        self
    }

    /// Conversion options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert one image file, writing artifacts into `output_dir`.
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output_dir: Q,
    ) -> Result<ConvertReport> {
        let input = input.as_ref();
        let output_dir = output_dir.as_ref();
        let data = std::fs::read(input)?;
        let image = crate::pipeline::decode_image(&data)?;
        let source = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());

        let output = self.pipeline.run(&image, source.as_deref())?;
        self.write_artifacts(input, output_dir, &image, output)
    }

    fn write_artifacts(
        &self,
        input: &Path,
        output_dir: &Path,
        image: &DynamicImage,
        output: PipelineOutput,
    ) -> Result<ConvertReport> {
        std::fs::create_dir_all(output_dir)?;
        let artifacts = &self.options.artifacts;
        let mut written = Vec::new();
        let PipelineOutput {
            diagram,
            preprocessed,
        } = output;

        if artifacts.gray {
            let path = output_dir.join(GRAY_FILE);
            preprocessed.gray.save(&path)?;
            log::info!("Saved grayscale image to {}", path.display());
            written.push(path);
        }

        if artifacts.threshold {
            let path = output_dir.join(threshold_file_name(&preprocessed.method.label()));
            preprocessed.binary.save(&path)?;
            log::info!("Saved threshold image to {}", path.display());
            written.push(path);
        }

        if artifacts.shapes_overlay {
            let path = output_dir.join(SHAPES_OVERLAY_FILE);
            draw_shapes(image, &diagram.shapes).save(&path)?;
            log::info!("Saved shape detection image to {}", path.display());
            written.push(path);
        }

        if artifacts.ocr_overlay {
            let path = output_dir.join(OCR_OVERLAY_FILE);
            draw_text_regions(image, &diagram.texts).save(&path)?;
            log::info!("Saved OCR annotated image to {}", path.display());
            written.push(path);
        }

        let scene = to_scene(&diagram, &self.options.render)?;
        let stats = SceneStats::from_scene(&scene);

        if artifacts.excalidraw_json {
            let path = output_dir.join(EXCALIDRAW_FILE);
            std::fs::write(&path, to_json(&scene, self.options.json_format)?)?;
            log::info!("Saved Excalidraw JSON to {}", path.display());
            written.push(path);
        }

        if artifacts.obsidian_markdown {
            let path = output_dir.join(OBSIDIAN_FILE);
            std::fs::write(&path, to_obsidian_markdown(&scene)?)?;
            log::info!("Saved Excalidraw markdown to {}", path.display());
            written.push(path);
        }

        if artifacts.diagram_json {
            let path = output_dir.join(DIAGRAM_FILE);
            std::fs::write(&path, to_diagram_json(&diagram, self.options.json_format)?)?;
            log::info!("Saved diagram model to {}", path.display());
            written.push(path);
        }

        Ok(ConvertReport {
            input: input.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            written,
            diagram,
            stats,
        })
    }

    /// Convert an in-memory image to the configured output format.
    pub fn convert_bytes(&self, data: &[u8]) -> Result<ConvertResult> {
        let output = self.pipeline.run_bytes(data, None)?;
        self.render(output.diagram)
    }

    /// Convert a decoded image to the configured output format.
    pub fn convert_image(&self, image: &DynamicImage, source: Option<&str>) -> Result<ConvertResult> {
        let output = self.pipeline.run(image, source)?;
        self.render(output.diagram)
    }

    fn render(&self, diagram: Diagram) -> Result<ConvertResult> {
        let format = self.options.format;
        let scene = to_scene(&diagram, &self.options.render)?;
        let stats = SceneStats::from_scene(&scene);

        let content = match format {
            OutputFormat::Excalidraw => to_json(&scene, self.options.json_format)?,
            OutputFormat::ObsidianMarkdown => to_obsidian_markdown(&scene)?,
            OutputFormat::DiagramJson => to_diagram_json(&diagram, self.options.json_format)?,
        };

        Ok(ConvertResult {
            content,
            diagram,
            stats,
            mime_type: format.mime_type(),
        })
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}

/// Convert one image file, writing artifacts into `output_dir`.
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output_dir: Q,
    options: &ConvertOptions,
) -> Result<ConvertReport> {
    Converter::new(options.clone()).convert_file(input, output_dir)
}

/// Convert an in-memory image to `options.format`.
pub fn convert_bytes(data: &[u8], options: &ConvertOptions) -> Result<ConvertResult> {
    Converter::new(options.clone()).convert_bytes(data)
}

/// Convert one image file on tokio's blocking pool.
#[cfg(feature = "async")]
pub async fn convert_file_async(
    input: PathBuf,
    output_dir: PathBuf,
    options: ConvertOptions,
) -> Result<ConvertReport> {
    tokio::task::spawn_blocking(move || convert_file(&input, &output_dir, &options))
        .await
        .map_err(|e| Error::Other(format!("conversion task failed: {}", e)))?
}

/// Default output directory for an input: `<stem>_excalidraw` next to it.
pub fn default_output_dir<P: AsRef<Path>>(input: P) -> Result<PathBuf> {
    let input = input.as_ref();
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::Other(format!("invalid input path: {}", input.display())))?;
    let parent = input.parent().unwrap_or_else(|| Path::new(""));
    Ok(parent.join(format!("{}_excalidraw", stem)))
}
