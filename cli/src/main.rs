//! img2excalidraw CLI - hand-drawn diagram to Excalidraw converter

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use img2excalidraw::convert::{default_output_dir, BatchEvent};
use img2excalidraw::ocr::{RecognizerRegistry, TesseractCli};
use img2excalidraw::render::{JsonFormat, PolygonStyle, RenderOptions};
use img2excalidraw::{
    detect_format_from_path, ContourRetrieval, ConvertOptions, Converter, ErrorMode, OcrOptions,
    OutputFormat, PipelineOptions, PreprocessOptions, ShapeOptions, ThresholdMethod,
};

#[derive(Parser)]
#[command(name = "img2excalidraw")]
#[command(version)]
#[command(about = "Convert photos of hand-drawn diagrams to Excalidraw drawings", long_about = None)]
struct Cli {
    /// Input image file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    analysis: AnalysisArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an image and write every artifact to a directory
    Convert {
        /// Input image file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Only write the Excalidraw and Obsidian files
        #[arg(long)]
        no_debug_images: bool,

        /// Also write the raw detection model
        #[arg(long)]
        diagram_json: bool,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Convert an image to Excalidraw JSON
    Json {
        /// Input image file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Convert an image to an Obsidian Excalidraw Markdown file
    #[command(alias = "md")]
    Markdown {
        /// Input image file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// List detected shapes and text
    Shapes {
        /// Input image file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Convert every image in a directory
    Batch {
        /// Input directory
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Only write the Excalidraw and Obsidian files
        #[arg(long)]
        no_debug_images: bool,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Show image information
    Info {
        /// Input image file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// List OCR engines and whether they are usable
    Engines,

    /// Show version information
    Version,
}

/// Options shared by every command that analyses an image.
#[derive(Args, Clone)]
struct AnalysisArgs {
    /// Thresholding method
    #[arg(long, value_enum)]
    threshold: Option<ThresholdArg>,

    /// Adaptive threshold block size (odd, >= 3)
    #[arg(long)]
    block_size: Option<u32>,

    /// Constant subtracted from the local mean
    #[arg(long, allow_hyphen_values = true)]
    offset: Option<i32>,

    /// Level for the fixed threshold method
    #[arg(long, default_value = "127")]
    fixed_level: u8,

    /// Skip the morphological open/close cleanup
    #[arg(long)]
    no_morphology: bool,

    /// Contour retrieval mode
    #[arg(long, value_enum)]
    retrieval: Option<RetrievalArg>,

    /// Drop contours with area at or below this value
    #[arg(long)]
    min_area: Option<f32>,

    /// Approximation tolerance as a fraction of the perimeter
    #[arg(long)]
    epsilon: Option<f32>,

    /// OCR engine ("tesseract", "leptess", "none")
    #[arg(long, env = "IMG2EXCALIDRAW_OCR")]
    ocr: Option<String>,

    /// OCR language
    #[arg(long, env = "IMG2EXCALIDRAW_LANG")]
    lang: Option<String>,

    /// Path to the tesseract executable
    #[arg(long, env = "TESSERACT_PATH")]
    tesseract: Option<PathBuf>,

    /// Drop text below this confidence (0.0-1.0)
    #[arg(long)]
    min_confidence: Option<f32>,

    /// Keep going when OCR fails
    #[arg(long)]
    lenient: bool,

    /// Seed for reproducible element ids
    #[arg(long)]
    seed: Option<u64>,

    /// How polygons are drawn
    #[arg(long, value_enum)]
    polygon_style: Option<PolygonStyleArg>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ThresholdArg {
    /// Median blur + adaptive mean (default)
    Median,
    /// Adaptive mean without blur
    Adaptive,
    /// Global Otsu threshold
    Otsu,
    /// Global fixed threshold (see --fixed-level)
    Fixed,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum RetrievalArg {
    /// Every contour, including holes (default)
    Tree,
    /// Outermost contours only
    External,
}

impl From<RetrievalArg> for ContourRetrieval {
    fn from(arg: RetrievalArg) -> Self {
        match arg {
            RetrievalArg::Tree => ContourRetrieval::Tree,
            RetrievalArg::External => ContourRetrieval::External,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PolygonStyleArg {
    /// One line element per edge (default)
    Segments,
    /// A single closed line element
    Polyline,
}

impl From<PolygonStyleArg> for PolygonStyle {
    fn from(arg: PolygonStyleArg) -> Self {
        match arg {
            PolygonStyleArg::Segments => PolygonStyle::Segments,
            PolygonStyleArg::Polyline => PolygonStyle::Polyline,
        }
    }
}

impl AnalysisArgs {
    fn threshold_method(&self) -> ThresholdMethod {
        let mut method = match self.threshold {
            None | Some(ThresholdArg::Median) => ThresholdMethod::default(),
            Some(ThresholdArg::Adaptive) => ThresholdMethod::AdaptiveMean {
                block_size: 25,
                offset: 5,
            },
            Some(ThresholdArg::Otsu) => ThresholdMethod::Otsu,
            Some(ThresholdArg::Fixed) => ThresholdMethod::Fixed(self.fixed_level),
        };
        if let Some(size) = self.block_size {
            method = method.with_block_size(size);
        }
        if let Some(offset) = self.offset {
            method = method.with_offset(offset);
        }
        method
    }

    fn pipeline_options(&self) -> PipelineOptions {
        let mut preprocess = PreprocessOptions::new().with_method(self.threshold_method());
        if self.no_morphology {
            preprocess = preprocess.without_morphology();
        }

        let mut shapes = ShapeOptions::new();
        if let Some(retrieval) = self.retrieval {
            shapes = shapes.with_retrieval(retrieval.into());
        }
        if let Some(area) = self.min_area {
            shapes = shapes.with_min_area(area);
        }
        if let Some(epsilon) = self.epsilon {
            shapes = shapes.with_epsilon_ratio(epsilon);
        }

        let mut ocr = OcrOptions::new();
        if let Some(ref lang) = self.lang {
            ocr = ocr.with_language(lang.clone());
        }
        if let Some(confidence) = self.min_confidence {
            ocr = ocr.with_min_confidence(confidence);
        }

        let mut options = PipelineOptions::new()
            .with_preprocess(preprocess)
            .with_shapes(shapes)
            .with_ocr(ocr);
        if let Some(ref engine) = self.ocr {
            options = options.with_ocr_engine(engine.clone());
        }
        if self.lenient {
            options = options.with_error_mode(ErrorMode::Lenient);
        }
        options
    }

    fn render_options(&self) -> RenderOptions {
        let mut options = RenderOptions::new();
        if let Some(seed) = self.seed {
            options = options.with_seed(seed);
        }
        if let Some(style) = self.polygon_style {
            options = options.with_polygon_style(style.into());
        }
        options
    }

    fn converter(&self, options: ConvertOptions) -> Converter {
        let options = options
            .with_pipeline(self.pipeline_options())
            .with_render_options(self.render_options());
        let use_tesseract = options.pipeline.ocr_engine.eq_ignore_ascii_case("tesseract");
        let converter = Converter::new(options);
        match &self.tesseract {
            Some(path) if use_tesseract => {
                converter.with_recognizer(Arc::new(TesseractCli::with_binary(path.clone())))
            }
            _ => converter,
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            no_debug_images,
            diagram_json,
            analysis,
        }) => cmd_convert(
            &input,
            output.as_deref(),
            no_debug_images,
            diagram_json,
            &analysis,
        ),
        Some(Commands::Json {
            input,
            output,
            compact,
            analysis,
        }) => cmd_json(&input, output.as_deref(), compact, &analysis),
        Some(Commands::Markdown {
            input,
            output,
            analysis,
        }) => cmd_markdown(&input, output.as_deref(), &analysis),
        Some(Commands::Shapes { input, analysis }) => cmd_shapes(&input, &analysis),
        Some(Commands::Batch {
            input,
            output,
            no_debug_images,
            analysis,
        }) => cmd_batch(&input, output.as_deref(), no_debug_images, &analysis),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Engines) => {
            cmd_engines();
            Ok(())
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), false, false, &cli.analysis)
            } else {
                println!("{}", "Usage: img2excalidraw <FILE> [OUTPUT]".yellow());
                println!("       img2excalidraw --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        log::error!("Command failed: {}", e);
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    no_debug_images: bool,
    diagram_json: bool,
    analysis: &AnalysisArgs,
) -> CliResult {
    let output_dir = match output {
        Some(p) => p.to_path_buf(),
        None => default_output_dir(input)?,
    };

    let mut options = ConvertOptions::new();
    if no_debug_images {
        options = options.without_debug_images();
    }
    options.artifacts.diagram_json = diagram_json;
    log::info!(
        "Converting {} into {}",
        input.display(),
        output_dir.display()
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Converting {}...", input.display()));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let report = analysis.converter(options).convert_file(input, &output_dir)?;

    pb.finish_with_message("Done!");
    log::debug!("Wrote {} files", report.written.len());

    println!(
        "\n{} {} shapes, {} text regions",
        "Detected".green().bold(),
        report.diagram.shape_count(),
        report.diagram.text_count()
    );
    println!("{} {}", "Output files in".green().bold(), output_dir.display());
    let last = report.written.len().saturating_sub(1);
    for (i, path) in report.written.iter().enumerate() {
        let branch = if i == last { "└─" } else { "├─" };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("  {} {}", branch.dimmed(), name);
    }

    Ok(())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    analysis: &AnalysisArgs,
) -> CliResult {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let options = ConvertOptions::new()
        .with_format(OutputFormat::Excalidraw)
        .with_json_format(format);
    log::info!("Rendering Excalidraw scene for {}", input.display());
    let data = fs::read(input)?;
    let result = analysis.converter(options).convert_bytes(&data)?;

    write_or_print(output, &result.content)
}

fn cmd_markdown(input: &Path, output: Option<&Path>, analysis: &AnalysisArgs) -> CliResult {
    let options = ConvertOptions::new().with_format(OutputFormat::ObsidianMarkdown);
    log::info!("Rendering Obsidian drawing for {}", input.display());
    let data = fs::read(input)?;
    let result = analysis.converter(options).convert_bytes(&data)?;

    write_or_print(output, &result.content)
}

fn write_or_print(output: Option<&Path>, content: &str) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        log::debug!("Wrote {} bytes to {}", content.len(), path.display());
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_shapes(input: &Path, analysis: &AnalysisArgs) -> CliResult {
    let data = fs::read(input)?;
    let result = analysis
        .converter(ConvertOptions::new())
        .convert_bytes(&data)?;
    let diagram = &result.diagram;

    println!("{}", "Shapes".cyan().bold());
    println!("{}", "─".repeat(60).dimmed());
    println!(
        "{:>4}  {:<12} {:>6} {:>6} {:>6} {:>6} {:>5} {:>10}",
        "#".bold(),
        "Kind".bold(),
        "X".bold(),
        "Y".bold(),
        "W".bold(),
        "H".bold(),
        "Verts".bold(),
        "Area".bold()
    );
    for (i, shape) in diagram.shapes.iter().enumerate() {
        let b = &shape.bounds;
        println!(
            "{:>4}  {:<12} {:>6} {:>6} {:>6} {:>6} {:>5} {:>10.1}",
            i + 1,
            shape.kind.label(),
            b.x,
            b.y,
            b.width,
            b.height,
            shape.vertex_count(),
            shape.contour_area
        );
    }

    if !diagram.texts.is_empty() {
        println!();
        println!("{}", "Text".cyan().bold());
        println!("{}", "─".repeat(60).dimmed());
        for region in &diagram.texts {
            let origin = region.top_left();
            println!(
                "  ({:>5.0}, {:>5.0})  {:.2}  {}",
                origin.x, origin.y, region.confidence, region.text
            );
        }
    }

    println!();
    for (kind, count) in diagram.count_by_kind() {
        println!("{}: {}", kind.bold(), count);
    }

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: Option<&Path>,
    no_debug_images: bool,
    analysis: &AnalysisArgs,
) -> CliResult {
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| input.join("excalidraw"));

    let mut options = ConvertOptions::new();
    if no_debug_images {
        options = options.without_debug_images();
    }
    let converter = analysis.converter(options);
    log::info!(
        "Batch converting {} into {}",
        input.display(),
        output_dir.display()
    );

    let (tx, rx) = crossbeam_channel::unbounded();
    let worker = {
        let input = input.to_path_buf();
        let output_dir = output_dir.clone();
        thread::spawn(move || converter.convert_directory_with_progress(input, output_dir, tx))
    };

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut failures = Vec::new();
    for event in rx {
        match event {
            BatchEvent::Started { total } => pb.set_length(total as u64),
            BatchEvent::FileDone { input, shapes, texts } => {
                pb.set_message(format!(
                    "{} ({} shapes, {} texts)",
                    file_label(&input),
                    shapes,
                    texts
                ));
                pb.inc(1);
            }
            BatchEvent::FileFailed { input, error } => {
                failures.push((input, error));
                pb.inc(1);
            }
            BatchEvent::Finished { .. } => pb.finish_with_message("Done!"),
        }
    }

    for (path, error) in &failures {
        eprintln!("{} {}: {}", "Failed".red(), path.display(), error);
    }

    let report = worker
        .join()
        .map_err(|_| "batch worker panicked".to_string())??;

    println!(
        "\n{} {} converted, {} failed",
        "Batch complete:".green().bold(),
        report.succeeded.len(),
        report.failed.len()
    );
    println!("{} {}", "Output directory".green(), output_dir.display());

    Ok(())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn cmd_info(input: &Path) -> CliResult {
    let format = detect_format_from_path(input)?;
    let data = fs::read(input)?;
    let image = img2excalidraw::pipeline::decode_image(&data)?;

    println!("{}", "Image Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {}", "MIME".bold(), format.kind.mime_type());
    println!("{}: {}x{}", "Size".bold(), image.width(), image.height());
    println!("{}: {:?}", "Color".bold(), image.color());
    println!("{}: {} bytes", "File size".bold(), data.len());

    // Shape statistics only; OCR is skipped so info works without tesseract
    let options = ConvertOptions::new().with_pipeline(PipelineOptions::new().without_ocr());
    let result = Converter::new(options).convert_image(&image, Some(&file_label(input)))?;
    let diagram = &result.diagram;

    println!();
    println!("{}", "Detection".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Threshold".bold(), diagram.metadata.threshold_method);
    println!("{}: {}", "Shapes".bold(), diagram.shape_count());
    for (kind, count) in diagram.count_by_kind() {
        println!("  {} {}: {}", "•".dimmed(), kind, count);
    }
    println!(
        "{}: {}",
        "Scene elements".bold(),
        result.stats.element_count()
    );

    Ok(())
}

fn cmd_engines() {
    let registry = RecognizerRegistry::with_defaults();

    println!("{}", "OCR Engines".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for engine in registry.iter() {
        let status = if engine.is_available() {
            "available".green()
        } else {
            "not available".red()
        };
        println!("  {:<12} {}", engine.name().bold(), status);
    }
}

fn cmd_version() {
    println!(
        "{} {}",
        "img2excalidraw".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("Hand-drawn diagram to Excalidraw converter");
    println!();
    println!("License: MIT");
}
