//! OCR through the `tesseract` command-line program.

use super::tsv::parse_tsv;
use super::{encode_png, OcrOptions, TextRecognizer};
use crate::error::{Error, Result};
use crate::model::TextRegion;
use image::DynamicImage;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Environment variable holding the path to the `tesseract` binary.
pub const TESSERACT_PATH_ENV: &str = "TESSERACT_PATH";

/// Recognizer that shells out to the `tesseract` executable.
///
/// The image is sent as PNG on stdin and the TSV report is read from stdout,
/// so no temporary files are involved.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    binary: PathBuf,
}

impl TesseractCli {
    /// Use `tesseract` from `PATH`.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
        }
    }

    /// Use a specific binary.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Use `$TESSERACT_PATH` if set, `tesseract` otherwise.
    pub fn from_env() -> Self {
        match std::env::var_os(TESSERACT_PATH_ENV) {
            Some(path) if !path.is_empty() => Self::with_binary(path),
            _ => Self::new(),
        }
    }

    /// Path of the binary this recognizer runs.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn command(&self, options: &OcrOptions) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["stdin", "stdout"])
            .arg("--psm")
            .arg(options.page_segmentation.to_string())
            .arg("-l")
            .arg(&options.language)
            .arg("tsv");
        cmd
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRecognizer for TesseractCli {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn recognize(&self, image: &DynamicImage, options: &OcrOptions) -> Result<Vec<TextRegion>> {
        let png = encode_png(image)?;

        let mut child = self
            .command(options)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::OcrUnavailable(format!(
                        "{} not found (set {} or install tesseract)",
                        self.binary.display(),
                        TESSERACT_PATH_ENV
                    ))
                } else {
                    Error::Io(e)
                }
            })?;

        // Feed stdin from a separate thread so a full stdout pipe cannot stall us.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Ocr("failed to open tesseract stdin".to_string()))?;
        let writer = std::thread::spawn(move || stdin.write_all(&png));

        let output = child.wait_with_output()?;
        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(Error::Io(e)),
            Err(_) => return Err(Error::Ocr("stdin writer panicked".to_string())),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        let regions = parse_tsv(&tsv);
        log::info!("Tesseract recognized {} text lines", regions.len());
        Ok(regions)
    }
}
