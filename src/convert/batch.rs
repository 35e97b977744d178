//! Directory conversion.

use super::{ConvertOptions, ConvertReport, Converter};
use crate::detect::has_image_extension;
use crate::error::{Error, Result};
use crate::pipeline::ErrorMode;
use crate::render::SceneStats;
use crossbeam_channel::Sender;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Progress events emitted during a batch conversion.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// Conversion is about to start
    Started {
        /// Number of images found
        total: usize,
    },
    /// One file converted
    FileDone {
        /// Input image
        input: PathBuf,
        /// Detected shapes
        shapes: usize,
        /// Recognized text regions
        texts: usize,
    },
    /// One file failed
    FileFailed {
        /// Input image
        input: PathBuf,
        /// Error message
        error: String,
    },
    /// All files processed
    Finished {
        /// Files converted
        succeeded: usize,
        /// Files that failed
        failed: usize,
    },
}

/// A file that could not be converted.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    /// Input image
    pub input: PathBuf,

    /// Error message
    pub error: String,
}

/// Outcome of a batch conversion.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Successful conversions, in input order
    pub succeeded: Vec<ConvertReport>,

    /// Failed conversions, in input order
    pub failed: Vec<BatchFailure>,

    /// Scene statistics over all successful conversions
    pub stats: SceneStats,
}

impl BatchReport {
    /// Number of files attempted.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Whether every file converted.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Image files directly inside `dir`, sorted by name.
pub fn list_images<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_image_extension(&path) {
            images.push(path);
        }
    }
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

/// Pair each input with its output directory.
///
/// Inputs sharing an output name after the first one (in input order) get an
/// error instead of a directory.
fn plan_outputs(
    images: Vec<PathBuf>,
    output_dir: &Path,
) -> Vec<(PathBuf, std::result::Result<PathBuf, String>)> {
    let mut claimed: HashMap<String, PathBuf> = HashMap::new();
    images
        .into_iter()
        .map(|input| {
            let name = output_name(&input);
            let target = match claimed.get(&name) {
                Some(owner) => Err(format!(
                    "output directory '{}' is already used by {}",
                    name,
                    owner.display()
                )),
                None => {
                    claimed.insert(name.clone(), input.clone());
                    Ok(output_dir.join(&name))
                }
            };
            (input, target)
        })
        .collect()
}

/// Output directory name for an input: its file name up to the first `.`.
pub fn output_name(input: &Path) -> String {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split('.').next() {
        Some(prefix) if !prefix.is_empty() => prefix.to_string(),
        _ => name,
    }
}

impl Converter {
    /// Convert every image in `input_dir` into per-image directories under
    /// `output_dir`.
    pub fn convert_directory<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_dir: P,
        output_dir: Q,
    ) -> Result<BatchReport> {
        self.run_batch(input_dir.as_ref(), output_dir.as_ref(), None)
    }

    /// Like [`convert_directory`](Self::convert_directory), reporting progress on `events`.
    pub fn convert_directory_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_dir: P,
        output_dir: Q,
        events: Sender<BatchEvent>,
    ) -> Result<BatchReport> {
        self.run_batch(input_dir.as_ref(), output_dir.as_ref(), Some(&events))
    }

    fn run_batch(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        events: Option<&Sender<BatchEvent>>,
    ) -> Result<BatchReport> {
        let send = |event: BatchEvent| {
            if let Some(tx) = events {
                // A dropped receiver only means nobody is watching.
                let _ = tx.send(event);
            }
        };

        let images = list_images(input_dir)?;
        log::info!(
            "Running batch on {} images in {}",
            images.len(),
            input_dir.display()
        );
        send(BatchEvent::Started {
            total: images.len(),
        });
        std::fs::create_dir_all(output_dir)?;

        let results: Vec<(PathBuf, Result<ConvertReport>)> = plan_outputs(images, output_dir)
            .into_par_iter()
            .map(|(input, target)| {
                let result = match target {
                    Ok(target) => {
                        log::info!("Processing image: {}", input.display());
                        self.convert_file(&input, &target)
                    }
                    Err(collision) => Err(Error::Other(collision)),
                };
                match &result {
                    Ok(report) => send(BatchEvent::FileDone {
                        input: input.clone(),
                        shapes: report.diagram.shape_count(),
                        texts: report.diagram.text_count(),
                    }),
                    Err(e) => {
                        log::warn!("Failed to convert {}: {}", input.display(), e);
                        send(BatchEvent::FileFailed {
                            input: input.clone(),
                            error: e.to_string(),
                        })
                    }
                }
                (input, result)
            })
            .collect();

        let mut report = BatchReport::default();
        for (input, result) in results {
            match result {
                Ok(converted) => {
                    report.stats.merge(&converted.stats);
                    report.succeeded.push(converted);
                }
                Err(e) => report.failed.push(BatchFailure {
                    input,
                    error: e.to_string(),
                }),
            }
        }

        send(BatchEvent::Finished {
            succeeded: report.succeeded.len(),
            failed: report.failed.len(),
        });
        log::info!(
            "Batch completed: {} converted, {} failed",
            report.succeeded.len(),
            report.failed.len()
        );

        if !report.is_success() && self.options.pipeline.error_mode == ErrorMode::Strict {
            return Err(Error::Batch {
                failed: report.failed.len(),
                total: report.total(),
            });
        }
        Ok(report)
    }
}

/// Convert every image in `input_dir` into per-image directories under `output_dir`.
pub fn convert_directory<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_dir: Q,
    options: &ConvertOptions,
) -> Result<BatchReport> {
    Converter::new(options.clone()).convert_directory(input_dir, output_dir)
}

/// Convert a directory, sending [`BatchEvent`]s as files complete.
pub fn convert_directory_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_dir: Q,
    options: &ConvertOptions,
    events: Sender<BatchEvent>,
) -> Result<BatchReport> {
    Converter::new(options.clone()).convert_directory_with_progress(input_dir, output_dir, events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_name() {
        assert_eq!(output_name(Path::new("in/board.jpg")), "board");
        assert_eq!(output_name(Path::new("in/board.v2.final.png")), "board");
        assert_eq!(output_name(Path::new("in/.hidden.png")), ".hidden.png");
    }

    #[test]
    fn test_plan_outputs_rejects_collisions() {
        let images = vec![
            PathBuf::from("in/board.png"),
            PathBuf::from("in/board.v2.png"),
            PathBuf::from("in/flow.jpg"),
        ];
        let plan = plan_outputs(images, Path::new("out"));

        assert_eq!(plan[0].1, Ok(PathBuf::from("out/board")));
        let collision = plan[1].1.as_ref().unwrap_err();
        assert!(collision.contains("'board'"));
        assert!(collision.contains("board.png"));
        assert_eq!(plan[2].1, Ok(PathBuf::from("out/flow")));
    }

    #[test]
    fn test_list_images_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.PNG", "a.jpg", "notes.txt", "c.jpeg"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("d.png")).unwrap();

        let images = list_images(dir.path()).unwrap();
        let names: Vec<String> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.PNG", "c.jpeg"]);
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let result = list_images("/nonexistent/img2excalidraw/input");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_batch_report_counts() {
        let mut report = BatchReport::default();
        assert!(report.is_success());
        report.failed.push(BatchFailure {
            input: PathBuf::from("x.png"),
            error: "boom".to_string(),
        });
        assert_eq!(report.total(), 1);
        assert!(!report.is_success());
    }
}
