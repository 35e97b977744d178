//! Diagram-level types.

use super::{DetectedShape, ShapeKind, TextRegion};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structured result of analysing one diagram image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagram {
    /// Source image width in pixels
    pub width: u32,

    /// Source image height in pixels
    pub height: u32,

    /// Detected shapes, in contour order
    pub shapes: Vec<DetectedShape>,

    /// Recognized text regions, in engine order
    pub texts: Vec<TextRegion>,

    /// Provenance information
    pub metadata: DiagramMetadata,
}

impl Diagram {
    /// Create an empty diagram for an image of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
            texts: Vec::new(),
            metadata: DiagramMetadata::default(),
        }
    }

    /// Add a shape.
    pub fn add_shape(&mut self, shape: DetectedShape) {
        self.shapes.push(shape);
    }

    /// Add a text region.
    pub fn add_text(&mut self, text: TextRegion) {
        self.texts.push(text);
    }

    /// Number of shapes.
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Number of text regions.
    pub fn text_count(&self) -> usize {
        self.texts.len()
    }

    /// Whether nothing was detected.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.texts.is_empty()
    }

    /// Shape counts per kind.
    pub fn count_by_kind(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for shape in &self.shapes {
            *counts.entry(shape.kind.label().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Shapes of one kind.
    pub fn shapes_of(&self, kind: ShapeKind) -> impl Iterator<Item = &DetectedShape> {
        self.shapes.iter().filter(move |s| s.kind == kind)
    }

    /// All recognized text in reading order (top-to-bottom, then left-to-right).
    pub fn plain_text(&self) -> String {
        let mut texts: Vec<&TextRegion> = self.texts.iter().collect();
        texts.sort_by(|a, b| {
            let (pa, pb) = (a.top_left(), b.top_left());
            pa.y.total_cmp(&pb.y).then(pa.x.total_cmp(&pb.x))
        });
        texts
            .into_iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Where a diagram came from and how it was produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagramMetadata {
    /// Source file name or caller-supplied label
    pub source: Option<String>,

    /// Label of the thresholding method used
    pub threshold_method: String,

    /// Name of the OCR engine used
    pub ocr_engine: Option<String>,

    /// When the diagram was produced
    pub created: Option<DateTime<Utc>>,
}
