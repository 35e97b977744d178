//! Detected shape types.

use super::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Classification of a detected contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Four vertices with a near-unit aspect ratio
    Square,
    /// Four vertices
    Rectangle,
    /// Many vertices, area close to the enclosing circle
    Circle,
    /// Any other closed outline
    Polygon,
    /// Not classified
    Unidentified,
}

impl ShapeKind {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ShapeKind::Square => "Square",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::Polygon => "Polygon",
            ShapeKind::Unidentified => "Unidentified",
        }
    }

    /// Whether the kind renders as a box.
    pub fn is_boxlike(&self) -> bool {
        matches!(self, ShapeKind::Square | ShapeKind::Rectangle)
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which border of a stroke a contour traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContourBorder {
    /// Outer edge of a foreground region
    #[default]
    Outer,
    /// Edge of a hole inside a foreground region
    Hole,
}

/// A shape found in the binarized image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedShape {
    /// Shape classification
    pub kind: ShapeKind,

    /// Bounding rectangle of the approximated outline
    pub bounds: Rect,

    /// Approximated outline vertices
    pub vertices: Vec<Point>,

    /// Area enclosed by the raw contour
    pub contour_area: f32,

    /// Whether the contour is an outer or hole border
    pub border: ContourBorder,
}

impl DetectedShape {
    /// Create a shape from its parts.
    pub fn new(kind: ShapeKind, bounds: Rect, vertices: Vec<Point>) -> Self {
        Self {
            kind,
            bounds,
            vertices,
            contour_area: 0.0,
            border: ContourBorder::Outer,
        }
    }

    /// Set the raw contour area.
    pub fn with_contour_area(mut self, area: f32) -> Self {
        self.contour_area = area;
        self
    }

    /// Set the border type.
    pub fn with_border(mut self, border: ContourBorder) -> Self {
        self.border = border;
        self
    }

    /// Number of approximated vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}
