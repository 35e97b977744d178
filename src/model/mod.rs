//! Diagram model types.
//!
//! This module defines the intermediate representation that bridges image
//! analysis and output rendering. Shapes and text regions live in image pixel
//! coordinates; renderers map them onto a target format.

mod diagram;
mod geometry;
mod shape;
mod text;

pub use diagram::{Diagram, DiagramMetadata};
pub use geometry::{Circle, Point, Polygon, Rect};
pub use shape::{ContourBorder, DetectedShape, ShapeKind};
pub use text::TextRegion;
