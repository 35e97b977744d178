//! Contour-based shape detection.
//!
//! Traces every border in the binary image, approximates each border with a
//! coarse polygon and classifies the result by vertex count, aspect ratio and
//! circularity.

mod options;

pub use options::{ContourRetrieval, ShapeOptions};

use crate::error::Result;
use crate::model::{ContourBorder, DetectedShape, Polygon, Rect, ShapeKind};
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType, Contour};

/// Detect shapes in an inverted binary image (strokes = 255).
///
/// Shapes are returned in contour order.
pub fn detect_shapes(binary: &GrayImage, options: &ShapeOptions) -> Result<Vec<DetectedShape>> {
    options.validate()?;

    log::info!("Detecting shapes from contours");
    let contours: Vec<Contour<u32>> = find_contours::<u32>(binary);
    log::info!("Found {} contours", contours.len());

    let candidates: Vec<(Polygon, ContourBorder)> = contours
        .iter()
        .filter(|c| match options.retrieval {
            ContourRetrieval::Tree => true,
            ContourRetrieval::External => {
                c.border_type == BorderType::Outer && c.parent.is_none()
            }
        })
        .map(|c| {
            let border = match c.border_type {
                BorderType::Outer => ContourBorder::Outer,
                BorderType::Hole => ContourBorder::Hole,
            };
            (Polygon::from_contour(c), border)
        })
        .filter(|(poly, _)| poly.area() > options.min_area)
        .collect();
    log::info!(
        "Filtered contours to {} based on area threshold of {}",
        candidates.len(),
        options.min_area
    );

    let limit = options.max_shapes.unwrap_or(usize::MAX);
    let shapes = candidates
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(idx, (contour, border))| {
            let shape = analyze_contour(&contour, options).with_border(border);
            log::debug!(
                "Contour {}: {} found at [x={}, y={}, w={}, h={}] with {} vertices",
                idx,
                shape.kind,
                shape.bounds.x,
                shape.bounds.y,
                shape.bounds.width,
                shape.bounds.height,
                shape.vertex_count()
            );
            shape
        })
        .collect();

    Ok(shapes)
}

/// Approximate and classify a single closed contour.
pub fn analyze_contour(contour: &Polygon, options: &ShapeOptions) -> DetectedShape {
    let perimeter = contour.perimeter(true);
    let approx = contour.approx_closed(options.epsilon_ratio * perimeter);
    let bounds = approx.bounding_rect();
    let area = contour.area();

    let circularity = if approx.len() > 4 {
        let circle = contour.min_enclosing_circle();
        if circle.area() > 0.0 {
            area / circle.area()
        } else {
            0.0
        }
    } else {
        0.0
    };

    let kind = classify(approx.len(), &bounds, circularity, options);
    DetectedShape::new(kind, bounds, approx.points).with_contour_area(area)
}

/// Classify an approximated outline.
///
/// `circularity` is the contour area over the area of its minimum enclosing
/// circle and is only consulted for outlines with more than four vertices.
pub fn classify(
    vertex_count: usize,
    bounds: &Rect,
    circularity: f32,
    options: &ShapeOptions,
) -> ShapeKind {
    match vertex_count {
        4 => {
            let aspect = bounds.aspect_ratio();
            if (1.0 - options.square_tolerance..=1.0 + options.square_tolerance).contains(&aspect)
            {
                ShapeKind::Square
            } else {
                ShapeKind::Rectangle
            }
        }
        n if n > 4 => {
            if (1.0 - circularity).abs() < options.circle_tolerance {
                ShapeKind::Circle
            } else {
                ShapeKind::Polygon
            }
        }
        _ => ShapeKind::Polygon,
    }
}
