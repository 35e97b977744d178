//! Mapping from a detected diagram to an Excalidraw scene.

use super::options::{PolygonStyle, RenderOptions};
use super::scene::{Scene, SceneBuilder};
use crate::error::Result;
use crate::model::{DetectedShape, Diagram, ShapeKind, TextRegion};

/// Convert a diagram to an Excalidraw scene.
///
/// Shapes are emitted first, in detection order, followed by text.
pub fn to_scene(diagram: &Diagram, options: &RenderOptions) -> Result<Scene> {
    options.validate()?;
    let mut sb = SceneBuilder::new(options);

    if options.include_shapes {
        for shape in &diagram.shapes {
            add_shape(&mut sb, shape, options);
        }
    }

    if options.include_texts {
        for region in &diagram.texts {
            add_text(&mut sb, region, options);
        }
    }

    let scene = sb.build();
    log::info!("Built Excalidraw scene with {} elements", scene.len());
    Ok(scene)
}

fn add_shape(sb: &mut SceneBuilder, shape: &DetectedShape, options: &RenderOptions) {
    let b = &shape.bounds;
    let (x, y, w, h) = (b.x as f32, b.y as f32, b.width as f32, b.height as f32);

    match shape.kind {
        ShapeKind::Square | ShapeKind::Rectangle => {
            sb.rectangle(x, y, w, h);
        }
        ShapeKind::Circle => {
            sb.ellipse(x, y, w, h);
        }
        ShapeKind::Polygon => match options.polygon_style {
            PolygonStyle::Segments => {
                let n = shape.vertices.len();
                if n < 2 {
                    return;
                }
                for i in 0..n {
                    sb.line(shape.vertices[i], shape.vertices[(i + 1) % n]);
                }
            }
            PolygonStyle::Polyline => {
                if !shape.vertices.is_empty() {
                    sb.polyline(&shape.vertices, true);
                }
            }
        },
        ShapeKind::Unidentified => {
            log::debug!("Skipping unidentified shape at ({}, {})", b.x, b.y);
        }
    }
}

fn add_text(sb: &mut SceneBuilder, region: &TextRegion, options: &RenderOptions) {
    let font_size = font_size_for(region.height(), options);
    let origin = region.top_left();
    sb.text(&region.text, origin.x, origin.y, font_size);
}

/// Font size for a text box of the given pixel height.
pub fn font_size_for(height: f32, options: &RenderOptions) -> f32 {
    (height / 2.0).clamp(options.min_font_size, options.max_font_size)
}
