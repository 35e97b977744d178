//! Debug overlays drawn on top of the source image.

use crate::model::{DetectedShape, Point, ShapeKind, TextRegion};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

const GREEN: Rgb<u8> = Rgb([0, 200, 0]);
const BLUE: Rgb<u8> = Rgb([0, 90, 255]);
const ORANGE: Rgb<u8> = Rgb([255, 140, 0]);
const GREY: Rgb<u8> = Rgb([128, 128, 128]);
const RED: Rgb<u8> = Rgb([230, 0, 0]);

/// Outline colour for a shape kind.
pub fn shape_color(kind: ShapeKind) -> Rgb<u8> {
    match kind {
        ShapeKind::Square | ShapeKind::Rectangle => GREEN,
        ShapeKind::Circle => BLUE,
        ShapeKind::Polygon => ORANGE,
        ShapeKind::Unidentified => GREY,
    }
}

/// Draw every shape's approximated outline on a copy of `image`.
pub fn draw_shapes(image: &DynamicImage, shapes: &[DetectedShape]) -> RgbImage {
    let mut canvas = image.to_rgb8();
    for shape in shapes {
        let color = shape_color(shape.kind);
        if shape.vertices.len() >= 2 {
            draw_closed_outline(&mut canvas, &shape.vertices, color);
        } else {
            let b = &shape.bounds;
            let corners = [
                Point::new(b.x as f32, b.y as f32),
                Point::new(b.right() as f32 - 1.0, b.y as f32),
                Point::new(b.right() as f32 - 1.0, b.bottom() as f32 - 1.0),
                Point::new(b.x as f32, b.bottom() as f32 - 1.0),
            ];
            draw_closed_outline(&mut canvas, &corners, color);
        }
    }
    canvas
}

/// Draw every text region's quad on a copy of `image`.
pub fn draw_text_regions(image: &DynamicImage, regions: &[TextRegion]) -> RgbImage {
    let mut canvas = image.to_rgb8();
    for region in regions {
        draw_closed_outline(&mut canvas, &region.quad, RED);
    }
    canvas
}

/// Two-pixel closed outline.
fn draw_closed_outline(canvas: &mut RgbImage, points: &[Point], color: Rgb<u8>) {
    let n = points.len();
    for i in 0..n {
        let (a, b) = (points[i], points[(i + 1) % n]);
        for (dx, dy) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)] {
            draw_line_segment_mut(canvas, (a.x + dx, a.y + dy), (b.x + dx, b.y + dy), color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rect;

    fn blank() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(50, 50, Rgb([255, 255, 255])))
    }

    #[test]
    fn test_draw_shapes_colours_by_kind() {
        let square = DetectedShape::new(
            ShapeKind::Square,
            Rect::new(5, 5, 11, 11),
            vec![
                Point::new(5.0, 5.0),
                Point::new(15.0, 5.0),
                Point::new(15.0, 15.0),
                Point::new(5.0, 15.0),
            ],
        );
        let circle = DetectedShape::new(ShapeKind::Circle, Rect::new(30, 30, 10, 10), vec![]);

        let out = draw_shapes(&blank(), &[square, circle]);
        assert_eq!(out.dimensions(), (50, 50));
        assert_eq!(*out.get_pixel(10, 5), GREEN);
        assert_eq!(*out.get_pixel(30, 35), BLUE);
        assert_eq!(*out.get_pixel(10, 10), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_draw_text_regions() {
        let region = TextRegion::from_rect("x", Rect::new(10, 10, 20, 8), 1.0);
        let out = draw_text_regions(&blank(), &[region]);
        assert_eq!(*out.get_pixel(20, 10), RED);
        assert_eq!(*out.get_pixel(20, 14), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_source_is_untouched() {
        let image = blank();
        let region = TextRegion::from_rect("x", Rect::new(0, 0, 10, 10), 1.0);
        let _ = draw_text_regions(&image, &[region]);
        assert_eq!(image.to_rgb8().get_pixel(0, 0), &Rgb([255, 255, 255]));
    }
}
