//! Recognized text regions.

use super::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A run of text recognized in the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRegion {
    /// Recognized text
    pub text: String,

    /// Corner points: top-left, top-right, bottom-right, bottom-left
    pub quad: [Point; 4],

    /// Recognition confidence in `0.0..=1.0`
    pub confidence: f32,
}

impl TextRegion {
    /// Create a region from an axis-aligned box.
    pub fn from_rect(text: impl Into<String>, rect: Rect, confidence: f32) -> Self {
        let (x0, y0) = (rect.x as f32, rect.y as f32);
        let (x1, y1) = (rect.right() as f32, rect.bottom() as f32);
        Self {
            text: text.into(),
            quad: [
                Point::new(x0, y0),
                Point::new(x1, y0),
                Point::new(x1, y1),
                Point::new(x0, y1),
            ],
            confidence,
        }
    }

    /// Top-left corner.
    pub fn top_left(&self) -> Point {
        self.quad[0]
    }

    /// Bottom-right corner.
    pub fn bottom_right(&self) -> Point {
        self.quad[2]
    }

    /// Height from the top-left to the bottom-right corner.
    pub fn height(&self) -> f32 {
        (self.quad[2].y - self.quad[0].y).abs()
    }

    /// Width from the top-left to the bottom-right corner.
    pub fn width(&self) -> f32 {
        (self.quad[2].x - self.quad[0].x).abs()
    }

    /// Center of the diagonal.
    pub fn center(&self) -> Point {
        Point::new(
            (self.quad[0].x + self.quad[2].x) / 2.0,
            (self.quad[0].y + self.quad[2].y) / 2.0,
        )
    }

    /// Upright rectangle covering all four corners.
    ///
    /// Corners are edge coordinates, so a region built with
    /// [`TextRegion::from_rect`] gives back the same rectangle.
    pub fn bounds(&self) -> Rect {
        let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
        let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
        for p in &self.quad {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        let (x0, y0) = (min_x.floor(), min_y.floor());
        Rect::new(
            x0 as i32,
            y0 as i32,
            (max_x.ceil() - x0) as u32,
            (max_y.ceil() - y0) as u32,
        )
    }
}
