//! Synthetic whiteboard photos and test doubles shared by integration tests.

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use img2excalidraw::ocr::OcrOptions;
use img2excalidraw::{Rect, Result, TextRecognizer, TextRegion};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point as IpPoint;
use imageproc::rect::Rect as IpRect;
use std::path::Path;

pub const PAPER: Rgb<u8> = Rgb([242, 240, 236]);
pub const INK: Rgb<u8> = Rgb([25, 25, 35]);

/// A 6px-stroked box, the way a marker outline looks after binarization.
pub fn stroked_box(img: &mut RgbImage, x: i32, y: i32, w: u32, h: u32) {
    draw_filled_rect_mut(img, IpRect::at(x, y).of_size(w, h), INK);
    draw_filled_rect_mut(img, IpRect::at(x + 6, y + 6).of_size(w - 12, h - 12), PAPER);
}

/// A 6px-stroked circle.
pub fn stroked_circle(img: &mut RgbImage, cx: i32, cy: i32, r: i32) {
    draw_filled_circle_mut(img, (cx, cy), r, INK);
    draw_filled_circle_mut(img, (cx, cy), r - 6, PAPER);
}

/// A filled triangle.
pub fn triangle(img: &mut RgbImage, a: (i32, i32), b: (i32, i32), c: (i32, i32)) {
    let points = [IpPoint::new(a.0, a.1), IpPoint::new(b.0, b.1), IpPoint::new(c.0, c.1)];
    draw_polygon_mut(img, &points, INK);
}

/// A whiteboard with a wide box, a square, a circle and a triangle.
pub fn whiteboard() -> DynamicImage {
    let mut img = RgbImage::from_pixel(480, 360, PAPER);
    stroked_box(&mut img, 20, 20, 180, 90);
    stroked_box(&mut img, 260, 20, 100, 100);
    stroked_circle(&mut img, 100, 250, 60);
    triangle(&mut img, (300, 320), (440, 320), (370, 190));
    DynamicImage::ImageRgb8(img)
}

/// A page with nothing on it.
pub fn blank_page() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(160, 120, PAPER))
}

/// Encode an image in the given format.
pub fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut data = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut data), format)
        .unwrap();
    data
}

/// Save an image as PNG.
pub fn save_png(image: &DynamicImage, path: &Path) {
    std::fs::write(path, encode(image, ImageFormat::Png)).unwrap();
}

/// Recognizer returning fixed labels, independent of the image.
pub struct FixedRecognizer {
    pub labels: Vec<(&'static str, Rect, f32)>,
}

impl FixedRecognizer {
    pub fn whiteboard() -> Self {
        Self {
            labels: vec![
                ("Web Server", Rect::new(50, 50, 110, 24), 0.93),
                ("DB", Rect::new(290, 55, 40, 28), 0.88),
                ("~~", Rect::new(200, 200, 20, 10), 0.15),
            ],
        }
    }
}

impl TextRecognizer for FixedRecognizer {
    fn name(&self) -> &str {
        "fixed"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn recognize(&self, _image: &DynamicImage, _options: &OcrOptions) -> Result<Vec<TextRegion>> {
        Ok(self
            .labels
            .iter()
            .map(|(text, rect, confidence)| TextRegion::from_rect(*text, *rect, *confidence))
            .collect())
    }
}
