//! Binarization kernels.

use image::GrayImage;
use imageproc::contrast::otsu_level;
use rayon::prelude::*;

const FOREGROUND: u8 = 255;
const BACKGROUND: u8 = 0;

/// Summed-area table with one row and column of zero padding.
struct IntegralImage {
    sums: Vec<u64>,
    stride: usize,
}

impl IntegralImage {
    fn new(gray: &GrayImage) -> Self {
        let (width, height) = gray.dimensions();
        let stride = width as usize + 1;
        let mut sums = vec![0u64; stride * (height as usize + 1)];

        for y in 0..height as usize {
            let mut row_sum = 0u64;
            for x in 0..width as usize {
                row_sum += gray.get_pixel(x as u32, y as u32).0[0] as u64;
                sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row_sum;
            }
        }

        Self { sums, stride }
    }

    /// Sum over the half-open window `[x0, x1) x [y0, y1)`.
    fn window_sum(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> u64 {
        let s = self.stride;
        self.sums[y1 * s + x1] + self.sums[y0 * s + x0]
            - self.sums[y0 * s + x1]
            - self.sums[y1 * s + x0]
    }
}

/// Inverted adaptive mean threshold.
///
/// A pixel becomes foreground when `pixel <= mean - offset`, where `mean` is
/// taken over the `block_size` square centred on the pixel, clipped to the
/// image bounds.
pub fn adaptive_mean_inv(gray: &GrayImage, block_size: u32, offset: i32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let radius = (block_size / 2) as usize;
    let integral = IntegralImage::new(gray);
    let (w, h) = (width as usize, height as usize);

    let mut out = vec![BACKGROUND; w * h];
    out.par_chunks_mut(w.max(1))
        .enumerate()
        .for_each(|(y, row)| {
            let y0 = y.saturating_sub(radius);
            let y1 = (y + radius + 1).min(h);
            for (x, value) in row.iter_mut().enumerate() {
                let x0 = x.saturating_sub(radius);
                let x1 = (x + radius + 1).min(w);
                let count = ((x1 - x0) * (y1 - y0)) as f64;
                let mean = integral.window_sum(x0, y0, x1, y1) as f64 / count;
                let threshold = mean - offset as f64;
                let pixel = gray.get_pixel(x as u32, y as u32).0[0] as f64;
                if pixel <= threshold {
                    *value = FOREGROUND;
                }
            }
        });

    GrayImage::from_raw(width, height, out).unwrap_or_else(|| GrayImage::new(width, height))
}

/// Inverted global threshold: pixels at or below `level` become foreground.
pub fn fixed_inv(gray: &GrayImage, level: u8) -> GrayImage {
    let mut out = gray.clone();
    for pixel in out.pixels_mut() {
        pixel.0[0] = if pixel.0[0] <= level {
            FOREGROUND
        } else {
            BACKGROUND
        };
    }
    out
}

/// Inverted Otsu threshold. Returns the binary image and the chosen level.
pub fn otsu_inv(gray: &GrayImage) -> (GrayImage, u8) {
    let level = otsu_level(gray);
    (fixed_inv(gray, level), level)
}
