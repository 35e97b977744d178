//! Image preprocessing: grayscale conversion and binarization.
//!
//! Hand-drawn diagrams are photographed under uneven light, so the default
//! method thresholds against the local mean rather than a global level.

mod options;
mod threshold;

pub use options::{PreprocessOptions, ThresholdMethod};
pub use threshold::{adaptive_mean_inv, fixed_inv, otsu_inv};

use crate::error::{Error, Result};
use image::{DynamicImage, GrayImage};
use imageproc::distance_transform::Norm;
use imageproc::filter::median_filter;
use imageproc::morphology;

/// Output of the preprocessing stage.
#[derive(Debug, Clone)]
pub struct Preprocessed {
    /// Grayscale version of the input
    pub gray: GrayImage,

    /// Inverted binary image (strokes = 255)
    pub binary: GrayImage,

    /// Method that produced `binary`
    pub method: ThresholdMethod,
}

impl Preprocessed {
    /// Fraction of pixels marked as foreground.
    pub fn foreground_ratio(&self) -> f32 {
        let total = self.binary.width() as usize * self.binary.height() as usize;
        if total == 0 {
            return 0.0;
        }
        let on = self.binary.pixels().filter(|p| p.0[0] > 0).count();
        on as f32 / total as f32
    }
}

/// Convert an image to grayscale and binarize it.
pub fn preprocess(image: &DynamicImage, options: &PreprocessOptions) -> Result<Preprocessed> {
    options.validate()?;
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::EmptyImage);
    }

    log::info!("Converting image to grayscale");
    let gray = image.to_luma8();

    log::info!("Applying thresholding ({})", options.method.label());
    let binary = binarize(&gray, &options.method, options.morphology_radius);

    Ok(Preprocessed {
        gray,
        binary,
        method: options.method,
    })
}

/// Binarize a grayscale image with the given method.
///
/// When `morphology_radius` is set, an opening removes speckle noise and a
/// closing then bridges small gaps in strokes.
pub fn binarize(
    gray: &GrayImage,
    method: &ThresholdMethod,
    morphology_radius: Option<u8>,
) -> GrayImage {
    let binary = match *method {
        ThresholdMethod::MedianAdaptiveMean {
            median_radius,
            block_size,
            offset,
        } => {
            let blurred = if median_radius > 0 {
                median_filter(gray, median_radius, median_radius)
            } else {
                gray.clone()
            };
            adaptive_mean_inv(&blurred, block_size, offset)
        }
        ThresholdMethod::AdaptiveMean { block_size, offset } => {
            adaptive_mean_inv(gray, block_size, offset)
        }
        ThresholdMethod::Otsu => {
            let (binary, level) = otsu_inv(gray);
            log::debug!("Otsu level: {}", level);
            binary
        }
        ThresholdMethod::Fixed(level) => fixed_inv(gray, level),
    };

    match morphology_radius {
        Some(k) if k > 0 => {
            let opened = morphology::open(&binary, Norm::L1, k);
            morphology::close(&opened, Norm::L1, k)
        }
        _ => binary,
    }
}
