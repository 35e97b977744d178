//! Preprocessing options and configuration.

use crate::error::{Error, Result};

/// How the grayscale image is binarized.
///
/// Every method produces an inverted binary image: dark strokes become 255
/// (foreground) and paper becomes 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdMethod {
    /// Median blur, then adaptive mean threshold.
    MedianAdaptiveMean {
        /// Median filter radius (1 = 3x3 window)
        median_radius: u32,
        /// Side of the square neighbourhood, odd and at least 3
        block_size: u32,
        /// Constant subtracted from the local mean
        offset: i32,
    },
    /// Adaptive mean threshold without blurring.
    AdaptiveMean {
        /// Side of the square neighbourhood, odd and at least 3
        block_size: u32,
        /// Constant subtracted from the local mean
        offset: i32,
    },
    /// Global threshold chosen by Otsu's method.
    Otsu,
    /// Global fixed threshold level.
    Fixed(u8),
}

impl ThresholdMethod {
    /// Short label used in artifact file names.
    pub fn label(&self) -> String {
        match self {
            ThresholdMethod::MedianAdaptiveMean { .. } => "median-blur-adaptive-thresh".to_string(),
            ThresholdMethod::AdaptiveMean { .. } => "adaptive-mean".to_string(),
            ThresholdMethod::Otsu => "otsu".to_string(),
            ThresholdMethod::Fixed(level) => format!("fixed-{}", level),
        }
    }

    /// Parse a method name as accepted on the command line.
    ///
    /// Adaptive methods get their default block size and offset.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "median" | "median-adaptive" | "median-blur-adaptive-thresh" => {
                Ok(ThresholdMethod::default())
            }
            "adaptive" | "adaptive-mean" => Ok(ThresholdMethod::AdaptiveMean {
                block_size: DEFAULT_BLOCK_SIZE,
                offset: DEFAULT_OFFSET,
            }),
            "otsu" => Ok(ThresholdMethod::Otsu),
            other => {
                if let Some(level) = other.strip_prefix("fixed-").or(other.strip_prefix("fixed:")) {
                    let level: u8 = level.parse().map_err(|_| {
                        Error::InvalidOption(format!("invalid fixed threshold level: {}", level))
                    })?;
                    Ok(ThresholdMethod::Fixed(level))
                } else {
                    Err(Error::InvalidOption(format!(
                        "unknown threshold method: {}",
                        other
                    )))
                }
            }
        }
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        let block_size = match self {
            ThresholdMethod::MedianAdaptiveMean { block_size, .. }
            | ThresholdMethod::AdaptiveMean { block_size, .. } => *block_size,
            _ => return Ok(()),
        };

        if block_size < 3 || block_size % 2 == 0 {
            return Err(Error::InvalidOption(format!(
                "block size must be odd and at least 3, got {}",
                block_size
            )));
        }
        Ok(())
    }

    /// Replace the block size of an adaptive method. Global methods are unchanged.
    pub fn with_block_size(self, size: u32) -> Self {
        match self {
            ThresholdMethod::MedianAdaptiveMean {
                median_radius,
                offset,
                ..
            } => ThresholdMethod::MedianAdaptiveMean {
                median_radius,
                block_size: size,
                offset,
            },
            ThresholdMethod::AdaptiveMean { offset, .. } => ThresholdMethod::AdaptiveMean {
                block_size: size,
                offset,
            },
            other => other,
        }
    }

    /// Replace the offset of an adaptive method. Global methods are unchanged.
    pub fn with_offset(self, c: i32) -> Self {
        match self {
            ThresholdMethod::MedianAdaptiveMean {
                median_radius,
                block_size,
                ..
            } => ThresholdMethod::MedianAdaptiveMean {
                median_radius,
                block_size,
                offset: c,
            },
            ThresholdMethod::AdaptiveMean { block_size, .. } => ThresholdMethod::AdaptiveMean {
                block_size,
                offset: c,
            },
            other => other,
        }
    }
}

const DEFAULT_BLOCK_SIZE: u32 = 25;
const DEFAULT_OFFSET: i32 = 5;

impl Default for ThresholdMethod {
    fn default() -> Self {
        ThresholdMethod::MedianAdaptiveMean {
            median_radius: 1,
            block_size: DEFAULT_BLOCK_SIZE,
            offset: DEFAULT_OFFSET,
        }
    }
}

/// Options for binarizing an input image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessOptions {
    /// Thresholding method
    pub method: ThresholdMethod,

    /// Cross-kernel radius for the open/close cleanup (None = skip)
    pub morphology_radius: Option<u8>,
}

impl PreprocessOptions {
    /// Create new preprocessing options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the threshold method.
    pub fn with_method(mut self, method: ThresholdMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the morphology kernel radius.
    pub fn with_morphology(mut self, radius: u8) -> Self {
        self.morphology_radius = Some(radius);
        self
    }

    /// Disable the morphological cleanup.
    pub fn without_morphology(mut self) -> Self {
        self.morphology_radius = None;
        self
    }

    /// Check option ranges.
    pub fn validate(&self) -> Result<()> {
        self.method.validate()?;
        if self.morphology_radius == Some(0) {
            return Err(Error::InvalidOption(
                "morphology radius must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            method: ThresholdMethod::default(),
            morphology_radius: Some(1),
        }
    }
}
