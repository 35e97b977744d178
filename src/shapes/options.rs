//! Shape detection options.

use crate::error::{Error, Result};

/// Which contours take part in shape detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContourRetrieval {
    /// Every border, including holes inside strokes
    #[default]
    Tree,
    /// Only outermost borders (no parent)
    External,
}

impl ContourRetrieval {
    /// Parse a retrieval mode name.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "tree" | "all" => Ok(ContourRetrieval::Tree),
            "external" | "outer" => Ok(ContourRetrieval::External),
            other => Err(Error::InvalidOption(format!(
                "unknown contour retrieval mode: {}",
                other
            ))),
        }
    }
}

/// Options for contour-based shape detection.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeOptions {
    /// Contour retrieval mode
    pub retrieval: ContourRetrieval,

    /// Contours with area at or below this value are dropped as noise
    pub min_area: f32,

    /// Approximation tolerance as a fraction of the contour perimeter
    pub epsilon_ratio: f32,

    /// Allowed deviation of the aspect ratio from 1.0 for squares
    pub square_tolerance: f32,

    /// Allowed deviation of the circularity from 1.0 for circles
    pub circle_tolerance: f32,

    /// Keep at most this many shapes (None = unlimited)
    pub max_shapes: Option<usize>,
}

impl ShapeOptions {
    /// Create new shape options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the retrieval mode.
    pub fn with_retrieval(mut self, retrieval: ContourRetrieval) -> Self {
        self.retrieval = retrieval;
        self
    }

    /// Only use outermost contours.
    pub fn external_only(mut self) -> Self {
        self.retrieval = ContourRetrieval::External;
        self
    }

    /// Set the noise area threshold.
    pub fn with_min_area(mut self, area: f32) -> Self {
        self.min_area = area;
        self
    }

    /// Set the approximation tolerance ratio.
    pub fn with_epsilon_ratio(mut self, ratio: f32) -> Self {
        self.epsilon_ratio = ratio;
        self
    }

    /// Set the square aspect tolerance.
    pub fn with_square_tolerance(mut self, tolerance: f32) -> Self {
        self.square_tolerance = tolerance;
        self
    }

    /// Set the circularity tolerance.
    pub fn with_circle_tolerance(mut self, tolerance: f32) -> Self {
        self.circle_tolerance = tolerance;
        self
    }

    /// Cap the number of shapes.
    pub fn with_max_shapes(mut self, max: usize) -> Self {
        self.max_shapes = Some(max);
        self
    }

    /// Check option ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon_ratio > 0.0 && self.epsilon_ratio < 1.0) {
            return Err(Error::InvalidOption(format!(
                "epsilon ratio must be in (0, 1), got {}",
                self.epsilon_ratio
            )));
        }
        if self.min_area < 0.0 || !self.min_area.is_finite() {
            return Err(Error::InvalidOption(format!(
                "minimum area must be non-negative, got {}",
                self.min_area
            )));
        }
        if self.square_tolerance < 0.0 || self.circle_tolerance < 0.0 {
            return Err(Error::InvalidOption(
                "tolerances must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self {
            retrieval: ContourRetrieval::Tree,
            min_area: 5.0,
            epsilon_ratio: 0.015,
            square_tolerance: 0.05,
            circle_tolerance: 0.2,
            max_shapes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_options_builder() {
        let options = ShapeOptions::new()
            .external_only()
            .with_min_area(50.0)
            .with_epsilon_ratio(0.02)
            .with_max_shapes(10);

        assert_eq!(options.retrieval, ContourRetrieval::External);
        assert_eq!(options.min_area, 50.0);
        assert_eq!(options.epsilon_ratio, 0.02);
        assert_eq!(options.max_shapes, Some(10));
    }

    #[test]
    fn test_default_options() {
        let options = ShapeOptions::default();
        assert_eq!(options.retrieval, ContourRetrieval::Tree);
        assert_eq!(options.min_area, 5.0);
        assert_eq!(options.epsilon_ratio, 0.015);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_epsilon() {
        assert!(ShapeOptions::new().with_epsilon_ratio(0.0).validate().is_err());
        assert!(ShapeOptions::new().with_epsilon_ratio(1.5).validate().is_err());
        assert!(ShapeOptions::new().with_min_area(-1.0).validate().is_err());
    }

    #[test]
    fn test_parse_retrieval() {
        assert_eq!(
            ContourRetrieval::parse("External").unwrap(),
            ContourRetrieval::External
        );
        assert!(ContourRetrieval::parse("ccomp").is_err());
    }
}
