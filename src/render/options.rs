//! Rendering options and configuration.

use crate::error::{Error, Result};

/// Options for rendering a diagram as an Excalidraw scene.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Seed for element ids and hand-drawn jitter (None = random)
    pub seed: Option<u64>,

    /// Value of every element's `updated` field in ms (None = now)
    pub timestamp: Option<i64>,

    /// Stroke and fill defaults applied to every element
    pub style: ElementStyle,

    /// How polygons become scene elements
    pub polygon_style: PolygonStyle,

    /// Smallest font size for text elements
    pub min_font_size: f32,

    /// Largest font size for text elements
    pub max_font_size: f32,

    /// Excalidraw font family (1 = Virgil, 2 = Helvetica, 3 = Cascadia)
    pub font_family: u8,

    /// Emit shape elements
    pub include_shapes: bool,

    /// Emit text elements
    pub include_texts: bool,

    /// Canvas background colour
    pub background_color: String,

    /// Value of the scene's `source` field
    pub source: String,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make ids and seeds reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fix the `updated` timestamp.
    pub fn with_timestamp(mut self, millis: i64) -> Self {
        self.timestamp = Some(millis);
        self
    }

    /// Set element styling.
    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the polygon rendering style.
    pub fn with_polygon_style(mut self, style: PolygonStyle) -> Self {
        self.polygon_style = style;
        self
    }

    /// Set the font size bounds.
    pub fn with_font_range(mut self, min: f32, max: f32) -> Self {
        self.min_font_size = min;
        self.max_font_size = max;
        self
    }

    /// Enable or disable text elements.
    pub fn with_texts(mut self, include: bool) -> Self {
        self.include_texts = include;
        self
    }

    /// Enable or disable shape elements.
    pub fn with_shapes(mut self, include: bool) -> Self {
        self.include_shapes = include;
        self
    }

    /// Set the canvas background colour.
    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    /// Set the scene source string.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Check option ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.min_font_size > 0.0 && self.min_font_size <= self.max_font_size) {
            return Err(Error::InvalidOption(format!(
                "invalid font size range {}..{}",
                self.min_font_size, self.max_font_size
            )));
        }
        Ok(())
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            seed: None,
            timestamp: None,
            style: ElementStyle::default(),
            polygon_style: PolygonStyle::Segments,
            min_font_size: 8.0,
            max_font_size: 36.0,
            font_family: 1,
            include_shapes: true,
            include_texts: true,
            background_color: "#ffffff".to_string(),
            source: "img2excalidraw".to_string(),
        }
    }
}

/// Visual defaults shared by all elements.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementStyle {
    /// Stroke color as `#rrggbb`
    pub stroke_color: String,
    /// Fill color, or `transparent`
    pub background_color: String,
    /// Fill pattern
    pub fill_style: String,
    /// Stroke width in pixels
    pub stroke_width: f32,
    /// `solid`, `dashed` or `dotted`
    pub stroke_style: String,
    /// 0 = architect, 1 = artist, 2 = cartoonist
    pub roughness: u8,
    /// Opacity in percent
    pub opacity: u8,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#000000".to_string(),
            background_color: "transparent".to_string(),
            fill_style: "hachure".to_string(),
            stroke_width: 1.0,
            stroke_style: "solid".to_string(),
            roughness: 1,
            opacity: 100,
        }
    }
}

/// How detected polygons are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolygonStyle {
    /// One line element per edge
    #[default]
    Segments,
    /// A single closed line element
    Polyline,
}

impl PolygonStyle {
    /// Parse a style name.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "segments" | "lines" => Ok(PolygonStyle::Segments),
            "polyline" | "path" => Ok(PolygonStyle::Polyline),
            other => Err(Error::InvalidOption(format!(
                "unknown polygon style: {}",
                other
            ))),
        }
    }
}
