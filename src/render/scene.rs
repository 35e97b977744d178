//! Excalidraw scene model and element builder.

use super::options::{ElementStyle, RenderOptions};
use crate::model::Point;
use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const ID_LEN: usize = 20;
const LINE_HEIGHT: f32 = 1.25;
const CHAR_WIDTH_RATIO: f32 = 0.55;

/// A complete Excalidraw document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Always `excalidraw`
    #[serde(rename = "type")]
    pub kind: String,
    /// Schema version
    pub version: u32,
    /// Producer name
    pub source: String,
    /// Elements in drawing order
    pub elements: Vec<Element>,
    /// Editor state
    pub app_state: AppState,
    /// Embedded binary files (always empty)
    pub files: serde_json::Map<String, serde_json::Value>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(source: impl Into<String>, background: impl Into<String>) -> Self {
        Self {
            kind: "excalidraw".to_string(),
            version: 2,
            source: source.into(),
            elements: Vec::new(),
            app_state: AppState {
                grid_size: None,
                view_background_color: background.into(),
            },
            files: serde_json::Map::new(),
        }
    }

    /// Text elements in scene order.
    pub fn texts(&self) -> impl Iterator<Item = (&Element, &TextProps)> {
        self.elements.iter().filter_map(|e| match &e.kind {
            ElementKind::Text(props) => Some((e, props)),
            _ => None,
        })
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the scene has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Editor state stored with the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Grid spacing, `None` when the grid is off
    pub grid_size: Option<u32>,
    /// Canvas color
    pub view_background_color: String,
}

/// Corner rounding of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Roundness {
    /// Rounding algorithm: 3 is adaptive
    #[serde(rename = "type")]
    pub kind: u8,
}

/// One drawable element. Fields common to every type live here; the
/// type-specific ones come from [`ElementKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique 20-character id
    pub id: String,
    /// Type tag and type-specific fields
    #[serde(flatten)]
    pub kind: ElementKind,
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Box width
    pub width: f32,
    /// Box height
    pub height: f32,
    /// Rotation in radians
    pub angle: f32,
    /// Stroke color as `#rrggbb`
    pub stroke_color: String,
    /// Fill color, or `transparent`
    pub background_color: String,
    /// `hachure`, `cross-hatch` or `solid`
    pub fill_style: String,
    /// Stroke width in pixels
    pub stroke_width: f32,
    /// `solid`, `dashed` or `dotted`
    pub stroke_style: String,
    /// Hand-drawn look, 0 (architect) to 2 (cartoonist)
    pub roughness: u8,
    /// Opacity in percent
    pub opacity: u8,
    /// Groups the element belongs to
    pub group_ids: Vec<String>,
    /// Enclosing frame
    pub frame_id: Option<String>,
    /// Corner rounding, `None` for sharp corners
    pub roundness: Option<Roundness>,
    /// Seed of the sketchy renderer
    pub seed: u32,
    /// Edit counter
    pub version: u32,
    /// Random nonce paired with `version`
    pub version_nonce: u32,
    /// Soft-deleted flag
    pub is_deleted: bool,
    /// Elements bound to this one, such as arrows
    pub bound_elements: Option<Vec<serde_json::Value>>,
    /// Last change, milliseconds since the Unix epoch
    pub updated: i64,
    /// Hyperlink attached to the element
    pub link: Option<String>,
    /// Locked against editing
    pub locked: bool,
}

impl Element {
    /// Excalidraw type name.
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}

/// Type tag plus type-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    /// Box
    Rectangle,
    /// Ellipse inscribed in the box
    Ellipse,
    /// Diamond inscribed in the box
    Diamond,
    /// Text block
    Text(TextProps),
    /// Open or closed line
    Line(LinearProps),
    /// Line with arrowheads
    Arrow(LinearProps),
}

impl ElementKind {
    /// Excalidraw type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementKind::Rectangle => "rectangle",
            ElementKind::Ellipse => "ellipse",
            ElementKind::Diamond => "diamond",
            ElementKind::Text(_) => "text",
            ElementKind::Line(_) => "line",
            ElementKind::Arrow(_) => "arrow",
        }
    }
}

/// Fields of a `text` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    /// Displayed text
    pub text: String,
    /// Font size in pixels
    pub font_size: f32,
    /// 1 is the hand-drawn font
    pub font_family: u8,
    /// `left`, `center` or `right`
    pub text_align: String,
    /// `top`, `middle` or `bottom`
    pub vertical_align: String,
    /// Shape the text is bound to
    pub container_id: Option<String>,
    /// Text before wrapping
    pub original_text: String,
    /// Line height as a multiple of the font size
    pub line_height: f32,
    /// Whether the box follows the text
    pub auto_resize: bool,
}

/// Fields of `line` and `arrow` elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearProps {
    /// Points relative to the element's `x`/`y`
    pub points: Vec<[f32; 2]>,
    /// Last point fixed while drawing
    pub last_committed_point: Option<[f32; 2]>,
    /// Shape the start point is bound to
    pub start_binding: Option<serde_json::Value>,
    /// Shape the end point is bound to
    pub end_binding: Option<serde_json::Value>,
    /// Arrowhead at the start, `None` for a plain end
    pub start_arrowhead: Option<String>,
    /// Arrowhead at the end, `None` for a plain end
    pub end_arrowhead: Option<String>,
}

/// Builds scene elements with consistent styling and unique ids.
///
/// All randomness comes from one generator, so a fixed seed reproduces the
/// same scene.
pub struct SceneBuilder {
    rng: StdRng,
    style: ElementStyle,
    font_family: u8,
    updated: i64,
    source: String,
    background: String,
    elements: Vec<Element>,
}

impl SceneBuilder {
    /// Create a builder from render options.
    pub fn new(options: &RenderOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            style: options.style.clone(),
            font_family: options.font_family,
            updated: options
                .timestamp
                .unwrap_or_else(|| chrono::Utc::now().timestamp_millis()),
            source: options.source.clone(),
            background: options.background_color.clone(),
            elements: Vec::new(),
        }
    }

    fn next_id(&mut self) -> String {
        (&mut self.rng)
            .sample_iter(Alphanumeric)
            .take(ID_LEN)
            .map(char::from)
            .collect()
    }

    fn push(&mut self, kind: ElementKind, x: f32, y: f32, width: f32, height: f32) -> &mut Element {
        let id = self.next_id();
        let roundness = match kind {
            ElementKind::Rectangle | ElementKind::Diamond => Some(Roundness { kind: 3 }),
            ElementKind::Line(_) | ElementKind::Arrow(_) => Some(Roundness { kind: 2 }),
            _ => None,
        };
        let element = Element {
            id,
            kind,
            x,
            y,
            width,
            height,
            angle: 0.0,
            stroke_color: self.style.stroke_color.clone(),
            background_color: self.style.background_color.clone(),
            fill_style: self.style.fill_style.clone(),
            stroke_width: self.style.stroke_width,
            stroke_style: self.style.stroke_style.clone(),
            roughness: self.style.roughness,
            opacity: self.style.opacity,
            group_ids: Vec::new(),
            frame_id: None,
            roundness,
            seed: self.rng.random_range(1..i32::MAX as u32),
            version: 1,
            version_nonce: self.rng.random_range(1..i32::MAX as u32),
            is_deleted: false,
            bound_elements: None,
            updated: self.updated,
            link: None,
            locked: false,
        };
        self.elements.push(element);
        let last = self.elements.len() - 1;
        &mut self.elements[last]
    }

    /// Rectangle with its top-left corner at `(x, y)`.
    pub fn rectangle(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Element {
        self.push(ElementKind::Rectangle, x, y, width, height)
    }

    /// Ellipse inscribed in the given box.
    pub fn ellipse(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Element {
        self.push(ElementKind::Ellipse, x, y, width, height)
    }

    /// Diamond inscribed in the given box.
    pub fn diamond(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Element {
        self.push(ElementKind::Diamond, x, y, width, height)
    }

    /// Straight line between two points.
    pub fn line(&mut self, start: Point, end: Point) -> &mut Element {
        self.linear(&[start, end], false, None)
    }

    /// Line through several points, optionally closed back to the first.
    pub fn polyline(&mut self, points: &[Point], closed: bool) -> &mut Element {
        self.linear(points, closed, None)
    }

    /// Arrow from `start` to `end`.
    pub fn arrow(&mut self, start: Point, end: Point) -> &mut Element {
        self.linear(&[start, end], false, Some("arrow"))
    }

    fn linear(&mut self, points: &[Point], closed: bool, arrowhead: Option<&str>) -> &mut Element {
        let origin = points.first().copied().unwrap_or_default();
        let mut relative: Vec<[f32; 2]> = points
            .iter()
            .map(|p| [p.x - origin.x, p.y - origin.y])
            .collect();
        if closed && relative.len() > 2 {
            relative.push([0.0, 0.0]);
        }
        if relative.is_empty() {
            relative.push([0.0, 0.0]);
        }

        let (min_x, max_x, min_y, max_y) = relative.iter().fold(
            (0.0f32, 0.0f32, 0.0f32, 0.0f32),
            |(a, b, c, d), [x, y]| (a.min(*x), b.max(*x), c.min(*y), d.max(*y)),
        );

        let props = LinearProps {
            points: relative,
            last_committed_point: None,
            start_binding: None,
            end_binding: None,
            start_arrowhead: None,
            end_arrowhead: arrowhead.map(str::to_string),
        };
        let kind = if arrowhead.is_some() {
            ElementKind::Arrow(props)
        } else {
            ElementKind::Line(props)
        };
        self.push(kind, origin.x, origin.y, max_x - min_x, max_y - min_y)
    }

    /// Left-aligned text with its top-left corner at `(x, y)`.
    ///
    /// The box size is estimated from the character count since no font
    /// metrics are available.
    pub fn text(&mut self, text: &str, x: f32, y: f32, font_size: f32) -> &mut Element {
        let (width, height) = estimate_text_size(text, font_size);
        let props = TextProps {
            text: text.to_string(),
            font_size,
            font_family: self.font_family,
            text_align: "left".to_string(),
            vertical_align: "top".to_string(),
            container_id: None,
            original_text: text.to_string(),
            line_height: LINE_HEIGHT,
            auto_resize: true,
        };
        self.push(ElementKind::Text(props), x, y, width, height)
    }

    /// Elements added so far.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Finish the scene.
    pub fn build(self) -> Scene {
        let mut scene = Scene::new(self.source, self.background);
        scene.elements = self.elements;
        scene
    }
}

/// Approximate rendered size of `text` at `font_size`.
pub fn estimate_text_size(text: &str, font_size: f32) -> (f32, f32) {
    let lines: Vec<&str> = text.lines().collect();
    let line_count = lines.len().max(1);
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    (
        longest as f32 * font_size * CHAR_WIDTH_RATIO,
        line_count as f32 * font_size * LINE_HEIGHT,
    )
}
