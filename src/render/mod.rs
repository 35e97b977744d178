//! Rendering module for converting diagrams to Excalidraw output formats.

pub mod annotate;
mod excalidraw;
mod json;
mod obsidian;
mod options;
mod result;
mod scene;

pub use annotate::{draw_shapes, draw_text_regions};
pub use excalidraw::{font_size_for, to_scene};
pub use json::{to_diagram_json, to_json, JsonFormat};
pub use obsidian::{to_obsidian_markdown, to_obsidian_markdown_with_stats, ObsidianRenderer};
pub use options::{ElementStyle, PolygonStyle, RenderOptions};
pub use result::{RenderResult, SceneStats};
pub use scene::{
    estimate_text_size, AppState, Element, ElementKind, LinearProps, Roundness, Scene,
    SceneBuilder, TextProps,
};
