//! Rendering result with statistics.

use super::scene::{ElementKind, Scene};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of rendering a scene, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content (JSON or Markdown)
    pub content: String,

    /// Scene statistics
    pub stats: SceneStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, stats: SceneStats) -> Self {
        Self { content, stats }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics about a rendered scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneStats {
    /// Number of scenes merged into these stats
    pub scene_count: u32,

    /// Element counts keyed by Excalidraw type
    pub elements_by_type: BTreeMap<String, u32>,

    /// Approximate word count over all text elements
    pub word_count: u32,

    /// Character count over all text elements (excluding whitespace)
    pub char_count: u32,
}

impl SceneStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics from a scene.
    pub fn from_scene(scene: &Scene) -> Self {
        let mut stats = Self {
            scene_count: 1,
            ..Self::default()
        };
        for element in &scene.elements {
            stats.add_element(element.type_name());
            if let ElementKind::Text(props) = &element.kind {
                stats.count_text(&props.text);
            }
        }
        stats
    }

    /// Increment the count for one element type.
    pub fn add_element(&mut self, type_name: &str) {
        *self
            .elements_by_type
            .entry(type_name.to_string())
            .or_insert(0) += 1;
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Total number of elements.
    pub fn element_count(&self) -> u32 {
        self.elements_by_type.values().sum()
    }

    /// Number of elements of one type.
    pub fn count_of(&self, type_name: &str) -> u32 {
        self.elements_by_type.get(type_name).copied().unwrap_or(0)
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &SceneStats) {
        self.scene_count += other.scene_count;
        for (kind, count) in &other.elements_by_type {
            *self.elements_by_type.entry(kind.clone()).or_insert(0) += count;
        }
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}
