//! Markdown rendering for the Obsidian Excalidraw plugin.

use super::json::{to_json, JsonFormat};
use super::scene::Scene;
use super::{RenderResult, SceneStats};
use crate::error::Result;

const BANNER: &str = "== Switch to EXCALIDRAW VIEW in the MORE OPTIONS menu of this document. == You can decompress Drawing data with the command palette: 'Decompress current Excalidraw file'. For more info check in plugin settings under 'Saving'";

/// Convert a scene to an Obsidian `.excalidraw.md` document.
pub fn to_obsidian_markdown(scene: &Scene) -> Result<String> {
    ObsidianRenderer::new().render(scene)
}

/// Convert a scene to Obsidian Markdown with statistics.
pub fn to_obsidian_markdown_with_stats(scene: &Scene) -> Result<RenderResult> {
    let content = ObsidianRenderer::new().render(scene)?;
    Ok(RenderResult::new(content, SceneStats::from_scene(scene)))
}

/// Obsidian Excalidraw renderer.
#[derive(Debug, Clone)]
pub struct ObsidianRenderer {
    tags: Vec<String>,
    banner: bool,
}

impl ObsidianRenderer {
    /// Create a renderer with the plugin's default frontmatter.
    pub fn new() -> Self {
        Self {
            tags: vec!["excalidraw".to_string()],
            banner: true,
        }
    }

    /// Add a frontmatter tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Omit the "switch view" banner.
    pub fn without_banner(mut self) -> Self {
        self.banner = false;
        self
    }

    /// Render a scene.
    pub fn render(&self, scene: &Scene) -> Result<String> {
        let mut output = String::new();

        output.push_str("---\n");
        output.push_str("excalidraw-plugin: parsed\n");
        output.push_str(&format!("tags: [{}]\n", self.tags.join(", ")));
        output.push_str("---\n\n");
        if self.banner {
            output.push_str(BANNER);
            output.push_str("\n\n");
        }
        output.push_str("# Excalidraw Data\n\n");

        output.push_str("## Text Elements\n");
        for (element, props) in scene.texts() {
            output.push_str(&format!("{} ^{}\n\n", props.text, element.id));
        }

        output.push_str("%%\n");
        output.push_str("## Drawing\n");
        output.push_str("```json\n");
        output.push_str(&to_json(scene, JsonFormat::Pretty)?);
        output.push_str("\n```\n");
        output.push_str("%%\n");

        Ok(output)
    }
}

impl Default for ObsidianRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RenderOptions, SceneBuilder};

    fn scene() -> Scene {
        let mut sb = SceneBuilder::new(&RenderOptions::new().with_seed(11).with_timestamp(0));
        sb.rectangle(0.0, 0.0, 40.0, 20.0);
        sb.text("Auth Service", 2.0, 2.0, 10.0);
        sb.build()
    }

    #[test]
    fn test_layout() {
        let scene = scene();
        let md = to_obsidian_markdown(&scene).unwrap();

        assert!(md.starts_with("---\nexcalidraw-plugin: parsed\ntags: [excalidraw]\n---\n\n"));
        assert!(md.contains("Switch to EXCALIDRAW VIEW"));

        let data = md.find("# Excalidraw Data").unwrap();
        let texts = md.find("## Text Elements").unwrap();
        let drawing = md.find("## Drawing").unwrap();
        assert!(data < texts && texts < drawing);
        assert!(md.ends_with("```\n%%\n"));
    }

    #[test]
    fn test_text_elements_listed_with_ids() {
        let scene = scene();
        let md = to_obsidian_markdown(&scene).unwrap();
        let (element, _) = scene.texts().next().unwrap();
        assert!(md.contains(&format!("Auth Service ^{}\n\n", element.id)));
    }

    #[test]
    fn test_embedded_json_parses() {
        let scene = scene();
        let md = to_obsidian_markdown(&scene).unwrap();
        let start = md.find("```json\n").unwrap() + "```json\n".len();
        let end = md.rfind("\n```").unwrap();
        let parsed: Scene = serde_json::from_str(&md[start..end]).unwrap();
        assert_eq!(parsed, scene);
    }

    #[test]
    fn test_custom_renderer() {
        let md = ObsidianRenderer::new()
            .with_tag("architecture")
            .without_banner()
            .render(&scene())
            .unwrap();
        assert!(md.contains("tags: [excalidraw, architecture]"));
        assert!(!md.contains("EXCALIDRAW VIEW"));
    }

    #[test]
    fn test_with_stats() {
        let result = to_obsidian_markdown_with_stats(&scene()).unwrap();
        assert_eq!(result.stats.count_of("text"), 1);
        assert!(result.content_len() > 0);
    }
}
