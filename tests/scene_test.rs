//! Integration tests for Excalidraw and Obsidian rendering.

use img2excalidraw::render::{
    self, to_json, to_obsidian_markdown, to_scene, ElementKind, JsonFormat, ObsidianRenderer,
    PolygonStyle, RenderOptions, SceneStats,
};
use img2excalidraw::{DetectedShape, Diagram, Point, Rect, ShapeKind, TextRegion};
use serde_json::Value;
use std::collections::HashSet;

fn sample_diagram() -> Diagram {
    let mut diagram = Diagram::new(640, 480);
    diagram.add_shape(DetectedShape::new(
        ShapeKind::Rectangle,
        Rect::new(10, 20, 200, 80),
        vec![],
    ));
    diagram.add_shape(DetectedShape::new(
        ShapeKind::Circle,
        Rect::new(300, 40, 90, 90),
        vec![],
    ));
    diagram.add_shape(DetectedShape::new(
        ShapeKind::Polygon,
        Rect::new(400, 300, 100, 80),
        vec![
            Point::new(400.0, 380.0),
            Point::new(500.0, 380.0),
            Point::new(450.0, 300.0),
        ],
    ));
    diagram.add_shape(DetectedShape::new(
        ShapeKind::Unidentified,
        Rect::new(0, 0, 5, 5),
        vec![],
    ));
    diagram.add_text(TextRegion::from_rect("API", Rect::new(40, 40, 60, 30), 0.9));
    diagram.add_text(TextRegion::from_rect("Cache", Rect::new(310, 70, 70, 20), 0.8));
    diagram
}

fn fixed_options() -> RenderOptions {
    RenderOptions::new().with_seed(7).with_timestamp(1_700_000_000_000)
}

#[test]
fn test_scene_document_shape() {
    let scene = to_scene(&sample_diagram(), &fixed_options()).unwrap();
    let json = to_json(&scene, JsonFormat::Pretty).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["type"], "excalidraw");
    assert_eq!(value["version"], 2);
    assert_eq!(value["source"], "img2excalidraw");
    assert_eq!(value["appState"]["viewBackgroundColor"], "#ffffff");
    assert!(value["appState"]["gridSize"].is_null());
    assert!(value["files"].as_object().unwrap().is_empty());

    let elements = value["elements"].as_array().unwrap();
    // rectangle + ellipse + 3 polygon edges + 2 texts
    assert_eq!(elements.len(), 7);
}

#[test]
fn test_element_order_and_types() {
    let scene = to_scene(&sample_diagram(), &fixed_options()).unwrap();
    let types: Vec<&str> = scene.elements.iter().map(|e| e.type_name()).collect();
    assert_eq!(
        types,
        vec!["rectangle", "ellipse", "line", "line", "line", "text", "text"]
    );
}

#[test]
fn test_rectangle_geometry() {
    let scene = to_scene(&sample_diagram(), &fixed_options()).unwrap();
    let rect = &scene.elements[0];
    assert_eq!((rect.x, rect.y), (10.0, 20.0));
    assert_eq!((rect.width, rect.height), (200.0, 80.0));
    assert_eq!(rect.roundness.map(|r| r.kind), Some(3));
    assert_eq!(rect.updated, 1_700_000_000_000);
}

#[test]
fn test_polygon_edges_are_relative_lines() {
    let scene = to_scene(&sample_diagram(), &fixed_options()).unwrap();
    let first_edge = &scene.elements[2];
    assert_eq!((first_edge.x, first_edge.y), (400.0, 380.0));
    match &first_edge.kind {
        ElementKind::Line(props) => {
            assert_eq!(props.points, vec![[0.0, 0.0], [100.0, 0.0]]);
        }
        other => panic!("expected line, got {:?}", other),
    }
}

#[test]
fn test_polyline_style() {
    let options = fixed_options().with_polygon_style(PolygonStyle::Polyline);
    let scene = to_scene(&sample_diagram(), &options).unwrap();
    let lines: Vec<_> = scene
        .elements
        .iter()
        .filter(|e| e.type_name() == "line")
        .collect();
    assert_eq!(lines.len(), 1);
    match &lines[0].kind {
        ElementKind::Line(props) => {
            // Closed: the first point is repeated at the end
            assert_eq!(props.points.len(), 4);
            assert_eq!(props.points.first(), props.points.last());
        }
        other => panic!("expected line, got {:?}", other),
    }
}

#[test]
fn test_text_elements() {
    let scene = to_scene(&sample_diagram(), &fixed_options()).unwrap();
    let texts: Vec<_> = scene.texts().collect();
    assert_eq!(texts.len(), 2);

    let (element, props) = texts[0];
    assert_eq!(props.text, "API");
    assert_eq!(props.original_text, "API");
    assert_eq!((element.x, element.y), (40.0, 40.0));
    assert_eq!(props.font_size, render::font_size_for(30.0, &fixed_options()));
    assert!(element.roundness.is_none());
}

#[test]
fn test_ids_unique_and_well_formed() {
    let scene = to_scene(&sample_diagram(), &fixed_options()).unwrap();
    let ids: HashSet<&str> = scene.elements.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids.len(), scene.len());
    assert!(scene
        .elements
        .iter()
        .all(|e| e.id.len() == 20 && e.id.chars().all(|c| c.is_ascii_alphanumeric())));
    assert!(scene.elements.iter().all(|e| e.seed >= 1 && e.version_nonce >= 1));
}

#[test]
fn test_seeded_scenes_are_identical() {
    let a = to_json(
        &to_scene(&sample_diagram(), &fixed_options()).unwrap(),
        JsonFormat::Compact,
    )
    .unwrap();
    let b = to_json(
        &to_scene(&sample_diagram(), &fixed_options()).unwrap(),
        JsonFormat::Compact,
    )
    .unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_texts_only_and_shapes_only() {
    let diagram = sample_diagram();

    let texts_only = to_scene(&diagram, &fixed_options().with_shapes(false)).unwrap();
    assert!(texts_only.elements.iter().all(|e| e.type_name() == "text"));
    assert_eq!(texts_only.len(), 2);

    let shapes_only = to_scene(&diagram, &fixed_options().with_texts(false)).unwrap();
    assert_eq!(shapes_only.texts().count(), 0);
    assert_eq!(shapes_only.len(), 5);
}

#[test]
fn test_empty_diagram() {
    let scene = to_scene(&Diagram::new(10, 10), &fixed_options()).unwrap();
    assert!(scene.is_empty());
    let json = to_json(&scene, JsonFormat::Compact).unwrap();
    assert!(json.contains("\"elements\":[]"));
}

#[test]
fn test_obsidian_document() {
    let scene = to_scene(&sample_diagram(), &fixed_options()).unwrap();
    let markdown = to_obsidian_markdown(&scene).unwrap();

    assert!(markdown.starts_with("---\nexcalidraw-plugin: parsed\ntags: [excalidraw]\n---\n"));
    assert!(markdown.contains("# Excalidraw Data"));
    assert!(markdown.contains("## Text Elements"));
    assert!(markdown.trim_end().ends_with("%%"));

    for (element, props) in scene.texts() {
        assert!(markdown.contains(&format!("{} ^{}", props.text, element.id)));
    }

    let start = markdown.find("```json\n").unwrap() + "```json\n".len();
    let end = markdown[start..].find("\n```").unwrap() + start;
    let embedded: Value = serde_json::from_str(&markdown[start..end]).unwrap();
    assert_eq!(embedded["elements"].as_array().unwrap().len(), scene.len());
}

#[test]
fn test_obsidian_renderer_options() {
    let scene = to_scene(&sample_diagram(), &fixed_options()).unwrap();
    let markdown = ObsidianRenderer::new()
        .with_tag("whiteboard")
        .without_banner()
        .render(&scene)
        .unwrap();
    assert!(markdown.contains("tags: [excalidraw, whiteboard]"));
    assert!(!markdown.contains("EXCALIDRAW VIEW"));
}

#[test]
fn test_scene_stats() {
    let scene = to_scene(&sample_diagram(), &fixed_options()).unwrap();
    let stats = SceneStats::from_scene(&scene);
    assert_eq!(stats.element_count(), 7);
    assert_eq!(stats.count_of("line"), 3);
    assert_eq!(stats.count_of("text"), 2);
    assert_eq!(stats.word_count, 2);
    assert_eq!(stats.char_count, 8);
}

#[test]
fn test_scene_roundtrip() {
    let scene = to_scene(&sample_diagram(), &fixed_options()).unwrap();
    let json = to_json(&scene, JsonFormat::Pretty).unwrap();
    let parsed: render::Scene = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, scene);
}
