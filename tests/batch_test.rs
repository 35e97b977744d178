//! Integration tests for file and directory conversion.

mod common;

use common::{blank_page, save_png, whiteboard, FixedRecognizer};
use img2excalidraw::convert::{
    BatchEvent, EXCALIDRAW_FILE, GRAY_FILE, OBSIDIAN_FILE, OCR_OVERLAY_FILE, SHAPES_OVERLAY_FILE,
};
use img2excalidraw::{
    Artifacts, ConvertOptions, Converter, Error, OutputFormat, PipelineOptions,
};
use std::sync::Arc;
use tempfile::tempdir;

fn converter(options: ConvertOptions) -> Converter {
    Converter::new(options).with_recognizer(Arc::new(FixedRecognizer::whiteboard()))
}

#[test]
fn test_convert_file_writes_all_artifacts() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("board.png");
    save_png(&whiteboard(), &input);
    let out = dir.path().join("out");

    let report = converter(ConvertOptions::default())
        .convert_file(&input, &out)
        .unwrap();

    let names: Vec<String> = report
        .written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            GRAY_FILE.to_string(),
            "2-threshold-median-blur-adaptive-thresh.png".to_string(),
            SHAPES_OVERLAY_FILE.to_string(),
            OCR_OVERLAY_FILE.to_string(),
            EXCALIDRAW_FILE.to_string(),
            OBSIDIAN_FILE.to_string(),
        ]
    );
    for path in &report.written {
        assert!(path.is_file(), "missing {}", path.display());
    }

    let gray = image::open(out.join(GRAY_FILE)).unwrap();
    assert_eq!((gray.width(), gray.height()), (480, 360));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join(EXCALIDRAW_FILE)).unwrap())
            .unwrap();
    assert_eq!(json["type"], "excalidraw");
    assert_eq!(
        json["elements"].as_array().unwrap().len() as u32,
        report.stats.element_count()
    );

    let markdown = std::fs::read_to_string(out.join(OBSIDIAN_FILE)).unwrap();
    assert!(markdown.contains("Web Server ^"));
    assert_eq!(report.diagram.metadata.source.as_deref(), Some("board.png"));
}

#[test]
fn test_outputs_only() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("board.png");
    save_png(&whiteboard(), &input);

    let options = ConvertOptions::default().without_debug_images();
    let report = converter(options)
        .convert_file(&input, dir.path().join("out"))
        .unwrap();
    assert_eq!(report.written.len(), 2);
    assert!(!dir.path().join("out").join(GRAY_FILE).exists());
}

#[test]
fn test_diagram_json_artifact() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("board.png");
    save_png(&whiteboard(), &input);

    let options = ConvertOptions::default().with_artifacts(Artifacts::all());
    let report = converter(options)
        .convert_file(&input, dir.path().join("out"))
        .unwrap();
    assert_eq!(report.written.len(), 7);
    let model = std::fs::read_to_string(dir.path().join("out").join("diagram.json")).unwrap();
    assert!(model.contains("\"shapes\""));
}

#[test]
fn test_convert_bytes_formats() {
    let data = common::encode(&whiteboard(), image::ImageFormat::Png);

    let json = converter(ConvertOptions::default())
        .convert_bytes(&data)
        .unwrap();
    assert_eq!(json.mime_type, "application/vnd.excalidraw+json");
    assert!(json.content.starts_with('{'));

    let markdown = converter(ConvertOptions::default().with_format(OutputFormat::ObsidianMarkdown))
        .convert_bytes(&data)
        .unwrap();
    assert!(markdown.content.starts_with("---\n"));
    assert_eq!(markdown.diagram.text_count(), 2);
}

#[test]
fn test_batch_directory() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("photos");
    std::fs::create_dir(&input).unwrap();
    save_png(&whiteboard(), &input.join("first.png"));
    save_png(&blank_page(), &input.join("second.final.png"));
    std::fs::write(input.join("notes.txt"), "not an image").unwrap();

    let out = dir.path().join("out");
    let report = converter(ConvertOptions::default().without_debug_images())
        .convert_directory(&input, &out)
        .unwrap();

    assert!(report.is_success());
    assert_eq!(report.total(), 2);
    assert!(out.join("first").join(EXCALIDRAW_FILE).is_file());
    assert!(out.join("second").join(OBSIDIAN_FILE).is_file());
    assert_eq!(report.stats.scene_count, 2);
}

#[test]
fn test_batch_strict_and_lenient() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("photos");
    std::fs::create_dir(&input).unwrap();
    save_png(&whiteboard(), &input.join("good.png"));
    std::fs::write(input.join("broken.png"), b"\x89PNG\r\n\x1a\ntruncated").unwrap();

    let strict = converter(ConvertOptions::default().without_debug_images())
        .convert_directory(&input, dir.path().join("strict"));
    assert!(matches!(
        strict,
        Err(Error::Batch {
            failed: 1,
            total: 2
        })
    ));

    let options = ConvertOptions::default()
        .without_debug_images()
        .with_pipeline(PipelineOptions::default().lenient());
    let report = converter(options)
        .convert_directory(&input, dir.path().join("lenient"))
        .unwrap();
    assert_eq!(report.succeeded.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].input.ends_with("broken.png"));
}

#[test]
fn test_batch_output_name_collision() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("photos");
    std::fs::create_dir(&input).unwrap();
    save_png(&whiteboard(), &input.join("board.png"));
    save_png(&blank_page(), &input.join("board.v2.png"));

    let options = ConvertOptions::default()
        .without_debug_images()
        .with_pipeline(PipelineOptions::default().lenient());
    let out = dir.path().join("out");
    let report = converter(options).convert_directory(&input, &out).unwrap();

    assert_eq!(report.succeeded.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(
        report.succeeded[0].diagram.metadata.source.as_deref(),
        Some("board.png")
    );
    assert!(report.failed[0].input.ends_with("board.v2.png"));
    assert!(report.failed[0].error.contains("'board'"));
    assert!(report.failed[0].error.contains("board.png"));

    // The directory holds the whiteboard's shapes, not the blank page
    let json: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(out.join("board").join(EXCALIDRAW_FILE)).unwrap(),
    )
    .unwrap();
    let shapes = json["elements"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["type"] != "text")
        .count();
    assert!(shapes > 0);
    assert!(report.succeeded[0].diagram.shape_count() > 0);

    let strict = converter(ConvertOptions::default().without_debug_images())
        .convert_directory(&input, dir.path().join("strict"));
    assert!(matches!(
        strict,
        Err(Error::Batch {
            failed: 1,
            total: 2
        })
    ));
}

#[test]
fn test_batch_progress_events() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("photos");
    std::fs::create_dir(&input).unwrap();
    for name in ["a.png", "b.png", "c.png"] {
        save_png(&whiteboard(), &input.join(name));
    }

    let (tx, rx) = crossbeam_channel::unbounded();
    let report = converter(ConvertOptions::default().without_debug_images())
        .convert_directory_with_progress(&input, dir.path().join("out"), tx)
        .unwrap();
    assert_eq!(report.succeeded.len(), 3);

    let events: Vec<BatchEvent> = rx.iter().collect();
    assert!(matches!(events.first(), Some(BatchEvent::Started { total: 3 })));
    assert!(matches!(
        events.last(),
        Some(BatchEvent::Finished {
            succeeded: 3,
            failed: 0
        })
    ));
    let done = events
        .iter()
        .filter(|e| matches!(e, BatchEvent::FileDone { .. }))
        .count();
    assert_eq!(done, 3);
}

#[test]
fn test_batch_empty_directory() {
    let dir = tempdir().unwrap();
    let report = converter(ConvertOptions::default())
        .convert_directory(dir.path(), dir.path().join("out"))
        .unwrap();
    assert_eq!(report.total(), 0);
    assert!(report.is_success());
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_convert_file_async() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("board.png");
    save_png(&whiteboard(), &input);

    let options = ConvertOptions::default()
        .without_debug_images()
        .with_pipeline(PipelineOptions::default().without_ocr());
    let report = img2excalidraw::convert::convert_file_async(
        input,
        dir.path().join("out"),
        options,
    )
    .await
    .unwrap();
    assert_eq!(report.written.len(), 2);
}
