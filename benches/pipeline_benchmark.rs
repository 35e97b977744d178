//! Benchmarks for img2excalidraw pipeline stages.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic whiteboard images of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, Rgb, RgbImage};
use img2excalidraw::preprocess::{preprocess, PreprocessOptions, ThresholdMethod};
use img2excalidraw::render::{to_json, to_obsidian_markdown, to_scene, JsonFormat, RenderOptions};
use img2excalidraw::shapes::{detect_shapes, ShapeOptions};
use img2excalidraw::{Pipeline, PipelineOptions};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;

const PAPER: Rgb<u8> = Rgb([240, 238, 232]);
const INK: Rgb<u8> = Rgb([30, 30, 40]);

/// Creates a whiteboard with a grid of stroked boxes and circles.
fn create_whiteboard(width: u32, height: u32) -> DynamicImage {
    let mut img = RgbImage::from_pixel(width, height, PAPER);
    let cell = 120;
    for (row, y) in (0..height.saturating_sub(cell)).step_by(cell as usize).enumerate() {
        for (col, x) in (0..width.saturating_sub(cell)).step_by(cell as usize).enumerate() {
            let (x, y) = (x as i32 + 10, y as i32 + 10);
            if (row + col) % 2 == 0 {
                draw_filled_rect_mut(&mut img, Rect::at(x, y).of_size(100, 70), INK);
                draw_filled_rect_mut(&mut img, Rect::at(x + 5, y + 5).of_size(90, 60), PAPER);
            } else {
                draw_filled_circle_mut(&mut img, (x + 50, y + 50), 45, INK);
                draw_filled_circle_mut(&mut img, (x + 50, y + 50), 40, PAPER);
            }
        }
    }
    DynamicImage::ImageRgb8(img)
}

fn bench_preprocess(c: &mut Criterion) {
    let mut group = c.benchmark_group("preprocess");
    let image = create_whiteboard(1024, 768);

    let methods = [
        ("median_adaptive", ThresholdMethod::default()),
        (
            "adaptive",
            ThresholdMethod::AdaptiveMean {
                block_size: 25,
                offset: 5,
            },
        ),
        ("otsu", ThresholdMethod::Otsu),
    ];
    for (name, method) in methods {
        let options = PreprocessOptions::default().with_method(method);
        group.bench_function(name, |b| {
            b.iter(|| preprocess(black_box(&image), &options).unwrap())
        });
    }

    group.finish();
}

fn bench_detect_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_shapes");

    for (width, height) in [(640, 480), (1280, 960), (2560, 1920)] {
        let image = create_whiteboard(width, height);
        let binary = preprocess(&image, &PreprocessOptions::default())
            .unwrap()
            .binary;
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", width, height)),
            &binary,
            |b, binary| b.iter(|| detect_shapes(black_box(binary), &ShapeOptions::default())),
        );
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let image = create_whiteboard(2560, 1920);
    let diagram = Pipeline::new(PipelineOptions::default().without_ocr())
        .run(&image, None)
        .unwrap()
        .diagram;
    let options = RenderOptions::new().with_seed(1);

    c.bench_function("to_scene", |b| {
        b.iter(|| to_scene(black_box(&diagram), &options).unwrap())
    });

    let scene = to_scene(&diagram, &options).unwrap();
    c.bench_function("to_json_pretty", |b| {
        b.iter(|| to_json(black_box(&scene), JsonFormat::Pretty).unwrap())
    });
    c.bench_function("to_obsidian_markdown", |b| {
        b.iter(|| to_obsidian_markdown(black_box(&scene)).unwrap())
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let image = create_whiteboard(1280, 960);
    let pipeline = Pipeline::new(PipelineOptions::default().without_ocr());

    c.bench_function("pipeline_1280x960", |b| {
        b.iter(|| pipeline.run(black_box(&image), None).unwrap())
    });
}

criterion_group!(
    benches,
    bench_preprocess,
    bench_detect_shapes,
    bench_render,
    bench_pipeline
);
criterion_main!(benches);
