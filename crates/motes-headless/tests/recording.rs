use glam::Vec3;
use motes_core::scenes::{Embrace, Flow};
use motes_core::{palette, Camera, FrameDriver, RenderableFrame, Shape, Sprite};
use motes_headless::{JsonLinesRenderer, TraceRenderer, Unpaced};
use motes_platform::{drive, RenderAdapter};
use serde_json::Value;

#[test]
fn one_json_object_per_frame() {
    let mut driver = FrameDriver::seeded(Flow, 11);
    let mut recorder = JsonLinesRenderer::new(Vec::new());
    let summary = drive(&mut driver, &mut recorder, &mut Unpaced).unwrap();
    assert_eq!(recorder.written(), summary.frames);

    let text = String::from_utf8(recorder.into_inner()).unwrap();
    let lines: Vec<Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 80);
    assert_eq!(lines[0]["tick"], 1);
    assert_eq!(lines[79]["tick"], 80);
    assert_eq!(lines[0]["sprites"].as_array().unwrap().len(), 20);
    assert_eq!(lines[0]["camera"]["azimuth"], 110.0);
}

#[test]
fn shapes_are_tagged() {
    let frame = RenderableFrame {
        tick: 7,
        sprites: vec![Sprite {
            position: Vec3::new(1.0, 2.0, 3.0),
            color: palette::GOLD,
            size: 4.0,
        }],
        shapes: vec![
            Shape::segment(Vec3::ZERO, Vec3::X, palette::WHITE, 1.0),
            Shape::Ring {
                center: Vec3::ZERO,
                radius: 2.0,
                color: palette::CYAN,
            },
        ],
        camera: Camera::fixed(10.0, 20.0),
        caption: None,
    };
    let mut recorder = JsonLinesRenderer::new(Vec::new());
    recorder.draw(&frame).unwrap();
    let text = String::from_utf8(recorder.into_inner()).unwrap();
    let value: Value = serde_json::from_str(text.trim_end()).unwrap();
    assert_eq!(value["shapes"][0]["shape"], "polyline");
    assert_eq!(value["shapes"][1]["shape"], "ring");
    assert_eq!(value["sprites"][0]["position"], serde_json::json!([1.0, 2.0, 3.0]));
    assert!(value["caption"].is_null());

    let back: RenderableFrame = serde_json::from_str(text.trim_end()).unwrap();
    assert_eq!(back, frame);
}

#[test]
fn trace_renderer_sees_every_frame() {
    let mut driver = FrameDriver::seeded(Embrace, 3);
    let mut renderer = TraceRenderer::new();
    let summary = drive(&mut driver, &mut renderer, &mut Unpaced).unwrap();
    assert_eq!(renderer.frames(), 300);
    assert_eq!(summary.frames, 300);
}

#[test]
fn record_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flow.jsonl");
    let mut driver = FrameDriver::seeded(Flow, 1);
    let mut recorder = JsonLinesRenderer::create(&path).unwrap();
    drive(&mut driver, &mut recorder, &mut Unpaced).unwrap();
    drop(recorder);
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 80);
}
