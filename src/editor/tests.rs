use super::*;
use crate::draw::{AnnotationKind, Bounds, Point};
use crate::raster::{ImageDecoder, TransformRequest};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

fn rect(editor: &mut Editor, x: f64, y: f64) -> Annotation {
    let id = editor.next_id();
    let now = editor.tick();
    Annotation::new(
        id,
        AnnotationKind::Rectangle,
        Bounds::new(x, y, 20.0, 20.0),
        editor.tool_settings().shape_style(),
        now,
    )
}

fn solid_base(path: &str) -> BaseImage {
    BaseImage::new(path, RgbaImage::from_pixel(8, 8, Rgba([0, 0, 255, 255]))).unwrap()
}

#[test]
fn add_records_one_action_and_flags_redraw() {
    let mut editor = Editor::default();
    editor.take_redraw();
    let a = rect(&mut editor, 0.0, 0.0);
    assert!(editor.add(a.clone()));
    assert_eq!(editor.annotations(), &[a]);
    assert_eq!(editor.history().len(), 1);
    assert!(editor.take_redraw());
    assert!(!editor.take_redraw());
}

#[test]
fn duplicate_ids_are_rejected() {
    let mut editor = Editor::default();
    let a = rect(&mut editor, 0.0, 0.0);
    assert!(editor.add(a.clone()));
    assert!(!editor.add(a));
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn unknown_ids_are_noops() {
    let mut editor = Editor::default();
    let a = rect(&mut editor, 0.0, 0.0);
    editor.add(a);
    let missing = AnnotationId::from("annotation-999");

    assert!(!editor.update(&missing, AnnotationPatch::bounds(Bounds::default())));
    assert!(!editor.delete(&missing));
    assert_eq!(editor.history().len(), 1);
    assert_eq!(editor.history().index(), 0);
}

#[test]
fn update_bumps_timestamp_and_undo_restores_before() {
    let mut editor = Editor::default();
    let a = rect(&mut editor, 0.0, 0.0);
    editor.add(a.clone());

    let moved = Bounds::new(50.0, 50.0, 20.0, 20.0);
    assert!(editor.update(&a.id, AnnotationPatch::bounds(moved)));
    let current = editor.store().get(&a.id).unwrap();
    assert_eq!(current.bounds, moved);
    assert!(current.updated_at > a.updated_at);
    assert_eq!(current.created_at, a.created_at);

    editor.undo();
    assert_eq!(editor.store().get(&a.id).unwrap(), &a);
    editor.redo();
    assert_eq!(editor.store().get(&a.id).unwrap().bounds, moved);
}

#[test]
fn delete_clears_selection_and_undo_restores_order() {
    let mut editor = Editor::default();
    let a = rect(&mut editor, 0.0, 0.0);
    let b = rect(&mut editor, 30.0, 0.0);
    let c = rect(&mut editor, 60.0, 0.0);
    for annotation in [a.clone(), b.clone(), c.clone()] {
        editor.add(annotation);
    }
    editor.select(Some(b.id.clone()));

    assert!(editor.delete(&b.id));
    assert!(editor.selected().is_none());

    editor.undo();
    assert_eq!(editor.annotations(), &[a, b, c]);
}

#[test]
fn undo_of_add_clears_selection_of_removed_annotation() {
    let mut editor = Editor::default();
    let a = rect(&mut editor, 0.0, 0.0);
    editor.add(a.clone());
    editor.select(Some(a.id.clone()));
    editor.undo();
    assert!(editor.selected().is_none());
    assert!(editor.annotations().is_empty());
}

#[test]
fn undo_and_redo_do_not_record() {
    let mut editor = Editor::default();
    let a = rect(&mut editor, 0.0, 0.0);
    editor.add(a);
    editor.undo();
    editor.redo();
    editor.undo();
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn tool_setting_changes_do_not_touch_existing_annotations() {
    let mut editor = Editor::default();
    let a = rect(&mut editor, 0.0, 0.0);
    editor.add(a.clone());
    editor.tool_settings_mut().color = crate::draw::BLUE;
    editor.tool_settings_mut().stroke_width = 9.0;
    assert_eq!(editor.annotations()[0].style, a.style);
}

#[test]
fn reset_clears_everything_but_the_image() {
    let mut editor = Editor::default();
    editor.set_base_image(solid_base("base.png"));
    let a = rect(&mut editor, 0.0, 0.0);
    editor.add(a.clone());
    editor.select(Some(a.id));
    editor.tool_settings_mut().mosaic_size = 40;

    editor.reset();
    assert!(editor.annotations().is_empty());
    assert!(editor.selected().is_none());
    assert!(!editor.can_undo());
    assert!(!editor.can_redo());
    assert_eq!(editor.tool_settings(), &ToolSettings::default());
    assert!(editor.base_image().is_some());
}

#[test]
fn replacing_base_image_drops_annotations_and_history() {
    let mut editor = Editor::default();
    editor.set_base_image(solid_base("first.png"));
    let a = rect(&mut editor, 0.0, 0.0);
    editor.add(a);

    editor.set_base_image(solid_base("second.png"));
    assert!(editor.annotations().is_empty());
    assert!(editor.history().is_empty());
    assert_eq!(editor.base_image().unwrap().path(), Path::new("second.png"));
}

#[test]
fn poll_image_raises_redraw_once() {
    let mut editor = Editor::default();
    editor.begin_image_load(PendingLoad::ready(
        "ready.png",
        Ok(RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]))),
    ));
    editor.take_redraw();
    assert!(editor.render(None).is_none());

    assert!(editor.poll_image());
    assert!(editor.take_redraw());
    assert!(!editor.poll_image());
    assert!(!editor.take_redraw());
    assert!(editor.render(None).unwrap().is_ok());
}

#[test]
fn failed_load_withholds_rendering() {
    let mut editor = Editor::default();
    editor.begin_image_load(PendingLoad::ready(
        "broken.png",
        Err(ImageError::Task("boom".to_string())),
    ));
    assert!(editor.poll_image());
    assert!(matches!(editor.image_state(), ImageState::Failed(msg) if msg.contains("boom")));
    assert!(editor.render(None).is_none());
    assert!(editor.export_request().is_none());
}

#[test]
fn export_request_snapshots_annotations() {
    let mut editor = Editor::default();
    editor.set_base_image(solid_base("photo.png"));
    let a = rect(&mut editor, 1.0, 1.0);
    editor.add(a.clone());

    let request = editor.export_request().unwrap();
    editor.delete(&a.id);
    assert_eq!(request.image_path, PathBuf::from("photo.png"));
    assert_eq!(request.annotations, vec![a]);
}

#[test]
fn preview_is_drawn_but_not_stored() {
    let mut editor = Editor::default();
    editor.set_base_image(solid_base("photo.png"));
    let id = editor.next_id();
    let preview = Annotation::new(
        id,
        AnnotationKind::Pen {
            points: vec![Point::new(0.0, 0.0), Point::new(7.0, 7.0)],
        },
        Bounds::new(0.0, 0.0, 7.0, 7.0),
        editor.tool_settings().stroke_style(),
        0,
    );
    assert!(editor.render(Some(&preview)).unwrap().is_ok());
    assert!(editor.annotations().is_empty());
}

struct RecordingTransform {
    output: PathBuf,
    seen: Mutex<Vec<(TransformRequest, PathBuf)>>,
}

impl TransformService for RecordingTransform {
    fn apply(&self, request: &TransformRequest, input: &Path) -> Result<PathBuf, TransformError> {
        self.seen
            .lock()
            .unwrap()
            .push((request.clone(), input.to_path_buf()));
        Ok(self.output.clone())
    }
}

struct FailingTransform;

impl TransformService for FailingTransform {
    fn apply(&self, request: &TransformRequest, _input: &Path) -> Result<PathBuf, TransformError> {
        Err(TransformError::Unsupported(format!("{request:?}")))
    }
}

struct TinyDecoder;

impl ImageDecoder for TinyDecoder {
    fn decode(&self, _path: &Path) -> Result<RgbaImage, ImageError> {
        Ok(RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255])))
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn transform_swaps_image_and_clears_annotations() {
    let loader = ImageLoader::with_decoder(&tokio::runtime::Handle::current(), Arc::new(TinyDecoder));
    let service = RecordingTransform {
        output: PathBuf::from("rotated.png"),
        seen: Mutex::new(Vec::new()),
    };
    let mut editor = Editor::default();
    editor.set_base_image(solid_base("original.png"));
    let a = rect(&mut editor, 0.0, 0.0);
    editor.add(a);

    editor
        .apply_transform(&service, &TransformRequest::Rotate(90), &loader)
        .unwrap();
    assert!(editor.annotations().is_empty());
    assert!(!editor.can_undo());
    assert_eq!(
        service.seen.lock().unwrap().as_slice(),
        &[(TransformRequest::Rotate(90), PathBuf::from("original.png"))]
    );

    let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(5);
    while !editor.poll_image() {
        assert!(tokio::time::Instant::now() < deadline, "load never finished");
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    assert_eq!(editor.base_image().unwrap().path(), Path::new("rotated.png"));
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_transform_keeps_annotations() {
    let loader = ImageLoader::new(&tokio::runtime::Handle::current());
    let mut editor = Editor::default();
    editor.set_base_image(solid_base("original.png"));
    let a = rect(&mut editor, 0.0, 0.0);
    editor.add(a);

    let result = editor.apply_transform(&FailingTransform, &TransformRequest::Rotate(90), &loader);
    assert!(matches!(result, Err(TransformError::Unsupported(_))));
    assert_eq!(editor.annotations().len(), 1);
    assert!(editor.base_image().is_some());
}
