use super::{
    LoadState, ModelEffect, ModelEvent, ModelState, ModelViewerAdapter, DEFAULT_CAMERA_ORBIT,
    ERROR_CLASS, LOAD_FAILURE_MESSAGE,
};
use crate::controls::Action;
use crate::dom::Document;
use crate::surface::{HeadlessSurface, Surface};

#[test]
fn test_starts_loading_and_stays_there_without_signal() {
    let state = ModelState::default();
    assert_eq!(state.load, LoadState::Loading);

    // Controls work while loading; none of them resolve the load.
    let (state, _) = state.reduce(ModelEvent::ToggleAutoRotate);
    let (state, _) = state.reduce(ModelEvent::ResetCamera);
    assert_eq!(state.load, LoadState::Loading);
}

#[test]
fn test_load_then_error_is_ignored() {
    let (loaded, effects) = ModelState::default().reduce(ModelEvent::Load);
    assert_eq!(loaded.load, LoadState::Loaded);
    assert_eq!(effects, vec![ModelEffect::MarkReady]);

    let (after, effects) = loaded.reduce(ModelEvent::Error("late".into()));
    assert_eq!(after.load, LoadState::Loaded);
    assert!(effects.is_empty());
}

#[test]
fn test_failed_is_terminal() {
    let (failed, effects) = ModelState::default().reduce(ModelEvent::Error("404".into()));
    assert_eq!(failed.load, LoadState::Failed);
    assert_eq!(
        effects,
        vec![ModelEffect::ShowFailure {
            detail: "404".into()
        }]
    );

    let (still, effects) = failed.reduce(ModelEvent::Load);
    assert_eq!(still.load, LoadState::Failed);
    assert!(effects.is_empty());
}

#[test]
fn test_auto_rotate_is_orthogonal_to_load() {
    let (rotating, effects) = ModelState::default().reduce(ModelEvent::ToggleAutoRotate);
    assert!(rotating.auto_rotate);
    assert_eq!(effects, vec![ModelEffect::SetAutoRotate(true)]);

    let (loaded, _) = rotating.reduce(ModelEvent::Load);
    assert!(loaded.auto_rotate);
    let (stopped, effects) = loaded.reduce(ModelEvent::ToggleAutoRotate);
    assert!(!stopped.auto_rotate);
    assert_eq!(effects, vec![ModelEffect::SetAutoRotate(false)]);
}

#[test]
fn test_fullscreen_toggle_depends_on_flag() {
    let (_, effects) = ModelState::default().reduce(ModelEvent::ToggleFullscreen);
    assert_eq!(effects, vec![ModelEffect::RequestFullscreen]);

    let (full, _) = ModelState::default().reduce(ModelEvent::FullscreenChanged(true));
    let (_, effects) = full.reduce(ModelEvent::ToggleFullscreen);
    assert_eq!(effects, vec![ModelEffect::ExitFullscreen]);
}

fn attached() -> (HeadlessSurface, ModelViewerAdapter) {
    let mut doc = Document::new();
    let main = doc.create_element("main");
    let widget = doc.create_element("model-viewer");
    doc.set_attr(widget, "src", "models/gripper.glb");
    doc.append_child(doc.root(), main);
    doc.append_child(main, widget);
    let adapter = ModelViewerAdapter::attach(&mut doc, widget);
    (HeadlessSurface::new(doc), adapter)
}

#[test]
fn test_attach_builds_container_and_controls() {
    let (surface, adapter) = attached();
    let doc = surface.document();
    assert_eq!(doc.parent(adapter.widget), Some(adapter.container));
    assert_eq!(doc.children(adapter.container)[1], adapter.controls.bar);
    let rotate = adapter.controls.button(Action::Rotate).unwrap();
    assert_eq!(doc.attr(rotate, "aria-pressed"), Some("false"));
    assert!(adapter.controls.button(Action::ZoomIn).is_none());
}

#[test]
fn test_error_hides_widget_and_keeps_detail_out_of_document() {
    let (mut surface, mut adapter) = attached();
    adapter.dispatch(ModelEvent::Error("GLTFLoader: 404 Not Found".into()), &mut surface);

    let doc = surface.document();
    assert!(doc.has_attr(adapter.widget, "hidden"));
    let panel = doc.next_sibling(adapter.widget).unwrap();
    assert!(doc.has_class(panel, ERROR_CLASS));
    assert_eq!(doc.text_content(panel), LOAD_FAILURE_MESSAGE);
    assert!(!doc.render().contains("404"));
}

#[test]
fn test_load_marks_widget_ready() {
    let (mut surface, mut adapter) = attached();
    adapter.dispatch(ModelEvent::Load, &mut surface);
    assert!(surface.document().has_class(adapter.widget, "loaded"));
    assert_eq!(adapter.state().load, LoadState::Loaded);
}

#[test]
fn test_rotate_and_reset_write_widget_attributes() {
    let (mut surface, mut adapter) = attached();
    let rotate = adapter.controls.button(Action::Rotate).unwrap();

    adapter.dispatch(ModelEvent::ToggleAutoRotate, &mut surface);
    adapter.dispatch(ModelEvent::ResetCamera, &mut surface);
    {
        let doc = surface.document();
        assert!(doc.has_attr(adapter.widget, "auto-rotate"));
        assert!(doc.has_class(rotate, "active"));
        assert_eq!(doc.attr(rotate, "aria-pressed"), Some("true"));
        assert_eq!(doc.attr(adapter.widget, "camera-orbit"), Some(DEFAULT_CAMERA_ORBIT));
    }

    adapter.dispatch(ModelEvent::ToggleAutoRotate, &mut surface);
    let doc = surface.document();
    assert!(!doc.has_attr(adapter.widget, "auto-rotate"));
    assert!(!doc.has_class(rotate, "active"));
}

#[test]
fn test_fullscreen_denial_changes_nothing() {
    let (mut surface, mut adapter) = attached();
    surface.set_fullscreen_allowed(false);
    adapter.dispatch(ModelEvent::ToggleFullscreen, &mut surface);
    assert_eq!(surface.fullscreen_element(), None);
    assert!(!adapter.state().fullscreen);
}
