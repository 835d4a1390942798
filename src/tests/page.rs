use super::{Outcome, Page, PageEvent};
use crate::config::Config;
use crate::controls::Action;
use crate::dom::{Document, NodeId};
use crate::model_viewer::LoadState;
use crate::surface::{HeadlessSurface, Surface};
use crate::tabs::{BUTTON_CLASS, PANEL_CLASS, TARGET_ATTR};
use crate::viewport::{Point, PointerId, ZOOMABLE_ATTR};

struct Fixture {
    surface: HeadlessSurface,
    page: Page,
}

fn text_el(doc: &mut Document, parent: NodeId, tag: &str, text: &str) -> NodeId {
    let el = doc.create_element(tag);
    let t = doc.create_text(text);
    doc.append_child(el, t);
    doc.append_child(parent, el);
    el
}

fn zoomable(doc: &mut Document, parent: NodeId, src: &str) -> NodeId {
    let img = doc.create_element("img");
    doc.set_attr(img, "src", src);
    doc.set_attr(img, ZOOMABLE_ATTR, "");
    doc.append_child(parent, img);
    img
}

fn fixture(with_region: bool) -> Fixture {
    let mut doc = Document::new();
    let root = doc.root();
    let region = if with_region {
        let main = doc.create_element("main");
        doc.append_child(root, main);
        main
    } else {
        root
    };
    text_el(&mut doc, region, "h2", "Overview");
    text_el(&mut doc, region, "h2", "Design");
    zoomable(&mut doc, region, "chassis.png");
    text_el(&mut doc, region, "h3", "Wiring");
    zoomable(&mut doc, region, "harness.png");
    text_el(&mut doc, region, "h2", "Results");
    let widget = doc.create_element("model-viewer");
    doc.set_attr(widget, "src", "arm.glb");
    doc.append_child(region, widget);

    for id in ["specs", "video"] {
        let b = text_el(&mut doc, region, "button", id);
        doc.add_class(b, BUTTON_CLASS);
        doc.set_attr(b, TARGET_ATTR, id);
    }
    let panel = doc.create_element("div");
    doc.add_class(panel, PANEL_CLASS);
    doc.set_attr(panel, "id", "specs");
    doc.append_child(region, panel);

    let mut surface = HeadlessSurface::new(doc);
    let page = Page::attach(&mut surface, &Config::default());
    Fixture { surface, page }
}

impl Fixture {
    fn send(&mut self, event: PageEvent) -> Outcome {
        self.page.dispatch(&mut self.surface, event)
    }

    fn click_viewport(&mut self, index: usize, action: Action) -> Outcome {
        let button = self.page.viewports()[index].controls.button(action).unwrap();
        self.send(PageEvent::Click { target: button })
    }

    fn image(&self, index: usize) -> NodeId {
        self.page.viewports()[index].image
    }
}

#[test]
fn test_attach_wires_every_component() {
    let f = fixture(true);
    let titles: Vec<&str> = f
        .page
        .sections()
        .sections
        .iter()
        .map(|s| s.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Design", "Wiring", "Results"]);
    assert_eq!(f.page.section_widgets().len(), 3);
    assert_eq!(f.page.viewports().len(), 2);
    assert_eq!(f.page.models().len(), 1);
    assert_eq!(f.page.tabs().map(crate::tabs::TabSwitcher::len), Some(2));

    let snapshot = f.page.snapshot(f.surface.document());
    assert_eq!(snapshot.sections_open, vec![true, false, false]);
    assert_eq!(snapshot.models[0].load, LoadState::Loading);
}

#[test]
fn test_missing_region_does_not_block_other_components() {
    let f = fixture(false);
    assert!(f.page.sections().is_empty());
    assert_eq!(f.page.viewports().len(), 2);
    assert_eq!(f.page.models().len(), 1);
}

#[test]
fn test_zoom_buttons_only_affect_their_viewport() {
    let mut f = fixture(true);
    assert!(f.click_viewport(0, Action::ZoomIn).handled);
    f.click_viewport(1, Action::ZoomOut);

    let snapshot = f.page.snapshot(f.surface.document());
    assert!((snapshot.viewports[0].scale - 1.2).abs() < 1e-9);
    assert!((snapshot.viewports[1].scale - 1.0 / 1.2).abs() < 1e-9);
}

#[test]
fn test_drags_are_routed_by_pointer_capture() {
    let mut f = fixture(true);
    let (a, b) = (f.image(0), f.image(1));

    f.send(PageEvent::PointerDown {
        target: a,
        pointer: PointerId(1),
        at: Point::new(10.0, 10.0),
    });
    f.send(PageEvent::PointerDown {
        target: b,
        pointer: PointerId(2),
        at: Point::new(100.0, 100.0),
    });
    let moved = f.send(PageEvent::PointerMove {
        pointer: PointerId(1),
        at: Point::new(15.0, 15.0),
    });
    assert!(moved.handled);
    f.send(PageEvent::PointerMove {
        pointer: PointerId(2),
        at: Point::new(90.0, 100.0),
    });

    let viewports = f.page.snapshot(f.surface.document()).viewports;
    assert_eq!(viewports[0].offset, Point::new(5.0, 5.0));
    assert_eq!(viewports[1].offset, Point::new(-10.0, 0.0));
    assert!(viewports[0].is_panning() && viewports[1].is_panning());

    assert!(f.send(PageEvent::PointerUp { pointer: PointerId(1) }).handled);
    let stray = f.send(PageEvent::PointerMove {
        pointer: PointerId(1),
        at: Point::new(50.0, 50.0),
    });
    assert_eq!(stray, Outcome::default());
    let viewports = f.page.snapshot(f.surface.document()).viewports;
    assert_eq!(viewports[0].offset, Point::new(5.0, 5.0));
    assert!(!viewports[0].is_panning());
    assert!(viewports[1].is_panning());
}

#[test]
fn test_pointer_down_on_controls_does_not_pan() {
    let mut f = fixture(true);
    let button = f.page.viewports()[0].controls.button(Action::Reset).unwrap();
    let outcome = f.send(PageEvent::PointerDown {
        target: button,
        pointer: PointerId(1),
        at: Point::ORIGIN,
    });
    assert_eq!(outcome, Outcome::default());
}

#[test]
fn test_wheel_is_prevented_only_over_viewports() {
    let mut f = fixture(true);
    let over = f.send(PageEvent::Wheel {
        target: f.image(0),
        delta_y: -120.0,
    });
    assert!(over.default_prevented);

    let root = f.surface.document().root();
    let elsewhere = f.send(PageEvent::Wheel {
        target: root,
        delta_y: -120.0,
    });
    assert!(!elsewhere.default_prevented);
}

#[test]
fn test_fullscreen_round_trip_updates_flags() {
    let mut f = fixture(true);
    f.click_viewport(1, Action::Fullscreen);

    let container = f.page.viewports()[1].container;
    assert_eq!(f.surface.fullscreen_element(), Some(container));
    assert!(f.page.viewports()[1].state().fullscreen);
    assert!(!f.page.viewports()[0].state().fullscreen);
    assert!(f.surface.document().has_class(container, "is-fullscreen"));

    f.click_viewport(1, Action::Fullscreen);
    assert_eq!(f.surface.fullscreen_element(), None);
    assert!(!f.page.viewports()[1].state().fullscreen);
    assert!(!f.surface.document().has_class(container, "is-fullscreen"));
}

#[test]
fn test_toggle_after_host_exit_requests_again() {
    let mut f = fixture(true);
    f.click_viewport(0, Action::Fullscreen);
    let container = f.page.viewports()[0].container;
    assert_eq!(f.surface.fullscreen_element(), Some(container));

    // Host leaves fullscreen on its own, e.g. on Escape.
    f.surface.exit_fullscreen().unwrap();
    f.click_viewport(0, Action::Fullscreen);
    assert_eq!(f.surface.fullscreen_element(), Some(container));
    assert!(f.page.viewports()[0].state().fullscreen);

    let model = f.page.models()[0].controls.button(Action::Fullscreen).unwrap();
    f.send(PageEvent::Click { target: model });
    f.surface.exit_fullscreen().unwrap();
    f.send(PageEvent::Click { target: model });
    assert_eq!(f.surface.fullscreen_element(), Some(f.page.models()[0].container));
    assert!(f.page.models()[0].state().fullscreen);
    assert!(!f.page.viewports()[0].state().fullscreen);
}

#[test]
fn test_fullscreen_denial_is_silent() {
    let mut f = fixture(true);
    f.surface.set_fullscreen_allowed(false);
    assert!(f.click_viewport(0, Action::Fullscreen).handled);
    assert!(!f.page.viewports()[0].state().fullscreen);
}

#[test]
fn test_model_events_reach_the_named_widget() {
    let mut f = fixture(true);
    let widget = f.page.models()[0].widget;
    f.send(PageEvent::ModelError {
        target: widget,
        detail: "decode failed".into(),
    });
    assert_eq!(f.page.models()[0].state().load, LoadState::Failed);
    assert!(f.surface.document().has_attr(widget, "hidden"));

    let root = f.surface.document().root();
    let unknown = f.send(PageEvent::ModelLoad { target: root });
    assert!(!unknown.handled);
}

#[test]
fn test_model_rotate_button() {
    let mut f = fixture(true);
    let rotate = f.page.models()[0].controls.button(Action::Rotate).unwrap();
    f.send(PageEvent::Click { target: rotate });
    assert!(f.page.models()[0].state().auto_rotate);
}

#[test]
fn test_summary_click_toggles_section() {
    let mut f = fixture(true);
    let results = f.page.sections().find("Results").unwrap().heading;
    f.send(PageEvent::Click { target: results });
    let snapshot = f.page.snapshot(f.surface.document());
    assert_eq!(snapshot.sections_open, vec![true, false, true]);
}

#[test]
fn test_tab_click_selects_tab() {
    let mut f = fixture(true);
    let doc = f.surface.document();
    let video = doc
        .find_all(doc.root(), |el| el.attr(TARGET_ATTR) == Some("video"))
        .first()
        .copied()
        .unwrap();
    assert!(f.send(PageEvent::Click { target: video }).handled);
    assert_eq!(f.page.snapshot(f.surface.document()).active_tab, Some(1));
}
