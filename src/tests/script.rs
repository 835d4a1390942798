use super::{replay, Script, ScriptEvent};
use crate::config::Config;
use crate::controls::Action;
use crate::error::Error;
use crate::formats::markdown::MarkdownFormat;
use crate::input::parse_page;
use crate::model_viewer::LoadState;
use crate::page::Page;
use crate::surface::HeadlessSurface;
use crate::viewport::Point;

const PAGE: &str = "\
## Overview

Intro text.

## Design

![Chassis](img/chassis.png \"zoomable\")

### Wiring

![Harness](img/harness.png \"zoomable\")

## Results

![Arm](models/arm.glb)
";

fn attached() -> (HeadlessSurface, Page) {
    let config = Config::default();
    let doc = parse_page(PAGE, &MarkdownFormat, &config).unwrap();
    let mut surface = HeadlessSurface::new(doc);
    let page = Page::attach(&mut surface, &config);
    (surface, page)
}

#[test]
fn test_script_parses_tagged_events() {
    let script = Script::from_json(
        r#"{"events": [
            {"kind": "viewport", "index": 0, "action": "zoom-in"},
            {"kind": "pointer_down", "viewport": 1, "pointer": 7, "x": 1.0, "y": 2.0},
            {"kind": "model_error", "model": 0, "message": "404"}
        ]}"#,
    )
    .unwrap();
    assert_eq!(
        script.events[0],
        ScriptEvent::Viewport {
            index: 0,
            action: Action::ZoomIn
        }
    );
    assert_eq!(script.events.len(), 3);

    assert!(matches!(
        Script::from_json(r#"{"events": [{"kind": "teleport"}]}"#),
        Err(Error::Script(_))
    ));
}

#[test]
fn test_replay_traces_each_step() {
    let (mut surface, mut page) = attached();
    let script = Script {
        events: vec![
            ScriptEvent::Viewport {
                index: 0,
                action: Action::ZoomIn,
            },
            ScriptEvent::PointerDown {
                viewport: 1,
                pointer: 1,
                x: 10.0,
                y: 10.0,
            },
            ScriptEvent::PointerMove {
                pointer: 1,
                x: 15.0,
                y: 15.0,
            },
            ScriptEvent::PointerUp { pointer: 1 },
            ScriptEvent::ModelLoad { model: 0 },
            ScriptEvent::ToggleSection { section: 2 },
        ],
    };

    let trace = replay(&mut page, &mut surface, &script).unwrap();
    assert_eq!(trace.initial.sections_open, vec![true, false, false]);
    assert_eq!(trace.steps.len(), 6);

    let zoomed = &trace.steps[0].snapshot.viewports;
    assert!((zoomed[0].scale - 1.2).abs() < 1e-9);
    assert!((zoomed[1].scale - 1.0).abs() < 1e-9);

    assert!(trace.steps[1].outcome.default_prevented);
    assert_eq!(
        trace.steps[2].snapshot.viewports[1].offset,
        Point::new(5.0, 5.0)
    );
    assert!(!trace.steps[3].snapshot.viewports[1].is_panning());
    assert_eq!(trace.steps[4].snapshot.models[0].load, LoadState::Loaded);
    assert_eq!(
        trace.steps[5].snapshot.sections_open,
        vec![true, false, true]
    );
}

#[test]
fn test_missing_component_stops_replay() {
    let (mut surface, mut page) = attached();
    let script = Script {
        events: vec![ScriptEvent::Wheel {
            viewport: 5,
            delta_y: -1.0,
        }],
    };
    let err = replay(&mut page, &mut surface, &script).unwrap_err();
    assert!(matches!(
        err,
        Error::MissingTarget {
            kind: "viewport",
            index: 5
        }
    ));

    let no_tabs = ScriptEvent::Tab { index: 0 }.resolve(&page);
    assert!(matches!(no_tabs, Err(Error::MissingTarget { kind: "tab", .. })));

    let no_button = ScriptEvent::Model {
        index: 0,
        action: Action::ZoomIn,
    }
    .resolve(&page);
    assert!(no_button.is_err());
}

#[test]
fn test_trace_serializes_to_json() {
    let (mut surface, mut page) = attached();
    let script = Script {
        events: vec![ScriptEvent::Model {
            index: 0,
            action: Action::Rotate,
        }],
    };
    let trace = replay(&mut page, &mut surface, &script).unwrap();
    let json = serde_json::to_value(&trace).unwrap();
    assert_eq!(json["steps"][0]["event"]["kind"], "model");
    assert_eq!(json["steps"][0]["snapshot"]["models"][0]["auto_rotate"], true);
}

#[test]
fn test_components_written_as_html_attach() {
    let source = "\
## Gallery

<div class=\"tabs\">
<button class=\"tab-button\" data-tab=\"specs\">Specs</button>
<button class=\"tab-button\" data-tab=\"video\">Video</button>
<div class=\"tab-content\" id=\"specs\">Payload 2&nbsp;kg</div>
<div class=\"tab-content\" id=\"video\">Demo</div>
</div>

<img src=\"img/p.png\" alt=\"Plate\" data-zoomable>

<model-viewer src=\"models/arm.glb\" camera-controls>
</model-viewer>
";
    let config = Config::default();
    let doc = parse_page(source, &MarkdownFormat, &config).unwrap();
    let mut surface = HeadlessSurface::new(doc);
    let mut page = Page::attach(&mut surface, &config);

    assert_eq!(page.tabs().map(crate::tabs::TabSwitcher::len), Some(2));
    assert_eq!(page.viewports().len(), 1);
    assert_eq!(page.models().len(), 1);

    let script = Script {
        events: vec![
            ScriptEvent::Tab { index: 1 },
            ScriptEvent::Viewport {
                index: 0,
                action: Action::ZoomIn,
            },
        ],
    };
    let trace = replay(&mut page, &mut surface, &script).unwrap();
    assert_eq!(trace.steps[0].snapshot.active_tab, Some(1));
    assert!((trace.steps[1].snapshot.viewports[0].scale - 1.2).abs() < 1e-9);
}
