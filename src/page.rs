//! Page attachment and event routing.
//!
//! [`Page::attach`] runs once per page load: it folds the content region, then independently
//! attaches a viewport to every zoomable image, an adapter to every model widget, and the tab
//! switcher. The components never talk to each other. [`Page::dispatch`] only decides which
//! component owns an event.
//!
//! Drags are routed by pointer capture: the viewport that saw the press owns that pointer until
//! it is released, and moves of that pointer reach no other viewport.

use crate::config::Config;
use crate::controls;
use crate::dom::{Document, NodeId};
use crate::fold::{self, FoldOptions, FoldPlan};
use crate::model_viewer::{self, ModelEvent, ModelState, ModelViewerAdapter};
use crate::surface::Surface;
use crate::tabs::TabSwitcher;
use crate::viewport::{
    Point, PointerId, ViewportController, ViewportEvent, ViewportState, ZoomPolicy, ZOOMABLE_ATTR,
};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
/// Host input delivered to the page.
pub enum PageEvent {
    /// Click or tap on `target`.
    Click {
        /// Innermost node hit.
        target: NodeId,
    },
    /// Wheel over `target`; negative `delta_y` scrolls up.
    Wheel {
        /// Innermost node hit.
        target: NodeId,
        /// Vertical wheel delta.
        delta_y: f64,
    },
    /// Pointer pressed on `target`.
    PointerDown {
        /// Innermost node hit.
        target: NodeId,
        /// Pressing pointer.
        pointer: PointerId,
        /// Pointer position.
        at: Point,
    },
    /// Pointer moved anywhere on the page.
    PointerMove {
        /// Moving pointer.
        pointer: PointerId,
        /// Pointer position.
        at: Point,
    },
    /// Pointer released anywhere on the page.
    PointerUp {
        /// Released pointer.
        pointer: PointerId,
    },
    /// A model widget reported a successful load.
    ModelLoad {
        /// The widget.
        target: NodeId,
    },
    /// A model widget reported a failed load.
    ModelError {
        /// The widget.
        target: NodeId,
        /// Host diagnostic.
        detail: String,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
/// What dispatching an event did.
pub struct Outcome {
    /// Some component consumed the event.
    pub handled: bool,
    /// The host should skip the event's default action.
    pub default_prevented: bool,
}

impl Outcome {
    const HANDLED: Self = Self {
        handled: true,
        default_prevented: false,
    };
    const PREVENTED: Self = Self {
        handled: true,
        default_prevented: true,
    };
}

#[derive(Clone, Debug, PartialEq, Serialize)]
/// Serializable view of every component's state.
pub struct PageSnapshot {
    /// Open flag of each folded section, in plan order.
    pub sections_open: Vec<bool>,
    /// State of each viewport, in document order.
    pub viewports: Vec<ViewportState>,
    /// State of each model adapter, in document order.
    pub models: Vec<ModelState>,
    /// Active tab button, if any.
    pub active_tab: Option<usize>,
}

#[derive(Clone, Debug)]
/// Every component attached to one page.
pub struct Page {
    sections: FoldPlan,
    section_widgets: Vec<NodeId>,
    viewports: Vec<ViewportController>,
    models: Vec<ModelViewerAdapter>,
    tabs: Option<TabSwitcher>,
    captures: HashMap<PointerId, usize>,
}

impl Page {
    /// Fold the content region and attach all interactive components.
    pub fn attach<S: Surface>(surface: &mut S, config: &Config) -> Self {
        let doc = surface.document_mut();
        let region = fold::locate_region(doc);
        let sections = fold::fold(doc, region, &FoldOptions::from_config(config));
        let section_widgets = sections
            .sections
            .iter()
            .filter_map(|s| doc.closest(s.heading, |el| el.tag == "details"))
            .collect();

        let root = doc.root();
        let policy = ZoomPolicy::from_config(config);
        let viewports: Vec<ViewportController> = doc
            .find_all(root, |el| el.tag == "img" && el.attr(ZOOMABLE_ATTR).is_some())
            .into_iter()
            .map(|img| ViewportController::attach(doc, img, policy))
            .collect();
        let models: Vec<ModelViewerAdapter> = doc
            .find_all(root, |el| el.tag == model_viewer::WIDGET_TAG)
            .into_iter()
            .map(|widget| ModelViewerAdapter::attach(doc, widget))
            .collect();
        let tabs = TabSwitcher::discover(doc, root);

        log::debug!(
            "attached {} sections, {} viewports, {} models, {} tabs",
            sections.len(),
            viewports.len(),
            models.len(),
            tabs.as_ref().map_or(0, TabSwitcher::len)
        );

        Self {
            sections,
            section_widgets,
            viewports,
            models,
            tabs,
            captures: HashMap::new(),
        }
    }

    #[must_use]
    /// The folding plan that was applied.
    pub fn sections(&self) -> &FoldPlan {
        &self.sections
    }

    #[must_use]
    /// Disclosure widgets, in plan order.
    pub fn section_widgets(&self) -> &[NodeId] {
        &self.section_widgets
    }

    #[must_use]
    /// Attached viewports, in document order.
    pub fn viewports(&self) -> &[ViewportController] {
        &self.viewports
    }

    #[must_use]
    /// Attached model adapters, in document order.
    pub fn models(&self) -> &[ModelViewerAdapter] {
        &self.models
    }

    #[must_use]
    /// The tab switcher, if the page has tabs.
    pub fn tabs(&self) -> Option<&TabSwitcher> {
        self.tabs.as_ref()
    }

    #[must_use]
    /// Current state of every component.
    pub fn snapshot(&self, doc: &Document) -> PageSnapshot {
        PageSnapshot {
            sections_open: self
                .section_widgets
                .iter()
                .map(|&w| fold::is_open(doc, w))
                .collect(),
            viewports: self.viewports.iter().map(ViewportController::state).collect(),
            models: self.models.iter().map(ModelViewerAdapter::state).collect(),
            active_tab: self.tabs.as_ref().and_then(TabSwitcher::active).map(|(b, _)| b),
        }
    }

    /// Route `event` to the component that owns it, then deliver any fullscreen change.
    ///
    /// Fullscreen changes the host made on its own are delivered first, so a toggle always
    /// acts on the host's current mode.
    pub fn dispatch<S: Surface>(&mut self, surface: &mut S, event: PageEvent) -> Outcome {
        self.sync_fullscreen(surface);
        let outcome = match event {
            PageEvent::Click { target } => self.click(surface, target),
            PageEvent::Wheel { target, delta_y } => {
                match self.viewport_frame_at(surface.document(), target) {
                    Some(i) => {
                        let prevented =
                            self.viewports[i].dispatch(ViewportEvent::Wheel { delta_y }, surface);
                        Outcome {
                            handled: true,
                            default_prevented: prevented,
                        }
                    }
                    None => Outcome::default(),
                }
            }
            PageEvent::PointerDown {
                target,
                pointer,
                at,
            } => match self.viewport_frame_at(surface.document(), target) {
                Some(i) => {
                    self.captures.retain(|_, owner| *owner != i);
                    self.captures.insert(pointer, i);
                    self.viewports[i].dispatch(ViewportEvent::PointerDown { pointer, at }, surface);
                    Outcome::PREVENTED
                }
                None => Outcome::default(),
            },
            PageEvent::PointerMove { pointer, at } => match self.captures.get(&pointer) {
                Some(&i) => {
                    self.viewports[i].dispatch(ViewportEvent::PointerMove { pointer, at }, surface);
                    Outcome::HANDLED
                }
                None => Outcome::default(),
            },
            PageEvent::PointerUp { pointer } => match self.captures.remove(&pointer) {
                Some(i) => {
                    self.viewports[i].dispatch(ViewportEvent::PointerUp { pointer }, surface);
                    Outcome::HANDLED
                }
                None => Outcome::default(),
            },
            PageEvent::ModelLoad { target } => self.model_event(surface, target, ModelEvent::Load),
            PageEvent::ModelError { target, detail } => {
                self.model_event(surface, target, ModelEvent::Error(detail))
            }
        };
        self.sync_fullscreen(surface);
        outcome
    }

    fn click<S: Surface>(&mut self, surface: &mut S, target: NodeId) -> Outcome {
        if let Some((button, action)) = controls::action_at(surface.document(), target) {
            let owns = |bar: &controls::ControlBar| bar.buttons.iter().any(|&(_, b)| b == button);
            if let Some(v) = self.viewports.iter_mut().find(|v| owns(&v.controls)) {
                if let Some(event) = ViewportController::event_for(action) {
                    v.dispatch(event, surface);
                    return Outcome::HANDLED;
                }
            }
            if let Some(m) = self.models.iter_mut().find(|m| owns(&m.controls)) {
                if let Some(event) = ModelViewerAdapter::event_for(action) {
                    m.dispatch(event, surface);
                    return Outcome::HANDLED;
                }
            }
        }

        if let Some(tabs) = self.tabs.as_mut() {
            if let Some(index) = tabs.button_index(surface.document(), target) {
                tabs.select(surface.document_mut(), index);
                return Outcome::HANDLED;
            }
        }

        let doc = surface.document();
        let widget = doc
            .closest(target, |el| el.tag == "summary")
            .and_then(|summary| doc.parent(summary))
            .filter(|&p| doc.tag(p) == Some("details"));
        if let Some(widget) = widget {
            fold::toggle(surface.document_mut(), widget);
            return Outcome::HANDLED;
        }

        Outcome::default()
    }

    fn viewport_frame_at(&self, doc: &Document, target: NodeId) -> Option<usize> {
        self.viewports
            .iter()
            .position(|v| doc.contains(v.viewport, target))
    }

    fn model_event<S: Surface>(
        &mut self,
        surface: &mut S,
        target: NodeId,
        event: ModelEvent,
    ) -> Outcome {
        match self.models.iter_mut().find(|m| m.widget == target) {
            Some(adapter) => {
                adapter.dispatch(event, surface);
                Outcome::HANDLED
            }
            None => Outcome::default(),
        }
    }

    fn sync_fullscreen<S: Surface>(&mut self, surface: &mut S) {
        let current = surface.fullscreen_element();
        for v in &mut self.viewports {
            let on = current == Some(v.container);
            if v.state().fullscreen != on {
                v.dispatch(ViewportEvent::FullscreenChanged(on), surface);
            }
        }
        for m in &mut self.models {
            let on = current == Some(m.container);
            if m.state().fullscreen != on {
                m.dispatch(ModelEvent::FullscreenChanged(on), surface);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/page.rs"]
mod tests;
