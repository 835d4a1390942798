//! Controls and load lifecycle for embedded 3D-model widgets.
//!
//! ```text
//! Loading --Load--> Loaded
//!    |
//!    +----Error---> Failed   (terminal, no retry)
//! ```
//!
//! Auto-rotate and fullscreen are independent flags. A widget that never reports success or
//! failure stays in `Loading`: there is deliberately no timeout.

use crate::controls::{Action, ControlBar};
use crate::dom::{Document, NodeId};
use crate::surface::Surface;
use serde::Serialize;

/// Tag of the model widget element.
pub const WIDGET_TAG: &str = "model-viewer";
/// Class of the element wrapping a widget and its controls.
pub const CONTAINER_CLASS: &str = "model-container";
/// Class of the model control bar.
pub const CONTROLS_CLASS: &str = "model-controls";
/// Class of the panel shown in place of a widget that failed to load.
pub const ERROR_CLASS: &str = "model-error";
/// Camera orbit the widget returns to on reset.
pub const DEFAULT_CAMERA_ORBIT: &str = "0deg 75deg 105%";
/// Message shown to readers when a model cannot be loaded.
pub const LOAD_FAILURE_MESSAGE: &str =
    "This 3D model could not be loaded. Try reloading the page.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
/// Load lifecycle of a widget.
pub enum LoadState {
    /// Asset requested, no outcome yet.
    Loading,
    /// Asset loaded and rendering.
    Loaded,
    /// Asset failed; the widget is hidden for good.
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
/// Everything one adapter knows.
pub struct ModelState {
    /// Load lifecycle.
    pub load: LoadState,
    /// Whether the widget spins on its own.
    pub auto_rotate: bool,
    /// Whether the host reports this widget as full-frame.
    pub fullscreen: bool,
}

impl Default for ModelState {
    fn default() -> Self {
        Self {
            load: LoadState::Loading,
            auto_rotate: false,
            fullscreen: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Input a model adapter reacts to.
pub enum ModelEvent {
    /// The widget finished loading.
    Load,
    /// The widget failed to load, with the host's diagnostic.
    Error(String),
    /// Reset button pressed.
    ResetCamera,
    /// Rotate button pressed.
    ToggleAutoRotate,
    /// Fullscreen button pressed.
    ToggleFullscreen,
    /// The host entered or left full-frame presentation of this widget.
    FullscreenChanged(bool),
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Work a state change asks the surface to do.
pub enum ModelEffect {
    /// Flag the widget as ready.
    MarkReady,
    /// Hide the widget, show the failure panel, log `detail`.
    ShowFailure {
        /// Diagnostic for the log only.
        detail: String,
    },
    /// Send the camera back to its default pose.
    ResetCamera,
    /// Start or stop auto-rotation.
    SetAutoRotate(bool),
    /// Ask the host for full-frame presentation.
    RequestFullscreen,
    /// Ask the host to leave full-frame presentation.
    ExitFullscreen,
    /// Reflect the fullscreen flag in markup.
    MarkFullscreen(bool),
}

impl ModelState {
    #[must_use]
    /// Next state and effects for `event`.
    pub fn reduce(self, event: ModelEvent) -> (Self, Vec<ModelEffect>) {
        let mut next = self;
        let effect = match event {
            ModelEvent::Load if self.load == LoadState::Loading => {
                next.load = LoadState::Loaded;
                ModelEffect::MarkReady
            }
            ModelEvent::Error(detail) if self.load == LoadState::Loading => {
                next.load = LoadState::Failed;
                ModelEffect::ShowFailure { detail }
            }
            ModelEvent::Load | ModelEvent::Error(_) => return (self, Vec::new()),
            ModelEvent::ResetCamera => ModelEffect::ResetCamera,
            ModelEvent::ToggleAutoRotate => {
                next.auto_rotate = !self.auto_rotate;
                ModelEffect::SetAutoRotate(next.auto_rotate)
            }
            ModelEvent::ToggleFullscreen if self.fullscreen => ModelEffect::ExitFullscreen,
            ModelEvent::ToggleFullscreen => ModelEffect::RequestFullscreen,
            ModelEvent::FullscreenChanged(on) => {
                next.fullscreen = on;
                ModelEffect::MarkFullscreen(on)
            }
        };
        (next, vec![effect])
    }
}

#[derive(Clone, Debug)]
/// One model widget, its generated container and controls, and its state.
pub struct ModelViewerAdapter {
    /// Wrapper holding the widget and the control bar; the fullscreen target.
    pub container: NodeId,
    /// The `model-viewer` element.
    pub widget: NodeId,
    /// Generated buttons.
    pub controls: ControlBar,
    state: ModelState,
}

impl ModelViewerAdapter {
    /// Wrap `widget` in a container with a control bar. The container takes the widget's place.
    pub fn attach(doc: &mut Document, widget: NodeId) -> Self {
        let container = doc.create_element("div");
        doc.add_class(container, CONTAINER_CLASS);
        let controls = ControlBar::build(
            doc,
            CONTROLS_CLASS,
            &[Action::Reset, Action::Rotate, Action::Fullscreen],
        );

        doc.insert_before(widget, container);
        doc.append_child(container, widget);
        doc.append_child(container, controls.bar);
        if let Some(rotate) = controls.button(Action::Rotate) {
            doc.set_attr(rotate, "aria-pressed", "false");
        }

        Self {
            container,
            widget,
            controls,
            state: ModelState::default(),
        }
    }

    #[must_use]
    /// Current state.
    pub fn state(&self) -> ModelState {
        self.state
    }

    #[must_use]
    /// Event a control button maps to; `None` for actions a model does not have.
    pub fn event_for(action: Action) -> Option<ModelEvent> {
        match action {
            Action::Reset => Some(ModelEvent::ResetCamera),
            Action::Rotate => Some(ModelEvent::ToggleAutoRotate),
            Action::Fullscreen => Some(ModelEvent::ToggleFullscreen),
            Action::ZoomIn | Action::ZoomOut => None,
        }
    }

    /// Feed `event` through the reducer and apply its effects.
    pub fn dispatch<S: Surface>(&mut self, event: ModelEvent, surface: &mut S) {
        let (next, effects) = self.state.reduce(event);
        self.state = next;
        for effect in effects {
            self.apply(effect, surface);
        }
    }

    fn apply<S: Surface>(&self, effect: ModelEffect, surface: &mut S) {
        match effect {
            ModelEffect::MarkReady => surface.document_mut().add_class(self.widget, "loaded"),
            ModelEffect::ShowFailure { detail } => {
                let src = surface
                    .document()
                    .attr(self.widget, "src")
                    .unwrap_or("<no src>")
                    .to_string();
                log::error!("model {src} failed to load: {detail}");
                let doc = surface.document_mut();
                doc.set_attr(self.widget, "hidden", "");
                let panel = doc.create_element("div");
                doc.add_class(panel, ERROR_CLASS);
                doc.set_attr(panel, "role", "alert");
                let p = doc.create_element("p");
                let text = doc.create_text(LOAD_FAILURE_MESSAGE);
                doc.append_child(p, text);
                doc.append_child(panel, p);
                doc.insert_after(self.widget, panel);
            }
            ModelEffect::ResetCamera => {
                let doc = surface.document_mut();
                doc.set_attr(self.widget, "camera-orbit", DEFAULT_CAMERA_ORBIT);
                doc.set_attr(self.widget, "camera-target", "auto auto auto");
                doc.set_attr(self.widget, "field-of-view", "auto");
            }
            ModelEffect::SetAutoRotate(on) => {
                let doc = surface.document_mut();
                if on {
                    doc.set_attr(self.widget, "auto-rotate", "");
                } else {
                    doc.remove_attr(self.widget, "auto-rotate");
                }
                if let Some(rotate) = self.controls.button(Action::Rotate) {
                    doc.set_class(rotate, "active", on);
                    doc.set_attr(rotate, "aria-pressed", if on { "true" } else { "false" });
                }
            }
            ModelEffect::RequestFullscreen => {
                if let Err(e) = surface.request_fullscreen(self.container) {
                    log::warn!("model fullscreen request failed: {e}");
                }
            }
            ModelEffect::ExitFullscreen => {
                if let Err(e) = surface.exit_fullscreen() {
                    log::warn!("model fullscreen exit failed: {e}");
                }
            }
            ModelEffect::MarkFullscreen(on) => {
                surface
                    .document_mut()
                    .set_class(self.container, "is-fullscreen", on);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/model_viewer.rs"]
mod tests;
