//! Zoom, pan and fullscreen for one zoomable image.
//!
//! The state machine is a reducer: [`ViewportState::reduce`] takes an event and returns the next
//! state plus the effects to apply. [`ViewportController`] owns one state per image and applies
//! those effects to a [`Surface`]. Pan state lives in the instance itself, keyed by the pointer
//! that started the drag, so two viewports never share a drag.
//!
//! ```text
//! Idle --PointerDown--> Panning --PointerUp--> Idle
//!           ^                |
//!           |__PointerMove___|   (same pointer only)
//! ```
//!
//! Fullscreen is a separate flag, not a state of its own.

use crate::config::Config;
use crate::controls::{Action, ControlBar};
use crate::dom::{Document, NodeId};
use crate::surface::Surface;
use serde::{Deserialize, Serialize};

/// Class of the element wrapping a controlled image and its control bar.
pub const CONTAINER_CLASS: &str = "zoom-container";
/// Class of the clipping frame the image moves inside.
pub const VIEWPORT_CLASS: &str = "zoom-viewport";
/// Class of the viewport control bar.
pub const CONTROLS_CLASS: &str = "zoom-controls";
/// Attribute marking an image for viewport control.
pub const ZOOMABLE_ATTR: &str = "data-zoomable";

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
/// Scale bounds and step factors.
pub struct ZoomPolicy {
    /// Smallest allowed scale.
    pub min_scale: f64,
    /// Largest allowed scale.
    pub max_scale: f64,
    /// Factor the zoom buttons multiply or divide by.
    pub button_factor: f64,
    /// Factor for a wheel step away from the reader (zoom in).
    pub wheel_in: f64,
    /// Factor for a wheel step towards the reader (zoom out).
    pub wheel_out: f64,
}

impl Default for ZoomPolicy {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 5.0,
            button_factor: 1.2,
            wheel_in: 1.1,
            wheel_out: 0.9,
        }
    }
}

impl ZoomPolicy {
    #[must_use]
    /// Policy taken from the site configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            button_factor: config.button_zoom_factor,
            wheel_in: config.wheel_zoom_in,
            wheel_out: config.wheel_zoom_out,
        }
    }

    #[must_use]
    /// `scale` forced into the allowed range.
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
/// A position or displacement in CSS pixels.
pub struct Point {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Point {
    /// `(0, 0)`.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    /// Point from its components.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Identifies one pointer (mouse, pen, or touch contact) for the duration of a press.
pub struct PointerId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
/// Whether a drag is in progress.
pub enum PanMode {
    /// No drag.
    Idle,
    /// A drag started by `pointer`; `origin` is the pointer position minus the offset at press.
    Panning {
        /// Pointer that owns the drag.
        pointer: PointerId,
        /// Anchor such that `offset = pointer position - origin`.
        origin: Point,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
/// Everything one viewport knows.
pub struct ViewportState {
    /// Zoom factor, always inside the policy bounds.
    pub scale: f64,
    /// Translation in un-scaled pixels.
    pub offset: Point,
    /// Drag state.
    pub mode: PanMode,
    /// Whether the host reports this viewport as full-frame.
    pub fullscreen: bool,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Point::ORIGIN,
            mode: PanMode::Idle,
            fullscreen: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Input a viewport reacts to.
pub enum ViewportEvent {
    /// Zoom button pressed.
    ZoomIn,
    /// Zoom-out button pressed.
    ZoomOut,
    /// Wheel scrolled over the viewport; negative `delta_y` scrolls up.
    Wheel {
        /// Vertical wheel delta.
        delta_y: f64,
    },
    /// Reset button pressed.
    Reset,
    /// A pointer pressed on the image.
    PointerDown {
        /// Pressing pointer.
        pointer: PointerId,
        /// Pointer position.
        at: Point,
    },
    /// A pointer moved.
    PointerMove {
        /// Moving pointer.
        pointer: PointerId,
        /// Pointer position.
        at: Point,
    },
    /// A pointer was released.
    PointerUp {
        /// Released pointer.
        pointer: PointerId,
    },
    /// Fullscreen button pressed.
    ToggleFullscreen,
    /// The host entered or left full-frame presentation of this viewport.
    FullscreenChanged(bool),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
/// Translation followed by scaling, always written together.
pub struct Transform {
    /// Translation in pixels.
    pub translate: Point,
    /// Scale factor.
    pub scale: f64,
}

impl Transform {
    #[must_use]
    /// CSS `transform` value.
    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.translate.x, self.translate.y, self.scale
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
/// Pointer feedback over the image.
pub enum Cursor {
    /// Not pannable.
    Default,
    /// Pannable.
    Grab,
    /// Being dragged.
    Grabbing,
}

impl Cursor {
    #[must_use]
    /// CSS `cursor` value.
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Work a state change asks the surface to do.
pub enum Effect {
    /// Write the combined transform and cursor.
    Render {
        /// New transform.
        transform: Transform,
        /// New cursor feedback.
        cursor: Cursor,
    },
    /// Suppress the event's default action (page scroll).
    PreventDefault,
    /// Ask the host for full-frame presentation.
    RequestFullscreen,
    /// Ask the host to leave full-frame presentation.
    ExitFullscreen,
    /// Reflect the fullscreen flag in markup.
    MarkFullscreen(bool),
}

impl ViewportState {
    #[must_use]
    /// Whether a drag is in progress.
    pub fn is_panning(&self) -> bool {
        matches!(self.mode, PanMode::Panning { .. })
    }

    #[must_use]
    /// Transform for the current scale and offset.
    pub fn transform(&self) -> Transform {
        Transform {
            translate: self.offset,
            scale: self.scale,
        }
    }

    #[must_use]
    /// Pan feedback: only shown once the image is larger than its frame.
    pub fn cursor(&self) -> Cursor {
        match (self.scale > 1.0, self.is_panning()) {
            (false, _) => Cursor::Default,
            (true, false) => Cursor::Grab,
            (true, true) => Cursor::Grabbing,
        }
    }

    #[must_use]
    /// Next state and effects for `event`.
    pub fn reduce(self, event: ViewportEvent, policy: &ZoomPolicy) -> (Self, Vec<Effect>) {
        let mut next = self;
        let mut effects = Vec::new();

        match event {
            ViewportEvent::ZoomIn => next.scale = policy.clamp(self.scale * policy.button_factor),
            ViewportEvent::ZoomOut => next.scale = policy.clamp(self.scale / policy.button_factor),
            ViewportEvent::Wheel { delta_y } => {
                effects.push(Effect::PreventDefault);
                let factor = if delta_y < 0.0 {
                    policy.wheel_in
                } else {
                    policy.wheel_out
                };
                next.scale = policy.clamp(self.scale * factor);
            }
            ViewportEvent::Reset => {
                next.scale = 1.0;
                next.offset = Point::ORIGIN;
                next.mode = PanMode::Idle;
            }
            ViewportEvent::PointerDown { pointer, at } => {
                next.mode = PanMode::Panning {
                    pointer,
                    origin: Point::new(at.x - self.offset.x, at.y - self.offset.y),
                };
            }
            ViewportEvent::PointerMove { pointer, at } => match self.mode {
                PanMode::Panning { pointer: owner, origin } if owner == pointer => {
                    next.offset = Point::new(at.x - origin.x, at.y - origin.y);
                }
                _ => return (self, effects),
            },
            ViewportEvent::PointerUp { .. } => next.mode = PanMode::Idle,
            ViewportEvent::ToggleFullscreen => {
                effects.push(if self.fullscreen {
                    Effect::ExitFullscreen
                } else {
                    Effect::RequestFullscreen
                });
                return (next, effects);
            }
            ViewportEvent::FullscreenChanged(on) => {
                next.fullscreen = on;
                effects.push(Effect::MarkFullscreen(on));
                return (next, effects);
            }
        }

        if next.transform() != self.transform() || next.cursor() != self.cursor() {
            effects.push(Effect::Render {
                transform: next.transform(),
                cursor: next.cursor(),
            });
        }
        (next, effects)
    }
}

#[derive(Clone, Debug)]
/// One zoomable image, its generated frame and controls, and its state.
pub struct ViewportController {
    /// Wrapper holding the frame and the control bar; the fullscreen target.
    pub container: NodeId,
    /// Clipping frame around the image.
    pub viewport: NodeId,
    /// The controlled image.
    pub image: NodeId,
    /// Generated buttons.
    pub controls: ControlBar,
    state: ViewportState,
    policy: ZoomPolicy,
}

impl ViewportController {
    /// Wrap `image` in a frame and control bar and write the initial transform.
    ///
    /// The container takes the image's place in the document.
    pub fn attach(doc: &mut Document, image: NodeId, policy: ZoomPolicy) -> Self {
        let container = doc.create_element("div");
        doc.add_class(container, CONTAINER_CLASS);
        let viewport = doc.create_element("div");
        doc.add_class(viewport, VIEWPORT_CLASS);
        let controls = ControlBar::build(
            doc,
            CONTROLS_CLASS,
            &[Action::ZoomIn, Action::ZoomOut, Action::Reset, Action::Fullscreen],
        );

        doc.insert_before(image, container);
        doc.append_child(container, viewport);
        doc.append_child(container, controls.bar);
        doc.append_child(viewport, image);

        let controller = Self {
            container,
            viewport,
            image,
            controls,
            state: ViewportState::default(),
            policy,
        };
        controller.render(doc);
        controller
    }

    #[must_use]
    /// Current state.
    pub fn state(&self) -> ViewportState {
        self.state
    }

    #[must_use]
    /// Event a control button maps to; `None` for actions a viewport does not have.
    pub fn event_for(action: Action) -> Option<ViewportEvent> {
        match action {
            Action::ZoomIn => Some(ViewportEvent::ZoomIn),
            Action::ZoomOut => Some(ViewportEvent::ZoomOut),
            Action::Reset => Some(ViewportEvent::Reset),
            Action::Fullscreen => Some(ViewportEvent::ToggleFullscreen),
            Action::Rotate => None,
        }
    }

    /// Feed `event` through the reducer and apply its effects. Returns whether the event's
    /// default action should be prevented.
    pub fn dispatch<S: Surface>(&mut self, event: ViewportEvent, surface: &mut S) -> bool {
        let (next, effects) = self.state.reduce(event, &self.policy);
        self.state = next;
        let mut prevent_default = false;
        for effect in effects {
            match effect {
                Effect::Render { transform, cursor } => {
                    self.write(surface.document_mut(), transform, cursor);
                }
                Effect::PreventDefault => prevent_default = true,
                Effect::RequestFullscreen => {
                    if let Err(e) = surface.request_fullscreen(self.container) {
                        log::warn!("viewport fullscreen request failed: {e}");
                    }
                }
                Effect::ExitFullscreen => {
                    if let Err(e) = surface.exit_fullscreen() {
                        log::warn!("viewport fullscreen exit failed: {e}");
                    }
                }
                Effect::MarkFullscreen(on) => {
                    surface
                        .document_mut()
                        .set_class(self.container, "is-fullscreen", on);
                }
            }
        }
        prevent_default
    }

    fn render(&self, doc: &mut Document) {
        self.write(doc, self.state.transform(), self.state.cursor());
    }

    fn write(&self, doc: &mut Document, transform: Transform, cursor: Cursor) {
        doc.set_style(self.image, "transform", &transform.to_css());
        doc.set_style(self.image, "cursor", cursor.as_css());
        doc.set_class(self.viewport, "can-pan", cursor != Cursor::Default);
        doc.set_class(self.viewport, "is-panning", cursor == Cursor::Grabbing);
    }
}

#[cfg(test)]
#[path = "tests/viewport.rs"]
mod tests;
