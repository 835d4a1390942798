//! Event scripts replay recorded input against an attached page.
//!
//! A script names components by their index on the page (viewports, models and sections in
//! document order) rather than by node, so the same script can be written by hand and applied to
//! any freshly attached page. Replaying produces a trace of every component's state after each
//! event.

use crate::controls::Action;
use crate::error::{Error, Result};
use crate::page::{Outcome, Page, PageEvent, PageSnapshot};
use crate::surface::Surface;
use crate::viewport::{Point, PointerId};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
/// Ordered input to replay against a page.
pub struct Script {
    /// Events, applied in order.
    pub events: Vec<ScriptEvent>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// One scripted input, addressed by component index.
pub enum ScriptEvent {
    /// Press a viewport control button.
    Viewport {
        /// Viewport index.
        index: usize,
        /// Button to press.
        action: Action,
    },
    /// Press a model control button.
    Model {
        /// Model index.
        index: usize,
        /// Button to press.
        action: Action,
    },
    /// Scroll the wheel over a viewport.
    Wheel {
        /// Viewport index.
        viewport: usize,
        /// Vertical wheel delta.
        delta_y: f64,
    },
    /// Press a pointer on a viewport's image.
    PointerDown {
        /// Viewport index.
        viewport: usize,
        /// Pointer id.
        pointer: u32,
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// Move a pointer.
    PointerMove {
        /// Pointer id.
        pointer: u32,
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// Release a pointer.
    PointerUp {
        /// Pointer id.
        pointer: u32,
    },
    /// A model finished loading.
    ModelLoad {
        /// Model index.
        model: usize,
    },
    /// A model failed to load.
    ModelError {
        /// Model index.
        model: usize,
        /// Host diagnostic.
        message: String,
    },
    /// Click a tab button.
    Tab {
        /// Tab button index.
        index: usize,
    },
    /// Click a section's summary.
    ToggleSection {
        /// Section index in plan order.
        section: usize,
    },
}

impl ScriptEvent {
    /// The page event this step delivers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTarget`] if the page has no component at the named index, or the
    /// component has no button for the named action.
    pub fn resolve(&self, page: &Page) -> Result<PageEvent> {
        let missing = |kind, index| Error::MissingTarget { kind, index };
        let viewport = |index: usize| page.viewports().get(index).ok_or(missing("viewport", index));
        let model = |index: usize| page.models().get(index).ok_or(missing("model", index));

        Ok(match *self {
            Self::Viewport { index, action } => PageEvent::Click {
                target: viewport(index)?
                    .controls
                    .button(action)
                    .ok_or(missing("viewport control", index))?,
            },
            Self::Model { index, action } => PageEvent::Click {
                target: model(index)?
                    .controls
                    .button(action)
                    .ok_or(missing("model control", index))?,
            },
            Self::Wheel { viewport: v, delta_y } => PageEvent::Wheel {
                target: viewport(v)?.image,
                delta_y,
            },
            Self::PointerDown {
                viewport: v,
                pointer,
                x,
                y,
            } => PageEvent::PointerDown {
                target: viewport(v)?.image,
                pointer: PointerId(pointer),
                at: Point::new(x, y),
            },
            Self::PointerMove { pointer, x, y } => PageEvent::PointerMove {
                pointer: PointerId(pointer),
                at: Point::new(x, y),
            },
            Self::PointerUp { pointer } => PageEvent::PointerUp {
                pointer: PointerId(pointer),
            },
            Self::ModelLoad { model: m } => PageEvent::ModelLoad {
                target: model(m)?.widget,
            },
            Self::ModelError {
                model: m,
                ref message,
            } => PageEvent::ModelError {
                target: model(m)?.widget,
                detail: message.clone(),
            },
            Self::Tab { index } => PageEvent::Click {
                target: page
                    .tabs()
                    .and_then(|t| t.button(index))
                    .ok_or(missing("tab", index))?,
            },
            Self::ToggleSection { section } => PageEvent::Click {
                target: page
                    .sections()
                    .sections
                    .get(section)
                    .map(|s| s.heading)
                    .ok_or(missing("section", section))?,
            },
        })
    }
}

impl Script {
    /// Parse a script from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a script.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
/// Page state before and after each replayed event.
pub struct Trace {
    /// State right after attachment.
    pub initial: PageSnapshot,
    /// One entry per event.
    pub steps: Vec<TraceStep>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
/// Result of one replayed event.
pub struct TraceStep {
    /// The scripted event.
    pub event: ScriptEvent,
    /// What dispatching it did.
    pub outcome: Outcome,
    /// State afterwards.
    pub snapshot: PageSnapshot,
}

/// Apply every event in `script` to `page`, recording the state after each.
///
/// Resolution happens step by step, so an event may address a component only after earlier
/// events have changed the page.
///
/// # Errors
///
/// Returns [`Error::MissingTarget`] at the first event naming a component the page lacks.
pub fn replay<S: Surface>(page: &mut Page, surface: &mut S, script: &Script) -> Result<Trace> {
    let initial = page.snapshot(surface.document());
    let mut steps = Vec::with_capacity(script.events.len());
    for event in &script.events {
        let resolved = event.resolve(page)?;
        log::debug!("replaying {event:?}");
        let outcome = page.dispatch(surface, resolved);
        steps.push(TraceStep {
            event: event.clone(),
            outcome,
            snapshot: page.snapshot(surface.document()),
        });
    }
    Ok(Trace { initial, steps })
}

#[cfg(test)]
#[path = "tests/script.rs"]
mod tests;
