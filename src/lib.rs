//! folio: progressive enhancement for long-form technical pages.
//!
//! A page is parsed into a [`dom::Document`], its content region is folded into collapsible
//! sections, and interactive components are attached to it: zoom/pan viewports for marked
//! images, adapters for 3D model widgets, and a tab switcher. Each component is a reducer over
//! its own state whose effects are applied to a [`surface::Surface`].
#![allow(clippy::multiple_crate_versions)]

pub mod config;
pub mod controls;
pub mod dom;
pub mod error;
pub mod fold;
pub mod formats;
pub mod input;
pub mod model_viewer;
pub mod outline;
pub mod page;
pub mod script;
pub mod section;
pub mod surface;
pub mod tabs;
pub mod ui;
pub mod viewport;

pub use error::{Error, Result};
