//! The host the page components write their effects to.
//!
//! Controllers never touch the platform directly: they compute effects, and those effects are
//! applied against a [`Surface`]. In a browser the surface would be the live DOM and the
//! Fullscreen API; [`HeadlessSurface`] is the in-process host used by the CLI and the tests.

use crate::dom::{Document, NodeId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// A request the host refused.
pub enum PlatformError {
    /// The host denied the request, e.g. because it was not triggered by a user gesture.
    #[error("request denied: {0}")]
    Denied(String),
    /// The host has no fullscreen support at all.
    #[error("fullscreen is not supported")]
    Unsupported,
}

/// Document plus the platform services the components rely on.
pub trait Surface {
    /// The rendered document.
    fn document(&self) -> &Document;

    /// The rendered document, for writing effects.
    fn document_mut(&mut self) -> &mut Document;

    /// Ask the host to present `node` full-frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses.
    fn request_fullscreen(&mut self, node: NodeId) -> Result<(), PlatformError>;

    /// Ask the host to leave full-frame presentation.
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses.
    fn exit_fullscreen(&mut self) -> Result<(), PlatformError>;

    /// The node currently presented full-frame, if any.
    fn fullscreen_element(&self) -> Option<NodeId>;
}

#[derive(Clone, Debug)]
/// In-memory host: a [`Document`] and a fullscreen slot.
pub struct HeadlessSurface {
    document: Document,
    fullscreen: Option<NodeId>,
    fullscreen_allowed: bool,
}

impl HeadlessSurface {
    #[must_use]
    /// Host over `document` that grants fullscreen requests.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            fullscreen: None,
            fullscreen_allowed: true,
        }
    }

    /// Grant or refuse later fullscreen requests.
    pub fn set_fullscreen_allowed(&mut self, allowed: bool) {
        self.fullscreen_allowed = allowed;
    }

    #[must_use]
    /// Give the document back.
    pub fn into_document(self) -> Document {
        self.document
    }
}

impl Surface for HeadlessSurface {
    fn document(&self) -> &Document {
        &self.document
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    fn request_fullscreen(&mut self, node: NodeId) -> Result<(), PlatformError> {
        if !self.fullscreen_allowed {
            return Err(PlatformError::Denied(
                "fullscreen is disabled on this host".to_string(),
            ));
        }
        self.fullscreen = Some(node);
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> Result<(), PlatformError> {
        if self.fullscreen.take().is_none() {
            return Err(PlatformError::Denied("not in fullscreen".to_string()));
        }
        Ok(())
    }

    fn fullscreen_element(&self) -> Option<NodeId> {
        self.fullscreen
    }
}
