//! Error types for editing operations.
//!
//! Every variant describes why an operation was a no-op. An `Err` from a
//! store operation always means the document and its history are untouched.

use thiserror::Error;

use crate::{ElementId, SlideId};

/// Result type for editing operations.
pub type EditResult<T> = Result<T, EditError>;

/// Reasons an editing operation was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    /// Slide not found in the document.
    #[error("Slide not found: {0}")]
    SlideNotFound(SlideId),

    /// Element not found in the slide.
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    /// The document must keep at least one slide.
    #[error("Cannot delete the last remaining slide")]
    LastSlide,

    /// An element with this id already lives in the slide.
    #[error("Duplicate element id: {0}")]
    DuplicateElement(ElementId),

    /// The operation needs a selected element.
    #[error("No element is selected")]
    NothingSelected,

    /// The operation does not apply to this kind of element.
    #[error("Operation not supported for {kind} element")]
    UnsupportedKind {
        /// Kind of the targeted element.
        kind: &'static str,
    },

    /// Width and height must both be positive and finite.
    #[error("Invalid size: {width}x{height}")]
    InvalidSize {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },

    /// A coordinate or angle was NaN or infinite.
    #[error("Non-finite value for {0}")]
    NonFinite(&'static str),

    /// Unknown shape tag.
    #[error("Unknown shape: {0}")]
    UnknownShape(String),
}

