//! # Deck Core
//!
//! Editing core for a slide deck editor: slides, elements, undo/redo and
//! slideshow playback. Compiles to WASM for the browser editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  Session                    │
//! ├─────────────────────────────────────────────┤
//! │  DocumentStore     │  PresentationController│
//! │  - Slides          │  - Idle / Presenting   │
//! │  - Elements        │  - Next / Prev / Exit  │
//! │  - Selection       │                        │
//! ├─────────────────────────────────────────────┤
//! │  History           │  Commands              │
//! │  - Snapshots       │  - Key chords          │
//! │  - Undo / Redo     │  - View settings       │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod command;
pub mod config;
pub mod document;
pub mod element;
pub mod error;
pub mod history;
pub mod presentation;
pub mod session;
pub mod slide;
pub mod store;
pub mod style;

#[cfg(feature = "images")]
pub mod ingest;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use command::{resolve, Command, KeyChord, KeyContext, KeyModifiers};
pub use config::{ConfigError, EditorConfig};
pub use document::{Document, Snapshot};
pub use element::{
    fit_within, Animation, AnimationKind, Element, ElementId, ElementKind, ShapeKind, Transform,
};
pub use error::{EditError, EditResult};
pub use history::History;
pub use presentation::{PresentationController, PresentationState, Progress};
pub use session::{Session, ViewSettings};
pub use slide::{Layout, Slide, SlideId, Transition, TransitionKind, ZOrder};
pub use store::DocumentStore;
pub use style::{
    Color, ColorParseError, FontStyle, FontWeight, ResolvedStyle, Style, TextAlign,
    TextDecoration,
};

#[cfg(feature = "images")]
pub use ingest::{DecodedImage, ImageFile, ImageFormat, IngestError};

/// Deck core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
