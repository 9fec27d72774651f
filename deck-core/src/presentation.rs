//! Slideshow playback.
//!
//! The controller only reads the document. It stores a raw position and
//! clamps it against the current slide count on every read, so slides
//! deleted mid-show never leave it pointing past the end.

use std::fmt;

use serde::Serialize;

use crate::{Document, Slide};

/// Whether a slideshow is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PresentationState {
    /// Editing; no slideshow.
    #[default]
    Idle,
    /// Showing slides full screen.
    Presenting {
        /// Index into the document's slides.
        position: usize,
    },
}

/// "n / total" progress through a slideshow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// One-based number of the slide on screen.
    pub current: usize,
    /// Number of slides.
    pub total: usize,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.current, self.total)
    }
}

/// Drives a slideshow over a [`Document`].
#[derive(Debug, Clone, Default)]
pub struct PresentationController {
    state: PresentationState,
}

impl PresentationController {
    /// Create an idle controller.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: PresentationState::Idle,
        }
    }

    /// Current state with the position clamped to `doc`.
    #[must_use]
    pub fn state(&self, doc: &Document) -> PresentationState {
        match self.position(doc) {
            Some(position) => PresentationState::Presenting { position },
            None => PresentationState::Idle,
        }
    }

    /// Check if a slideshow is running.
    #[must_use]
    pub const fn is_presenting(&self) -> bool {
        matches!(self.state, PresentationState::Presenting { .. })
    }

    /// Start from the first slide.
    pub fn start(&mut self) {
        self.start_at(0, usize::MAX);
    }

    /// Start from `index`, clamped to `slide_count`.
    pub fn start_at(&mut self, index: usize, slide_count: usize) {
        let position = index.min(slide_count.saturating_sub(1));
        self.state = PresentationState::Presenting { position };
        tracing::info!(position, "Presentation started");
    }

    /// Advance one slide. Returns `false` at the last slide or when idle.
    pub fn next(&mut self, doc: &Document) -> bool {
        let Some(position) = self.position(doc) else {
            return false;
        };
        if position + 1 >= doc.slide_count() {
            return false;
        }
        self.state = PresentationState::Presenting {
            position: position + 1,
        };
        true
    }

    /// Go back one slide. Returns `false` at the first slide or when idle.
    pub fn prev(&mut self, doc: &Document) -> bool {
        let Some(position) = self.position(doc) else {
            return false;
        };
        if position == 0 {
            return false;
        }
        self.state = PresentationState::Presenting {
            position: position - 1,
        };
        true
    }

    /// Stop the slideshow.
    pub fn exit(&mut self) {
        if self.is_presenting() {
            tracing::info!("Presentation exited");
        }
        self.state = PresentationState::Idle;
    }

    /// Index of the slide on screen, or `None` when idle.
    #[must_use]
    pub fn position(&self, doc: &Document) -> Option<usize> {
        match self.state {
            PresentationState::Presenting { position } => {
                Some(position.min(doc.slide_count().saturating_sub(1)))
            }
            PresentationState::Idle => None,
        }
    }

    /// The slide on screen.
    #[must_use]
    pub fn current_slide<'a>(&self, doc: &'a Document) -> Option<&'a Slide> {
        doc.slide_at(self.position(doc)?)
    }

    /// Progress through the show.
    #[must_use]
    pub fn progress(&self, doc: &Document) -> Option<Progress> {
        Some(Progress {
            current: self.position(doc)? + 1,
            total: doc.slide_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocumentStore;

    fn store_with_slides(n: usize) -> DocumentStore {
        let mut store = DocumentStore::new();
        for _ in 1..n {
            store.add_slide();
        }
        store
    }

    #[test]
    fn test_idle_by_default() {
        let store = store_with_slides(2);
        let show = PresentationController::new();
        assert!(!show.is_presenting());
        assert_eq!(show.state(store.document()), PresentationState::Idle);
        assert!(show.current_slide(store.document()).is_none());
        assert!(show.progress(store.document()).is_none());
    }

    #[test]
    fn test_start_at_first_slide() {
        let store = store_with_slides(3);
        let mut show = PresentationController::new();
        show.start();
        assert_eq!(show.position(store.document()), Some(0));
        assert_eq!(
            show.current_slide(store.document()).map(|s| s.title.as_str()),
            Some("Slide 1")
        );
    }

    #[test]
    fn test_next_prev_clamp_without_wrap() {
        let store = store_with_slides(3);
        let doc = store.document();
        let mut show = PresentationController::new();
        show.start();

        assert!(!show.prev(doc));
        assert!(show.next(doc));
        assert!(show.next(doc));
        assert!(!show.next(doc));
        assert_eq!(show.position(doc), Some(2));
        assert!(show.prev(doc));
        assert_eq!(show.position(doc), Some(1));
    }

    #[test]
    fn test_navigation_while_idle_is_noop() {
        let store = store_with_slides(2);
        let mut show = PresentationController::new();
        assert!(!show.next(store.document()));
        assert!(!show.prev(store.document()));
        assert!(!show.is_presenting());
    }

    #[test]
    fn test_exit_leaves_document_untouched() {
        let store = store_with_slides(2);
        let before = store.document().clone();
        let mut show = PresentationController::new();
        show.start();
        show.next(store.document());
        show.exit();
        assert!(!show.is_presenting());
        assert_eq!(store.document(), &before);
    }

    #[test]
    fn test_position_reclamped_after_delete() {
        let mut store = store_with_slides(3);
        let mut show = PresentationController::new();
        show.start_at(2, store.document().slide_count());

        let last = store.document().slide_at(2).expect("slide").id();
        store.delete_slide(last).expect("delete");
        assert_eq!(show.position(store.document()), Some(1));
        assert!(!show.next(store.document()));
    }

    #[test]
    fn test_progress_display() {
        let store = store_with_slides(5);
        let mut show = PresentationController::new();
        show.start_at(2, 5);
        let progress = show.progress(store.document()).expect("presenting");
        assert_eq!(progress.to_string(), "3 / 5");
    }
}
