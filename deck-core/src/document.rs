//! The document aggregate: slides in presentation order, the active slide
//! and the selected element.
//!
//! Invariants kept by every method here:
//! - there is always at least one slide;
//! - `active_slide` names an existing slide;
//! - `selected_element`, when set, names an element of the active slide.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::error::{EditError, EditResult};
use crate::{Element, ElementId, Slide, SlideId};

/// An immutable copy of the slide sequence, as stored in history.
///
/// Cloning is cheap: slides are shared until the live document edits one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot(Vec<Arc<Slide>>);

impl Snapshot {
    /// Slides in presentation order.
    pub fn slides(&self) -> impl ExactSizeIterator<Item = &Slide> + '_ {
        self.0.iter().map(|slide| &**slide)
    }

    /// Number of slides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the snapshot holds no slides.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Slides plus editing focus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    slides: Vec<Arc<Slide>>,
    #[serde(skip)]
    positions: HashMap<SlideId, usize>,
    active_slide: SlideId,
    selected_element: Option<ElementId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding a single default slide, which is active.
    #[must_use]
    pub fn new() -> Self {
        Self::with_slide(Slide::new(1))
    }

    /// Create a document from one slide.
    #[must_use]
    pub fn with_slide(slide: Slide) -> Self {
        let id = slide.id();
        let mut doc = Self {
            slides: vec![Arc::new(slide)],
            positions: HashMap::new(),
            active_slide: id,
            selected_element: None,
        };
        doc.reindex();
        doc
    }

    /// Slides in presentation order.
    pub fn slides(&self) -> impl ExactSizeIterator<Item = &Slide> + '_ {
        self.slides.iter().map(|slide| &**slide)
    }

    /// Number of slides (never zero).
    #[must_use]
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Get a slide by ID.
    #[must_use]
    pub fn slide(&self, id: SlideId) -> Option<&Slide> {
        self.positions.get(&id).map(|&i| self.slides[i].as_ref())
    }

    /// Get a slide by presentation index.
    #[must_use]
    pub fn slide_at(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index).map(|slide| &**slide)
    }

    /// Presentation index of a slide.
    #[must_use]
    pub fn position_of(&self, id: SlideId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// ID of the slide being edited.
    #[must_use]
    pub const fn active_slide_id(&self) -> SlideId {
        self.active_slide
    }

    /// The slide being edited.
    #[must_use]
    pub fn active_slide(&self) -> &Slide {
        let index = self.positions.get(&self.active_slide).copied().unwrap_or(0);
        &self.slides[index]
    }

    /// ID of the selected element, if any.
    #[must_use]
    pub const fn selected_element_id(&self) -> Option<ElementId> {
        self.selected_element
    }

    /// The selected element, if any.
    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        self.active_slide().element(self.selected_element?)
    }

    /// Find an element on a slide.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::SlideNotFound`] or [`EditError::ElementNotFound`].
    pub fn element(&self, slide: SlideId, element: ElementId) -> EditResult<&Element> {
        self.slide(slide)
            .ok_or(EditError::SlideNotFound(slide))?
            .element(element)
            .ok_or(EditError::ElementNotFound(element))
    }

    /// Capture the slide sequence.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.slides.clone())
    }

    /// Replace the slide sequence with a snapshot.
    ///
    /// The active slide is kept if it still exists, otherwise the first slide
    /// becomes active. The selection is kept only if it is still on the
    /// active slide. An empty snapshot is ignored.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        if snapshot.is_empty() {
            tracing::warn!("Ignoring empty snapshot");
            return;
        }
        self.slides.clone_from(&snapshot.0);
        self.reindex();
        if !self.positions.contains_key(&self.active_slide) {
            self.active_slide = self.slides[0].id();
        }
        self.retain_selection();
    }

    // -----------------------------------------------------------------------
    // Crate-internal mutation, used by the store on a staged copy
    // -----------------------------------------------------------------------

    /// Mutable access to a slide, copying it first if a snapshot shares it.
    pub(crate) fn slide_mut(&mut self, id: SlideId) -> EditResult<&mut Slide> {
        let index = self.position_of(id).ok_or(EditError::SlideNotFound(id))?;
        Ok(Arc::make_mut(&mut self.slides[index]))
    }

    /// Insert a slide at `index` (clamped to the end).
    pub(crate) fn insert_slide(&mut self, index: usize, slide: Slide) {
        let index = index.min(self.slides.len());
        self.slides.insert(index, Arc::new(slide));
        self.reindex();
    }

    /// Remove a slide, moving focus to the first remaining slide if it was
    /// active.
    pub(crate) fn remove_slide(&mut self, id: SlideId) -> EditResult<()> {
        let index = self.position_of(id).ok_or(EditError::SlideNotFound(id))?;
        if self.slides.len() <= 1 {
            return Err(EditError::LastSlide);
        }
        self.slides.remove(index);
        self.reindex();
        if self.active_slide == id {
            self.activate(self.slides[0].id())?;
        }
        Ok(())
    }

    /// Move a slide to a new presentation index (clamped to the end).
    pub(crate) fn move_slide(&mut self, id: SlideId, to: usize) -> EditResult<()> {
        let from = self.position_of(id).ok_or(EditError::SlideNotFound(id))?;
        let slide = self.slides.remove(from);
        let to = to.min(self.slides.len());
        self.slides.insert(to, slide);
        self.reindex();
        Ok(())
    }

    /// Make a slide active. Clears the selection when the slide changes.
    pub(crate) fn activate(&mut self, id: SlideId) -> EditResult<()> {
        if !self.positions.contains_key(&id) {
            return Err(EditError::SlideNotFound(id));
        }
        if self.active_slide != id {
            self.active_slide = id;
            self.selected_element = None;
        }
        Ok(())
    }

    /// Select an element of the active slide, or clear the selection.
    pub(crate) fn select(&mut self, id: Option<ElementId>) -> EditResult<()> {
        if let Some(id) = id {
            if !self.active_slide().contains(id) {
                return Err(EditError::ElementNotFound(id));
            }
        }
        self.selected_element = id;
        Ok(())
    }

    /// Drop the selection if it no longer points into the active slide.
    pub(crate) fn retain_selection(&mut self) {
        if let Some(id) = self.selected_element {
            if !self.active_slide().contains(id) {
                self.selected_element = None;
            }
        }
    }

    fn reindex(&mut self) {
        self.positions = self
            .slides
            .iter()
            .enumerate()
            .map(|(i, slide)| (slide.id(), i))
            .collect();
    }
}
