//! Document store: every editing operation, with undo/redo.
//!
//! Each mutating operation runs against a staged copy of the document. On
//! success the copy replaces the live document and a snapshot is committed
//! to history; on failure the live document is untouched and nothing is
//! committed. Copies are cheap because slides and elements sit behind `Arc`s
//! and only the touched ones are cloned.
//!
//! # Example
//!
//! ```
//! use deck_core::{DocumentStore, Element};
//!
//! let mut store = DocumentStore::new();
//! let slide = store.document().active_slide_id();
//! let id = store.add_element(slide, Element::text("Hello")).unwrap();
//!
//! assert_eq!(store.document().selected_element_id(), Some(id));
//! assert!(store.undo());
//! assert!(store.document().active_slide().is_empty());
//! ```

use crate::config::EditorConfig;
use crate::document::{Document, Snapshot};
use crate::element::{validate_size, Animation, ElementKind, ShapeKind};
use crate::error::{EditError, EditResult};
use crate::history::History;
use crate::slide::{Layout, Transition, ZOrder};
use crate::style::{Color, Style, TextAlign};
use crate::{Element, ElementId, Slide, SlideId};

/// Owns the live document and its history.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    document: Document,
    history: History<Snapshot>,
    image_box: (f32, f32),
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    /// Create a store with one default slide and the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&EditorConfig::default())
    }

    /// Create a store with one default slide.
    ///
    /// The initial document is committed as the first history entry, so it
    /// is the floor undo stops at.
    #[must_use]
    pub fn with_config(config: &EditorConfig) -> Self {
        Self::from_document(Document::new(), config)
    }

    /// Create a store around an existing document.
    #[must_use]
    pub fn from_document(document: Document, config: &EditorConfig) -> Self {
        let history = match config.history_capacity {
            Some(capacity) => History::with_capacity(capacity),
            None => History::new(),
        };
        let mut store = Self {
            document,
            history,
            image_box: (config.image_max_width, config.image_max_height),
        };
        store.history.commit(store.document.snapshot());
        store
    }

    /// The live document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// The undo/redo history.
    #[must_use]
    pub const fn history(&self) -> &History<Snapshot> {
        &self.history
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Whether there is an edit to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether there is an undone edit to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Roll back one edit. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.document.restore(snapshot);
        tracing::debug!(cursor = ?self.history.cursor(), "Undo");
        true
    }

    /// Re-apply one undone edit. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.document.restore(snapshot);
        tracing::debug!(cursor = ?self.history.cursor(), "Redo");
        true
    }

    // -----------------------------------------------------------------------
    // Slides
    // -----------------------------------------------------------------------

    /// Append a default slide and make it active.
    pub fn add_slide(&mut self) -> SlideId {
        let slide = Slide::new(self.document.slide_count() + 1);
        let id = slide.id();
        let result = self.edit("add_slide", |doc| {
            doc.insert_slide(doc.slide_count(), slide);
            doc.activate(id)
        });
        if let Err(e) = result {
            tracing::warn!("Failed to add slide {id}: {e}");
        }
        id
    }

    /// Delete a slide. If it was active, the first remaining slide becomes
    /// active.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::SlideNotFound`] or [`EditError::LastSlide`].
    pub fn delete_slide(&mut self, id: SlideId) -> EditResult<()> {
        self.edit("delete_slide", |doc| doc.remove_slide(id))
    }

    /// Insert a copy of a slide right after it. The copy's elements get new
    /// IDs; the active slide does not change.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::SlideNotFound`] if the source does not exist.
    pub fn duplicate_slide(&mut self, id: SlideId) -> EditResult<SlideId> {
        self.edit("duplicate_slide", |doc| {
            let copy = doc
                .slide(id)
                .ok_or(EditError::SlideNotFound(id))?
                .clone_for_duplicate();
            let copy_id = copy.id();
            let index = doc.position_of(id).ok_or(EditError::SlideNotFound(id))?;
            doc.insert_slide(index + 1, copy);
            Ok(copy_id)
        })
    }

    /// Move a slide to a new presentation index (clamped to the end).
    ///
    /// # Errors
    ///
    /// Returns [`EditError::SlideNotFound`] if the slide does not exist.
    pub fn move_slide(&mut self, id: SlideId, to: usize) -> EditResult<()> {
        self.edit("move_slide", |doc| doc.move_slide(id, to))
    }

    /// Make a slide the one being edited. Clears the selection if the slide
    /// changes. Not recorded in history.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::SlideNotFound`] if the slide does not exist.
    pub fn set_active_slide(&mut self, id: SlideId) -> EditResult<()> {
        self.document.activate(id)
    }

    /// Set a slide's sorter title.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::SlideNotFound`] if the slide does not exist.
    pub fn set_slide_title(&mut self, id: SlideId, title: impl Into<String>) -> EditResult<()> {
        let title = title.into();
        self.edit_slide("set_slide_title", id, |slide| slide.title = title)
    }

    /// Set the text of a slide's title area.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::SlideNotFound`] if the slide does not exist.
    pub fn set_slide_headline(
        &mut self,
        id: SlideId,
        headline: impl Into<String>,
    ) -> EditResult<()> {
        let headline = headline.into();
        self.edit_slide("set_slide_headline", id, |slide| slide.headline = headline)
    }

    /// Set a slide's speaker notes.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::SlideNotFound`] if the slide does not exist.
    pub fn set_slide_notes(&mut self, id: SlideId, notes: impl Into<String>) -> EditResult<()> {
        let notes = notes.into();
        self.edit_slide("set_slide_notes", id, |slide| slide.notes = notes)
    }

    /// Set a slide's background color.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::SlideNotFound`] if the slide does not exist.
    pub fn set_slide_background(&mut self, id: SlideId, color: Color) -> EditResult<()> {
        self.edit_slide("set_slide_background", id, |slide| slide.background = color)
    }

    /// Set a slide's entry transition.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::SlideNotFound`] if the slide does not exist.
    pub fn set_slide_transition(&mut self, id: SlideId, transition: Transition) -> EditResult<()> {
        self.edit_slide("set_slide_transition", id, |slide| {
            slide.transition = transition;
        })
    }

    /// Set a slide's layout tag.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::SlideNotFound`] if the slide does not exist.
    pub fn set_slide_layout(&mut self, id: SlideId, layout: Layout) -> EditResult<()> {
        self.edit_slide("set_slide_layout", id, |slide| slide.layout = layout)
    }

    // -----------------------------------------------------------------------
    // Elements
    // -----------------------------------------------------------------------

    /// Append an element to a slide. When the slide is active the new
    /// element becomes the selection.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::SlideNotFound`], [`EditError::DuplicateElement`]
    /// or [`EditError::InvalidSize`].
    pub fn add_element(&mut self, slide: SlideId, element: Element) -> EditResult<ElementId> {
        validate_size(element.transform.width, element.transform.height)?;
        let id = element.id;
        self.edit("add_element", |doc| {
            doc.slide_mut(slide)?.push_element(element)?;
            if doc.active_slide_id() == slide {
                doc.select(Some(id))?;
            }
            Ok(id)
        })
    }

    /// Add a default text box to the active slide.
    ///
    /// # Errors
    ///
    /// Propagates [`DocumentStore::add_element`] errors.
    pub fn add_text_box(&mut self) -> EditResult<ElementId> {
        let slide = self.document.active_slide_id();
        self.add_element(slide, Element::text("Click to add text"))
    }

    /// Add a shape to the active slide.
    ///
    /// # Errors
    ///
    /// Propagates [`DocumentStore::add_element`] errors.
    pub fn add_shape(&mut self, shape: ShapeKind) -> EditResult<ElementId> {
        let slide = self.document.active_slide_id();
        self.add_element(slide, Element::shape(shape))
    }

    /// Add an image to the active slide, fitted into the configured box.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::InvalidSize`] if the natural size is not positive.
    pub fn add_image(
        &mut self,
        src: impl Into<String>,
        natural_width: f32,
        natural_height: f32,
    ) -> EditResult<ElementId> {
        let (max_width, max_height) = self.image_box;
        let element =
            Element::image_within(src, natural_width, natural_height, max_width, max_height)?;
        let slide = self.document.active_slide_id();
        self.add_element(slide, element)
    }

    /// Delete an element. Clears the selection if it was selected.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::SlideNotFound`] or [`EditError::ElementNotFound`];
    /// deleting the same element twice fails harmlessly the second time.
    pub fn delete_element(&mut self, slide: SlideId, element: ElementId) -> EditResult<()> {
        self.edit("delete_element", |doc| {
            doc.slide_mut(slide)?.remove_element(element)?;
            doc.retain_selection();
            Ok(())
        })
    }

    /// Delete the selected element.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NothingSelected`] when there is no selection.
    pub fn delete_selection(&mut self) -> EditResult<()> {
        let element = self
            .document
            .selected_element_id()
            .ok_or(EditError::NothingSelected)?;
        let slide = self.document.active_slide_id();
        self.delete_element(slide, element)
    }

    /// Merge a style patch into an element: fields set in `patch` overwrite,
    /// the rest are untouched. A patch that changes nothing is not recorded.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::SlideNotFound`] or [`EditError::ElementNotFound`].
    pub fn update_element_style(
        &mut self,
        slide: SlideId,
        element: ElementId,
        patch: &Style,
    ) -> EditResult<()> {
        self.edit_if_changed("update_element_style", |doc| {
            let el = doc.slide_mut(slide)?.element_mut(element)?;
            if el.style.is_unchanged_by(patch) {
                return Ok(false);
            }
            el.style.merge(patch);
            Ok(true)
        })
        .map(drop)
    }

    /// Replace an element's content: the text of a text box or the tag of a
    /// shape.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::UnsupportedKind`] for images,
    /// [`EditError::UnknownShape`] for a bad shape tag, or a not-found error.
    pub fn update_element_content(
        &mut self,
        slide: SlideId,
        element: ElementId,
        content: &str,
    ) -> EditResult<()> {
        self.edit_element("update_element_content", slide, element, |el| {
            match &mut el.kind {
                ElementKind::Text { content: text } => content.clone_into(text),
                ElementKind::Shape { shape } => *shape = content.parse()?,
                ElementKind::Image { .. } => {
                    return Err(EditError::UnsupportedKind { kind: "image" });
                }
            }
            Ok(())
        })
    }

    /// Move an element's top-left corner.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NonFinite`] or a not-found error.
    pub fn move_element(
        &mut self,
        slide: SlideId,
        element: ElementId,
        x: f32,
        y: f32,
    ) -> EditResult<()> {
        if !(x.is_finite() && y.is_finite()) {
            return Err(EditError::NonFinite("position"));
        }
        self.edit_element("move_element", slide, element, |el| {
            el.transform.x = x;
            el.transform.y = y;
            Ok(())
        })
    }

    /// Resize an element.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::InvalidSize`] or a not-found error.
    pub fn resize_element(
        &mut self,
        slide: SlideId,
        element: ElementId,
        width: f32,
        height: f32,
    ) -> EditResult<()> {
        validate_size(width, height)?;
        self.edit_element("resize_element", slide, element, |el| {
            el.transform.width = width;
            el.transform.height = height;
            Ok(())
        })
    }

    /// Rotate an element to an absolute angle in degrees, normalized to
    /// `[0, 360)`.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NonFinite`] or a not-found error.
    pub fn rotate_element(
        &mut self,
        slide: SlideId,
        element: ElementId,
        degrees: f32,
    ) -> EditResult<()> {
        if !degrees.is_finite() {
            return Err(EditError::NonFinite("rotation"));
        }
        self.edit_element("rotate_element", slide, element, |el| {
            el.transform.rotation = degrees.rem_euclid(360.0);
            Ok(())
        })
    }

    /// Move an element in paint order. Returns whether it moved; a move that
    /// changes nothing is not recorded.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::SlideNotFound`] or [`EditError::ElementNotFound`].
    pub fn reorder_element(
        &mut self,
        slide: SlideId,
        element: ElementId,
        order: ZOrder,
    ) -> EditResult<bool> {
        self.edit_if_changed("reorder_element", |doc| {
            doc.slide_mut(slide)?.reorder(element, order)
        })
    }

    /// Set an element's entrance animation.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::SlideNotFound`] or [`EditError::ElementNotFound`].
    pub fn set_element_animation(
        &mut self,
        slide: SlideId,
        element: ElementId,
        animation: Animation,
    ) -> EditResult<()> {
        self.edit_element("set_element_animation", slide, element, |el| {
            el.animation = animation;
            Ok(())
        })
    }

    // -----------------------------------------------------------------------
    // Selection and text formatting
    // -----------------------------------------------------------------------

    /// Select an element of the active slide, or clear the selection with
    /// `None`. Not recorded in history.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::ElementNotFound`] if the element is not on the
    /// active slide.
    pub fn select_element(&mut self, element: Option<ElementId>) -> EditResult<()> {
        self.document.select(element)
    }

    /// Flip the selected text between normal and bold.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NothingSelected`] or [`EditError::UnsupportedKind`]
    /// when the selection is not a text box.
    pub fn toggle_bold(&mut self) -> EditResult<()> {
        let weight = self.selected_text()?.style.font_weight.unwrap_or_default();
        self.style_selected_text(Style {
            font_weight: Some(weight.toggled()),
            ..Style::default()
        })
    }

    /// Flip the selected text between upright and italic.
    ///
    /// # Errors
    ///
    /// Same as [`DocumentStore::toggle_bold`].
    pub fn toggle_italic(&mut self) -> EditResult<()> {
        let slant = self.selected_text()?.style.font_style.unwrap_or_default();
        self.style_selected_text(Style {
            font_style: Some(slant.toggled()),
            ..Style::default()
        })
    }

    /// Flip the selected text between plain and underlined.
    ///
    /// # Errors
    ///
    /// Same as [`DocumentStore::toggle_bold`].
    pub fn toggle_underline(&mut self) -> EditResult<()> {
        let decoration = self
            .selected_text()?
            .style
            .text_decoration
            .unwrap_or_default();
        self.style_selected_text(Style {
            text_decoration: Some(decoration.toggled()),
            ..Style::default()
        })
    }

    /// Set the selected text's font family.
    ///
    /// # Errors
    ///
    /// Same as [`DocumentStore::toggle_bold`].
    pub fn set_font_family(&mut self, family: impl Into<String>) -> EditResult<()> {
        self.style_selected_text(Style {
            font_family: Some(family.into()),
            ..Style::default()
        })
    }

    /// Set the selected text's font size.
    ///
    /// # Errors
    ///
    /// Same as [`DocumentStore::toggle_bold`], plus [`EditError::InvalidSize`]
    /// for a size that is not positive.
    pub fn set_font_size(&mut self, size: f32) -> EditResult<()> {
        validate_size(size, size)?;
        self.style_selected_text(Style {
            font_size: Some(size),
            ..Style::default()
        })
    }

    /// Set the selected text's color.
    ///
    /// # Errors
    ///
    /// Same as [`DocumentStore::toggle_bold`].
    pub fn set_text_color(&mut self, color: Color) -> EditResult<()> {
        self.style_selected_text(Style {
            color: Some(color),
            ..Style::default()
        })
    }

    /// Set the selected text's box background.
    ///
    /// # Errors
    ///
    /// Same as [`DocumentStore::toggle_bold`].
    pub fn set_text_background(&mut self, color: Color) -> EditResult<()> {
        self.style_selected_text(Style {
            background_color: Some(color),
            ..Style::default()
        })
    }

    /// Set the selected text's alignment.
    ///
    /// # Errors
    ///
    /// Same as [`DocumentStore::toggle_bold`].
    pub fn set_text_align(&mut self, align: TextAlign) -> EditResult<()> {
        self.style_selected_text(Style {
            text_align: Some(align),
            ..Style::default()
        })
    }

    /// The selected element, if it is a text box.
    fn selected_text(&self) -> EditResult<&Element> {
        let element = self
            .document
            .selected_element()
            .ok_or(EditError::NothingSelected)?;
        if element.is_text() {
            Ok(element)
        } else {
            Err(EditError::UnsupportedKind {
                kind: element.kind.name(),
            })
        }
    }

    fn style_selected_text(&mut self, patch: Style) -> EditResult<()> {
        let element = self.selected_text()?.id;
        let slide = self.document.active_slide_id();
        self.update_element_style(slide, element, &patch)
    }

    // -----------------------------------------------------------------------
    // Staging
    // -----------------------------------------------------------------------

    /// Apply `f` to a staged copy; on success adopt it and commit.
    fn edit<T, F>(&mut self, action: &'static str, f: F) -> EditResult<T>
    where
        F: FnOnce(&mut Document) -> EditResult<T>,
    {
        let mut staged = self.document.clone();
        match f(&mut staged) {
            Ok(value) => {
                self.adopt(action, staged);
                Ok(value)
            }
            Err(e) => {
                tracing::debug!(action, error = %e, "Edit rejected");
                Err(e)
            }
        }
    }

    /// Like [`DocumentStore::edit`], but `f` reports whether it changed
    /// anything and unchanged results are not committed.
    fn edit_if_changed<F>(&mut self, action: &'static str, f: F) -> EditResult<bool>
    where
        F: FnOnce(&mut Document) -> EditResult<bool>,
    {
        let mut staged = self.document.clone();
        let changed = f(&mut staged).inspect_err(|e| {
            tracing::debug!(action, error = %e, "Edit rejected");
        })?;
        if changed {
            self.adopt(action, staged);
        }
        Ok(changed)
    }

    fn edit_slide<F>(&mut self, action: &'static str, id: SlideId, f: F) -> EditResult<()>
    where
        F: FnOnce(&mut Slide),
    {
        self.edit(action, |doc| {
            f(doc.slide_mut(id)?);
            Ok(())
        })
    }

    fn edit_element<F>(
        &mut self,
        action: &'static str,
        slide: SlideId,
        element: ElementId,
        f: F,
    ) -> EditResult<()>
    where
        F: FnOnce(&mut Element) -> EditResult<()>,
    {
        self.edit(action, |doc| f(doc.slide_mut(slide)?.element_mut(element)?))
    }

    fn adopt(&mut self, action: &'static str, staged: Document) {
        self.document = staged;
        self.history.commit(self.document.snapshot());
        tracing::debug!(
            action,
            slides = self.document.slide_count(),
            history = self.history.len(),
            "Committed edit"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::AnimationKind;
    use crate::slide::TransitionKind;
    use crate::style::{FontStyle, FontWeight, TextDecoration};

    fn store_with_text() -> (DocumentStore, SlideId, ElementId) {
        let mut store = DocumentStore::new();
        let slide = store.document().active_slide_id();
        let id = store
            .add_element(slide, Element::text("Hello"))
            .expect("add text");
        (store, slide, id)
    }

    fn element(store: &DocumentStore, slide: SlideId, id: ElementId) -> &Element {
        store.document().element(slide, id).expect("element exists")
    }

    #[test]
    fn test_new_store_has_one_slide_and_no_undo() {
        let store = DocumentStore::new();
        assert_eq!(store.document().slide_count(), 1);
        assert_eq!(store.history().len(), 1);
        assert!(!store.can_undo());
        assert!(!store.can_redo());
    }

    #[test]
    fn test_add_slide_appends_and_activates() {
        let mut store = DocumentStore::new();
        let id = store.add_slide();
        assert_eq!(store.document().slide_count(), 2);
        assert_eq!(store.document().active_slide_id(), id);
        assert_eq!(store.document().active_slide().title, "Slide 2");
        assert!(store.can_undo());
    }

    #[test]
    fn test_delete_only_slide_is_rejected_without_commit() {
        let mut store = DocumentStore::new();
        let id = store.document().active_slide_id();
        assert_eq!(store.delete_slide(id), Err(EditError::LastSlide));
        assert_eq!(store.document().slide_count(), 1);
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_delete_active_slide_activates_first() {
        let mut store = DocumentStore::new();
        let first = store.document().active_slide_id();
        let second = store.add_slide();
        store.add_slide();
        store.set_active_slide(second).expect("activate");

        store.delete_slide(second).expect("delete");
        assert_eq!(store.document().slide_count(), 2);
        assert_eq!(store.document().active_slide_id(), first);
    }

    #[test]
    fn test_delete_missing_slide() {
        let mut store = DocumentStore::new();
        let ghost = SlideId::new();
        assert_eq!(store.delete_slide(ghost), Err(EditError::SlideNotFound(ghost)));
    }

    #[test]
    fn test_duplicate_slide_inserts_after_source() {
        let mut store = DocumentStore::new();
        let first = store.document().active_slide_id();
        store.add_slide();
        store.set_active_slide(first).expect("activate");
        store.add_shape(ShapeKind::Circle).expect("shape");

        let copy = store.duplicate_slide(first).expect("duplicate");
        let doc = store.document();
        assert_eq!(doc.position_of(copy), Some(1));
        assert_eq!(doc.slide(copy).expect("copy").title, "Slide 1 Copy");
        assert_eq!(doc.active_slide_id(), first);
        assert_eq!(doc.slide_count(), 3);
    }

    #[test]
    fn test_add_element_selects_it() {
        let (store, slide, id) = store_with_text();
        assert_eq!(store.document().selected_element_id(), Some(id));
        assert!(element(&store, slide, id).is_text());
    }

    #[test]
    fn test_add_element_to_inactive_slide_does_not_select() {
        let mut store = DocumentStore::new();
        let first = store.document().active_slide_id();
        store.add_slide();
        let id = store
            .add_element(first, Element::shape(ShapeKind::Star))
            .expect("add");
        assert!(store.document().selected_element_id().is_none());
        assert!(store.document().slide(first).expect("slide").contains(id));
    }

    #[test]
    fn test_add_element_rejects_bad_size() {
        let mut store = DocumentStore::new();
        let slide = store.document().active_slide_id();
        let mut el = Element::text("flat");
        el.transform.height = 0.0;
        assert!(matches!(
            store.add_element(slide, el),
            Err(EditError::InvalidSize { .. })
        ));
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_delete_element_is_idempotent() {
        let (mut store, slide, id) = store_with_text();
        store.delete_element(slide, id).expect("delete");
        let after_first = store.document().clone();
        let history_len = store.history().len();

        assert_eq!(
            store.delete_element(slide, id),
            Err(EditError::ElementNotFound(id))
        );
        assert_eq!(store.document(), &after_first);
        assert_eq!(store.history().len(), history_len);
        assert!(store.document().selected_element_id().is_none());
    }

    #[test]
    fn test_delete_unselected_element_keeps_selection() {
        let (mut store, slide, text) = store_with_text();
        let shape = store.add_shape(ShapeKind::Heart).expect("shape");
        store.select_element(Some(text)).expect("select");
        store.delete_element(slide, shape).expect("delete");
        assert_eq!(store.document().selected_element_id(), Some(text));
    }

    #[test]
    fn test_update_style_is_shallow_merge() {
        let (mut store, slide, id) = store_with_text();
        let patch = Style {
            color: Some(Color::rgb(0xff, 0, 0)),
            ..Style::default()
        };
        store.update_element_style(slide, id, &patch).expect("style");

        let style = &element(&store, slide, id).style;
        assert_eq!(style.color, Some(Color::rgb(0xff, 0, 0)));
        assert_eq!(style.font_size, Some(16.0));
        assert_eq!(style.font_weight, Some(FontWeight::Normal));
    }

    #[test]
    fn test_update_style_noop_patch_not_recorded() {
        let (mut store, slide, id) = store_with_text();
        let len = store.history().len();
        let patch = Style {
            font_weight: Some(FontWeight::Normal),
            ..Style::default()
        };
        store.update_element_style(slide, id, &patch).expect("style");
        assert_eq!(store.history().len(), len);
    }

    #[test]
    fn test_update_style_missing_element() {
        let (mut store, slide, _) = store_with_text();
        let ghost = ElementId::new();
        assert_eq!(
            store.update_element_style(slide, ghost, &Style::default()),
            Err(EditError::ElementNotFound(ghost))
        );
    }

    #[test]
    fn test_update_content_by_kind() {
        let (mut store, slide, text) = store_with_text();
        store
            .update_element_content(slide, text, "Updated")
            .expect("text");
        assert_eq!(
            element(&store, slide, text).kind,
            ElementKind::Text {
                content: "Updated".to_string()
            }
        );

        let shape = store.add_shape(ShapeKind::Rectangle).expect("shape");
        store
            .update_element_content(slide, shape, "arrow-left")
            .expect("shape tag");
        assert_eq!(
            element(&store, slide, shape).kind,
            ElementKind::Shape {
                shape: ShapeKind::ArrowLeft
            }
        );
        assert!(matches!(
            store.update_element_content(slide, shape, "squiggle"),
            Err(EditError::UnknownShape(_))
        ));

        store
            .update_element_content(slide, shape, "diamond")
            .expect("diamond tag");
        assert_eq!(
            element(&store, slide, shape).kind,
            ElementKind::Shape {
                shape: ShapeKind::Diamond
            }
        );

        let image = store.add_image("data:image/png;base64,AA", 10.0, 10.0).expect("image");
        assert_eq!(
            store.update_element_content(slide, image, "nope"),
            Err(EditError::UnsupportedKind { kind: "image" })
        );
    }

    #[test]
    fn test_move_resize_rotate_touch_one_group() {
        let (mut store, slide, id) = store_with_text();
        let before = element(&store, slide, id).clone();

        store.move_element(slide, id, 10.0, -20.0).expect("move");
        store.resize_element(slide, id, 300.0, 80.0).expect("resize");
        store.rotate_element(slide, id, -90.0).expect("rotate");

        let after = element(&store, slide, id);
        assert!((after.transform.x - 10.0).abs() < f32::EPSILON);
        assert!((after.transform.y + 20.0).abs() < f32::EPSILON);
        assert!((after.transform.width - 300.0).abs() < f32::EPSILON);
        assert!((after.transform.rotation - 270.0).abs() < f32::EPSILON);
        assert_eq!(after.style, before.style);
        assert_eq!(after.kind, before.kind);
    }

    #[test]
    fn test_geometry_validation() {
        let (mut store, slide, id) = store_with_text();
        assert!(matches!(
            store.resize_element(slide, id, -1.0, 10.0),
            Err(EditError::InvalidSize { .. })
        ));
        assert_eq!(
            store.move_element(slide, id, f32::NAN, 0.0),
            Err(EditError::NonFinite("position"))
        );
        assert_eq!(
            store.rotate_element(slide, id, f32::INFINITY),
            Err(EditError::NonFinite("rotation"))
        );
    }

    #[test]
    fn test_reorder_element() {
        let (mut store, slide, text) = store_with_text();
        let shape = store.add_shape(ShapeKind::Sun).expect("shape");
        let len = store.history().len();

        assert!(!store.reorder_element(slide, shape, ZOrder::Front).expect("noop"));
        assert_eq!(store.history().len(), len);

        assert!(store.reorder_element(slide, shape, ZOrder::Back).expect("back"));
        let order: Vec<_> = store
            .document()
            .active_slide()
            .elements()
            .map(|e| e.id)
            .collect();
        assert_eq!(order, vec![shape, text]);
    }

    #[test]
    fn test_slide_metadata_setters() {
        let mut store = DocumentStore::new();
        let id = store.document().active_slide_id();
        store.set_slide_background(id, Color::rgb(0xe3, 0xf2, 0xfd)).expect("bg");
        store
            .set_slide_transition(
                id,
                Transition {
                    kind: TransitionKind::Fade,
                    duration_ms: 1500,
                },
            )
            .expect("transition");
        store.set_slide_title(id, "Intro").expect("title");
        store.set_slide_headline(id, "Welcome").expect("headline");
        store.set_slide_notes(id, "Smile").expect("notes");
        store.set_slide_layout(id, Layout::TwoColumn).expect("layout");

        let slide = store.document().active_slide();
        assert_eq!(slide.background, Color::rgb(0xe3, 0xf2, 0xfd));
        assert_eq!(slide.transition.kind, TransitionKind::Fade);
        assert_eq!(slide.title, "Intro");
        assert_eq!(slide.headline, "Welcome");
        assert_eq!(slide.notes, "Smile");
        assert_eq!(slide.layout, Layout::TwoColumn);
        assert_eq!(store.history().len(), 7);
    }

    #[test]
    fn test_set_element_animation() {
        let (mut store, slide, id) = store_with_text();
        let animation = Animation {
            kind: AnimationKind::Bounce,
            duration_ms: 750,
            delay_ms: 100,
        };
        store.set_element_animation(slide, id, animation).expect("animation");
        assert_eq!(element(&store, slide, id).animation, animation);
    }

    #[test]
    fn test_selection_is_not_recorded() {
        let (mut store, _, id) = store_with_text();
        let len = store.history().len();
        store.select_element(None).expect("clear");
        store.select_element(Some(id)).expect("select");
        assert_eq!(store.history().len(), len);
    }

    #[test]
    fn test_toggle_bold_twice() {
        let (mut store, slide, id) = store_with_text();
        store.toggle_bold().expect("bold");
        assert_eq!(
            element(&store, slide, id).style.font_weight,
            Some(FontWeight::Bold)
        );
        store.toggle_bold().expect("unbold");
        assert_eq!(
            element(&store, slide, id).style.font_weight,
            Some(FontWeight::Normal)
        );
    }

    #[test]
    fn test_toggle_italic_and_underline() {
        let (mut store, slide, id) = store_with_text();
        store.toggle_italic().expect("italic");
        store.toggle_underline().expect("underline");
        let style = &element(&store, slide, id).style;
        assert_eq!(style.font_style, Some(FontStyle::Italic));
        assert_eq!(style.text_decoration, Some(TextDecoration::Underline));
    }

    #[test]
    fn test_toggles_ignore_non_text() {
        let mut store = DocumentStore::new();
        let slide = store.document().active_slide_id();
        let shape = store.add_shape(ShapeKind::Zap).expect("shape");
        let len = store.history().len();

        assert_eq!(
            store.toggle_bold(),
            Err(EditError::UnsupportedKind { kind: "shape" })
        );
        assert!(element(&store, slide, shape).style.font_weight.is_none());
        assert_eq!(store.history().len(), len);

        store.select_element(None).expect("clear");
        assert_eq!(store.toggle_italic(), Err(EditError::NothingSelected));
    }

    #[test]
    fn test_text_setters_apply_to_selection() {
        let (mut store, slide, id) = store_with_text();
        store.set_font_family("Georgia").expect("family");
        store.set_font_size(24.0).expect("size");
        store.set_text_color(Color::rgb(0x12, 0x34, 0x56)).expect("color");
        store.set_text_background(Color::WHITE).expect("background");
        store.set_text_align(TextAlign::Center).expect("align");

        let style = &element(&store, slide, id).style;
        assert_eq!(style.font_family.as_deref(), Some("Georgia"));
        assert_eq!(style.font_size, Some(24.0));
        assert_eq!(style.color, Some(Color::rgb(0x12, 0x34, 0x56)));
        assert_eq!(style.background_color, Some(Color::WHITE));
        assert_eq!(style.text_align, Some(TextAlign::Center));
        assert!(store.set_font_size(0.0).is_err());
    }

    #[test]
    fn test_add_image_uses_configured_box() {
        let config = EditorConfig::default().with_image_box(100.0, 100.0);
        let mut store = DocumentStore::with_config(&config);
        let slide = store.document().active_slide_id();
        let id = store.add_image("data:,", 400.0, 200.0).expect("image");
        let el = element(&store, slide, id);
        assert!((el.transform.width - 100.0).abs() < f32::EPSILON);
        assert!((el.transform.height - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_undo_redo_restores_structurally() {
        let (mut store, slide, id) = store_with_text();
        let committed = store.document().clone();

        store.move_element(slide, id, 1.0, 2.0).expect("move");
        assert!(store.undo());
        assert_eq!(store.document(), &committed);
        assert!(store.redo());
        assert!((element(&store, slide, id).transform.x - 1.0).abs() < f32::EPSILON);
        assert!(!store.redo());
    }

    #[test]
    fn test_undo_past_start_is_noop() {
        let mut store = DocumentStore::new();
        let before = store.document().clone();
        assert!(!store.undo());
        assert_eq!(store.document(), &before);
    }

    #[test]
    fn test_undo_add_element_clears_selection() {
        let (mut store, _, _) = store_with_text();
        assert!(store.undo());
        assert!(store.document().selected_element_id().is_none());
        assert!(store.document().active_slide().is_empty());
    }

    #[test]
    fn test_undo_add_slide_falls_back_to_first() {
        let mut store = DocumentStore::new();
        let first = store.document().active_slide_id();
        store.add_slide();
        assert!(store.undo());
        assert_eq!(store.document().slide_count(), 1);
        assert_eq!(store.document().active_slide_id(), first);
    }

    #[test]
    fn test_new_edit_after_undo_drops_redo() {
        let mut store = DocumentStore::new();
        store.add_slide();
        store.add_slide();
        assert!(store.undo());
        assert!(store.can_redo());
        store.add_shape(ShapeKind::Moon).expect("shape");
        assert!(!store.can_redo());
        assert_eq!(store.history().len(), 3);
    }

    #[test]
    fn test_history_capacity_from_config() {
        let config = EditorConfig::default().with_history_capacity(Some(2));
        let mut store = DocumentStore::with_config(&config);
        store.add_slide();
        store.add_slide();
        store.add_slide();
        assert_eq!(store.history().len(), 2);
        assert!(store.undo());
        assert!(!store.undo());
        assert_eq!(store.document().slide_count(), 3);
    }
}
