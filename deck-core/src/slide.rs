//! Slides - ordered element containers with slide-level metadata.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EditError, EditResult};
use crate::style::Color;
use crate::{Element, ElementId};

/// Text shown in the title area of a new slide.
pub const DEFAULT_HEADLINE: &str = "Click to add title";

/// Speaker notes of a new slide.
pub const DEFAULT_NOTES: &str = "Click to add notes";

/// Unique identifier for a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlideId(Uuid);

impl SlideId {
    /// Create a new unique slide ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for SlideId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transition effects between slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum TransitionKind {
    #[default]
    None,
    Fade,
    Slide,
    Zoom,
    Flip,
}

/// Transition played when this slide is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Effect.
    pub kind: TransitionKind,
    /// Duration in milliseconds.
    pub duration_ms: u32,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            kind: TransitionKind::None,
            duration_ms: 500,
        }
    }
}

/// Slide layout. Informational; does not constrain placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum Layout {
    #[default]
    Title,
    Content,
    TwoColumn,
    Blank,
}

/// Paint-order moves for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZOrder {
    /// One step towards the top.
    Forward,
    /// One step towards the bottom.
    Backward,
    /// Topmost.
    Front,
    /// Bottommost.
    Back,
}

/// A slide: metadata plus elements in paint order.
///
/// Elements are shared with history snapshots through `Arc` and copied only
/// when one of them is edited.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slide {
    id: SlideId,
    /// Name shown in the slide sorter.
    pub title: String,
    /// Text of the title area on the slide itself.
    pub headline: String,
    /// Speaker notes.
    pub notes: String,
    /// Background color.
    pub background: Color,
    /// Entry transition.
    pub transition: Transition,
    /// Layout tag.
    pub layout: Layout,
    elements: Vec<Arc<Element>>,
    #[serde(skip)]
    positions: HashMap<ElementId, usize>,
}

impl Slide {
    /// Create an empty slide titled "Slide {number}".
    #[must_use]
    pub fn new(number: usize) -> Self {
        Self::titled(format!("Slide {number}"))
    }

    /// Create an empty slide with a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            id: SlideId::new(),
            title: title.into(),
            headline: DEFAULT_HEADLINE.to_string(),
            notes: DEFAULT_NOTES.to_string(),
            background: Color::WHITE,
            transition: Transition::default(),
            layout: Layout::Title,
            elements: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Slide ID.
    #[must_use]
    pub const fn id(&self) -> SlideId {
        self.id
    }

    /// Elements in paint order (first is painted first).
    pub fn elements(&self) -> impl ExactSizeIterator<Item = &Element> + '_ {
        self.elements.iter().map(|el| &**el)
    }

    /// Get an element by ID.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.positions.get(&id).map(|&i| self.elements[i].as_ref())
    }

    /// Paint-order index of an element.
    #[must_use]
    pub fn position_of(&self, id: ElementId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Whether the slide holds this element.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Number of elements.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Check if the slide has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Deep copy for duplication: new slide ID, new element IDs, title
    /// suffixed with " Copy".
    #[must_use]
    pub fn clone_for_duplicate(&self) -> Self {
        let mut copy = Self {
            id: SlideId::new(),
            title: format!("{} Copy", self.title),
            elements: self
                .elements
                .iter()
                .map(|el| Arc::new(el.with_new_id()))
                .collect(),
            ..self.clone()
        };
        copy.reindex();
        copy
    }

    /// Append an element on top.
    pub(crate) fn push_element(&mut self, element: Element) -> EditResult<()> {
        if self.contains(element.id) {
            return Err(EditError::DuplicateElement(element.id));
        }
        self.positions.insert(element.id, self.elements.len());
        self.elements.push(Arc::new(element));
        Ok(())
    }

    /// Remove an element.
    pub(crate) fn remove_element(&mut self, id: ElementId) -> EditResult<Arc<Element>> {
        let index = self
            .position_of(id)
            .ok_or(EditError::ElementNotFound(id))?;
        let removed = self.elements.remove(index);
        self.reindex();
        Ok(removed)
    }

    /// Mutable access to one element, copying it first if a snapshot shares it.
    pub(crate) fn element_mut(&mut self, id: ElementId) -> EditResult<&mut Element> {
        let index = self
            .position_of(id)
            .ok_or(EditError::ElementNotFound(id))?;
        Ok(Arc::make_mut(&mut self.elements[index]))
    }

    /// Move an element in paint order. Returns whether anything moved.
    pub(crate) fn reorder(&mut self, id: ElementId, order: ZOrder) -> EditResult<bool> {
        let from = self
            .position_of(id)
            .ok_or(EditError::ElementNotFound(id))?;
        let last = self.elements.len() - 1;
        let to = match order {
            ZOrder::Forward => (from + 1).min(last),
            ZOrder::Backward => from.saturating_sub(1),
            ZOrder::Front => last,
            ZOrder::Back => 0,
        };
        if to == from {
            return Ok(false);
        }
        let element = self.elements.remove(from);
        self.elements.insert(to, element);
        self.reindex();
        Ok(true)
    }

    fn reindex(&mut self) {
        self.positions = self
            .elements
            .iter()
            .enumerate()
            .map(|(i, el)| (el.id, i))
            .collect();
    }
}
