//! Slide elements - the text boxes, shapes and images placed on a slide.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EditError, EditResult};
use crate::style::Style;

/// Largest width, in logical units, an inserted image is given.
pub const IMAGE_MAX_WIDTH: f32 = 300.0;

/// Largest height, in logical units, an inserted image is given.
pub const IMAGE_MAX_HEIGHT: f32 = 200.0;

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
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

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shapes available from the insert gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Triangle,
    Diamond,
    Star,
    Heart,
    Hexagon,
    Pentagon,
    Sun,
    Moon,
    Cloud,
    Flame,
    Droplets,
    Zap,
    Phone,
    Mail,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl ShapeKind {
    /// Every shape, in gallery order.
    pub const ALL: [Self; 20] = [
        Self::Rectangle,
        Self::Circle,
        Self::Triangle,
        Self::Diamond,
        Self::Star,
        Self::Heart,
        Self::Hexagon,
        Self::Pentagon,
        Self::Sun,
        Self::Moon,
        Self::Cloud,
        Self::Flame,
        Self::Droplets,
        Self::Zap,
        Self::Phone,
        Self::Mail,
        Self::ArrowUp,
        Self::ArrowDown,
        Self::ArrowLeft,
        Self::ArrowRight,
    ];

    /// The shape's tag, e.g. `"arrow-up"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Triangle => "triangle",
            Self::Diamond => "diamond",
            Self::Star => "star",
            Self::Heart => "heart",
            Self::Hexagon => "hexagon",
            Self::Pentagon => "pentagon",
            Self::Sun => "sun",
            Self::Moon => "moon",
            Self::Cloud => "cloud",
            Self::Flame => "flame",
            Self::Droplets => "droplets",
            Self::Zap => "zap",
            Self::Phone => "phone",
            Self::Mail => "mail",
            Self::ArrowUp => "arrow-up",
            Self::ArrowDown => "arrow-down",
            Self::ArrowLeft => "arrow-left",
            Self::ArrowRight => "arrow-right",
        }
    }
}

impl FromStr for ShapeKind {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.as_str() == s)
            .ok_or_else(|| EditError::UnknownShape(s.to_string()))
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The type of content an element contains.
///
/// The kind is fixed when the element is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    /// A text box.
    Text {
        /// Text content.
        content: String,
    },

    /// A vector shape.
    Shape {
        /// Which shape to draw.
        shape: ShapeKind,
    },

    /// A raster image.
    Image {
        /// Image source URI or base64 data URI. Never changes.
        src: String,
    },
}

impl ElementKind {
    /// Lowercase name of the kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Shape { .. } => "shape",
            Self::Image { .. } => "image",
        }
    }
}

/// Animation effects an element can enter with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum AnimationKind {
    #[default]
    None,
    FadeIn,
    SlideIn,
    Bounce,
    Zoom,
}

/// Entrance animation metadata. Stored only; never played back here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animation {
    /// Effect.
    pub kind: AnimationKind,
    /// Effect duration in milliseconds.
    pub duration_ms: u32,
    /// Delay before the effect starts, in milliseconds.
    pub delay_ms: u32,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            kind: AnimationKind::None,
            duration_ms: 500,
            delay_ms: 0,
        }
    }
}

/// Position, size and rotation in slide-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// X position (units from the slide's left edge).
    pub x: f32,
    /// Y position (units from the slide's top edge).
    pub y: f32,
    /// Width, always > 0.
    pub width: f32,
    /// Height, always > 0.
    pub height: f32,
    /// Clockwise rotation in degrees.
    pub rotation: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
        }
    }
}

impl Transform {
    /// Transform at a position with a size and no rotation.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: 0.0,
        }
    }
}

/// Check that a size can be given to an element.
///
/// # Errors
///
/// Returns [`EditError::InvalidSize`] unless both sides are finite and positive.
pub fn validate_size(width: f32, height: f32) -> EditResult<()> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(EditError::InvalidSize { width, height })
    }
}

/// Scale `(width, height)` down to fit a `max_width` x `max_height` box,
/// keeping the aspect ratio.
///
/// Width is clamped first and height second, so both bounds hold afterwards.
#[must_use]
pub fn fit_within(width: f32, height: f32, max_width: f32, max_height: f32) -> (f32, f32) {
    let (mut width, mut height) = (width, height);
    if width > max_width {
        height = height * max_width / width;
        width = max_width;
    }
    if height > max_height {
        width = width * max_height / height;
        height = max_height;
    }
    (width, height)
}

/// A slide element with content, placement, style and animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Element content type.
    pub kind: ElementKind,
    /// Position, size and rotation.
    pub transform: Transform,
    /// Presentation attributes.
    #[serde(default)]
    pub style: Style,
    /// Entrance animation.
    #[serde(default)]
    pub animation: Animation,
}

impl Element {
    /// Create a new element with the given kind and an empty style.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(),
            kind,
            transform: Transform::default(),
            style: Style::default(),
            animation: Animation::default(),
        }
    }

    /// Create a text box with the default text style.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(ElementKind::Text {
            content: content.into(),
        })
        .with_transform(Transform::new(100.0, 100.0, 200.0, 50.0))
        .with_style(Style::text_defaults())
    }

    /// Create a shape with the default fill and stroke.
    #[must_use]
    pub fn shape(shape: ShapeKind) -> Self {
        Self::new(ElementKind::Shape { shape })
            .with_transform(Transform::new(150.0, 150.0, 100.0, 100.0))
            .with_style(Style::shape_defaults())
    }

    /// Create an image from its natural pixel size, fitted into the default
    /// 300x200 box.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::InvalidSize`] if the natural size is not positive.
    pub fn image(src: impl Into<String>, width: f32, height: f32) -> EditResult<Self> {
        Self::image_within(src, width, height, IMAGE_MAX_WIDTH, IMAGE_MAX_HEIGHT)
    }

    /// Create an image fitted into a custom box.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::InvalidSize`] if the natural size or the box is not positive.
    pub fn image_within(
        src: impl Into<String>,
        width: f32,
        height: f32,
        max_width: f32,
        max_height: f32,
    ) -> EditResult<Self> {
        validate_size(width, height)?;
        validate_size(max_width, max_height)?;
        let (width, height) = fit_within(width, height, max_width, max_height);
        Ok(
            Self::new(ElementKind::Image { src: src.into() })
                .with_transform(Transform::new(100.0, 100.0, width, height)),
        )
    }

    /// Set the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the animation.
    #[must_use]
    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = animation;
        self
    }

    /// A copy of this element under a fresh ID.
    #[must_use]
    pub fn with_new_id(&self) -> Self {
        Self {
            id: ElementId::new(),
            ..self.clone()
        }
    }

    /// Whether this is a text box.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self.kind, ElementKind::Text { .. })
    }

    /// Image source, for image elements.
    #[must_use]
    pub fn image_source(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Image { src } => Some(src),
            _ => None,
        }
    }
}
