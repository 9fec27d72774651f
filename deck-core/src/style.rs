//! Whole-element presentation attributes.
//!
//! A [`Style`] is a bag of independently optional fields. Text elements use
//! the font fields, shapes use fill and stroke, and every field that is left
//! unset falls back to the defaults in [`ResolvedStyle`] when rendered.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An RGBA color.
///
/// Serialized as a CSS-style string: `#rrggbb`, `#rrggbbaa` or `transparent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Create an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Create a color with alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Whether the color is fully transparent.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }
}

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid color: {0:?}")]
pub struct ColorParseError(String);

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("transparent") {
            return Ok(Self::TRANSPARENT);
        }
        let err = || ColorParseError(s.to_string());
        let hex = trimmed.strip_prefix('#').ok_or_else(err)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let nibble = |i: usize| {
            u8::from_str_radix(&hex[i..=i], 16)
                .map(|n| n * 0x11)
                .map_err(|_| err())
        };
        match hex.len() {
            3 => Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(err()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::TRANSPARENT {
            f.write_str("transparent")
        } else if self.a == 0xff {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

impl FontWeight {
    /// The other weight.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Normal => Self::Bold,
            Self::Bold => Self::Normal,
        }
    }
}

/// Font slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright.
    #[default]
    Normal,
    /// Italic.
    Italic,
}

impl FontStyle {
    /// The other slant.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Normal => Self::Italic,
            Self::Italic => Self::Normal,
        }
    }
}

/// Text decoration line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDecoration {
    /// No decoration.
    #[default]
    None,
    /// Underlined.
    Underline,
}

impl TextDecoration {
    /// The other decoration.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::None => Self::Underline,
            Self::Underline => Self::None,
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
    /// Justified.
    Justify,
}

/// Default font family for new text.
pub const DEFAULT_FONT_FAMILY: &str = "Segoe UI";

/// Optional presentation attributes of an element.
///
/// Also used as a patch for [`Style::merge`]: `Some` fields overwrite,
/// `None` fields leave the target untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Font family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Font size in logical pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    /// Font weight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    /// Font slant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    /// Text decoration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,
    /// Text color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Box background color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    /// Text alignment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    /// Line height as a multiple of the font size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    /// Extra letter spacing in logical pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f32>,
    /// Shape fill.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    /// Shape outline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,
    /// Outline width in logical pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,
    /// Opacity from 0.0 to 1.0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    /// Corner radius in logical pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f32>,
}

impl Style {
    /// Style given to new text boxes.
    #[must_use]
    pub fn text_defaults() -> Self {
        Self {
            font_family: Some(DEFAULT_FONT_FAMILY.to_string()),
            font_size: Some(16.0),
            font_weight: Some(FontWeight::Normal),
            font_style: Some(FontStyle::Normal),
            text_decoration: Some(TextDecoration::None),
            color: Some(Color::BLACK),
            background_color: Some(Color::TRANSPARENT),
            text_align: Some(TextAlign::Left),
            line_height: Some(1.2),
            ..Self::default()
        }
    }

    /// Style given to new shapes.
    #[must_use]
    pub fn shape_defaults() -> Self {
        Self {
            fill: Some(Color::rgb(0x42, 0x85, 0xf4)),
            stroke: Some(Color::rgb(0x1a, 0x73, 0xe8)),
            stroke_width: Some(2.0),
            ..Self::default()
        }
    }

    /// Shallow merge: every `Some` field of `patch` overwrites this style.
    pub fn merge(&mut self, patch: &Self) {
        merge_field(&mut self.font_family, patch.font_family.as_ref());
        merge_field(&mut self.font_size, patch.font_size.as_ref());
        merge_field(&mut self.font_weight, patch.font_weight.as_ref());
        merge_field(&mut self.font_style, patch.font_style.as_ref());
        merge_field(&mut self.text_decoration, patch.text_decoration.as_ref());
        merge_field(&mut self.color, patch.color.as_ref());
        merge_field(&mut self.background_color, patch.background_color.as_ref());
        merge_field(&mut self.text_align, patch.text_align.as_ref());
        merge_field(&mut self.line_height, patch.line_height.as_ref());
        merge_field(&mut self.letter_spacing, patch.letter_spacing.as_ref());
        merge_field(&mut self.fill, patch.fill.as_ref());
        merge_field(&mut self.stroke, patch.stroke.as_ref());
        merge_field(&mut self.stroke_width, patch.stroke_width.as_ref());
        merge_field(&mut self.opacity, patch.opacity.as_ref());
        merge_field(&mut self.corner_radius, patch.corner_radius.as_ref());
    }

    /// Whether merging `patch` would leave this style unchanged.
    #[must_use]
    pub fn is_unchanged_by(&self, patch: &Self) -> bool {
        let mut merged = self.clone();
        merged.merge(patch);
        merged == *self
    }

    /// Fill in every unset field with its render-time default.
    #[must_use]
    pub fn resolve(&self) -> ResolvedStyle {
        let d = ResolvedStyle::default();
        ResolvedStyle {
            font_family: self.font_family.clone().unwrap_or(d.font_family),
            font_size: self.font_size.unwrap_or(d.font_size),
            font_weight: self.font_weight.unwrap_or(d.font_weight),
            font_style: self.font_style.unwrap_or(d.font_style),
            text_decoration: self.text_decoration.unwrap_or(d.text_decoration),
            color: self.color.unwrap_or(d.color),
            background_color: self.background_color.unwrap_or(d.background_color),
            text_align: self.text_align.unwrap_or(d.text_align),
            line_height: self.line_height.unwrap_or(d.line_height),
            letter_spacing: self.letter_spacing.unwrap_or(d.letter_spacing),
            fill: self.fill.unwrap_or(d.fill),
            stroke: self.stroke.unwrap_or(d.stroke),
            stroke_width: self.stroke_width.unwrap_or(d.stroke_width),
            opacity: self.opacity.unwrap_or(d.opacity),
            corner_radius: self.corner_radius.unwrap_or(d.corner_radius),
        }
    }
}

fn merge_field<T: Clone>(target: &mut Option<T>, patch: Option<&T>) {
    if let Some(value) = patch {
        *target = Some(value.clone());
    }
}

/// A style with every field decided, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(missing_docs)] // mirrors `Style` field for field
pub struct ResolvedStyle {
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub text_decoration: TextDecoration,
    pub color: Color,
    pub background_color: Color,
    pub text_align: TextAlign,
    pub line_height: f32,
    pub letter_spacing: f32,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f32,
    pub opacity: f32,
    pub corner_radius: f32,
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: 16.0,
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            text_decoration: TextDecoration::None,
            color: Color::BLACK,
            background_color: Color::TRANSPARENT,
            text_align: TextAlign::Left,
            line_height: 1.2,
            letter_spacing: 0.0,
            fill: Color::TRANSPARENT,
            stroke: Color::TRANSPARENT,
            stroke_width: 0.0,
            opacity: 1.0,
            corner_radius: 0.0,
        }
    }
}
