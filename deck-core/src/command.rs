//! Keyboard chords and the editor commands they map to.

use serde::{Deserialize, Serialize};

use crate::element::ShapeKind;

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct KeyModifiers {
    /// Shift key pressed.
    pub shift: bool,
    /// Control key pressed.
    pub ctrl: bool,
    /// Alt/Option key pressed.
    pub alt: bool,
    /// Meta/Command key pressed.
    pub meta: bool,
}

impl KeyModifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    #[must_use]
    pub const fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// A key press with its modifiers.
///
/// `key` uses DOM `KeyboardEvent.key` names (`"z"`, `"Delete"`, `"ArrowRight"`,
/// `" "` for the space bar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChord {
    /// Key name.
    pub key: String,
    /// Active modifier keys.
    #[serde(default)]
    pub modifiers: KeyModifiers,
}

impl KeyChord {
    /// A chord with no modifiers.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: KeyModifiers::default(),
        }
    }

    /// Add Ctrl.
    #[must_use]
    pub const fn with_ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    /// Add Meta/Cmd.
    #[must_use]
    pub const fn with_meta(mut self) -> Self {
        self.modifiers.meta = true;
        self
    }

    /// Add Shift.
    #[must_use]
    pub const fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    fn is(&self, name: &str) -> bool {
        self.key.eq_ignore_ascii_case(name)
    }
}

/// What the keyboard handler needs to know about the editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyContext {
    /// A slideshow is running.
    pub presenting: bool,
    /// An element is selected.
    pub has_selection: bool,
    /// The selected element is a text box.
    pub text_selected: bool,
}

/// Everything the session can do in response to input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    /// Roll back one edit.
    Undo,
    /// Re-apply one undone edit.
    Redo,
    /// Delete the selected element.
    DeleteSelection,
    /// Toggle bold on the selected text.
    ToggleBold,
    /// Toggle italic on the selected text.
    ToggleItalic,
    /// Toggle underline on the selected text.
    ToggleUnderline,
    /// Append a slide.
    AddSlide,
    /// Add a text box to the active slide.
    AddTextBox,
    /// Add a shape to the active slide.
    AddShape {
        /// Shape to add.
        shape: ShapeKind,
    },
    /// Start the slideshow from the first slide.
    StartPresentation,
    /// Show the next slide.
    NextSlide,
    /// Show the previous slide.
    PrevSlide,
    /// Leave the slideshow.
    ExitPresentation,
    /// Zoom the editing canvas in one step.
    ZoomIn,
    /// Zoom the editing canvas out one step.
    ZoomOut,
    /// Show or hide the alignment grid.
    ToggleGrid,
    /// Show or hide the notes panel.
    ToggleNotes,
}

/// Map a chord to a command. Unmapped chords resolve to `None`.
#[must_use]
pub fn resolve(chord: &KeyChord, context: KeyContext) -> Option<Command> {
    if context.presenting {
        return resolve_presenting(chord);
    }

    let modifiers = chord.modifiers;
    if modifiers.command() {
        if chord.is("z") {
            return Some(if modifiers.shift {
                Command::Redo
            } else {
                Command::Undo
            });
        }
        if chord.is("y") {
            return Some(Command::Redo);
        }
        if !context.text_selected {
            return None;
        }
        return match chord.key.to_ascii_lowercase().as_str() {
            "b" => Some(Command::ToggleBold),
            "i" => Some(Command::ToggleItalic),
            "u" => Some(Command::ToggleUnderline),
            _ => None,
        };
    }

    if context.has_selection && (chord.is("Delete") || chord.is("Backspace")) {
        return Some(Command::DeleteSelection);
    }
    None
}

fn resolve_presenting(chord: &KeyChord) -> Option<Command> {
    match chord.key.as_str() {
        "ArrowRight" | "PageDown" | " " | "Spacebar" => Some(Command::NextSlide),
        "ArrowLeft" | "PageUp" => Some(Command::PrevSlide),
        "Escape" | "Esc" => Some(Command::ExitPresentation),
        _ => None,
    }
}
