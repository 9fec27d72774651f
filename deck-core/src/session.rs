//! The editor session: the single object a UI drives.
//!
//! A session owns the document store, the slideshow controller, the
//! configuration and the view settings, and routes keyboard input through
//! [`crate::command::resolve`].

use serde::Serialize;

use crate::command::{self, Command, KeyChord, KeyContext};
use crate::config::{EditorConfig, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::error::EditResult;
use crate::presentation::{PresentationController, Progress};
use crate::{Document, DocumentStore, Slide};

#[cfg(feature = "images")]
use crate::{
    ingest::{DecodedImage, IngestError},
    ElementId,
};

/// Default zoom, in percent.
pub const DEFAULT_ZOOM: u16 = 100;

/// Canvas view settings. None of these are part of the document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSettings {
    /// Logical canvas width that element coordinates refer to.
    pub canvas_width: f32,
    /// Logical canvas height.
    pub canvas_height: f32,
    /// Zoom in percent.
    pub zoom: u16,
    /// Alignment grid visible.
    pub show_grid: bool,
    /// Notes panel visible.
    pub show_notes: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            zoom: DEFAULT_ZOOM,
            show_grid: false,
            show_notes: true,
        }
    }
}

/// Store, slideshow, configuration and view settings together.
#[derive(Debug, Clone)]
pub struct Session {
    config: EditorConfig,
    store: DocumentStore,
    presentation: PresentationController,
    view: ViewSettings,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Create a session with the given configuration.
    #[must_use]
    pub fn with_config(config: EditorConfig) -> Self {
        let view = ViewSettings {
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
            zoom: DEFAULT_ZOOM.max(config.zoom_min).min(config.zoom_max),
            ..ViewSettings::default()
        };
        Self {
            store: DocumentStore::with_config(&config),
            presentation: PresentationController::new(),
            view,
            config,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The document store.
    #[must_use]
    pub const fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Mutable access to the document store for editing operations.
    pub fn store_mut(&mut self) -> &mut DocumentStore {
        &mut self.store
    }

    /// The live document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        self.store.document()
    }

    /// Whether there is an edit to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    /// Whether there is an undone edit to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    // -----------------------------------------------------------------------
    // Slideshow
    // -----------------------------------------------------------------------

    /// The slideshow controller.
    #[must_use]
    pub const fn presentation(&self) -> &PresentationController {
        &self.presentation
    }

    /// Check if a slideshow is running.
    #[must_use]
    pub const fn is_presenting(&self) -> bool {
        self.presentation.is_presenting()
    }

    /// Start the slideshow from the first slide.
    pub fn start_presentation(&mut self) {
        self.presentation.start();
    }

    /// Start the slideshow from `index`.
    pub fn start_presentation_at(&mut self, index: usize) {
        self.presentation
            .start_at(index, self.store.document().slide_count());
    }

    /// Show the next slide.
    pub fn next_slide(&mut self) -> bool {
        self.presentation.next(self.store.document())
    }

    /// Show the previous slide.
    pub fn prev_slide(&mut self) -> bool {
        self.presentation.prev(self.store.document())
    }

    /// Leave the slideshow.
    pub fn exit_presentation(&mut self) {
        self.presentation.exit();
    }

    /// The slide on screen during a slideshow.
    #[must_use]
    pub fn presented_slide(&self) -> Option<&Slide> {
        self.presentation.current_slide(self.store.document())
    }

    /// Slideshow progress.
    #[must_use]
    pub fn progress(&self) -> Option<Progress> {
        self.presentation.progress(self.store.document())
    }

    // -----------------------------------------------------------------------
    // View
    // -----------------------------------------------------------------------

    /// Current view settings.
    #[must_use]
    pub const fn view(&self) -> ViewSettings {
        self.view
    }

    /// Set the zoom, clamped to the configured range.
    pub fn set_zoom(&mut self, percent: u16) -> u16 {
        self.view.zoom = percent.max(self.config.zoom_min).min(self.config.zoom_max);
        self.view.zoom
    }

    /// Zoom in one step.
    pub fn zoom_in(&mut self) -> u16 {
        self.set_zoom(self.view.zoom.saturating_add(self.config.zoom_step))
    }

    /// Zoom out one step.
    pub fn zoom_out(&mut self) -> u16 {
        self.set_zoom(self.view.zoom.saturating_sub(self.config.zoom_step))
    }

    /// Show or hide the grid. Returns the new visibility.
    pub fn toggle_grid(&mut self) -> bool {
        self.view.show_grid = !self.view.show_grid;
        self.view.show_grid
    }

    /// Show or hide the notes panel. Returns the new visibility.
    pub fn toggle_notes(&mut self) -> bool {
        self.view.show_notes = !self.view.show_notes;
        self.view.show_notes
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Keyboard context for the current state.
    #[must_use]
    pub fn key_context(&self) -> KeyContext {
        let selected = self.store.document().selected_element();
        KeyContext {
            presenting: self.is_presenting(),
            has_selection: selected.is_some(),
            text_selected: selected.is_some_and(crate::Element::is_text),
        }
    }

    /// Resolve a key press and run the command it maps to.
    ///
    /// Returns the command that ran, or `None` for unmapped chords.
    ///
    /// # Errors
    ///
    /// Propagates the error of the command that ran.
    pub fn handle_key(&mut self, chord: &KeyChord) -> EditResult<Option<Command>> {
        let Some(command) = command::resolve(chord, self.key_context()) else {
            return Ok(None);
        };
        self.execute(&command)?;
        Ok(Some(command))
    }

    /// Run a command.
    ///
    /// # Errors
    ///
    /// Propagates the store error for editing commands.
    pub fn execute(&mut self, command: &Command) -> EditResult<()> {
        tracing::debug!(?command, "Executing command");
        match command {
            Command::Undo => {
                self.store.undo();
            }
            Command::Redo => {
                self.store.redo();
            }
            Command::DeleteSelection => self.store.delete_selection()?,
            Command::ToggleBold => self.store.toggle_bold()?,
            Command::ToggleItalic => self.store.toggle_italic()?,
            Command::ToggleUnderline => self.store.toggle_underline()?,
            Command::AddSlide => {
                self.store.add_slide();
            }
            Command::AddTextBox => {
                self.store.add_text_box()?;
            }
            Command::AddShape { shape } => {
                self.store.add_shape(*shape)?;
            }
            Command::StartPresentation => self.start_presentation(),
            Command::NextSlide => {
                self.next_slide();
            }
            Command::PrevSlide => {
                self.prev_slide();
            }
            Command::ExitPresentation => self.exit_presentation(),
            Command::ZoomIn => {
                self.zoom_in();
            }
            Command::ZoomOut => {
                self.zoom_out();
            }
            Command::ToggleGrid => {
                self.toggle_grid();
            }
            Command::ToggleNotes => {
                self.toggle_notes();
            }
        }
        Ok(())
    }

    /// Add one image element per successfully decoded file, in the order
    /// given. Failures are logged and skipped.
    #[cfg(feature = "images")]
    #[allow(clippy::cast_precision_loss)]
    pub fn insert_ingested(
        &mut self,
        results: Vec<Result<DecodedImage, IngestError>>,
    ) -> Vec<ElementId> {
        let mut inserted = Vec::new();
        for result in results {
            let image = match result {
                Ok(image) => image,
                Err(e) => {
                    tracing::warn!("Skipping image: {e}");
                    continue;
                }
            };
            match self
                .store
                .add_image(image.src, image.width as f32, image.height as f32)
            {
                Ok(id) => inserted.push(id),
                Err(e) => tracing::warn!("Failed to insert {}: {e}", image.name),
            }
        }
        inserted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ShapeKind;
    use crate::style::FontWeight;

    #[test]
    fn test_defaults() {
        let session = Session::new();
        assert_eq!(session.view(), ViewSettings::default());
        assert_eq!(session.view().zoom, 100);
        assert!(session.view().show_notes);
        assert!(!session.is_presenting());
        assert_eq!(session.document().slide_count(), 1);
    }

    #[test]
    fn test_view_carries_configured_canvas() {
        let config = EditorConfig::default().with_canvas_size(1280.0, 720.0);
        let session = Session::with_config(config);
        let view = session.view();
        assert!((view.canvas_width - 1280.0).abs() < f32::EPSILON);
        assert!((view.canvas_height - 720.0).abs() < f32::EPSILON);

        let json = serde_json::to_value(Session::new().view()).expect("serialize");
        assert_eq!(json["canvasWidth"], 720.0);
        assert_eq!(json["canvasHeight"], 540.0);
    }

    #[test]
    fn test_zoom_steps_and_clamps() {
        let mut session = Session::new();
        assert_eq!(session.zoom_in(), 110);
        assert_eq!(session.zoom_out(), 100);
        assert_eq!(session.set_zoom(1000), 400);
        assert_eq!(session.zoom_in(), 400);
        assert_eq!(session.set_zoom(0), 10);
        assert_eq!(session.zoom_out(), 10);
    }

    #[test]
    fn test_view_toggles() {
        let mut session = Session::new();
        assert!(session.toggle_grid());
        assert!(!session.toggle_notes());
        session.execute(&Command::ToggleGrid).expect("toggle");
        assert!(!session.view().show_grid);
    }

    #[test]
    fn test_keyboard_bold_on_text() {
        let mut session = Session::new();
        session.execute(&Command::AddTextBox).expect("add");
        let ran = session
            .handle_key(&KeyChord::new("b").with_ctrl())
            .expect("bold");
        assert_eq!(ran, Some(Command::ToggleBold));
        let weight = session
            .document()
            .selected_element()
            .and_then(|e| e.style.font_weight);
        assert_eq!(weight, Some(FontWeight::Bold));
    }

    #[test]
    fn test_keyboard_bold_on_shape_is_unmapped() {
        let mut session = Session::new();
        session
            .execute(&Command::AddShape {
                shape: ShapeKind::Triangle,
            })
            .expect("add");
        let ran = session
            .handle_key(&KeyChord::new("b").with_ctrl())
            .expect("no-op");
        assert_eq!(ran, None);
    }

    #[test]
    fn test_keyboard_delete_then_undo() {
        let mut session = Session::new();
        session.execute(&Command::AddTextBox).expect("add");
        session.handle_key(&KeyChord::new("Delete")).expect("delete");
        assert!(session.document().active_slide().is_empty());

        session
            .handle_key(&KeyChord::new("z").with_ctrl())
            .expect("undo");
        assert_eq!(session.document().active_slide().element_count(), 1);
        session
            .handle_key(&KeyChord::new("z").with_ctrl().with_shift())
            .expect("redo");
        assert!(session.document().active_slide().is_empty());
    }

    #[test]
    fn test_presentation_keys_navigate() {
        let mut session = Session::new();
        session.execute(&Command::AddSlide).expect("add");
        session.execute(&Command::StartPresentation).expect("start");
        assert_eq!(session.progress().map(|p| p.to_string()).as_deref(), Some("1 / 2"));

        session.handle_key(&KeyChord::new("ArrowRight")).expect("next");
        session.handle_key(&KeyChord::new("ArrowRight")).expect("clamped");
        assert_eq!(session.progress().map(|p| p.current), Some(2));

        session.handle_key(&KeyChord::new("Escape")).expect("exit");
        assert!(!session.is_presenting());
        assert_eq!(session.document().slide_count(), 2);
    }

    #[test]
    fn test_editing_keys_ignored_while_presenting() {
        let mut session = Session::new();
        session.execute(&Command::AddSlide).expect("add");
        session.start_presentation();
        let ran = session
            .handle_key(&KeyChord::new("z").with_ctrl())
            .expect("ignored");
        assert_eq!(ran, None);
        assert_eq!(session.document().slide_count(), 2);
    }

    #[cfg(feature = "images")]
    #[test]
    fn test_insert_ingested_skips_failures() {
        let mut session = Session::new();
        let results = vec![
            Ok(DecodedImage {
                name: "wide.png".to_string(),
                src: "data:image/png;base64,AA".to_string(),
                width: 600,
                height: 100,
                format: crate::ingest::ImageFormat::Png,
            }),
            Err(IngestError::Empty {
                name: "empty.png".to_string(),
            }),
        ];
        let inserted = session.insert_ingested(results);
        assert_eq!(inserted.len(), 1);

        let slide = session.document().active_slide();
        let image = slide.element(inserted[0]).expect("image");
        assert!((image.transform.width - 300.0).abs() < f32::EPSILON);
        assert!((image.transform.height - 50.0).abs() < f32::EPSILON);
        assert_eq!(image.image_source(), Some("data:image/png;base64,AA"));
    }
}
