//! WebAssembly bindings for deck-core.
//!
//! IDs cross the boundary as strings and structured values as JSON. Every
//! fallible method returns `Err(String)` instead of throwing a panic.

use std::fmt::Display;

use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

use crate::{
    Animation, Color, Command, EditorConfig, ElementId, KeyChord, Layout, Session, ShapeKind,
    SlideId, Style, Transition, ZOrder,
};

/// Initialize the deck WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Editor instance for WASM.
#[wasm_bindgen]
pub struct WasmEditor {
    session: Session,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor with one empty slide.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            session: Session::new(),
        }
    }

    /// Create an editor from a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns an error string if the configuration is invalid.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str) -> Result<WasmEditor, String> {
        let config = EditorConfig::from_json(json).map_err(to_message)?;
        Ok(Self {
            session: Session::with_config(config),
        })
    }

    // -- Queries ------------------------------------------------------------

    /// Get the document (slides, active slide, selection) as JSON.
    #[wasm_bindgen(js_name = getDocumentJson)]
    #[must_use]
    pub fn get_document_json(&self) -> String {
        serde_json::to_string(self.session.document()).unwrap_or_default()
    }

    /// Get canvas size, zoom, grid and notes visibility as JSON.
    #[wasm_bindgen(js_name = getViewJson)]
    #[must_use]
    pub fn get_view_json(&self) -> String {
        serde_json::to_string(&self.session.view()).unwrap_or_default()
    }

    /// Get the slideshow state as JSON.
    #[wasm_bindgen(js_name = getPresentationJson)]
    #[must_use]
    pub fn get_presentation_json(&self) -> String {
        let state = self.session.presentation().state(self.session.document());
        serde_json::to_string(&state).unwrap_or_default()
    }

    /// ID of the active slide.
    #[wasm_bindgen(js_name = activeSlideId)]
    #[must_use]
    pub fn active_slide_id(&self) -> String {
        self.session.document().active_slide_id().to_string()
    }

    /// ID of the selected element, if any.
    #[wasm_bindgen(js_name = selectedElementId)]
    #[must_use]
    pub fn selected_element_id(&self) -> Option<String> {
        self.session
            .document()
            .selected_element_id()
            .map(|id| id.to_string())
    }

    /// Whether there is an edit to undo.
    #[wasm_bindgen(js_name = canUndo)]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    /// Whether there is an undone edit to redo.
    #[wasm_bindgen(js_name = canRedo)]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    /// Check if a slideshow is running.
    #[wasm_bindgen(js_name = isPresenting)]
    #[must_use]
    pub fn is_presenting(&self) -> bool {
        self.session.is_presenting()
    }

    // -- Input --------------------------------------------------------------

    /// Handle a key press given as `{"key": "...", "modifiers": {...}}`.
    ///
    /// Returns the executed command as JSON, or `undefined` if the key is
    /// unmapped.
    ///
    /// # Errors
    ///
    /// Returns an error string for malformed JSON or a rejected command.
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, chord_json: &str) -> Result<Option<String>, String> {
        let chord: KeyChord = parse_json(chord_json)?;
        let command = self.session.handle_key(&chord).map_err(to_message)?;
        Ok(command.and_then(|c| serde_json::to_string(&c).ok()))
    }

    /// Run a command given as JSON, e.g. `{"command": "zoomIn"}`.
    ///
    /// # Errors
    ///
    /// Returns an error string for malformed JSON or a rejected command.
    pub fn execute(&mut self, command_json: &str) -> Result<(), String> {
        let command: Command = parse_json(command_json)?;
        self.session.execute(&command).map_err(to_message)
    }

    /// Roll back one edit.
    pub fn undo(&mut self) -> bool {
        self.session.store_mut().undo()
    }

    /// Re-apply one undone edit.
    pub fn redo(&mut self) -> bool {
        self.session.store_mut().redo()
    }

    // -- Slides -------------------------------------------------------------

    /// Append a slide and make it active. Returns its ID.
    #[wasm_bindgen(js_name = addSlide)]
    pub fn add_slide(&mut self) -> String {
        self.session.store_mut().add_slide().to_string()
    }

    /// Delete a slide.
    ///
    /// # Errors
    ///
    /// Returns an error string for a bad ID or the last slide.
    #[wasm_bindgen(js_name = deleteSlide)]
    pub fn delete_slide(&mut self, slide_id: &str) -> Result<(), String> {
        let id = parse_slide_id(slide_id)?;
        self.session.store_mut().delete_slide(id).map_err(to_message)
    }

    /// Duplicate a slide. Returns the copy's ID.
    ///
    /// # Errors
    ///
    /// Returns an error string for a bad ID.
    #[wasm_bindgen(js_name = duplicateSlide)]
    pub fn duplicate_slide(&mut self, slide_id: &str) -> Result<String, String> {
        let id = parse_slide_id(slide_id)?;
        self.session
            .store_mut()
            .duplicate_slide(id)
            .map(|copy| copy.to_string())
            .map_err(to_message)
    }

    /// Move a slide to a new index.
    ///
    /// # Errors
    ///
    /// Returns an error string for a bad ID.
    #[wasm_bindgen(js_name = moveSlide)]
    pub fn move_slide(&mut self, slide_id: &str, to: usize) -> Result<(), String> {
        let id = parse_slide_id(slide_id)?;
        self.session.store_mut().move_slide(id, to).map_err(to_message)
    }

    /// Make a slide active.
    ///
    /// # Errors
    ///
    /// Returns an error string for a bad ID.
    #[wasm_bindgen(js_name = setActiveSlide)]
    pub fn set_active_slide(&mut self, slide_id: &str) -> Result<(), String> {
        let id = parse_slide_id(slide_id)?;
        self.session.store_mut().set_active_slide(id).map_err(to_message)
    }

    /// Set a slide's title, headline or notes. `field` is `"title"`,
    /// `"headline"` or `"notes"`.
    ///
    /// # Errors
    ///
    /// Returns an error string for a bad ID or field.
    #[wasm_bindgen(js_name = setSlideText)]
    pub fn set_slide_text(
        &mut self,
        slide_id: &str,
        field: &str,
        text: &str,
    ) -> Result<(), String> {
        let id = parse_slide_id(slide_id)?;
        let store = self.session.store_mut();
        let result = match field {
            "title" => store.set_slide_title(id, text),
            "headline" => store.set_slide_headline(id, text),
            "notes" => store.set_slide_notes(id, text),
            other => return Err(format!("Unknown slide field: {other}")),
        };
        result.map_err(to_message)
    }

    /// Set a slide's background color (`#rrggbb`).
    ///
    /// # Errors
    ///
    /// Returns an error string for a bad ID or color.
    #[wasm_bindgen(js_name = setSlideBackground)]
    pub fn set_slide_background(&mut self, slide_id: &str, color: &str) -> Result<(), String> {
        let id = parse_slide_id(slide_id)?;
        let color: Color = color.parse().map_err(to_message)?;
        self.session
            .store_mut()
            .set_slide_background(id, color)
            .map_err(to_message)
    }

    /// Set a slide's transition from JSON `{"kind": "fade", "duration_ms": 500}`.
    ///
    /// # Errors
    ///
    /// Returns an error string for a bad ID or JSON.
    #[wasm_bindgen(js_name = setSlideTransition)]
    pub fn set_slide_transition(&mut self, slide_id: &str, json: &str) -> Result<(), String> {
        let id = parse_slide_id(slide_id)?;
        let transition: Transition = parse_json(json)?;
        self.session
            .store_mut()
            .set_slide_transition(id, transition)
            .map_err(to_message)
    }

    /// Set a slide's layout (`"title"`, `"content"`, `"twoColumn"`, `"blank"`).
    ///
    /// # Errors
    ///
    /// Returns an error string for a bad ID or layout.
    #[wasm_bindgen(js_name = setSlideLayout)]
    pub fn set_slide_layout(&mut self, slide_id: &str, layout: &str) -> Result<(), String> {
        let id = parse_slide_id(slide_id)?;
        let layout: Layout = parse_tag(layout)?;
        self.session
            .store_mut()
            .set_slide_layout(id, layout)
            .map_err(to_message)
    }

    // -- Elements -----------------------------------------------------------

    /// Add a text box to the active slide. Returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error string if the element is rejected.
    #[wasm_bindgen(js_name = addTextBox)]
    pub fn add_text_box(&mut self) -> Result<String, String> {
        self.session
            .store_mut()
            .add_text_box()
            .map(|id| id.to_string())
            .map_err(to_message)
    }

    /// Add a shape (e.g. `"star"`, `"arrow-up"`) to the active slide.
    ///
    /// # Errors
    ///
    /// Returns an error string for an unknown shape.
    #[wasm_bindgen(js_name = addShape)]
    pub fn add_shape(&mut self, shape: &str) -> Result<String, String> {
        let shape: ShapeKind = shape.parse().map_err(to_message)?;
        self.session
            .store_mut()
            .add_shape(shape)
            .map(|id| id.to_string())
            .map_err(to_message)
    }

    /// Add an image with its natural size to the active slide.
    ///
    /// # Errors
    ///
    /// Returns an error string if the size is not positive.
    #[wasm_bindgen(js_name = addImage)]
    pub fn add_image(&mut self, src: &str, width: f32, height: f32) -> Result<String, String> {
        self.session
            .store_mut()
            .add_image(src, width, height)
            .map(|id| id.to_string())
            .map_err(to_message)
    }

    /// Delete an element.
    ///
    /// # Errors
    ///
    /// Returns an error string for bad IDs.
    #[wasm_bindgen(js_name = deleteElement)]
    pub fn delete_element(&mut self, slide_id: &str, element_id: &str) -> Result<(), String> {
        let (slide, element) = parse_ids(slide_id, element_id)?;
        self.session
            .store_mut()
            .delete_element(slide, element)
            .map_err(to_message)
    }

    /// Select an element of the active slide, or clear with `undefined`.
    ///
    /// # Errors
    ///
    /// Returns an error string for a bad ID.
    #[wasm_bindgen(js_name = selectElement)]
    #[allow(clippy::needless_pass_by_value)]
    pub fn select_element(&mut self, element_id: Option<String>) -> Result<(), String> {
        let element = element_id.as_deref().map(parse_element_id).transpose()?;
        self.session
            .store_mut()
            .select_element(element)
            .map_err(to_message)
    }

    /// Merge a JSON style patch into an element.
    ///
    /// # Errors
    ///
    /// Returns an error string for bad IDs or JSON.
    #[wasm_bindgen(js_name = updateElementStyle)]
    pub fn update_element_style(
        &mut self,
        slide_id: &str,
        element_id: &str,
        style_json: &str,
    ) -> Result<(), String> {
        let (slide, element) = parse_ids(slide_id, element_id)?;
        let patch: Style = parse_json(style_json)?;
        self.session
            .store_mut()
            .update_element_style(slide, element, &patch)
            .map_err(to_message)
    }

    /// Replace a text box's text or a shape's tag.
    ///
    /// # Errors
    ///
    /// Returns an error string for bad IDs or an image target.
    #[wasm_bindgen(js_name = updateElementContent)]
    pub fn update_element_content(
        &mut self,
        slide_id: &str,
        element_id: &str,
        content: &str,
    ) -> Result<(), String> {
        let (slide, element) = parse_ids(slide_id, element_id)?;
        self.session
            .store_mut()
            .update_element_content(slide, element, content)
            .map_err(to_message)
    }

    /// Move an element.
    ///
    /// # Errors
    ///
    /// Returns an error string for bad IDs or coordinates.
    #[wasm_bindgen(js_name = moveElement)]
    pub fn move_element(
        &mut self,
        slide_id: &str,
        element_id: &str,
        x: f32,
        y: f32,
    ) -> Result<(), String> {
        let (slide, element) = parse_ids(slide_id, element_id)?;
        self.session
            .store_mut()
            .move_element(slide, element, x, y)
            .map_err(to_message)
    }

    /// Resize an element.
    ///
    /// # Errors
    ///
    /// Returns an error string for bad IDs or sizes.
    #[wasm_bindgen(js_name = resizeElement)]
    pub fn resize_element(
        &mut self,
        slide_id: &str,
        element_id: &str,
        width: f32,
        height: f32,
    ) -> Result<(), String> {
        let (slide, element) = parse_ids(slide_id, element_id)?;
        self.session
            .store_mut()
            .resize_element(slide, element, width, height)
            .map_err(to_message)
    }

    /// Rotate an element to an angle in degrees.
    ///
    /// # Errors
    ///
    /// Returns an error string for bad IDs or angles.
    #[wasm_bindgen(js_name = rotateElement)]
    pub fn rotate_element(
        &mut self,
        slide_id: &str,
        element_id: &str,
        degrees: f32,
    ) -> Result<(), String> {
        let (slide, element) = parse_ids(slide_id, element_id)?;
        self.session
            .store_mut()
            .rotate_element(slide, element, degrees)
            .map_err(to_message)
    }

    /// Change paint order (`"forward"`, `"backward"`, `"front"`, `"back"`).
    ///
    /// # Errors
    ///
    /// Returns an error string for bad IDs or order.
    #[wasm_bindgen(js_name = reorderElement)]
    pub fn reorder_element(
        &mut self,
        slide_id: &str,
        element_id: &str,
        order: &str,
    ) -> Result<bool, String> {
        let (slide, element) = parse_ids(slide_id, element_id)?;
        let order: ZOrder = parse_tag(order)?;
        self.session
            .store_mut()
            .reorder_element(slide, element, order)
            .map_err(to_message)
    }

    /// Set an element's animation from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string for bad IDs or JSON.
    #[wasm_bindgen(js_name = setElementAnimation)]
    pub fn set_element_animation(
        &mut self,
        slide_id: &str,
        element_id: &str,
        json: &str,
    ) -> Result<(), String> {
        let (slide, element) = parse_ids(slide_id, element_id)?;
        let animation: Animation = parse_json(json)?;
        self.session
            .store_mut()
            .set_element_animation(slide, element, animation)
            .map_err(to_message)
    }
}

impl Default for WasmEditor {
    fn default() -> Self {
        Self::new()
    }
}

fn to_message(e: impl Display) -> String {
    e.to_string()
}

fn parse_json<T: DeserializeOwned>(json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(to_message)
}

/// Parse a bare enum tag such as `twoColumn` without JSON quotes.
fn parse_tag<T: DeserializeOwned>(tag: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(tag.to_string())).map_err(to_message)
}

fn parse_slide_id(id: &str) -> Result<SlideId, String> {
    SlideId::parse(id).map_err(|e| format!("Invalid slide id {id}: {e}"))
}

fn parse_element_id(id: &str) -> Result<ElementId, String> {
    ElementId::parse(id).map_err(|e| format!("Invalid element id {id}: {e}"))
}

fn parse_ids(slide_id: &str, element_id: &str) -> Result<(SlideId, ElementId), String> {
    Ok((parse_slide_id(slide_id)?, parse_element_id(element_id)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(editor: &WasmEditor) -> serde_json::Value {
        serde_json::from_str(&editor.get_document_json()).expect("valid JSON")
    }

    #[test]
    fn wasm_editor_new_has_one_slide() {
        let editor = WasmEditor::new();
        let doc = document(&editor);
        assert_eq!(doc["slides"].as_array().map(Vec::len), Some(1));
        assert!(!editor.can_undo());
        assert!(!editor.is_presenting());
    }

    #[test]
    fn wasm_editor_default_trait_works() {
        let editor = WasmEditor::default();
        assert!(editor.selected_element_id().is_none());
    }

    #[test]
    fn with_config_rejects_invalid_json() {
        assert!(WasmEditor::with_config("{ not json }").is_err());
        assert!(WasmEditor::with_config(r#"{"history_capacity": 5}"#).is_ok());
    }

    #[test]
    fn add_text_box_selects_and_serializes() {
        let mut editor = WasmEditor::new();
        let id = editor.add_text_box().expect("add");
        assert_eq!(editor.selected_element_id(), Some(id.clone()));

        let doc = document(&editor);
        let element = &doc["slides"][0]["elements"][0];
        assert_eq!(element["id"], serde_json::Value::String(id));
        assert_eq!(element["kind"]["type"], "text");
        assert_eq!(element["style"]["font_family"], "Segoe UI");
    }

    #[test]
    fn element_edits_by_string_id() {
        let mut editor = WasmEditor::new();
        let slide = editor.active_slide_id();
        let id = editor.add_shape("star").expect("add");

        editor.move_element(&slide, &id, 5.0, 6.0).expect("move");
        editor
            .update_element_style(&slide, &id, r##"{"fill": "#ff0000"}"##)
            .expect("style");
        editor
            .update_element_content(&slide, &id, "heart")
            .expect("content");

        let doc = document(&editor);
        let element = &doc["slides"][0]["elements"][0];
        assert_eq!(element["style"]["fill"], "#ff0000");
        assert_eq!(element["kind"]["shape"], "heart");

        editor.add_shape("diamond").expect("diamond");
        let doc = document(&editor);
        assert_eq!(doc["slides"][0]["elements"][1]["kind"]["shape"], "diamond");
    }

    #[test]
    fn bad_ids_are_errors_not_panics() {
        let mut editor = WasmEditor::new();
        assert!(editor.delete_slide("not-a-uuid").is_err());
        let slide = editor.active_slide_id();
        assert!(editor.delete_slide(&slide).is_err());
        assert!(editor
            .delete_element(&slide, &ElementId::new().to_string())
            .is_err());
        assert!(editor.add_shape("blob").is_err());
    }

    #[test]
    fn slide_setters_parse_tags() {
        let mut editor = WasmEditor::new();
        let slide = editor.active_slide_id();
        editor.set_slide_layout(&slide, "twoColumn").expect("layout");
        editor.set_slide_background(&slide, "#e3f2fd").expect("bg");
        editor
            .set_slide_transition(&slide, r#"{"kind": "fade", "duration_ms": 1000}"#)
            .expect("transition");
        editor.set_slide_text(&slide, "notes", "hello").expect("notes");
        assert!(editor.set_slide_text(&slide, "footer", "x").is_err());

        let doc = document(&editor);
        assert_eq!(doc["slides"][0]["layout"], "twoColumn");
        assert_eq!(doc["slides"][0]["background"], "#e3f2fd");
        assert_eq!(doc["slides"][0]["notes"], "hello");
    }

    #[test]
    fn handle_key_returns_command_json() {
        let mut editor = WasmEditor::new();
        editor.add_text_box().expect("add");
        let ran = editor
            .handle_key(r#"{"key": "b", "modifiers": {"ctrl": true}}"#)
            .expect("bold");
        assert_eq!(ran.as_deref(), Some(r#"{"command":"toggleBold"}"#));

        let unmapped = editor.handle_key(r#"{"key": "q"}"#).expect("unmapped");
        assert!(unmapped.is_none());
        assert!(editor.handle_key("nope").is_err());
    }

    #[test]
    fn execute_and_undo() {
        let mut editor = WasmEditor::new();
        editor.execute(r#"{"command": "addSlide"}"#).expect("add");
        assert!(editor.can_undo());
        assert!(editor.undo());
        assert!(editor.redo());
        editor.execute(r#"{"command": "zoomIn"}"#).expect("zoom");
        let view: serde_json::Value =
            serde_json::from_str(&editor.get_view_json()).expect("view");
        assert_eq!(view["zoom"], 110);
        assert_eq!(view["canvasWidth"], 720.0);
    }

    #[test]
    fn presentation_json() {
        let mut editor = WasmEditor::new();
        editor.execute(r#"{"command": "startPresentation"}"#).expect("start");
        assert!(editor.is_presenting());
        assert_eq!(
            editor.get_presentation_json(),
            r#"{"mode":"presenting","position":0}"#
        );
    }
}
