//! `EditorDocument` over a `<textarea>`.
//!
//! The textarea stays the source of truth. A `TextareaDocument` snapshots its
//! value and selection, lets a transform run on the snapshot, and writes text
//! and selection back in one step when the transform notifies. The write-back
//! dispatches a bubbling `input` event so preview and dirty-guard listeners
//! see programmatic edits exactly like typed ones.

use wasm_bindgen::JsCast;
use web_sys::{Event, EventInit, HtmlTextAreaElement};

use wiki_editor_core::{EditorDocument, EditorRope, Selection, TextBuffer};

pub struct TextareaDocument {
    element: HtmlTextAreaElement,
    buffer: EditorRope,
    selection: Selection,
}

impl TextareaDocument {
    /// Snapshot the textarea's current value and selection.
    pub fn load(element: HtmlTextAreaElement) -> Self {
        let buffer = EditorRope::from_str(&element.value());
        let start = utf16_offset(element.selection_start());
        let end = utf16_offset(element.selection_end());
        let mut selection = Selection::new(buffer.utf16_to_char(start), buffer.utf16_to_char(end));
        if element.selection_direction().ok().flatten().as_deref() == Some("backward") {
            selection = Selection::new(selection.head, selection.anchor);
        }
        Self {
            element,
            buffer,
            selection,
        }
    }

    pub fn element(&self) -> &HtmlTextAreaElement {
        &self.element
    }

    /// Write value and selection back to the textarea.
    pub fn commit(&self) {
        let sel = self.selection.clamped(self.buffer.len_chars());
        let start = self.buffer.char_to_utf16(sel.start()) as u32;
        let end = self.buffer.char_to_utf16(sel.end()) as u32;
        self.element.set_value(&self.buffer.to_string());
        if let Err(e) = self.element.set_selection_range(start, end) {
            tracing::debug!("setSelectionRange failed: {:?}", e);
        }
    }
}

fn utf16_offset(result: Result<Option<u32>, wasm_bindgen::JsValue>) -> usize {
    result.ok().flatten().unwrap_or(0) as usize
}

/// Fire a bubbling `input` event on `element`.
pub fn dispatch_input(element: &web_sys::EventTarget) {
    let init = EventInit::new();
    init.set_bubbles(true);
    match Event::new_with_event_init_dict("input", &init) {
        Ok(event) => {
            if let Err(e) = element.dispatch_event(&event) {
                tracing::warn!("input dispatch failed: {:?}", e);
            }
        }
        Err(e) => tracing::warn!("could not create input event: {:?}", e),
    }
}

impl EditorDocument for TextareaDocument {
    type Buffer = EditorRope;

    fn buffer(&self) -> &EditorRope {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut EditorRope {
        &mut self.buffer
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    fn notify_changed(&mut self) {
        self.commit();
        dispatch_input(self.element.unchecked_ref());
    }

    fn focus(&mut self) {
        if let Err(e) = self.element.focus() {
            tracing::debug!("focus failed: {:?}", e);
        }
    }
}
