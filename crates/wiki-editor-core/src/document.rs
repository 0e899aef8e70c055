//! Core editor document trait and implementations.
//!
//! Defines the `EditorDocument` trait for abstracting the editing surface,
//! so the selection transforms run the same against a browser textarea and
//! against a plain in-memory document in tests.

use std::ops::Range;

use smol_str::SmolStr;

use crate::text::TextBuffer;
use crate::types::Selection;

/// Core trait for editor documents.
///
/// A document owns the authoritative text and the caret/selection range.
/// Transforms mutate the buffer and the selection, then call [`focus`] and
/// [`notify_changed`] so downstream listeners (preview, dirty guard) see the
/// mutation before the transform returns.
///
/// [`focus`]: EditorDocument::focus
/// [`notify_changed`]: EditorDocument::notify_changed
pub trait EditorDocument {
    /// The buffer type used for text storage.
    type Buffer: TextBuffer;

    // === Required: Buffer access ===

    /// Get a reference to the underlying buffer.
    fn buffer(&self) -> &Self::Buffer;

    /// Get a mutable reference to the underlying buffer.
    fn buffer_mut(&mut self) -> &mut Self::Buffer;

    // === Required: Selection state ===

    /// Get the current selection. A caret is a collapsed selection.
    fn selection(&self) -> Selection;

    /// Set the selection.
    fn set_selection(&mut self, selection: Selection);

    // === Required: Surface notifications ===

    /// Emit a change notification to whoever listens on the surface.
    fn notify_changed(&mut self);

    /// Return input focus to the editing surface.
    fn focus(&mut self) {}

    // === Provided: Convenience accessors ===

    /// Get the full content as a String.
    fn content_string(&self) -> String {
        self.buffer().to_string()
    }

    /// Get length in characters.
    fn len_chars(&self) -> usize {
        self.buffer().len_chars()
    }

    /// Check if document is empty.
    fn is_empty(&self) -> bool {
        self.buffer().len_chars() == 0
    }

    /// Get a slice of the content.
    fn slice(&self, range: Range<usize>) -> Option<SmolStr> {
        self.buffer().slice(range)
    }

    /// Selection ordered and clamped to the current content.
    fn clamped_selection(&self) -> Selection {
        self.selection().clamped(self.len_chars())
    }

    /// Get selected text. Empty for a caret.
    fn selected_text(&self) -> SmolStr {
        self.slice(self.clamped_selection().to_range())
            .unwrap_or_default()
    }

    // === Provided: Text operations ===

    /// Insert text at char offset, leaving a caret after it.
    fn insert(&mut self, offset: usize, text: &str) {
        self.buffer_mut().insert(offset, text);
        let caret = offset + text.chars().count();
        self.set_selection(Selection::collapsed(caret));
    }

    /// Delete char range, leaving a caret at its start.
    fn delete(&mut self, range: Range<usize>) {
        let start = range.start;
        self.buffer_mut().delete(range);
        self.set_selection(Selection::collapsed(start));
    }

    /// Replace char range with text, leaving a caret after the new text.
    fn replace(&mut self, range: Range<usize>, text: &str) {
        let start = range.start;
        self.buffer_mut().replace(range, text);
        let caret = start + text.chars().count();
        self.set_selection(Selection::collapsed(caret));
    }
}

/// Callback invoked with the full content after every change notification.
pub type ChangeListener = Box<dyn FnMut(&str)>;

/// Simple field-based implementation of EditorDocument.
///
/// Stores selection and focus as plain fields and fans change
/// notifications out to registered listeners. Use this for non-DOM
/// contexts or as a base for testing.
pub struct PlainEditor<T: TextBuffer> {
    buffer: T,
    selection: Selection,
    focused: bool,
    changes: u64,
    listeners: Vec<ChangeListener>,
}

impl<T: TextBuffer + Default> Default for PlainEditor<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: TextBuffer> PlainEditor<T> {
    /// Create a new editor with the given buffer and a caret at the start.
    pub fn new(buffer: T) -> Self {
        Self {
            buffer,
            selection: Selection::default(),
            focused: false,
            changes: 0,
            listeners: Vec::new(),
        }
    }

    /// Register a listener for change notifications.
    pub fn on_change(&mut self, listener: impl FnMut(&str) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Number of change notifications emitted so far.
    pub fn change_count(&self) -> u64 {
        self.changes
    }

    /// Whether a transform has focused this document.
    pub fn is_focused(&self) -> bool {
        self.focused
    }
}

impl<T: TextBuffer> EditorDocument for PlainEditor<T> {
    type Buffer = T;

    fn buffer(&self) -> &Self::Buffer {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut Self::Buffer {
        &mut self.buffer
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    fn notify_changed(&mut self) {
        self.changes += 1;
        let content = self.buffer.to_string();
        for listener in &mut self.listeners {
            listener(&content);
        }
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::EditorRope;

    type TestEditor = PlainEditor<EditorRope>;

    fn make_editor(content: &str) -> TestEditor {
        PlainEditor::new(EditorRope::from_str(content))
    }

    #[test]
    fn test_basic_insert() {
        let mut editor = make_editor("hello");
        editor.insert(5, " world");
        assert_eq!(editor.content_string(), "hello world");
        assert_eq!(editor.selection(), Selection::collapsed(11));
    }

    #[test]
    fn test_delete_and_replace() {
        let mut editor = make_editor("hello world");
        editor.delete(5..11);
        assert_eq!(editor.content_string(), "hello");
        assert_eq!(editor.selection(), Selection::collapsed(5));

        editor.replace(0..5, "bye");
        assert_eq!(editor.content_string(), "bye");
        assert_eq!(editor.selection(), Selection::collapsed(3));
    }

    #[test]
    fn test_selected_text_clamps_stale_selection() {
        let mut editor = make_editor("hello world");
        editor.set_selection(Selection::new(11, 6));
        assert_eq!(editor.selected_text(), "world");

        editor.set_selection(Selection::new(6, 400));
        assert_eq!(editor.selected_text(), "world");
    }

    #[test]
    fn test_listeners_see_content() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut editor = make_editor("a");
        let sink = seen.clone();
        editor.on_change(move |text| sink.borrow_mut().push(text.to_string()));

        editor.insert(1, "b");
        editor.notify_changed();

        assert_eq!(editor.change_count(), 1);
        assert_eq!(*seen.borrow(), vec!["ab".to_string()]);
    }
}
