//! Text buffer abstraction for editor storage.
//!
//! The `TextBuffer` trait provides a common interface for text storage so the
//! selection transforms don't care whether the text came out of a textarea
//! or a test fixture.

use smol_str::{SmolStr, ToSmolStr};
use std::ops::Range;

/// A text buffer that supports efficient editing and offset conversion.
///
/// All offsets are in Unicode scalar values (chars), not bytes or UTF-16.
pub trait TextBuffer {
    /// Total length in chars (Unicode scalar values).
    fn len_chars(&self) -> usize;

    /// Check if empty.
    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Insert text at char offset.
    fn insert(&mut self, char_offset: usize, text: &str);

    /// Delete char range.
    fn delete(&mut self, char_range: Range<usize>);

    /// Replace char range with text.
    fn replace(&mut self, char_range: Range<usize>, text: &str) {
        self.delete(char_range.clone());
        self.insert(char_range.start, text);
    }

    /// Get a slice as SmolStr. Returns None if range is invalid.
    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr>;

    /// Convert entire buffer to String.
    fn to_string(&self) -> String;

    /// Convert a char offset to a UTF-16 code unit offset.
    ///
    /// Browser text controls report selections in UTF-16 code units.
    fn char_to_utf16(&self, char_offset: usize) -> usize;

    /// Convert a UTF-16 code unit offset to a char offset.
    fn utf16_to_char(&self, utf16_offset: usize) -> usize;
}

/// Ropey-backed text buffer.
#[derive(Clone, Default)]
pub struct EditorRope {
    rope: ropey::Rope,
}

impl EditorRope {
    /// Create from string.
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(s),
        }
    }
}

impl TextBuffer for EditorRope {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn insert(&mut self, char_offset: usize, text: &str) {
        self.rope.insert(char_offset, text);
    }

    fn delete(&mut self, char_range: Range<usize>) {
        self.rope.remove(char_range);
    }

    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        if char_range.start > char_range.end || char_range.end > self.len_chars() {
            return None;
        }
        Some(self.rope.slice(char_range).to_smolstr())
    }

    fn to_string(&self) -> String {
        self.rope.to_string()
    }

    fn char_to_utf16(&self, char_offset: usize) -> usize {
        self.rope
            .char_to_utf16_cu(char_offset.min(self.rope.len_chars()))
    }

    fn utf16_to_char(&self, utf16_offset: usize) -> usize {
        self.rope
            .utf16_cu_to_char(utf16_offset.min(self.rope.len_utf16_cu()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut rope = EditorRope::from_str("hello world");
        assert_eq!(rope.len_chars(), 11);

        rope.insert(5, " beautiful");
        assert_eq!(rope.to_string(), "hello beautiful world");

        rope.delete(5..15);
        assert_eq!(rope.to_string(), "hello world");
    }

    #[test]
    fn test_slice() {
        let rope = EditorRope::from_str("привет мир");
        assert_eq!(rope.slice(0..6).as_deref(), Some("привет"));
        assert_eq!(rope.slice(7..10).as_deref(), Some("мир"));
        assert_eq!(rope.slice(0..100), None);
    }

    #[test]
    fn test_replace() {
        let mut rope = EditorRope::from_str("hello world");
        rope.replace(6..11, "rust");
        assert_eq!(rope.to_string(), "hello rust");
    }

    #[test]
    fn test_utf16_conversion() {
        // The crab is one char but two UTF-16 code units.
        let rope = EditorRope::from_str("a🦀b");
        assert_eq!(rope.char_to_utf16(1), 1);
        assert_eq!(rope.char_to_utf16(2), 3);
        assert_eq!(rope.utf16_to_char(3), 2);
        assert_eq!(rope.utf16_to_char(99), 3);
    }
}
