//! Selection transforms for editor documents.
//!
//! These functions apply toolbar transforms to any type implementing
//! `EditorDocument`. The logic is generic and platform-agnostic. Every
//! transform reads the buffer and selection, writes the new text and the new
//! selection, then focuses the surface and emits one change notification.

use crate::actions::{ToolbarAction, Transform};
use crate::document::EditorDocument;
use crate::text::TextBuffer;
use crate::types::Selection;

/// Apply a toolbar action to a document.
pub fn apply_action<D: EditorDocument>(doc: &mut D, action: &ToolbarAction) {
    tracing::debug!(?action, "applying toolbar action");
    apply_transform(doc, &action.transform());
}

/// Apply a resolved transform to a document.
pub fn apply_transform<D: EditorDocument>(doc: &mut D, transform: &Transform) {
    match transform {
        Transform::Wrap {
            prefix,
            suffix,
            placeholder,
        } => wrap_selection(doc, prefix, suffix, placeholder),
        Transform::InsertLine {
            prefix,
            placeholder,
        } => insert_line(doc, prefix, placeholder),
    }
}

/// Surround the selection with `prefix` and `suffix`.
///
/// With a non-empty selection the original text ends up selected inside the
/// markers. With a caret, `placeholder` is inserted between the markers and
/// selected instead.
pub fn wrap_selection<D: EditorDocument>(
    doc: &mut D,
    prefix: &str,
    suffix: &str,
    placeholder: &str,
) {
    let sel = doc.clamped_selection();
    let selected = doc.selected_text();
    let body: &str = if selected.is_empty() {
        placeholder
    } else {
        selected.as_str()
    };

    let wrapped = format!("{prefix}{body}{suffix}");
    doc.buffer_mut().replace(sel.to_range(), &wrapped);

    let body_start = sel.start() + prefix.chars().count();
    let body_end = body_start + body.chars().count();
    finish(doc, Selection::new(body_start, body_end));
}

/// Insert `prefix + placeholder` as its own line at the caret.
///
/// The new line is always followed by a newline, so whatever sat after the
/// caret moves down intact. Only the placeholder is left selected.
pub fn insert_line<D: EditorDocument>(doc: &mut D, prefix: &str, placeholder: &str) {
    let caret = doc.clamped_selection().start();
    let line = format!("{prefix}{placeholder}\n");
    doc.buffer_mut().insert(caret, &line);

    let body_start = caret + prefix.chars().count();
    let body_end = body_start + placeholder.chars().count();
    finish(doc, Selection::new(body_start, body_end));
}

/// Insert `text` at the end of the selection and park a caret right after it.
///
/// Selected text is kept, never replaced.
pub fn insert_at_caret<D: EditorDocument>(doc: &mut D, text: &str) {
    let at = doc.clamped_selection().end();
    doc.buffer_mut().insert(at, text);
    finish(doc, Selection::collapsed(at + text.chars().count()));
}

/// Remove `prefix` and `suffix` from around the selection.
///
/// Inverse of [`wrap_selection`] on a non-empty selection: the same text
/// stays selected. Returns false and leaves the document untouched when the
/// markers are not both present.
pub fn unwrap_selection<D: EditorDocument>(doc: &mut D, prefix: &str, suffix: &str) -> bool {
    let sel = doc.clamped_selection();
    let prefix_len = prefix.chars().count();
    let suffix_len = suffix.chars().count();

    if sel.start() < prefix_len {
        return false;
    }
    let before = doc.slice(sel.start() - prefix_len..sel.start());
    let after = doc.slice(sel.end()..sel.end() + suffix_len);
    if before.as_deref() != Some(prefix) || after.as_deref() != Some(suffix) {
        return false;
    }

    // Suffix first so the prefix offsets stay valid.
    doc.buffer_mut().delete(sel.end()..sel.end() + suffix_len);
    doc.buffer_mut().delete(sel.start() - prefix_len..sel.start());

    finish(
        doc,
        Selection::new(sel.start() - prefix_len, sel.end() - prefix_len),
    );
    true
}

fn finish<D: EditorDocument>(doc: &mut D, selection: Selection) {
    let selection = selection.clamped(doc.len_chars());
    doc.set_selection(selection);
    doc.focus();
    doc.notify_changed();
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::actions::HeadingLevels;
    use crate::{EditorRope, PlainEditor};

    type TestEditor = PlainEditor<EditorRope>;

    fn make_editor(content: &str, selection: Selection) -> TestEditor {
        let mut editor = PlainEditor::new(EditorRope::from_str(content));
        editor.set_selection(selection);
        editor
    }

    fn selected(editor: &TestEditor) -> String {
        editor.selected_text().to_string()
    }

    #[test]
    fn test_wrap_selection_keeps_text_selected() {
        let mut editor = make_editor("say hello now", Selection::new(4, 9));
        apply_action(&mut editor, &ToolbarAction::Bold);

        assert_eq!(editor.content_string(), "say **hello** now");
        assert_eq!(editor.selection(), Selection::new(6, 11));
        assert_eq!(selected(&editor), "hello");
    }

    #[test]
    fn test_wrap_caret_selects_placeholder() {
        let mut editor = make_editor("ab", Selection::collapsed(1));
        apply_action(&mut editor, &ToolbarAction::Strike);

        assert_snapshot!(editor.content_string(), @"a~~текст~~b");
        assert_eq!(selected(&editor), "текст");
    }

    #[test]
    fn test_wrap_backwards_selection() {
        let mut editor = make_editor("one two", Selection::new(7, 4));
        apply_action(&mut editor, &ToolbarAction::Code);
        assert_eq!(editor.content_string(), "one `two`");
        assert_eq!(selected(&editor), "two");
    }

    #[test]
    fn test_link_and_image_markup() {
        let mut editor = make_editor("docs", Selection::new(0, 4));
        apply_action(&mut editor, &ToolbarAction::Link);
        assert_snapshot!(editor.content_string(), @"[docs](https://example.com)");

        let mut editor = make_editor("", Selection::collapsed(0));
        apply_action(&mut editor, &ToolbarAction::Image);
        assert_snapshot!(editor.content_string(), @"![описание](текст)");
        assert_eq!(selected(&editor), "текст");
    }

    #[test]
    fn test_wrap_then_unwrap_round_trips() {
        let cases = [
            ("plain words here", Selection::new(6, 11)),
            ("кириллица и 🦀", Selection::new(0, 9)),
            ("edge", Selection::new(0, 4)),
            ("x\ny\nz", Selection::new(2, 3)),
        ];
        let markers = [("**", "**"), ("[", "](https://example.com)"), ("\n```\n", "\n```\n")];

        for (text, sel) in cases {
            for (prefix, suffix) in markers {
                let mut editor = make_editor(text, sel);
                wrap_selection(&mut editor, prefix, suffix, "unused");
                assert!(unwrap_selection(&mut editor, prefix, suffix));
                assert_eq!(editor.content_string(), text);
                assert_eq!(editor.selection(), Selection::new(sel.start(), sel.end()));
            }
        }
    }

    #[test]
    fn test_unwrap_without_markers_is_noop() {
        let mut editor = make_editor("*a*", Selection::new(1, 2));
        assert!(!unwrap_selection(&mut editor, "**", "**"));
        assert_eq!(editor.content_string(), "*a*");
        assert_eq!(editor.change_count(), 0);
    }

    #[test]
    fn test_insert_line_mid_line_pushes_rest_down() {
        let mut editor = make_editor("first second", Selection::collapsed(6));
        apply_action(&mut editor, &ToolbarAction::Quote);

        assert_eq!(editor.content_string(), "first > цитата\nsecond");
        assert_eq!(selected(&editor), "цитата");
    }

    #[test]
    fn test_insert_line_length_law() {
        let cases = [("", 0), ("abc", 0), ("abc", 3), ("ab\ncd", 4), ("добрый день", 6)];
        let actions = [
            ToolbarAction::Quote,
            ToolbarAction::BulletList,
            ToolbarAction::NumberedList,
            ToolbarAction::Checklist,
            ToolbarAction::Heading(3),
            ToolbarAction::HorizontalRule,
            ToolbarAction::Paragraph,
        ];

        for (text, caret) in cases {
            for action in actions {
                let Transform::InsertLine {
                    prefix,
                    placeholder,
                } = action.transform()
                else {
                    panic!("{action:?} should insert a line");
                };
                let mut editor = make_editor(text, Selection::collapsed(caret));
                apply_action(&mut editor, &action);

                let before: String = text.chars().take(caret).collect();
                let after: String = text.chars().skip(caret).collect();
                let expected = format!("{before}{prefix}{placeholder}\n{after}");
                assert_eq!(editor.content_string(), expected);
                assert_eq!(
                    editor.len_chars(),
                    text.chars().count()
                        + prefix.chars().count()
                        + placeholder.chars().count()
                        + 1
                );
            }
        }
    }

    #[test]
    fn test_heading_from_toolbar() {
        let levels = HeadingLevels::default();
        let action = ToolbarAction::from_name("heading", Some(5), &levels).unwrap();
        let mut editor = make_editor("", Selection::collapsed(0));
        apply_action(&mut editor, &action);

        assert_eq!(editor.content_string(), "### Заголовок 3\n");
        assert_eq!(selected(&editor), "Заголовок 3");
    }

    #[test]
    fn test_table_inserts_template() {
        let mut editor = make_editor("", Selection::collapsed(0));
        apply_action(&mut editor, &ToolbarAction::Table);
        assert_eq!(
            editor.content_string(),
            "\n| Столбец 1 | Столбец 2 |\n| --- | --- |\n| Значение | Значение |\n\nтекст"
        );
        assert_eq!(selected(&editor), "текст");
    }

    #[test]
    fn test_insert_at_caret_moves_caret_past_text() {
        let mut editor = make_editor("ab", Selection::collapsed(1));
        insert_at_caret(&mut editor, "XYZ");
        assert_eq!(editor.content_string(), "aXYZb");
        assert_eq!(editor.selection(), Selection::collapsed(4));
    }

    #[test]
    fn test_insert_at_caret_keeps_selected_text() {
        for sel in [Selection::new(5, 9), Selection::new(9, 5)] {
            let mut editor = make_editor("keep THIS text", sel);
            insert_at_caret(&mut editor, "![x](y)");
            assert_eq!(editor.content_string(), "keep THIS![x](y) text");
            assert_eq!(editor.selection(), Selection::collapsed(16));
        }
    }

    #[test]
    fn test_stale_selection_is_clamped() {
        let mut editor = make_editor("abc", Selection::new(2, 50));
        apply_action(&mut editor, &ToolbarAction::Italic);
        assert_eq!(editor.content_string(), "ab*c*");
        let sel = editor.selection();
        assert!(sel.start() <= sel.end() && sel.end() <= editor.len_chars());
    }

    #[test]
    fn test_every_transform_focuses_and_notifies_once() {
        let mut editor = make_editor("text", Selection::new(0, 4));
        apply_action(&mut editor, &ToolbarAction::Checklist);
        assert!(editor.is_focused());
        assert_eq!(editor.change_count(), 1);

        insert_at_caret(&mut editor, "!");
        assert_eq!(editor.change_count(), 2);
    }
}
