//! Toolbar actions and the text transforms they map to.
//!
//! A `ToolbarAction` is what a toolbar button (or the block picker) asks for.
//! Each one resolves to a `Transform`: either wrap the selection in a
//! prefix/suffix pair, or insert a fresh prefixed line at the caret. The
//! mapping is a pure function of the action; nothing here looks at earlier
//! dispatches.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Placeholder used when a wrap action runs on an empty selection.
pub const WRAP_PLACEHOLDER: &str = "текст";
const QUOTE_PLACEHOLDER: &str = "цитата";
const LIST_PLACEHOLDER: &str = "элемент списка";
const CHECKLIST_PLACEHOLDER: &str = "задача";
const TABLE_TEMPLATE: &str =
    "\n| Столбец 1 | Столбец 2 |\n| --- | --- |\n| Значение | Значение |\n\n";
/// Alt text of inserted image references.
pub const IMAGE_DESCRIPTION: &str = "описание";

/// A named toolbar operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Bold,
    Italic,
    Strike,
    Code,
    BlockCode,
    Quote,
    BulletList,
    NumberedList,
    Link,
    Image,
    Table,
    /// Heading with an already clamped level.
    Heading(u8),
    Checklist,
    HorizontalRule,
    /// Empty line, used by the block picker's "paragraph" entry.
    Paragraph,
}

/// How an action edits the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Surround the selection (or the placeholder) with prefix and suffix.
    Wrap {
        prefix: String,
        suffix: String,
        placeholder: String,
    },
    /// Insert `prefix + placeholder` followed by a newline at the caret.
    InsertLine { prefix: String, placeholder: String },
}

impl Transform {
    fn wrap(prefix: &str, suffix: &str) -> Self {
        Self::Wrap {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            placeholder: WRAP_PLACEHOLDER.to_string(),
        }
    }

    fn line(prefix: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self::InsertLine {
            prefix: prefix.into(),
            placeholder: placeholder.into(),
        }
    }
}

impl ToolbarAction {
    /// Resolve a toolbar button's `data-action` / `data-level` pair.
    ///
    /// Returns `None` for names no button should carry. Heading levels are
    /// clamped into `levels`; a missing level uses its default.
    pub fn from_name(name: &str, level: Option<u8>, levels: &HeadingLevels) -> Option<Self> {
        let action = match name {
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "strike" => Self::Strike,
            "code" => Self::Code,
            "blockcode" => Self::BlockCode,
            "quote" => Self::Quote,
            "ul" => Self::BulletList,
            "ol" => Self::NumberedList,
            "link" => Self::Link,
            "image" => Self::Image,
            "table" => Self::Table,
            "heading" => Self::Heading(levels.clamp(level.unwrap_or(levels.default))),
            "checklist" => Self::Checklist,
            "hr" => Self::HorizontalRule,
            _ => return None,
        };
        Some(action)
    }

    /// Resolve a block picker value (`p`, `h2`, `h3`, `quote`, `code`).
    pub fn from_block_choice(value: &str, levels: &HeadingLevels) -> Option<Self> {
        match value {
            "p" => Some(Self::Paragraph),
            "h2" => Some(Self::Heading(levels.clamp(2))),
            "h3" => Some(Self::Heading(levels.clamp(3))),
            "quote" => Some(Self::Quote),
            "code" => Some(Self::BlockCode),
            _ => None,
        }
    }

    /// The transform this action performs.
    pub fn transform(&self) -> Transform {
        match self {
            Self::Bold => Transform::wrap("**", "**"),
            Self::Italic => Transform::wrap("*", "*"),
            Self::Strike => Transform::wrap("~~", "~~"),
            Self::Code => Transform::wrap("`", "`"),
            Self::BlockCode => Transform::wrap("\n```\n", "\n```\n"),
            Self::Link => Transform::wrap("[", "](https://example.com)"),
            Self::Image => Transform::wrap(&format!("![{IMAGE_DESCRIPTION}]("), ")"),
            Self::Table => Transform::wrap(TABLE_TEMPLATE, ""),
            Self::Quote => Transform::line("> ", QUOTE_PLACEHOLDER),
            Self::BulletList => Transform::line("- ", LIST_PLACEHOLDER),
            Self::NumberedList => Transform::line("1. ", LIST_PLACEHOLDER),
            Self::Checklist => Transform::line("- [ ] ", CHECKLIST_PLACEHOLDER),
            Self::Heading(level) => Transform::line(
                format!("{} ", "#".repeat(usize::from(*level))),
                format!("Заголовок {level}"),
            ),
            Self::HorizontalRule => Transform::line("\n---\n", ""),
            Self::Paragraph => Transform::line("", ""),
        }
    }
}

/// The heading levels the toolbar may produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeadingLevels {
    pub min: u8,
    pub max: u8,
    /// Level for heading buttons without `data-level`.
    pub default: u8,
}

impl Default for HeadingLevels {
    fn default() -> Self {
        Self {
            min: 2,
            max: 3,
            default: 2,
        }
    }
}

impl HeadingLevels {
    /// Clamp a requested level into the configured range.
    ///
    /// A misconfigured range (min above max, or outside 1..=6) is repaired
    /// first so the result is always a valid markdown heading level.
    pub fn clamp(&self, level: u8) -> u8 {
        let range = self.range();
        level.clamp(*range.start(), *range.end())
    }

    /// The same levels with the range repaired and the default inside it.
    pub fn normalized(&self) -> Self {
        let range = self.range();
        Self {
            min: *range.start(),
            max: *range.end(),
            default: self.clamp(self.default),
        }
    }

    fn range(&self) -> RangeInclusive<u8> {
        let lo = self.min.clamp(1, 6);
        let hi = self.max.clamp(1, 6).max(lo);
        lo..=hi
    }
}
