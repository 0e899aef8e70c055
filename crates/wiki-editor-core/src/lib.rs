//! wiki-editor-core: editing, preview scheduling and page-state logic for the
//! wiki editor, without any DOM or framework dependency.
//!
//! This crate provides:
//! - `TextBuffer` trait for text storage abstraction
//! - `EditorRope` - ropey-backed implementation
//! - `EditorDocument` - the editing surface the toolbar transforms run on
//! - `PreviewMachine`, `TreeState`, `DirtyGuard`, `UploadInserter` - state
//!   machines fed by discrete events, so they run in native tests
//! - `HttpWikiClient` - reqwest client for the render and upload endpoints

pub mod actions;
pub mod annotate;
pub mod client;
pub mod config;
pub mod debounce;
pub mod document;
pub mod error;
pub mod execute;
pub mod guard;
pub mod preview;
pub mod text;
pub mod tree;
pub mod types;
pub mod upload;

pub use actions::{HeadingLevels, IMAGE_DESCRIPTION, ToolbarAction, Transform, WRAP_PLACEHOLDER};
pub use annotate::{
    CodeHighlighter, CopyFeedback, CopyLabels, NoHighlighting, PreviewSurface, annotate,
    show_rendered,
};
pub use client::{HttpWikiClient, RenderClient, UploadClient, UploadFile, endpoint_url};
pub use config::{EditorConfig, ElementIds, PreviewModeSetting, PreviewSettings};
pub use debounce::{DebounceToken, Debouncer};
pub use document::{EditorDocument, PlainEditor};
pub use error::EditorError;
pub use execute::{
    apply_action, apply_transform, insert_at_caret, insert_line, unwrap_selection, wrap_selection,
};
pub use guard::{DirtyGuard, GuardEvent, GuardState, LinkClick, NavigationDecision};
pub use preview::{
    PreviewCommand, PreviewEvent, PreviewMachine, PreviewMode, PreviewPhase, RenderTicket,
};
pub use smol_str::SmolStr;
pub use text::{EditorRope, TextBuffer};
pub use tree::{NodeId, TreeChanges, TreeNode, TreeState};
pub use types::Selection;
pub use upload::{
    BeginOutcome, DROP_HIGHLIGHT_CLASSES, DragPhase, DropZone, Finished, TriggerView,
    UploadIndicator, UploadInserter, UploadOutcome, UploadPhase, UploadResponse, UploadSettings,
    image_snippet,
};
