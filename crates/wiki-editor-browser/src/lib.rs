//! Browser DOM layer for the wiki editor.
//!
//! This crate binds the `wiki-editor-core` state machines to the
//! server-rendered wiki markup. It assumes a `wasm32-unknown-unknown`
//! target environment.
//!
//! # Architecture
//!
//! - `textarea`: `EditorDocument` over a `<textarea>`, UTF-16 offset mapping
//! - `toolbar`: `[data-action]` buttons and the block picker
//! - `preview`: debounced live preview driving the core `PreviewMachine`
//! - `annotate`: the preview element as a `PreviewSurface`, highlight.js
//! - `clipboard`, `copy_buttons`: copy controls with transient labels
//! - `tree`: the page tree navigator
//! - `guard`: unsaved-changes guard
//! - `upload`: drop zone and upload trigger
//!
//! Every bound component owns its `gloo-events` listeners; dropping the
//! component unbinds it.
//!
//! # Re-exports
//!
//! This crate re-exports `wiki-editor-core` for convenience, so consumers
//! only need to depend on `wiki-editor-browser`.

// Re-export core crate
pub use wiki_editor_core;
pub use wiki_editor_core::*;

pub mod annotate;
pub mod clipboard;
pub mod copy_buttons;
pub mod dom;
pub mod guard;
pub mod preview;
pub mod textarea;
pub mod toolbar;
pub mod tree;
pub mod upload;

pub use annotate::{DomPreviewSurface, Hljs};
pub use clipboard::{CopyButton, write_text};
pub use copy_buttons::CopyButtons;
pub use guard::{UnsavedGuard, link_click};
pub use preview::{LivePreview, PreviewElements};
pub use textarea::{TextareaDocument, dispatch_input};
pub use toolbar::{Toolbar, button_action, run_action};
pub use tree::TreeView;
pub use upload::{DropZoneView, UploadControl, read_file};
