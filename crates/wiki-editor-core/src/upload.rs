//! Upload-to-insert for images.
//!
//! A file picked or dropped becomes the selected file. Triggering the upload
//! disables the trigger and shows a busy label; when the call settles the
//! image reference is inserted at the caret (success) or an error label is
//! shown. Either way the trigger comes back to its original label after a
//! fixed delay. The delay only prevents flicker, nothing is retried.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::actions::IMAGE_DESCRIPTION;
use crate::debounce::{DebounceToken, Debouncer};
use crate::document::EditorDocument;
use crate::error::EditorError;
use crate::execute::insert_at_caret;

/// Body of a successful `POST /upload`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

impl UploadResponse {
    /// `url` when present, else `{uploads_prefix}{filename}`.
    pub fn resolve_url(&self, uploads_prefix: &str) -> Option<String> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.is_empty()) {
            return Some(url.to_string());
        }
        self.filename
            .as_deref()
            .filter(|f| !f.is_empty())
            .map(|f| format!("{}/{}", uploads_prefix.trim_end_matches('/'), f))
    }
}

/// Markdown image reference for an uploaded file.
pub fn image_snippet(url: &str) -> String {
    format!("![{IMAGE_DESCRIPTION}]({url})")
}

/// Terminal result of one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded { url: String, snippet: String },
    Failed { reason: String },
}

/// Upload labels and timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UploadSettings {
    pub busy_label: String,
    pub done_label: String,
    pub failed_label: String,
    /// Delay before the trigger gets its original label back.
    pub restore_ms: u32,
    /// Where files named only by `filename` are served from.
    pub uploads_prefix: String,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            busy_label: "Загрузка...".into(),
            done_label: "Готово".into(),
            failed_label: "Ошибка".into(),
            restore_ms: 1500,
            uploads_prefix: "/uploads".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadIndicator {
    None,
    Busy,
    Done,
    Failed,
}

/// How the trigger control should look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerView {
    pub label: String,
    pub disabled: bool,
    pub indicator: UploadIndicator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Busy,
    Finished,
}

/// Result of pressing the trigger.
#[derive(Debug)]
pub enum BeginOutcome<F> {
    /// Send `file`; show `view` until the call settles.
    Upload { file: F, view: TriggerView },
    /// Nothing to send. Show `view`, then restore with `restore`.
    Rejected {
        view: TriggerView,
        restore: DebounceToken,
    },
    /// An upload is already running.
    Ignored,
}

/// Result of a settled upload call.
#[derive(Debug)]
pub struct Finished {
    pub outcome: UploadOutcome,
    pub view: TriggerView,
    pub restore: DebounceToken,
}

/// Upload state for one trigger control, generic over the host's file handle.
pub struct UploadInserter<F> {
    settings: UploadSettings,
    original_label: String,
    selected: Option<F>,
    phase: UploadPhase,
    restore: Debouncer,
}

impl<F: Clone> UploadInserter<F> {
    pub fn new(settings: UploadSettings, original_label: impl Into<String>) -> Self {
        let restore = Debouncer::new(Duration::from_millis(u64::from(settings.restore_ms)));
        Self {
            settings,
            original_label: original_label.into(),
            selected: None,
            phase: UploadPhase::Idle,
            restore,
        }
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn restore_delay(&self) -> Duration {
        self.restore.delay()
    }

    /// Remember a picked or dropped file. Replaces any earlier selection.
    pub fn select(&mut self, file: F) {
        self.selected = Some(file);
    }

    /// Press the trigger.
    pub fn begin(&mut self) -> BeginOutcome<F> {
        if self.phase == UploadPhase::Busy {
            return BeginOutcome::Ignored;
        }
        let Some(file) = self.selected.clone() else {
            tracing::debug!("upload triggered without a file");
            self.phase = UploadPhase::Finished;
            return BeginOutcome::Rejected {
                view: self.view(UploadIndicator::Failed),
                restore: self.restore.schedule(),
            };
        };
        // A pending restore from the previous upload must not undo the busy state.
        self.restore.cancel();
        self.phase = UploadPhase::Busy;
        BeginOutcome::Upload {
            file,
            view: self.view(UploadIndicator::Busy),
        }
    }

    /// Settle the upload call, inserting the snippet into `doc` on success.
    pub fn finish<D: EditorDocument>(
        &mut self,
        result: Result<UploadResponse, EditorError>,
        doc: &mut D,
    ) -> Finished {
        let resolved = result.and_then(|response| {
            response
                .resolve_url(&self.settings.uploads_prefix)
                .ok_or(EditorError::MissingUrl)
        });

        let (outcome, indicator) = match resolved {
            Ok(url) => {
                let snippet = image_snippet(&url);
                insert_at_caret(doc, &snippet);
                tracing::debug!(%url, "inserted uploaded image");
                (UploadOutcome::Uploaded { url, snippet }, UploadIndicator::Done)
            }
            Err(err) => {
                tracing::warn!("upload failed: {err}");
                let reason = err.to_string();
                (UploadOutcome::Failed { reason }, UploadIndicator::Failed)
            }
        };

        self.phase = UploadPhase::Finished;
        Finished {
            outcome,
            view: self.view(indicator),
            restore: self.restore.schedule(),
        }
    }

    /// Restore the trigger once the delay for `token` has passed.
    pub fn restore(&mut self, token: DebounceToken) -> Option<TriggerView> {
        if self.phase != UploadPhase::Finished || !self.restore.fire(token) {
            return None;
        }
        self.phase = UploadPhase::Idle;
        Some(self.view(UploadIndicator::None))
    }

    fn view(&self, indicator: UploadIndicator) -> TriggerView {
        let (label, disabled) = match indicator {
            UploadIndicator::None => (&self.original_label, false),
            UploadIndicator::Busy => (&self.settings.busy_label, true),
            UploadIndicator::Done => (&self.settings.done_label, true),
            UploadIndicator::Failed => (&self.settings.failed_label, true),
        };
        TriggerView {
            label: label.clone(),
            disabled,
            indicator,
        }
    }
}

/// Drag events on a drop zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Enter,
    Over,
    Leave,
    Drop,
}

/// Classes toggled on a drop zone while a drag hovers over it.
pub const DROP_HIGHLIGHT_CLASSES: [&str; 2] = ["ring-2", "ring-blue-400"];

/// Highlight state of a drop zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropZone {
    highlighted: bool,
}

impl DropZone {
    /// Feed a drag event; returns whether the zone is highlighted afterwards.
    pub fn handle(&mut self, phase: DragPhase) -> bool {
        match phase {
            DragPhase::Over => self.highlighted = true,
            DragPhase::Leave | DragPhase::Drop => self.highlighted = false,
            DragPhase::Enter => {}
        }
        self.highlighted
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }
}
