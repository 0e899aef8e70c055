//! Annotation pass over rendered preview content.
//!
//! After new HTML lands in the preview, every `pre code` block is handed to
//! the highlighter and gets a copy button, at most one per block no matter
//! how often the pass runs. Copy buttons report their outcome through a
//! transient label that reverts after a fixed delay.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::debounce::{DebounceToken, Debouncer};

/// Applies syntax highlighting to a code element in place.
pub trait CodeHighlighter<B> {
    fn highlight(&self, block: &B);
}

/// Highlighter for pages without a highlighting engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHighlighting;

impl<B> CodeHighlighter<B> for NoHighlighting {
    fn highlight(&self, _block: &B) {}
}

/// The surface the preview renders into.
pub trait PreviewSurface {
    /// Handle to one `pre code` element.
    type CodeBlock;

    /// Replace the whole surface content with `html`.
    fn replace_html(&mut self, html: &str);

    /// All code blocks currently on the surface, in document order.
    fn code_blocks(&self) -> Vec<Self::CodeBlock>;

    /// Whether the block's container already carries a copy control.
    fn has_copy_control(&self, block: &Self::CodeBlock) -> bool;

    /// Attach a copy control to the block's container.
    fn attach_copy_control(&mut self, block: &Self::CodeBlock);
}

/// Highlight every code block and give each one a single copy control.
///
/// Returns how many controls were attached by this pass.
pub fn annotate<S, H>(surface: &mut S, highlighter: &H) -> usize
where
    S: PreviewSurface,
    H: CodeHighlighter<S::CodeBlock>,
{
    let mut attached = 0;
    for block in surface.code_blocks() {
        highlighter.highlight(&block);
        if !surface.has_copy_control(&block) {
            surface.attach_copy_control(&block);
            attached += 1;
        }
    }
    attached
}

/// Swap in freshly rendered HTML and annotate it.
pub fn show_rendered<S, H>(surface: &mut S, highlighter: &H, html: &str) -> usize
where
    S: PreviewSurface,
    H: CodeHighlighter<S::CodeBlock>,
{
    surface.replace_html(html);
    annotate(surface, highlighter)
}

/// Labels a copy button cycles through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CopyLabels {
    pub ready: String,
    pub copied: String,
    pub failed: String,
    /// How long the outcome label stays before reverting.
    pub revert_ms: u32,
}

impl Default for CopyLabels {
    fn default() -> Self {
        Self {
            ready: "Copy".into(),
            copied: "Copied".into(),
            failed: "Error".into(),
            revert_ms: 1200,
        }
    }
}

impl CopyLabels {
    /// Labels for the standalone `[data-copy-target]` buttons.
    pub fn for_copy_targets() -> Self {
        Self {
            copied: "Скопировано".into(),
            failed: "Ошибка".into(),
            ..Self::default()
        }
    }
}

/// Transient label state for one copy button.
///
/// Rapid clicks each restart the revert timer; only the last one reverts.
#[derive(Debug, Clone)]
pub struct CopyFeedback {
    labels: CopyLabels,
    revert: Debouncer,
    current: String,
}

impl CopyFeedback {
    pub fn new(labels: CopyLabels) -> Self {
        let revert = Debouncer::new(Duration::from_millis(u64::from(labels.revert_ms)));
        let current = labels.ready.clone();
        Self {
            labels,
            revert,
            current,
        }
    }

    /// Label currently shown.
    pub fn label(&self) -> &str {
        &self.current
    }

    pub fn revert_delay(&self) -> Duration {
        self.revert.delay()
    }

    /// Record a clipboard outcome. Returns the label to show and the token
    /// the revert timer must hand back.
    pub fn record(&mut self, copied: bool) -> (String, DebounceToken) {
        self.current = if copied {
            self.labels.copied.clone()
        } else {
            self.labels.failed.clone()
        };
        (self.current.clone(), self.revert.schedule())
    }

    /// Revert to the ready label if `token` is still the latest outcome.
    pub fn revert(&mut self, token: DebounceToken) -> Option<String> {
        if !self.revert.fire(token) {
            return None;
        }
        self.current = self.labels.ready.clone();
        Some(self.current.clone())
    }
}
