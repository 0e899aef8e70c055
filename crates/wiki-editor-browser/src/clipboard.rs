//! Clipboard writes and the copy buttons that report on them.
//!
//! Both the code-block copy controls and the standalone `[data-copy-target]`
//! buttons run through [`CopyButton`]: write the text, swap the label for the
//! outcome, and revert once the last click's timer fires.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use wasm_bindgen_futures::JsFuture;
use web_sys::Element;

use wiki_editor_core::{CopyFeedback, CopyLabels, DebounceToken, EditorError};

use crate::dom::js_error;

/// Write plain text through the async Clipboard API.
pub async fn write_text(text: &str) -> Result<(), EditorError> {
    let clipboard = gloo_utils::window().navigator().clipboard();
    JsFuture::from(clipboard.write_text(text))
        .await
        .map(|_| ())
        .map_err(js_error)
}

struct CopyState {
    feedback: CopyFeedback,
    revert_timer: Option<Timeout>,
}

/// A button whose label reports clipboard outcomes.
#[derive(Clone)]
pub struct CopyButton {
    button: Element,
    state: Rc<RefCell<CopyState>>,
}

impl CopyButton {
    pub fn new(button: Element, labels: CopyLabels) -> Self {
        Self {
            button,
            state: Rc::new(RefCell::new(CopyState {
                feedback: CopyFeedback::new(labels),
                revert_timer: None,
            })),
        }
    }

    pub fn element(&self) -> &Element {
        &self.button
    }

    /// Bind `text_source` to clicks. Returning `None` skips the click.
    pub fn on_click(
        &self,
        text_source: impl Fn() -> Option<String> + 'static,
    ) -> EventListener {
        let this = self.clone();
        EventListener::new_with_options(
            &self.button,
            "click",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                if let Some(text) = text_source() {
                    this.copy(text);
                }
            },
        )
    }

    /// Copy `text` and show the outcome.
    pub fn copy(&self, text: String) {
        let this = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let copied = match write_text(&text).await {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!("clipboard write failed: {err}");
                    false
                }
            };
            this.show_outcome(copied);
        });
    }

    fn show_outcome(&self, copied: bool) {
        let mut state = self.state.borrow_mut();
        let (label, token) = state.feedback.record(copied);
        self.button.set_text_content(Some(&label));

        let delay = u32::try_from(state.feedback.revert_delay().as_millis()).unwrap_or(u32::MAX);
        let this = self.clone();
        // Replacing the timer drops (cancels) the previous one.
        state.revert_timer = Some(Timeout::new(delay, move || this.revert(token)));
    }

    fn revert(&self, token: DebounceToken) {
        let mut state = self.state.borrow_mut();
        // The fired timer stays in its slot; the next outcome replaces it.
        if let Some(label) = state.feedback.revert(token) {
            self.button.set_text_content(Some(&label));
        }
    }
}
