//! Standalone `[data-copy-target]` buttons.
//!
//! The attribute holds a selector; a click copies the trimmed visible text of
//! the first element it matches.

use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use wiki_editor_core::CopyLabels;

use crate::clipboard::CopyButton;
use crate::dom::query_all;

pub struct CopyButtons {
    listeners: Vec<EventListener>,
}

impl CopyButtons {
    pub fn attach(document: &Document, labels: &CopyLabels) -> Self {
        let mut listeners = Vec::new();
        for el in query_all(document, "[data-copy-target]") {
            let Some(selector) = el.get_attribute("data-copy-target") else {
                continue;
            };
            let document = document.clone();
            let button = CopyButton::new(el, labels.clone());
            listeners.push(button.on_click(move || {
                let target = document.query_selector(&selector).ok().flatten()?;
                let text = match target.dyn_ref::<HtmlElement>() {
                    Some(html) => html.inner_text(),
                    None => target.text_content().unwrap_or_default(),
                };
                Some(text.trim().to_string())
            }));
        }
        tracing::debug!(count = listeners.len(), "copy buttons attached");
        Self { listeners }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
