//! Toolbar buttons and the block picker.

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlSelectElement, HtmlTextAreaElement};

use wiki_editor_core::{HeadingLevels, ToolbarAction, apply_action};

use crate::dom::query_all;
use crate::textarea::TextareaDocument;

/// Run `action` against the textarea's current value and selection.
pub fn run_action(textarea: &HtmlTextAreaElement, action: &ToolbarAction) {
    let mut doc = TextareaDocument::load(textarea.clone());
    apply_action(&mut doc, action);
}

/// Resolve a toolbar button's `data-action` / `data-level`.
pub fn button_action(button: &Element, levels: &HeadingLevels) -> Option<ToolbarAction> {
    let name = button.get_attribute("data-action")?;
    let level = button
        .get_attribute("data-level")
        .and_then(|l| l.trim().parse::<u8>().ok());
    ToolbarAction::from_name(&name, level, levels)
}

/// Listeners bound to one toolbar. Dropping it unbinds them.
pub struct Toolbar {
    _listeners: Vec<EventListener>,
}

impl Toolbar {
    pub fn attach(
        toolbar: &Element,
        textarea: HtmlTextAreaElement,
        levels: HeadingLevels,
    ) -> Self {
        let mut listeners = Vec::new();

        for button in query_all(toolbar, "[data-action]") {
            let Some(action) = button_action(&button, &levels) else {
                tracing::debug!(
                    action = button.get_attribute("data-action").as_deref(),
                    "ignoring unknown toolbar action"
                );
                continue;
            };
            let textarea = textarea.clone();
            listeners.push(EventListener::new_with_options(
                &button,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    event.prevent_default();
                    run_action(&textarea, &action);
                },
            ));
        }

        let picker = toolbar
            .query_selector("select[data-block-picker]")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok());
        if let Some(picker) = picker {
            let select = picker.clone();
            let textarea = textarea.clone();
            listeners.push(EventListener::new(&picker, "change", move |_| {
                if let Some(action) = ToolbarAction::from_block_choice(&select.value(), &levels) {
                    run_action(&textarea, &action);
                }
                select.set_selected_index(0);
            }));
        }

        tracing::debug!(bound = listeners.len(), "toolbar attached");
        Self {
            _listeners: listeners,
        }
    }
}
