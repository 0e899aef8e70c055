//! The preview element as a `PreviewSurface`, plus highlight.js bridging.

use gloo_events::EventListener;
use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

use wiki_editor_core::{CodeHighlighter, CopyLabels, PreviewSurface};

use crate::clipboard::CopyButton;
use crate::dom::query_all;

const COPY_CONTROL_CLASS: &str = "code-copy";

/// Highlights code through `window.hljs.highlightElement`, when the page
/// loaded highlight.js. Without it, blocks are left as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hljs;

impl Hljs {
    fn highlight_fn() -> Option<(JsValue, Function)> {
        let hljs = Reflect::get(&gloo_utils::window(), &JsValue::from_str("hljs")).ok()?;
        if hljs.is_undefined() || hljs.is_null() {
            return None;
        }
        let func = Reflect::get(&hljs, &JsValue::from_str("highlightElement"))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;
        Some((hljs, func))
    }
}

impl CodeHighlighter<Element> for Hljs {
    fn highlight(&self, block: &Element) {
        let Some((hljs, func)) = Self::highlight_fn() else {
            return;
        };
        if let Err(e) = func.call1(&hljs, block) {
            tracing::warn!("highlightElement threw: {:?}", e);
        }
    }
}

/// An element whose content is replaced by rendered HTML.
///
/// Copy controls it attaches keep their listeners here; they are dropped
/// with the content they belong to on the next `replace_html`.
pub struct DomPreviewSurface {
    root: Element,
    labels: CopyLabels,
    controls: Vec<EventListener>,
}

impl DomPreviewSurface {
    pub fn new(root: Element, labels: CopyLabels) -> Self {
        Self {
            root,
            labels,
            controls: Vec::new(),
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Copy controls currently bound on this surface.
    pub fn control_count(&self) -> usize {
        self.controls.len()
    }
}

impl PreviewSurface for DomPreviewSurface {
    type CodeBlock = Element;

    fn replace_html(&mut self, html: &str) {
        self.root.set_inner_html(html);
        self.controls.clear();
    }

    fn code_blocks(&self) -> Vec<Element> {
        query_all(&self.root, "pre code")
    }

    fn has_copy_control(&self, block: &Element) -> bool {
        block
            .parent_element()
            .and_then(|pre| pre.query_selector(&format!(".{COPY_CONTROL_CLASS}")).ok())
            .flatten()
            .is_some()
    }

    fn attach_copy_control(&mut self, block: &Element) {
        let Some(pre) = block.parent_element() else {
            return;
        };
        let button = match gloo_utils::document().create_element("button") {
            Ok(button) => button,
            Err(e) => {
                tracing::warn!("could not create copy button: {:?}", e);
                return;
            }
        };
        let _ = button.set_attribute("type", "button");
        button.set_class_name(COPY_CONTROL_CLASS);
        button.set_text_content(Some(&self.labels.ready));
        if let Err(e) = pre.append_child(&button) {
            tracing::warn!("could not attach copy button: {:?}", e);
            return;
        }

        let block = block.clone();
        let control = CopyButton::new(button, self.labels.clone());
        self.controls
            .push(control.on_click(move || block.text_content()));
    }
}
