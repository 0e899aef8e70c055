//! Small DOM lookups shared by the page bindings.
//!
//! Every initializer starts by resolving its elements here. A missing element
//! is never an error for the page: the feature just stays inert.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element};

use wiki_editor_core::EditorError;

/// Convert a thrown JS value into an editor error.
pub fn js_error(value: JsValue) -> EditorError {
    let message = value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"));
    EditorError::Platform(message)
}

pub fn document() -> Result<Document, EditorError> {
    gloo_utils::window()
        .document()
        .ok_or_else(|| EditorError::Platform("window has no document".into()))
}

/// Element by id, cast to the expected type.
pub fn by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, EditorError> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
        .ok_or_else(|| EditorError::MissingElement(id.to_string()))
}

/// Like [`by_id`], but an absent id (`None`) or element is just `None`.
pub fn optional_by_id<T: JsCast>(document: &Document, id: Option<&str>) -> Option<T> {
    let id = id.filter(|id| !id.is_empty())?;
    by_id(document, id).ok()
}

/// All elements under `root` matching `selector`, in document order.
pub fn query_all(root: &impl AsRef<web_sys::Node>, selector: &str) -> Vec<Element> {
    let node: &web_sys::Node = root.as_ref();
    let list = if let Some(el) = node.dyn_ref::<Element>() {
        el.query_selector_all(selector)
    } else if let Some(doc) = node.dyn_ref::<Document>() {
        doc.query_selector_all(selector)
    } else {
        return Vec::new();
    };
    let Ok(list) = list else {
        tracing::warn!(selector, "invalid selector");
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// First element under `owner` matching `selector` whose closest `scope`
/// ancestor is `owner` itself, i.e. not one belonging to a nested scope.
pub fn own_descendant(owner: &Element, selector: &str, scope: &str) -> Option<Element> {
    query_all(owner, selector).into_iter().find(|el| {
        el.parent_element()
            .and_then(|p| p.closest(scope).ok().flatten())
            .is_some_and(|s| &s == owner)
    })
}

pub fn set_classes(el: &Element, classes: &[&str], on: bool) {
    let list = el.class_list();
    for class in classes {
        let result = if on {
            list.add_1(class)
        } else {
            list.remove_1(class)
        };
        if let Err(e) = result {
            tracing::debug!("class update failed: {:?}", e);
        }
    }
}

/// Origin the page was served from, e.g. `https://wiki.example`.
pub fn page_origin() -> String {
    gloo_utils::window()
        .location()
        .origin()
        .unwrap_or_default()
}

/// `data-current-path` of `<body>`, empty when absent.
pub fn current_path(document: &Document) -> String {
    document
        .body()
        .and_then(|body| body.get_attribute("data-current-path"))
        .unwrap_or_default()
}
