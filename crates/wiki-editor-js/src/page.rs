//! WikiPage - every editor feature of one page, bound from JavaScript.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlInputElement, HtmlTextAreaElement};

use wiki_editor_browser::dom::{self, by_id, optional_by_id};
use wiki_editor_browser::{
    CopyButtons, DomPreviewSurface, DropZoneView, EditorConfig, EditorError, Hljs, HttpWikiClient,
    LivePreview, PreviewElements, Toolbar, ToolbarAction, TreeView, UnsavedGuard, UploadControl,
    annotate, run_action,
};

fn js_err(err: EditorError) -> JsError {
    JsError::new(&err.to_string())
}

/// Read the config from a JS object, or from `<body data-editor-config>`
/// when `value` is `undefined` or `null`.
pub fn load_config(document: &Document, value: JsValue) -> Result<EditorConfig, EditorError> {
    if value.is_undefined() || value.is_null() {
        let json = document
            .body()
            .and_then(|body| body.get_attribute("data-editor-config"))
            .unwrap_or_default();
        return EditorConfig::from_json(&json);
    }
    let config: EditorConfig = serde_wasm_bindgen::from_value(value)
        .map_err(|e| EditorError::Platform(format!("invalid editor config: {e}")))?;
    Ok(EditorConfig {
        headings: config.headings.normalized(),
        ..config
    })
}

fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

/// The editor features bound on one page.
///
/// Dropping the page (or calling `teardown`) unbinds everything.
#[wasm_bindgen]
pub struct WikiPage {
    config: EditorConfig,
    document: Document,
    client: HttpWikiClient,
    toolbar: Option<Toolbar>,
    preview: Option<LivePreview<HttpWikiClient>>,
    tree: Option<TreeView>,
    guard: Option<UnsavedGuard>,
    code_copy: Option<DomPreviewSurface>,
    copy_buttons: Option<CopyButtons>,
    upload: Option<UploadControl<HttpWikiClient>>,
    drop_zone: Option<DropZoneView>,
}

#[wasm_bindgen]
impl WikiPage {
    /// Create a page without binding anything yet.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WikiPage, JsError> {
        let document = dom::document().map_err(js_err)?;
        let config = load_config(&document, config).map_err(js_err)?;
        let origin = dom::page_origin();
        let client = HttpWikiClient::new(
            config.base_url_or(&origin),
            &config.render_endpoint,
            &config.upload_endpoint,
        );
        tracing::debug!(
            render = client.render_url(),
            upload = client.upload_url(),
            "wiki page created"
        );

        Ok(Self {
            config,
            document,
            client,
            toolbar: None,
            preview: None,
            tree: None,
            guard: None,
            code_copy: None,
            copy_buttons: None,
            upload: None,
            drop_zone: None,
        })
    }

    /// Create a page and bind every feature whose elements are present.
    pub fn mount(config: JsValue) -> Result<WikiPage, JsError> {
        let mut page = Self::new(config)?;
        page.init_code_copy();
        page.init_tree_navigation();
        page.init_toolbar();
        page.init_preview();
        page.init_unsaved_guard();
        page.init_copy_buttons();
        page.init_upload_drop();
        Ok(page)
    }

    fn textarea(&self) -> Option<HtmlTextAreaElement> {
        match by_id(&self.document, &self.config.elements.textarea) {
            Ok(textarea) => Some(textarea),
            Err(err) => {
                tracing::debug!("{err}");
                None
            }
        }
    }

    /// Highlight and add copy buttons to code blocks already on the page.
    ///
    /// Safe to call again after new blocks appear; buttons from earlier
    /// passes stay bound.
    #[wasm_bindgen(js_name = initCodeCopy)]
    pub fn init_code_copy(&mut self) -> usize {
        let Some(body) = self.document.body() else {
            return 0;
        };
        let labels = &self.config.code_copy;
        let surface = self
            .code_copy
            .get_or_insert_with(|| DomPreviewSurface::new(body.into(), labels.clone()));
        let attached = annotate(surface, &Hljs);
        tracing::debug!(attached, bound = surface.control_count(), "code copy pass");
        attached
    }

    #[wasm_bindgen(js_name = initTreeNavigation)]
    pub fn init_tree_navigation(&mut self) -> bool {
        self.tree = TreeView::attach(&self.document);
        self.tree.is_some()
    }

    #[wasm_bindgen(js_name = initToolbar)]
    pub fn init_toolbar(&mut self) -> bool {
        let Some(textarea) = self.textarea() else {
            return false;
        };
        let toolbar: Element = match by_id(&self.document, &self.config.elements.toolbar) {
            Ok(toolbar) => toolbar,
            Err(err) => {
                tracing::debug!("{err}");
                return false;
            }
        };
        self.toolbar = Some(Toolbar::attach(
            &toolbar,
            textarea,
            self.config.headings.clone(),
        ));
        true
    }

    #[wasm_bindgen(js_name = initPreview)]
    pub fn init_preview(&mut self) -> bool {
        let Some(textarea) = self.textarea() else {
            return false;
        };
        let ids = &self.config.elements;
        let preview: Element = match by_id(&self.document, &ids.preview) {
            Ok(preview) => preview,
            Err(err) => {
                tracing::debug!("{err}");
                return false;
            }
        };
        let elements = PreviewElements {
            textarea,
            preview,
            auto_checkbox: optional_by_id(&self.document, ids.auto_checkbox.as_deref()),
            refresh_button: optional_by_id(&self.document, ids.refresh_button.as_deref()),
            container: optional_by_id(&self.document, ids.preview_container.as_deref()),
        };
        self.preview = Some(LivePreview::mount(
            elements,
            &self.config.preview,
            self.config.code_copy.clone(),
            self.client.clone(),
        ));
        true
    }

    #[wasm_bindgen(js_name = initUnsavedGuard)]
    pub fn init_unsaved_guard(&mut self) -> bool {
        self.guard = UnsavedGuard::attach(&self.document, &self.config.unsaved_message);
        self.guard.is_some()
    }

    #[wasm_bindgen(js_name = initCopyButtons)]
    pub fn init_copy_buttons(&mut self) -> usize {
        let buttons = CopyButtons::attach(&self.document, &self.config.copy_target);
        let count = buttons.len();
        self.copy_buttons = Some(buttons);
        count
    }

    /// Bind the upload trigger and the drop zone.
    #[wasm_bindgen(js_name = initUploadDrop)]
    pub fn init_upload_drop(&mut self) -> bool {
        let Some(input) = query(&self.document, "[data-drop-input]")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        else {
            tracing::debug!("no upload input on this page");
            return false;
        };

        let button: Option<HtmlButtonElement> = optional_by_id(
            &self.document,
            self.config.elements.upload_button.as_deref(),
        );
        if let (Some(button), Some(textarea)) = (button, self.textarea()) {
            self.upload = Some(UploadControl::attach(
                button,
                input.clone(),
                textarea,
                self.config.upload.clone(),
                self.client.clone(),
            ));
        }

        if let Some(zone) = query(&self.document, "[data-dropzone]") {
            self.drop_zone = Some(match &self.upload {
                Some(upload) => DropZoneView::attach(zone, input, upload.file_sink()),
                None => DropZoneView::attach(zone, input, |_| {}),
            });
        }
        self.upload.is_some() || self.drop_zone.is_some()
    }

    /// Apply a toolbar action by name, as a `data-action` button would.
    #[wasm_bindgen(js_name = applyAction)]
    pub fn apply_action(&self, name: &str, level: Option<u8>) -> bool {
        let Some(textarea) = self.textarea() else {
            return false;
        };
        match ToolbarAction::from_name(name, level, &self.config.headings) {
            Some(action) => {
                run_action(&textarea, &action);
                true
            }
            None => false,
        }
    }

    #[wasm_bindgen(js_name = refreshPreview)]
    pub fn refresh_preview(&self) {
        if let Some(preview) = &self.preview {
            preview.refresh();
        }
    }

    #[wasm_bindgen(js_name = isDirty)]
    pub fn is_dirty(&self) -> bool {
        self.guard.as_ref().is_some_and(|g| g.is_dirty())
    }

    #[wasm_bindgen(js_name = resetDirty)]
    pub fn reset_dirty(&self) {
        if let Some(guard) = &self.guard {
            guard.reset();
        }
    }

    /// Unbind every feature.
    pub fn teardown(&mut self) {
        if let Some(guard) = self.guard.take() {
            guard.teardown();
        }
        self.toolbar = None;
        self.preview = None;
        self.tree = None;
        self.code_copy = None;
        self.copy_buttons = None;
        self.drop_zone = None;
        self.upload = None;
        tracing::debug!("wiki page torn down");
    }
}

#[cfg(test)]
mod tests {
    use wasm_bindgen_test::*;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_code_copy_pass_keeps_earlier_buttons_bound() {
        let document = dom::document().unwrap();
        let body = document.body().unwrap();
        body.set_inner_html("<pre><code>a</code></pre>");

        let Ok(mut page) = WikiPage::new(JsValue::UNDEFINED) else {
            panic!("page should build with default config");
        };
        assert_eq!(page.init_code_copy(), 1);

        body.insert_adjacent_html("beforeend", "<pre><code>b</code></pre>")
            .unwrap();
        assert_eq!(page.init_code_copy(), 1);
        assert_eq!(page.init_code_copy(), 0);

        let bound = page.code_copy.as_ref().map(DomPreviewSurface::control_count);
        assert_eq!(bound, Some(2));
        assert_eq!(
            document.query_selector_all(".code-copy").unwrap().length(),
            2
        );
    }
}
