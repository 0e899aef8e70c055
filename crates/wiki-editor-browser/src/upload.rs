//! Image upload: the drop zone and the upload trigger.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{DragEvent, Element, File, HtmlButtonElement, HtmlInputElement, HtmlTextAreaElement};

use wiki_editor_core::{
    BeginOutcome, DROP_HIGHLIGHT_CLASSES, DebounceToken, DragPhase, DropZone, EditorError,
    TriggerView, UploadClient, UploadFile, UploadIndicator, UploadInserter, UploadResponse,
    UploadSettings,
};

use crate::dom::{js_error, set_classes};
use crate::textarea::TextareaDocument;

/// Read a browser `File` into memory.
pub async fn read_file(file: &File) -> Result<UploadFile, EditorError> {
    let buffer = JsFuture::from(file.array_buffer()).await.map_err(js_error)?;
    Ok(UploadFile {
        name: file.name(),
        mime: file.type_(),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}

fn first_file(input: &HtmlInputElement) -> Option<File> {
    input.files().and_then(|files| files.get(0))
}

struct UploadState {
    inserter: UploadInserter<File>,
    restore_timer: Option<Timeout>,
}

struct Shared<C> {
    button: HtmlButtonElement,
    textarea: HtmlTextAreaElement,
    client: C,
    state: RefCell<UploadState>,
}

impl<C: UploadClient + 'static> Shared<C> {
    fn show(&self, view: &TriggerView) {
        self.button.set_text_content(Some(&view.label));
        self.button.set_disabled(view.disabled);
        let state = match view.indicator {
            UploadIndicator::None => None,
            UploadIndicator::Busy => Some("busy"),
            UploadIndicator::Done => Some("done"),
            UploadIndicator::Failed => Some("failed"),
        };
        let _ = match state {
            Some(state) => self.button.set_attribute("data-upload-state", state),
            None => self.button.remove_attribute("data-upload-state"),
        };
    }

    fn trigger(self: &Rc<Self>) {
        let outcome = self.state.borrow_mut().inserter.begin();
        match outcome {
            BeginOutcome::Upload { file, view } => {
                self.show(&view);
                let this = Rc::clone(self);
                wasm_bindgen_futures::spawn_local(async move {
                    let result = match read_file(&file).await {
                        Ok(file) => this.client.upload(file).await,
                        Err(err) => Err(err),
                    };
                    this.settle(result);
                });
            }
            BeginOutcome::Rejected { view, restore } => {
                tracing::debug!("{}", EditorError::NoFileSelected);
                self.show(&view);
                self.arm_restore(restore);
            }
            BeginOutcome::Ignored => {}
        }
    }

    fn settle(self: &Rc<Self>, result: Result<UploadResponse, EditorError>) {
        // Snapshot the textarea now: the caret may have moved during the upload.
        let mut doc = TextareaDocument::load(self.textarea.clone());
        let finished = self.state.borrow_mut().inserter.finish(result, &mut doc);
        self.show(&finished.view);
        self.arm_restore(finished.restore);
    }

    fn arm_restore(self: &Rc<Self>, token: DebounceToken) {
        let mut state = self.state.borrow_mut();
        let delay = u32::try_from(state.inserter.restore_delay().as_millis()).unwrap_or(u32::MAX);
        let this = Rc::clone(self);
        state.restore_timer = Some(Timeout::new(delay, move || {
            let view = this.state.borrow_mut().inserter.restore(token);
            if let Some(view) = view {
                this.show(&view);
            }
        }));
    }

    fn select(&self, file: File) {
        tracing::debug!(name = %file.name(), "file selected for upload");
        self.state.borrow_mut().inserter.select(file);
    }
}

/// The upload trigger bound to a button, a file input and the textarea.
pub struct UploadControl<C: UploadClient + 'static> {
    shared: Rc<Shared<C>>,
    _listeners: Vec<EventListener>,
}

impl<C: UploadClient + 'static> UploadControl<C> {
    pub fn attach(
        button: HtmlButtonElement,
        input: HtmlInputElement,
        textarea: HtmlTextAreaElement,
        settings: UploadSettings,
        client: C,
    ) -> Self {
        let original_label = button.text_content().unwrap_or_default();
        let shared = Rc::new(Shared {
            button: button.clone(),
            textarea,
            client,
            state: RefCell::new(UploadState {
                inserter: UploadInserter::new(settings, original_label.trim()),
                restore_timer: None,
            }),
        });
        if let Some(file) = first_file(&input) {
            shared.select(file);
        }

        let mut listeners = Vec::new();
        let this = Rc::clone(&shared);
        let picker = input.clone();
        listeners.push(EventListener::new(&input, "change", move |_| {
            if let Some(file) = first_file(&picker) {
                this.select(file);
            }
        }));

        let this = Rc::clone(&shared);
        listeners.push(EventListener::new_with_options(
            &button,
            "click",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                this.trigger();
            },
        ));

        Self {
            shared,
            _listeners: listeners,
        }
    }

    /// Make `file` the one the next trigger uploads.
    pub fn select(&self, file: File) {
        self.shared.select(file);
    }

    /// A callback selecting files into this control, for a drop zone.
    pub fn file_sink(&self) -> impl Fn(File) + 'static {
        let shared = Rc::clone(&self.shared);
        move |file| shared.select(file)
    }

    pub fn trigger(&self) {
        self.shared.trigger();
    }
}

impl<C: UploadClient + 'static> Drop for UploadControl<C> {
    fn drop(&mut self) {
        self.shared.state.borrow_mut().restore_timer = None;
    }
}

/// `[data-dropzone]` feeding files into `[data-drop-input]`.
pub struct DropZoneView {
    _listeners: Vec<EventListener>,
}

impl DropZoneView {
    /// Bind the zone. `on_file` receives the first dropped file.
    pub fn attach(
        zone: Element,
        input: HtmlInputElement,
        on_file: impl Fn(File) + 'static,
    ) -> Self {
        let state = Rc::new(RefCell::new(DropZone::default()));
        let on_file = Rc::new(on_file);
        let mut listeners = Vec::new();

        for (name, phase) in [
            ("dragenter", DragPhase::Enter),
            ("dragover", DragPhase::Over),
            ("dragleave", DragPhase::Leave),
            ("drop", DragPhase::Drop),
        ] {
            let state = Rc::clone(&state);
            let on_file = Rc::clone(&on_file);
            let zone_el = zone.clone();
            let input = input.clone();
            listeners.push(EventListener::new_with_options(
                &zone,
                name,
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    event.prevent_default();
                    event.stop_propagation();

                    let highlighted = state.borrow_mut().handle(phase);
                    set_classes(&zone_el, &DROP_HIGHLIGHT_CLASSES, highlighted);

                    if phase != DragPhase::Drop {
                        return;
                    }
                    let files = event
                        .dyn_ref::<DragEvent>()
                        .and_then(|e| e.data_transfer())
                        .and_then(|dt| dt.files());
                    if let Some(files) = files.filter(|f| f.length() > 0) {
                        input.set_files(Some(&files));
                        if let Some(file) = files.get(0) {
                            on_file(file);
                        }
                    }
                },
            ));
        }

        tracing::debug!("drop zone attached");
        Self {
            _listeners: listeners,
        }
    }
}
