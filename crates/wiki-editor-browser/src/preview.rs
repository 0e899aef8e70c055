//! Live preview bound to the page.
//!
//! DOM events become `PreviewEvent`s for the core `PreviewMachine`; the
//! commands it answers with are carried out here with a `gloo-timers`
//! timeout, a spawned render call and the preview surface.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use web_sys::{Element, HtmlInputElement, HtmlTextAreaElement};

use wiki_editor_core::{
    CopyLabels, PreviewCommand, PreviewEvent, PreviewMachine, PreviewPhase, PreviewSettings,
    PreviewSurface, RenderClient, show_rendered,
};

use crate::annotate::{DomPreviewSurface, Hljs};
use crate::dom::set_classes;

/// The elements a preview binds to. Only `textarea` and `preview` are required.
pub struct PreviewElements {
    pub textarea: HtmlTextAreaElement,
    pub preview: Element,
    pub auto_checkbox: Option<HtmlInputElement>,
    pub refresh_button: Option<Element>,
    pub container: Option<Element>,
}

struct PreviewState {
    machine: PreviewMachine,
    timer: Option<Timeout>,
    surface: DomPreviewSurface,
    container: Option<Element>,
}

struct Shared<C> {
    textarea: HtmlTextAreaElement,
    client: C,
    state: RefCell<PreviewState>,
}

impl<C: RenderClient + 'static> Shared<C> {
    fn dispatch(self: &Rc<Self>, event: PreviewEvent) {
        let commands = self.state.borrow_mut().machine.handle(event);
        for command in commands {
            self.execute(command);
        }
    }

    fn execute(self: &Rc<Self>, command: PreviewCommand) {
        match command {
            PreviewCommand::ArmTimer { token, delay_ms } => {
                let this = Rc::clone(self);
                let timeout = Timeout::new(delay_ms, move || {
                    this.dispatch(PreviewEvent::TimerExpired(token));
                });
                // Replacing the slot drops (cancels) the previous timeout.
                self.state.borrow_mut().timer = Some(timeout);
            }
            PreviewCommand::DisarmTimer => {
                self.state.borrow_mut().timer = None;
            }
            PreviewCommand::StartRender(ticket) => {
                let content = self.textarea.value();
                let this = Rc::clone(self);
                wasm_bindgen_futures::spawn_local(async move {
                    let result = this.client.render(&content).await;
                    this.dispatch(PreviewEvent::RenderSettled { ticket, result });
                });
            }
            PreviewCommand::ShowHtml(html) => {
                let mut state = self.state.borrow_mut();
                let attached = show_rendered(&mut state.surface, &Hljs, &html);
                tracing::trace!(attached, "preview annotated");
            }
            PreviewCommand::ShowError(html) => {
                self.state.borrow_mut().surface.replace_html(&html);
            }
            PreviewCommand::RevealContainer => {
                if let Some(container) = &self.state.borrow().container {
                    set_classes(container, &["hidden"], false);
                }
            }
        }
    }
}

/// A mounted preview. Dropping it unbinds every listener and cancels a
/// pending timer; a render already in flight still lands.
pub struct LivePreview<C: RenderClient + 'static> {
    shared: Rc<Shared<C>>,
    _listeners: Vec<EventListener>,
}

impl<C: RenderClient + 'static> LivePreview<C> {
    pub fn mount(
        elements: PreviewElements,
        settings: &PreviewSettings,
        copy_labels: CopyLabels,
        client: C,
    ) -> Self {
        let PreviewElements {
            textarea,
            preview,
            auto_checkbox,
            refresh_button,
            container,
        } = elements;

        let auto_enabled = auto_checkbox.as_ref().is_none_or(|cb| cb.checked());
        let shared = Rc::new(Shared {
            textarea: textarea.clone(),
            client,
            state: RefCell::new(PreviewState {
                machine: settings.machine(auto_enabled),
                timer: None,
                surface: DomPreviewSurface::new(preview, copy_labels),
                container,
            }),
        });

        let mut listeners = Vec::new();
        let this = Rc::clone(&shared);
        listeners.push(EventListener::new(&textarea, "input", move |_| {
            this.dispatch(PreviewEvent::BufferChanged);
        }));

        if let Some(checkbox) = auto_checkbox {
            let this = Rc::clone(&shared);
            let cb = checkbox.clone();
            listeners.push(EventListener::new(&checkbox, "change", move |_| {
                this.dispatch(PreviewEvent::AutoToggled(cb.checked()));
            }));
        }

        if let Some(button) = refresh_button {
            let this = Rc::clone(&shared);
            listeners.push(EventListener::new_with_options(
                &button,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    event.prevent_default();
                    this.dispatch(PreviewEvent::RefreshRequested);
                },
            ));
        }

        shared.dispatch(PreviewEvent::Mounted);
        tracing::debug!(mode = ?shared.state.borrow().machine.mode(), "preview mounted");

        Self {
            shared,
            _listeners: listeners,
        }
    }

    /// Same as clicking the refresh control.
    pub fn refresh(&self) {
        self.shared.dispatch(PreviewEvent::RefreshRequested);
    }

    pub fn phase(&self) -> PreviewPhase {
        self.shared.state.borrow().machine.phase()
    }
}

impl<C: RenderClient + 'static> Drop for LivePreview<C> {
    fn drop(&mut self) {
        // The timeout closure holds the shared state; drop it to free both.
        self.shared.state.borrow_mut().timer = None;
    }
}
