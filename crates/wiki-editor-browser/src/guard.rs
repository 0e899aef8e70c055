//! Unsaved-changes guard bound to `form[data-guard-unsaved="true"]`.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{BeforeUnloadEvent, Document, Element, Event, MouseEvent};

use wiki_editor_core::{DirtyGuard, GuardEvent, LinkClick, NavigationDecision};

use crate::dom::query_all;

const GUARDED_FORMS: &str = r#"form[data-guard-unsaved="true"]"#;
const TRACKED_FIELDS: &str = "textarea, input, select";

/// Read what the guard needs from a link click.
pub fn link_click(link: &Element, event: &MouseEvent) -> LinkClick {
    LinkClick {
        href: link.get_attribute("href").unwrap_or_default(),
        target: link.get_attribute("target"),
        new_tab_modifier: event.ctrl_key()
            || event.meta_key()
            || event.shift_key()
            || event.button() != 0,
    }
}

/// The `<a>` a click landed on or inside.
fn clicked_link(event: &Event) -> Option<Element> {
    event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .and_then(|el| el.closest("a").ok().flatten())
}

/// A bound guard. Dropping it (or calling [`teardown`](Self::teardown))
/// removes every listener.
pub struct UnsavedGuard {
    guard: Rc<RefCell<DirtyGuard>>,
    listeners: Vec<EventListener>,
}

impl UnsavedGuard {
    /// Guard every marked form on the page. `None` when there are none.
    pub fn attach(document: &Document, message: &str) -> Option<Self> {
        let forms = query_all(document, GUARDED_FORMS);
        if forms.is_empty() {
            tracing::debug!("no guarded forms on this page");
            return None;
        }

        let guard = Rc::new(RefCell::new(DirtyGuard::initialize(forms.len())));
        let mut listeners = Vec::new();

        for form in &forms {
            for field in query_all(form, TRACKED_FIELDS) {
                for (name, event) in [
                    ("input", GuardEvent::FieldInput),
                    ("change", GuardEvent::FieldChange),
                ] {
                    let guard = Rc::clone(&guard);
                    listeners.push(EventListener::new(&field, name, move |_| {
                        guard.borrow_mut().handle(event);
                    }));
                }
            }
            let guard = Rc::clone(&guard);
            listeners.push(EventListener::new(form, "submit", move |_| {
                guard.borrow_mut().handle(GuardEvent::Submit);
            }));
        }

        let window = gloo_utils::window();
        {
            let guard = Rc::clone(&guard);
            listeners.push(EventListener::new_with_options(
                &window,
                "beforeunload",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    if guard.borrow().before_unload() != NavigationDecision::Intercept {
                        return;
                    }
                    event.prevent_default();
                    if let Some(event) = event.dyn_ref::<BeforeUnloadEvent>() {
                        event.set_return_value("");
                    }
                },
            ));
        }

        // One delegated listener: covers links added after attach.
        let guard_for_links = Rc::clone(&guard);
        let message = message.to_string();
        listeners.push(EventListener::new_with_options(
            document,
            "click",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let Some(link) = clicked_link(event) else {
                    return;
                };
                let click = link_click(&link, mouse);
                let decision = guard_for_links.borrow_mut().link_clicked(&click, || {
                    gloo_utils::window()
                        .confirm_with_message(&message)
                        .unwrap_or(false)
                });
                if decision == NavigationDecision::Cancel {
                    event.prevent_default();
                }
            },
        ));

        tracing::debug!(forms = forms.len(), "unsaved guard attached");
        Some(Self { guard, listeners })
    }

    pub fn is_dirty(&self) -> bool {
        self.guard.borrow().is_dirty()
    }

    /// Forget pending edits, e.g. after a save done outside a form submit.
    pub fn reset(&self) {
        self.guard.borrow_mut().reset();
    }

    /// The shared guard, for code that needs to ask "is dirty?".
    pub fn handle(&self) -> Rc<RefCell<DirtyGuard>> {
        Rc::clone(&self.guard)
    }

    pub fn teardown(mut self) {
        self.guard.borrow_mut().teardown();
        self.listeners.clear();
    }
}
