//! Unsaved-changes guard.
//!
//! One `DirtyGuard` instance owns the dirty flag for every guarded form on
//! the page. Field events arm it, a submit disarms it, and while armed it
//! asks for confirmation before the page is left. Hosts pass the instance to
//! whatever needs to ask "is dirty?"; there is no global flag.

/// Events from guarded forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardEvent {
    /// `input` on a tracked field.
    FieldInput,
    /// `change` on a tracked field.
    FieldChange,
    /// The form is being submitted, i.e. saved on purpose.
    Submit,
}

/// Lifecycle of the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// No guarded forms on the page; nothing is ever intercepted.
    Inactive,
    Disarmed,
    Armed,
    /// The page is going away; listeners are being dropped.
    TornDown,
}

/// Whether a page-leaving action may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    Proceed,
    /// Show the host's confirmation (browser unload prompt).
    Intercept,
    /// The user declined; cancel the navigation entirely.
    Cancel,
}

/// What the guard needs to know about a clicked link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkClick {
    /// Raw `href` attribute.
    pub href: String,
    /// Raw `target` attribute.
    pub target: Option<String>,
    /// Ctrl/meta/shift held or a non-primary button: opens elsewhere.
    pub new_tab_modifier: bool,
}

impl LinkClick {
    /// Links that leave the current document in this tab.
    pub fn leaves_page(&self) -> bool {
        if self.new_tab_modifier || self.target.as_deref() == Some("_blank") {
            return false;
        }
        !self.href.starts_with('#')
    }
}

#[derive(Debug, Clone)]
pub struct DirtyGuard {
    state: GuardState,
    forms: usize,
}

impl Default for DirtyGuard {
    fn default() -> Self {
        Self::initialize(0)
    }
}

impl DirtyGuard {
    /// Start guarding `forms` forms. With zero forms the guard stays inactive.
    pub fn initialize(forms: usize) -> Self {
        let state = if forms == 0 {
            GuardState::Inactive
        } else {
            GuardState::Disarmed
        };
        Self { state, forms }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn forms(&self) -> usize {
        self.forms
    }

    pub fn is_dirty(&self) -> bool {
        self.state == GuardState::Armed
    }

    /// Feed a form event.
    pub fn handle(&mut self, event: GuardEvent) {
        if matches!(self.state, GuardState::Inactive | GuardState::TornDown) {
            return;
        }
        let next = match event {
            GuardEvent::FieldInput | GuardEvent::FieldChange => GuardState::Armed,
            GuardEvent::Submit => GuardState::Disarmed,
        };
        if next != self.state {
            tracing::debug!(?event, from = ?self.state, to = ?next, "unsaved guard transition");
            self.state = next;
        }
    }

    /// Clear the flag without a submit (the user chose to discard).
    pub fn reset(&mut self) {
        if self.state == GuardState::Armed {
            self.state = GuardState::Disarmed;
        }
    }

    /// Decide on a browser unload (tab close, refresh, external back).
    pub fn before_unload(&self) -> NavigationDecision {
        if self.is_dirty() {
            NavigationDecision::Intercept
        } else {
            NavigationDecision::Proceed
        }
    }

    /// Decide on an in-page link click.
    ///
    /// `confirm` is only consulted when the click would leave the page with
    /// unsaved edits. Accepting clears the flag so the unload that follows
    /// is not intercepted a second time.
    pub fn link_clicked(
        &mut self,
        link: &LinkClick,
        confirm: impl FnOnce() -> bool,
    ) -> NavigationDecision {
        if !self.is_dirty() || !link.leaves_page() {
            return NavigationDecision::Proceed;
        }
        if confirm() {
            self.reset();
            NavigationDecision::Proceed
        } else {
            NavigationDecision::Cancel
        }
    }

    /// Stop guarding. Later events are ignored.
    pub fn teardown(&mut self) {
        self.state = GuardState::TornDown;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(href: &str) -> LinkClick {
        LinkClick {
            href: href.into(),
            ..LinkClick::default()
        }
    }

    #[test]
    fn test_change_arms_submit_disarms() {
        let mut guard = DirtyGuard::initialize(1);
        assert_eq!(guard.before_unload(), NavigationDecision::Proceed);

        guard.handle(GuardEvent::FieldInput);
        assert_eq!(guard.before_unload(), NavigationDecision::Intercept);

        guard.handle(GuardEvent::Submit);
        assert_eq!(guard.before_unload(), NavigationDecision::Proceed);
    }

    #[test]
    fn test_change_right_before_submit_still_disarms() {
        let mut guard = DirtyGuard::initialize(2);
        guard.handle(GuardEvent::FieldInput);
        guard.handle(GuardEvent::FieldChange);
        guard.handle(GuardEvent::Submit);
        assert!(!guard.is_dirty());
    }

    #[test]
    fn test_no_forms_never_intercepts() {
        let mut guard = DirtyGuard::initialize(0);
        guard.handle(GuardEvent::FieldInput);
        assert_eq!(guard.state(), GuardState::Inactive);
        assert_eq!(guard.before_unload(), NavigationDecision::Proceed);
    }

    #[test]
    fn test_link_confirmation() {
        let mut guard = DirtyGuard::initialize(1);
        guard.handle(GuardEvent::FieldInput);

        let decision = guard.link_clicked(&link("/docs"), || false);
        assert_eq!(decision, NavigationDecision::Cancel);
        assert!(guard.is_dirty());

        let decision = guard.link_clicked(&link("/docs"), || true);
        assert_eq!(decision, NavigationDecision::Proceed);
        assert!(!guard.is_dirty());
        assert_eq!(guard.before_unload(), NavigationDecision::Proceed);
    }

    #[test]
    fn test_links_that_stay_never_prompt() {
        let mut guard = DirtyGuard::initialize(1);
        guard.handle(GuardEvent::FieldChange);

        let stays = [
            link("#section"),
            LinkClick {
                target: Some("_blank".into()),
                ..link("/docs")
            },
            LinkClick {
                new_tab_modifier: true,
                ..link("/docs")
            },
        ];
        for click in stays {
            let decision = guard.link_clicked(&click, || panic!("must not prompt"));
            assert_eq!(decision, NavigationDecision::Proceed);
        }
        assert!(guard.is_dirty());
    }

    #[test]
    fn test_clean_guard_never_prompts() {
        let mut guard = DirtyGuard::initialize(1);
        let decision = guard.link_clicked(&link("/docs"), || panic!("must not prompt"));
        assert_eq!(decision, NavigationDecision::Proceed);
    }

    #[test]
    fn test_teardown_ignores_events() {
        let mut guard = DirtyGuard::initialize(1);
        guard.teardown();
        guard.handle(GuardEvent::FieldInput);
        assert_eq!(guard.state(), GuardState::TornDown);
        assert_eq!(guard.before_unload(), NavigationDecision::Proceed);
    }
}
