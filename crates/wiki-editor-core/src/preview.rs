//! Debounced live preview as an explicit state machine.
//!
//! The machine is fed `PreviewEvent`s and answers with `PreviewCommand`s for
//! the host to carry out (arm a timer, start a render call, swap the preview
//! HTML). It never touches a DOM or a network itself, so any event sequence
//! can be replayed in a test.
//!
//! Lifecycle: `Idle → Scheduled → Rendering → Idle`.
//!
//! - Qualifying events reschedule the single debounce slot: refresh in
//!   either mode, plus buffer changes and the auto switch turning on in auto
//!   mode. Only the trailing event in a burst fires.
//! - A fire starts a render unless one is already in flight; then exactly one
//!   follow-up render is queued and starts when the in-flight call settles.
//!   Render calls never overlap.
//! - The host snapshots the buffer when it executes `StartRender`, so the
//!   render always sees the latest text rather than the text at schedule time.
//! - Settled renders are applied in the order they settle. Since calls are
//!   serialized that is also the order they were started.

use web_time::Instant;

use crate::debounce::{DebounceToken, Debouncer};
use crate::error::EditorError;

/// Whether typing drives the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewMode {
    /// Re-render after every burst of edits while the auto switch is on.
    Auto,
    /// Only render on the explicit trigger, revealing the hidden container.
    Manual,
}

/// Observable pipeline phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewPhase {
    Idle,
    Scheduled,
    Rendering,
}

/// Identifies one render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTicket(u64);

#[derive(Debug)]
pub enum PreviewEvent {
    /// Page finished wiring the preview.
    Mounted,
    /// The editing surface emitted a change.
    BufferChanged,
    /// The refresh control was clicked.
    RefreshRequested,
    /// The auto-preview switch changed.
    AutoToggled(bool),
    /// A debounce timer armed by `ArmTimer` expired.
    TimerExpired(DebounceToken),
    /// A render call finished.
    RenderSettled {
        ticket: RenderTicket,
        result: Result<String, EditorError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewCommand {
    /// Arm the host timer, replacing any armed one.
    ArmTimer {
        token: DebounceToken,
        delay_ms: u32,
    },
    /// Drop the armed host timer.
    DisarmTimer,
    /// Snapshot the buffer now and issue one render call for it.
    StartRender(RenderTicket),
    /// Replace the preview content and run the annotation pass over it.
    ShowHtml(String),
    /// Replace the preview content with the error fragment.
    ShowError(String),
    /// Unhide the preview container (manual mode).
    RevealContainer,
}

#[derive(Debug)]
struct InFlight {
    ticket: RenderTicket,
    started: Instant,
}

pub struct PreviewMachine {
    mode: PreviewMode,
    auto_enabled: bool,
    debouncer: Debouncer,
    in_flight: Option<InFlight>,
    queued: bool,
    next_ticket: u64,
    revealed: bool,
    error_html: String,
}

impl PreviewMachine {
    /// Create a machine.
    ///
    /// `auto_enabled` is the initial state of the auto switch; pages without
    /// one pass true. `error_html` is the fragment shown when a render fails.
    pub fn new(
        mode: PreviewMode,
        auto_enabled: bool,
        debouncer: Debouncer,
        error_html: impl Into<String>,
    ) -> Self {
        Self {
            mode,
            auto_enabled,
            debouncer,
            in_flight: None,
            queued: false,
            next_ticket: 0,
            revealed: false,
            error_html: error_html.into(),
        }
    }

    pub fn mode(&self) -> PreviewMode {
        self.mode
    }

    pub fn phase(&self) -> PreviewPhase {
        if self.in_flight.is_some() {
            PreviewPhase::Rendering
        } else if self.debouncer.is_pending() || self.queued {
            PreviewPhase::Scheduled
        } else {
            PreviewPhase::Idle
        }
    }

    /// Whether a follow-up render is waiting for the in-flight one.
    pub fn has_queued_render(&self) -> bool {
        self.queued
    }

    /// Feed one event and collect the commands it produces.
    pub fn handle(&mut self, event: PreviewEvent) -> Vec<PreviewCommand> {
        let mut commands = Vec::new();
        match event {
            PreviewEvent::Mounted => {
                if self.mode == PreviewMode::Auto {
                    self.start_or_queue(&mut commands);
                }
            }
            PreviewEvent::BufferChanged => {
                if self.mode == PreviewMode::Auto && self.auto_enabled {
                    self.schedule(&mut commands);
                }
            }
            PreviewEvent::RefreshRequested => {
                if self.mode == PreviewMode::Manual && !self.revealed {
                    self.revealed = true;
                    commands.push(PreviewCommand::RevealContainer);
                }
                self.schedule(&mut commands);
            }
            PreviewEvent::AutoToggled(enabled) => {
                self.auto_enabled = enabled;
                if enabled {
                    if self.mode == PreviewMode::Auto {
                        self.schedule(&mut commands);
                    }
                } else if self.debouncer.is_pending() {
                    self.debouncer.cancel();
                    commands.push(PreviewCommand::DisarmTimer);
                }
            }
            PreviewEvent::TimerExpired(token) => {
                if self.debouncer.fire(token) {
                    self.start_or_queue(&mut commands);
                } else {
                    tracing::trace!(?token, "ignoring stale preview timer");
                }
            }
            PreviewEvent::RenderSettled { ticket, result } => {
                self.settle(ticket, result, &mut commands);
            }
        }
        commands
    }

    fn schedule(&mut self, commands: &mut Vec<PreviewCommand>) {
        let token = self.debouncer.schedule();
        let delay_ms = u32::try_from(self.debouncer.delay().as_millis()).unwrap_or(u32::MAX);
        commands.push(PreviewCommand::ArmTimer { token, delay_ms });
    }

    fn start_or_queue(&mut self, commands: &mut Vec<PreviewCommand>) {
        if self.in_flight.is_some() {
            self.queued = true;
            return;
        }
        self.next_ticket += 1;
        let ticket = RenderTicket(self.next_ticket);
        self.in_flight = Some(InFlight {
            ticket,
            started: Instant::now(),
        });
        commands.push(PreviewCommand::StartRender(ticket));
    }

    fn settle(
        &mut self,
        ticket: RenderTicket,
        result: Result<String, EditorError>,
        commands: &mut Vec<PreviewCommand>,
    ) {
        let Some(in_flight) = self.in_flight.take_if(|f| f.ticket == ticket) else {
            tracing::warn!(?ticket, "render settled without a matching call in flight");
            return;
        };
        let elapsed = in_flight.started.elapsed();

        match result {
            Ok(html) => {
                tracing::debug!(?ticket, ?elapsed, bytes = html.len(), "preview rendered");
                commands.push(PreviewCommand::ShowHtml(html));
            }
            Err(err) => {
                tracing::warn!(?ticket, ?elapsed, "preview render failed: {err}");
                commands.push(PreviewCommand::ShowError(self.error_html.clone()));
            }
        }

        if std::mem::take(&mut self.queued) {
            self.start_or_queue(commands);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const ERROR_HTML: &str = "<p class=\"text-red-600\">Ошибка предпросмотра</p>";

    fn auto_machine() -> PreviewMachine {
        PreviewMachine::new(
            PreviewMode::Auto,
            true,
            Debouncer::new(Duration::from_millis(300)),
            ERROR_HTML,
        )
    }

    fn armed_token(commands: &[PreviewCommand]) -> DebounceToken {
        match commands {
            [PreviewCommand::ArmTimer { token, delay_ms }] => {
                assert_eq!(*delay_ms, 300);
                *token
            }
            other => panic!("expected a single ArmTimer, got {other:?}"),
        }
    }

    fn started_ticket(commands: &[PreviewCommand]) -> RenderTicket {
        match commands {
            [PreviewCommand::StartRender(ticket)] => *ticket,
            other => panic!("expected a single StartRender, got {other:?}"),
        }
    }

    #[test]
    fn test_burst_collapses_to_one_render_of_latest_text() {
        let mut machine = auto_machine();
        let mut buffer = String::new();
        let mut tokens = Vec::new();

        for ch in "hello".chars() {
            buffer.push(ch);
            tokens.push(armed_token(&machine.handle(PreviewEvent::BufferChanged)));
            assert_eq!(machine.phase(), PreviewPhase::Scheduled);
        }

        // Every timer fires eventually; only the last one is live.
        let mut rendered = Vec::new();
        for token in tokens {
            for command in machine.handle(PreviewEvent::TimerExpired(token)) {
                if let PreviewCommand::StartRender(_) = command {
                    rendered.push(buffer.clone());
                }
            }
        }

        assert_eq!(rendered, vec!["hello".to_string()]);
        assert_eq!(machine.phase(), PreviewPhase::Rendering);
    }

    #[test]
    fn test_success_shows_html_and_returns_to_idle() {
        let mut machine = auto_machine();
        let ticket = started_ticket(&machine.handle(PreviewEvent::Mounted));

        let commands = machine.handle(PreviewEvent::RenderSettled {
            ticket,
            result: Ok("<p>ok</p>".into()),
        });
        assert_eq!(commands, vec![PreviewCommand::ShowHtml("<p>ok</p>".into())]);
        assert_eq!(machine.phase(), PreviewPhase::Idle);
    }

    #[test]
    fn test_failure_shows_error_fragment() {
        let mut machine = auto_machine();
        let ticket = started_ticket(&machine.handle(PreviewEvent::Mounted));

        let commands = machine.handle(PreviewEvent::RenderSettled {
            ticket,
            result: Err(EditorError::Status {
                endpoint: "/render_markdown".into(),
                status: 502,
            }),
        });
        assert_eq!(commands, vec![PreviewCommand::ShowError(ERROR_HTML.into())]);
        assert_eq!(machine.phase(), PreviewPhase::Idle);
    }

    #[test]
    fn test_fire_during_render_queues_one_follow_up() {
        let mut machine = auto_machine();
        let first = started_ticket(&machine.handle(PreviewEvent::Mounted));

        // Two separate bursts settle while the first call is out.
        for _ in 0..2 {
            let token = armed_token(&machine.handle(PreviewEvent::BufferChanged));
            assert!(machine.handle(PreviewEvent::TimerExpired(token)).is_empty());
        }
        assert!(machine.has_queued_render());
        assert_eq!(machine.phase(), PreviewPhase::Rendering);

        let commands = machine.handle(PreviewEvent::RenderSettled {
            ticket: first,
            result: Ok("<p>old</p>".into()),
        });
        let [PreviewCommand::ShowHtml(html), PreviewCommand::StartRender(second)] =
            commands.as_slice()
        else {
            panic!("expected apply then follow-up render, got {commands:?}");
        };
        assert_eq!(html, "<p>old</p>");
        assert_ne!(*second, first);
        assert!(!machine.has_queued_render());

        let commands = machine.handle(PreviewEvent::RenderSettled {
            ticket: *second,
            result: Ok("<p>new</p>".into()),
        });
        assert_eq!(commands, vec![PreviewCommand::ShowHtml("<p>new</p>".into())]);
        assert_eq!(machine.phase(), PreviewPhase::Idle);
    }

    #[test]
    fn test_unknown_ticket_is_ignored() {
        let mut machine = auto_machine();
        let ticket = started_ticket(&machine.handle(PreviewEvent::Mounted));
        machine.handle(PreviewEvent::RenderSettled {
            ticket,
            result: Ok(String::new()),
        });

        let commands = machine.handle(PreviewEvent::RenderSettled {
            ticket,
            result: Ok("<p>late</p>".into()),
        });
        assert!(commands.is_empty());
    }

    #[test]
    fn test_auto_switch() {
        let mut machine = auto_machine();
        let token = armed_token(&machine.handle(PreviewEvent::BufferChanged));

        assert_eq!(
            machine.handle(PreviewEvent::AutoToggled(false)),
            vec![PreviewCommand::DisarmTimer]
        );
        assert!(machine.handle(PreviewEvent::TimerExpired(token)).is_empty());
        assert!(machine.handle(PreviewEvent::BufferChanged).is_empty());
        assert_eq!(machine.phase(), PreviewPhase::Idle);

        let token = armed_token(&machine.handle(PreviewEvent::AutoToggled(true)));
        started_ticket(&machine.handle(PreviewEvent::TimerExpired(token)));
    }

    #[test]
    fn test_manual_mode_renders_only_on_trigger() {
        let mut machine = PreviewMachine::new(
            PreviewMode::Manual,
            false,
            Debouncer::new(Duration::from_millis(300)),
            ERROR_HTML,
        );
        assert!(machine.handle(PreviewEvent::Mounted).is_empty());
        assert!(machine.handle(PreviewEvent::BufferChanged).is_empty());
        assert!(machine.handle(PreviewEvent::AutoToggled(true)).is_empty());
        assert!(machine.handle(PreviewEvent::BufferChanged).is_empty());
        assert_eq!(machine.phase(), PreviewPhase::Idle);

        let commands = machine.handle(PreviewEvent::RefreshRequested);
        assert_eq!(commands[0], PreviewCommand::RevealContainer);
        let token = armed_token(&commands[1..]);
        started_ticket(&machine.handle(PreviewEvent::TimerExpired(token)));

        // The container is only revealed once.
        let commands = machine.handle(PreviewEvent::RefreshRequested);
        armed_token(&commands);
    }
}
