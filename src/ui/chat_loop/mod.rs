//! Main chat event loop.
//!
//! The loop is the only owner of [`App`]. Terminal events arrive from a
//! reader task, request outcomes from [`ChatRequestService`] tasks; both are
//! turned into [`AppAction`]s and applied here, so no lock ever guards the
//! conversation.

mod keybindings;
mod lifecycle;

use std::error::Error;
use std::time::{Duration, Instant};

use ratatui::crossterm::event::{self, Event};
use tokio::sync::mpsc;
use tracing::{debug, info};

use self::keybindings::actions_for_event;
use self::lifecycle::{restore_terminal, setup_terminal};
use crate::core::app::{apply_actions, App, AppAction, AppActionDispatcher, AppCommand};
use crate::core::chat_request::{ChatRequestService, RequestOutcome};
use crate::ui::renderer::ui;

const MAX_FPS: u64 = 60;
const LOADING_REDRAW: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

/// Forward terminal events to the action queue. Returns whether any arrived.
fn process_ui_events(
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    dispatcher: &AppActionDispatcher,
) -> bool {
    let mut received_any = false;
    while let Ok(UiEvent::Crossterm(ev)) = event_rx.try_recv() {
        received_any = true;
        dispatcher.dispatch_many(actions_for_event(ev));
    }
    received_any
}

/// Forward finished requests to the action queue. Returns whether any arrived.
fn process_request_outcomes(
    rx: &mut mpsc::UnboundedReceiver<(RequestOutcome, u64)>,
    dispatcher: &AppActionDispatcher,
) -> bool {
    let mut received_any = false;
    while let Ok((outcome, request_id)) = rx.try_recv() {
        received_any = true;
        dispatcher.dispatch(AppAction::RequestCompleted {
            request_id,
            outcome,
        });
    }
    received_any
}

/// Apply every queued action and run the commands they produce.
fn drain_action_queue(
    app: &mut App,
    request_service: &ChatRequestService,
    action_rx: &mut mpsc::UnboundedReceiver<AppAction>,
) -> bool {
    let mut pending = Vec::new();
    while let Ok(action) = action_rx.try_recv() {
        pending.push(action);
    }
    if pending.is_empty() {
        return false;
    }

    for command in apply_actions(app, pending) {
        match command {
            AppCommand::SpawnRequest(params) => {
                debug!(request_id = params.request_id, "Spawning request task");
                request_service.spawn_request(params);
            }
        }
    }
    true
}

pub async fn run_chat(mut app: App) -> Result<(), Box<dyn Error>> {
    let mut terminal = setup_terminal()?;
    info!(model = %app.session.model, "Chat session started");

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppAction>();
    let dispatcher = AppActionDispatcher::new(action_tx);
    let (request_service, mut request_rx) = ChatRequestService::new();

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut last_loading_frame = Instant::now();
    let mut request_redraw = true;

    let result: Result<(), Box<dyn Error>> = loop {
        if app.ui.exit_requested {
            break Ok(());
        }

        let now = Instant::now();
        if request_redraw && now.duration_since(last_draw) >= frame_duration {
            if let Err(err) = terminal.draw(|f| ui(f, &mut app)) {
                break Err(err.into());
            }
            last_draw = now;
            request_redraw = false;
        }

        let events = process_ui_events(&mut event_rx, &dispatcher);
        let outcomes = process_request_outcomes(&mut request_rx, &dispatcher);
        let applied = drain_action_queue(&mut app, &request_service, &mut action_rx);
        if events || outcomes || applied {
            request_redraw = true;
        }

        if app.is_pending() && now.duration_since(last_loading_frame) >= LOADING_REDRAW {
            request_redraw = true;
            last_loading_frame = now;
        }

        if !events && !outcomes && !applied {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    };

    event_reader_handle.abort();
    restore_terminal(&mut terminal)?;
    info!(messages = app.conversation.len(), "Chat session ended");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::ERROR_REPLY;
    use crate::core::message::Role;
    use crate::utils::test_utils::{create_test_app_with, ScriptedBackend};
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    struct Harness {
        app: App,
        dispatcher: AppActionDispatcher,
        action_rx: mpsc::UnboundedReceiver<AppAction>,
        request_service: ChatRequestService,
        request_rx: mpsc::UnboundedReceiver<(RequestOutcome, u64)>,
        event_tx: mpsc::UnboundedSender<UiEvent>,
        event_rx: mpsc::UnboundedReceiver<UiEvent>,
    }

    impl Harness {
        fn new(backend: std::sync::Arc<ScriptedBackend>) -> Self {
            let (action_tx, action_rx) = mpsc::unbounded_channel();
            let (request_service, request_rx) = ChatRequestService::new();
            let (event_tx, event_rx) = mpsc::unbounded_channel();
            Self {
                app: create_test_app_with(backend),
                dispatcher: AppActionDispatcher::new(action_tx),
                action_rx,
                request_service,
                request_rx,
                event_tx,
                event_rx,
            }
        }

        fn press(&self, code: KeyCode, modifiers: KeyModifiers) {
            self.event_tx
                .send(UiEvent::Crossterm(Event::Key(KeyEvent::new(code, modifiers))))
                .expect("send event");
        }

        fn type_text(&self, text: &str) {
            for ch in text.chars() {
                self.press(KeyCode::Char(ch), KeyModifiers::NONE);
            }
        }

        fn pump(&mut self) {
            process_ui_events(&mut self.event_rx, &self.dispatcher);
            process_request_outcomes(&mut self.request_rx, &self.dispatcher);
            drain_action_queue(&mut self.app, &self.request_service, &mut self.action_rx);
        }

        async fn wait_for_outcome(&mut self) {
            let (outcome, request_id) = self.request_rx.recv().await.expect("outcome");
            self.dispatcher.dispatch(AppAction::RequestCompleted {
                request_id,
                outcome,
            });
            self.pump();
        }
    }

    #[tokio::test]
    async fn typed_message_round_trips_through_the_loop() {
        let backend = ScriptedBackend::replying("hi there");
        let mut harness = Harness::new(backend.clone());

        harness.type_text("hello");
        harness.press(KeyCode::Enter, KeyModifiers::NONE);
        harness.pump();

        assert!(harness.app.is_pending());
        assert_eq!(harness.app.ui.input_text(), "");
        assert_eq!(harness.app.conversation.len(), 1);

        harness.wait_for_outcome().await;

        assert!(!harness.app.is_pending());
        let entries: Vec<(Role, &str)> = harness
            .app
            .conversation
            .iter()
            .map(|m| (m.role(), m.text()))
            .collect();
        assert_eq!(entries, [(Role::User, "hello"), (Role::Model, "hi there")]);
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn failures_surface_as_error_reply() {
        let mut harness = Harness::new(ScriptedBackend::failing());
        harness.type_text("test");
        harness.press(KeyCode::Enter, KeyModifiers::NONE);
        harness.pump();
        harness.wait_for_outcome().await;

        assert_eq!(
            harness.app.conversation.last().map(|m| m.text()),
            Some(ERROR_REPLY)
        );
    }

    #[tokio::test]
    async fn reply_after_clear_is_dropped() {
        let mut harness = Harness::new(ScriptedBackend::replying("late"));
        harness.type_text("hello");
        harness.press(KeyCode::Enter, KeyModifiers::NONE);
        harness.press(KeyCode::Char('l'), KeyModifiers::CONTROL);
        harness.pump();

        assert!(harness.app.conversation.is_empty());
        harness.wait_for_outcome().await;

        assert!(harness.app.conversation.is_empty());
        assert!(!harness.app.is_pending());
    }

    #[test]
    fn escape_requests_exit() {
        let mut harness = Harness::new(ScriptedBackend::replying("x"));
        harness.press(KeyCode::Esc, KeyModifiers::NONE);
        harness.pump();
        assert!(harness.app.ui.exit_requested);
    }

    #[test]
    fn enter_with_blank_draft_does_nothing() {
        let mut harness = Harness::new(ScriptedBackend::replying("x"));
        harness.type_text("   ");
        harness.press(KeyCode::Enter, KeyModifiers::NONE);
        harness.pump();
        assert!(harness.app.conversation.is_empty());
        assert!(!harness.app.is_pending());
    }
}
