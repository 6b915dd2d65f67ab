mod composer;
mod requests;

use ratatui::crossterm::event::KeyEvent;
use tokio::sync::mpsc;

use super::App;
use crate::core::chat_request::{RequestOutcome, RequestParams};

pub enum AppAction {
    /// Submit whatever is in the composer.
    SubmitDraft,
    RequestCompleted {
        request_id: u64,
        outcome: RequestOutcome,
    },
    ClearConversation,
    InsertIntoInput {
        text: String,
    },
    EditInput {
        key: KeyEvent,
    },
    ScrollUp {
        lines: u16,
    },
    ScrollDown {
        lines: u16,
    },
    PageUp,
    PageDown,
    ScrollToTop,
    ScrollToBottom,
    Quit,
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppAction>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppAction>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction) {
        self.dispatch_many([action]);
    }

    pub fn dispatch_many<I>(&self, actions: I)
    where
        I: IntoIterator<Item = AppAction>,
    {
        for action in actions.into_iter() {
            let _ = self.tx.send(action);
        }
    }
}

pub enum AppCommand {
    SpawnRequest(RequestParams),
}

pub fn apply_actions(
    app: &mut App,
    actions: impl IntoIterator<Item = AppAction>,
) -> Vec<AppCommand> {
    actions
        .into_iter()
        .filter_map(|action| apply_action(app, action))
        .collect()
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitDraft
        | AppAction::RequestCompleted { .. }
        | AppAction::ClearConversation => requests::handle_request_action(app, action),

        AppAction::InsertIntoInput { .. }
        | AppAction::EditInput { .. }
        | AppAction::ScrollUp { .. }
        | AppAction::ScrollDown { .. }
        | AppAction::PageUp
        | AppAction::PageDown
        | AppAction::ScrollToTop
        | AppAction::ScrollToBottom
        | AppAction::Quit => composer::handle_composer_action(app, action),
    }
}
