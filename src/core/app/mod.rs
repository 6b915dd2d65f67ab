use std::sync::Arc;

use tracing::info;

use crate::core::chat_request::ChatBackend;
use crate::core::constants::SYSTEM_INSTRUCTION;
use crate::core::conversation::Conversation;
use crate::ui::theme::Theme;
use crate::utils::input::is_blank;

pub mod actions;
pub mod dispatch;
pub mod session;
pub mod ui_state;

pub use actions::{apply_action, apply_actions, AppAction, AppActionDispatcher, AppCommand};
pub use session::{PendingRequest, SessionContext};
pub use ui_state::UiState;

/// Everything needed to build an [`App`].
pub struct AppInitConfig {
    pub backend: Arc<dyn ChatBackend>,
    pub model: String,
    pub theme: Theme,
    pub markdown_enabled: bool,
}

/// Single owner of the chat state. Mutated only from the event loop,
/// through [`apply_action`] or the dispatch methods.
pub struct App {
    pub session: SessionContext,
    pub conversation: Conversation,
    pub ui: UiState,
}

impl App {
    pub fn new(init_config: AppInitConfig) -> Self {
        let AppInitConfig {
            backend,
            model,
            theme,
            markdown_enabled,
        } = init_config;

        Self {
            session: SessionContext::new(backend, model, SYSTEM_INSTRUCTION),
            conversation: Conversation::new(),
            ui: UiState::new(theme, markdown_enabled),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.session.is_pending()
    }

    /// The composer refuses submission while a request is in flight or the
    /// draft has nothing but whitespace.
    pub fn input_disabled(&self) -> bool {
        self.is_pending() || is_blank(&self.ui.input_text())
    }

    /// Drop the transcript. Any request still in flight becomes stale and its
    /// reply is discarded when it arrives.
    pub fn clear_conversation(&mut self) {
        if let Some(pending) = self.session.pending.take() {
            info!(
                request_id = pending.request_id,
                "Conversation cleared while a request was pending; reply will be discarded"
            );
        }
        self.conversation.clear();
        self.ui.scroll_offset = 0;
        self.ui.auto_scroll = true;
    }

    pub fn request_exit(&mut self) {
        self.ui.exit_requested = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Message;
    use crate::utils::test_utils::create_test_app;

    #[test]
    fn input_disabled_tracks_draft_and_pending() {
        let mut app = create_test_app();
        assert!(app.input_disabled());

        app.ui.set_input_text("   \n\t");
        assert!(app.input_disabled());

        app.ui.set_input_text("hello");
        assert!(!app.input_disabled());

        app.session.start_request(app.conversation.epoch());
        assert!(app.input_disabled());

        app.session.pending = None;
        assert!(!app.input_disabled());
    }

    #[test]
    fn clear_conversation_empties_and_drops_pending() {
        let mut app = create_test_app();
        app.conversation.append(Message::user("hi"));
        app.conversation.append(Message::model("hello"));
        app.session.start_request(app.conversation.epoch());
        app.ui.auto_scroll = false;

        app.clear_conversation();

        assert!(app.conversation.is_empty());
        assert!(!app.is_pending());
        assert!(app.ui.auto_scroll);
        assert_eq!(app.conversation.epoch(), 1);
    }

    #[test]
    fn clearing_an_empty_conversation_is_harmless() {
        let mut app = create_test_app();
        app.clear_conversation();
        app.clear_conversation();
        assert!(app.conversation.is_empty());
    }
}
