use super::{App, AppAction, AppCommand};
use crate::utils::input::sanitize_text_input;

pub(super) fn handle_composer_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::InsertIntoInput { text } => {
            app.ui.insert_text(&sanitize_text_input(&text));
        }
        AppAction::EditInput { key } => app.ui.handle_input_key(key),
        AppAction::ScrollUp { lines } => app.ui.scroll_up(lines),
        AppAction::ScrollDown { lines } => app.ui.scroll_down(lines),
        AppAction::PageUp => app.ui.page_up(),
        AppAction::PageDown => app.ui.page_down(),
        AppAction::ScrollToTop => app.ui.scroll_to_top(),
        AppAction::ScrollToBottom => app.ui.scroll_to_bottom(),
        AppAction::Quit => app.request_exit(),
        _ => unreachable!("non-composer action routed to composer handler"),
    }
    None
}
