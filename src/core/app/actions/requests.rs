use super::{App, AppAction, AppCommand};

pub(super) fn handle_request_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitDraft => {
            if app.input_disabled() {
                return None;
            }
            let draft = app.ui.input_text();
            let params = app.begin_send(&draft)?;
            app.ui.clear_input();
            Some(AppCommand::SpawnRequest(params))
        }
        AppAction::RequestCompleted {
            request_id,
            outcome,
        } => {
            app.finish_request(request_id, outcome);
            None
        }
        AppAction::ClearConversation => {
            app.clear_conversation();
            None
        }
        _ => unreachable!("non-request action routed to request handler"),
    }
}
