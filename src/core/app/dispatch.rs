//! Request lifecycle on the conversation owner.
//!
//! Sending is split in two so the event loop never blocks: [`App::begin_send`]
//! records the user message and hands back the request to run, and
//! [`App::finish_request`] folds the outcome into the transcript once the
//! spawned task reports back. At most one request is in flight.

use tracing::{debug, info};

use super::App;
use crate::core::chat_request::{build_request, run_request, RequestOutcome, RequestParams};
use crate::core::constants::{ERROR_REPLY, FALLBACK_REPLY};
use crate::core::message::Message;
use crate::utils::input::is_blank;

impl App {
    /// Append `text` as a user message and mark a request as pending.
    ///
    /// Returns `None` without touching any state when `text` is blank or a
    /// request is already in flight.
    pub fn begin_send(&mut self, text: &str) -> Option<RequestParams> {
        if is_blank(text) {
            debug!("Ignoring blank submission");
            return None;
        }
        if self.is_pending() {
            debug!("Ignoring submission while a request is pending");
            return None;
        }

        self.conversation.append(Message::user(text));
        let request_id = self.session.start_request(self.conversation.epoch());
        self.ui.auto_scroll = true;
        self.ui.begin_loading();

        let request = build_request(self.conversation.iter(), &self.session.system_instruction);
        info!(
            request_id,
            messages = request.contents.len(),
            model = %self.session.model,
            "Dispatching request"
        );

        Some(RequestParams {
            backend: self.session.backend.clone(),
            request,
            request_id,
        })
    }

    /// Record the outcome of request `request_id`.
    ///
    /// Returns the appended model message, or `None` when the request is no
    /// longer current (the conversation was cleared after it started).
    pub fn finish_request(&mut self, request_id: u64, outcome: RequestOutcome) -> Option<Message> {
        let Some(pending) = self.session.pending else {
            info!(request_id, "Discarding reply for a request that is no longer pending");
            return None;
        };
        if pending.request_id != request_id || pending.epoch != self.conversation.epoch() {
            info!(
                request_id,
                current = pending.request_id,
                "Discarding reply for a stale request"
            );
            return None;
        }

        self.session.pending = None;
        let reply = Message::model(reply_text(outcome));
        self.conversation.append(reply.clone());
        self.ui.auto_scroll = true;
        debug!(request_id, "Request completed");
        Some(reply)
    }

    /// Run a whole exchange against the session backend and wait for it.
    pub async fn send_and_wait(&mut self, text: &str) -> Option<Message> {
        let RequestParams {
            backend,
            request,
            request_id,
        } = self.begin_send(text)?;
        let outcome = run_request(backend.as_ref(), request).await;
        self.finish_request(request_id, outcome)
    }
}

/// Text shown for an outcome. Failures and empty replies map to fixed strings.
pub fn reply_text(outcome: RequestOutcome) -> String {
    match outcome {
        RequestOutcome::Reply(Some(text)) if !text.is_empty() => text,
        RequestOutcome::Reply(_) => FALLBACK_REPLY.to_string(),
        RequestOutcome::Failed(_) => ERROR_REPLY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chat_request::DispatchError;
    use crate::core::message::Role;
    use crate::utils::test_utils::{create_test_app, create_test_app_with, ScriptedBackend};

    #[tokio::test]
    async fn successful_exchange_appends_user_then_model() {
        let backend = ScriptedBackend::replying("hi there");
        let mut app = create_test_app_with(backend.clone());

        let reply = app.send_and_wait("hello").await.expect("reply");

        assert_eq!(reply.role(), Role::Model);
        assert_eq!(reply.text(), "hi there");
        let entries: Vec<(Role, &str)> = app
            .conversation
            .iter()
            .map(|m| (m.role(), m.text()))
            .collect();
        assert_eq!(entries, [(Role::User, "hello"), (Role::Model, "hi there")]);
        assert!(!app.is_pending());
    }

    #[tokio::test]
    async fn failed_exchange_appends_fixed_error_reply() {
        let mut app = create_test_app_with(ScriptedBackend::failing());

        let reply = app.send_and_wait("test").await.expect("reply");

        assert_eq!(reply.role(), Role::Model);
        assert_eq!(reply.text(), ERROR_REPLY);
        assert_eq!(app.conversation.len(), 2);
        assert_eq!(app.conversation.iter().next().map(Message::text), Some("test"));
        assert!(!app.is_pending());
    }

    #[tokio::test]
    async fn missing_text_uses_fallback_reply() {
        let mut app = create_test_app_with(ScriptedBackend::empty());

        let reply = app.send_and_wait("anything").await.expect("reply");

        assert_eq!(reply.text(), FALLBACK_REPLY);
        assert!(!app.is_pending());
    }

    #[tokio::test]
    async fn n_sends_yield_two_n_messages_regardless_of_outcome() {
        let mut ok = create_test_app_with(ScriptedBackend::replying("ok"));
        let mut failing = create_test_app_with(ScriptedBackend::failing());
        for n in 1..=4 {
            ok.send_and_wait(&format!("msg {n}")).await;
            failing.send_and_wait(&format!("msg {n}")).await;
            assert_eq!(ok.conversation.len(), 2 * n);
            assert_eq!(failing.conversation.len(), 2 * n);
        }
        assert!(ok
            .conversation
            .iter()
            .zip([Role::User, Role::Model].into_iter().cycle())
            .all(|(message, role)| message.role() == role));
    }

    #[tokio::test]
    async fn request_carries_full_history_and_system_instruction() {
        let backend = ScriptedBackend::replying("r");
        let mut app = create_test_app_with(backend.clone());

        app.send_and_wait("first").await;
        app.send_and_wait("second").await;

        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        let texts: Vec<&str> = requests[1]
            .contents
            .iter()
            .map(|c| c.parts[0].text.as_str())
            .collect();
        assert_eq!(texts, ["first", "r", "second"]);
        assert!(requests[1].system_instruction.is_some());
    }

    #[test]
    fn begin_send_appends_user_message_before_reply() {
        let mut app = create_test_app();
        let params = app.begin_send("hello").expect("params");

        assert!(app.is_pending());
        assert_eq!(app.conversation.len(), 1);
        assert_eq!(params.request.contents.len(), 1);
        assert_eq!(params.request.contents[0].role, "user");
    }

    #[test]
    fn send_while_pending_is_a_no_op() {
        let mut app = create_test_app();
        let first = app.begin_send("one").expect("params");
        let pending = app.session.pending;

        assert!(app.begin_send("two").is_none());
        assert_eq!(app.conversation.len(), 1);
        assert_eq!(app.session.pending, pending);

        app.finish_request(first.request_id, RequestOutcome::Reply(Some("r".into())));
        assert_eq!(app.conversation.len(), 2);
    }

    #[test]
    fn blank_input_never_appends_or_sets_pending() {
        let mut app = create_test_app();
        for text in ["", "   ", "\n\t  \n"] {
            assert!(app.begin_send(text).is_none());
        }
        assert!(app.conversation.is_empty());
        assert!(!app.is_pending());
    }

    #[test]
    fn reply_after_clear_is_discarded() {
        let mut app = create_test_app();
        let params = app.begin_send("hello").expect("params");

        app.clear_conversation();
        let appended = app.finish_request(
            params.request_id,
            RequestOutcome::Reply(Some("late".into())),
        );

        assert!(appended.is_none());
        assert!(app.conversation.is_empty());
        assert!(!app.is_pending());
    }

    #[test]
    fn stale_reply_does_not_disturb_newer_request() {
        let mut app = create_test_app();
        let old = app.begin_send("old").expect("params");
        app.clear_conversation();
        let new = app.begin_send("new").expect("params");

        assert!(app
            .finish_request(old.request_id, RequestOutcome::Reply(Some("stale".into())))
            .is_none());
        assert!(app.is_pending());
        assert_eq!(app.conversation.len(), 1);

        let reply = app
            .finish_request(new.request_id, RequestOutcome::Reply(Some("fresh".into())))
            .expect("reply");
        assert_eq!(reply.text(), "fresh");
        assert!(!app.is_pending());
    }

    #[test]
    fn reply_text_maps_outcomes() {
        assert_eq!(reply_text(RequestOutcome::Reply(Some("x".into()))), "x");
        assert_eq!(reply_text(RequestOutcome::Reply(None)), FALLBACK_REPLY);
        assert_eq!(
            reply_text(RequestOutcome::Reply(Some(String::new()))),
            FALLBACK_REPLY
        );
        let failure = DispatchError::Status {
            status: 500,
            summary: "boom".into(),
        };
        assert_eq!(reply_text(RequestOutcome::Failed(failure)), ERROR_REPLY);
    }
}
