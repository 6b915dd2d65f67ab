use std::sync::Arc;

use crate::core::chat_request::ChatBackend;

/// The request currently awaited, tagged with the conversation epoch it was
/// issued against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRequest {
    pub request_id: u64,
    pub epoch: u64,
}

pub struct SessionContext {
    pub backend: Arc<dyn ChatBackend>,
    pub model: String,
    pub system_instruction: String,
    pub pending: Option<PendingRequest>,
    next_request_id: u64,
}

impl SessionContext {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        model: impl Into<String>,
        system_instruction: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            model: model.into(),
            system_instruction: system_instruction.into(),
            pending: None,
            next_request_id: 0,
        }
    }

    /// Mark a new request as in flight and return its id.
    pub fn start_request(&mut self, epoch: u64) -> u64 {
        self.next_request_id = self.next_request_id.wrapping_add(1);
        let request_id = self.next_request_id;
        self.pending = Some(PendingRequest { request_id, epoch });
        request_id
    }

    pub fn is_current_request(&self, request_id: u64) -> bool {
        self.pending
            .is_some_and(|pending| pending.request_id == request_id)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
