use std::collections::VecDeque;

use crate::core::message::Message;

/// Ordered transcript of the current session.
///
/// Entries are only ever appended or dropped wholesale. Every [`clear`]
/// advances the epoch so work started against an earlier transcript can
/// recognise that it is stale.
///
/// [`clear`]: Conversation::clear
#[derive(Debug, Default, Clone)]
pub struct Conversation {
    messages: VecDeque<Message>,
    epoch: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push_back(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.epoch += 1;
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.back()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}
