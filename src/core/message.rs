use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }

    /// Heading shown above a message in the transcript.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Model => "Gemini",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Role::User),
            "model" => Ok(Role::Model),
            _ => Err(format!("invalid message role: {value}")),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

/// Identifier derived from the creation time in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(i64);

static LAST_ID: AtomicI64 = AtomicI64::new(0);

impl MessageId {
    /// Returns an id for a message created at `at`. Two messages created in the
    /// same millisecond get consecutive ids.
    pub fn for_time(at: DateTime<Local>) -> Self {
        let millis = at.timestamp_millis();
        let mut last = LAST_ID.load(Ordering::Relaxed);
        loop {
            let next = if millis > last { millis } else { last + 1 };
            match LAST_ID.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => return MessageId(next),
                Err(current) => last = current,
            }
        }
    }
}

/// A single transcript entry. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    role: Role,
    text: String,
    timestamp: DateTime<Local>,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self::new_at(role, text, Local::now())
    }

    pub fn new_at(role: Role, text: impl Into<String>, timestamp: DateTime<Local>) -> Self {
        Self {
            id: MessageId::for_time(timestamp),
            role,
            text: text.into(),
            timestamp,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// `HH:MM` in local time, as shown in the transcript header.
    pub fn display_time(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn role_strings_round_trip() {
        assert_eq!(Role::try_from("user"), Ok(Role::User));
        assert_eq!(Role::try_from("model"), Ok(Role::Model));
        assert_eq!(String::from(Role::Model), "model");
    }

    #[test]
    fn invalid_role_strings_are_rejected() {
        assert!(Role::try_from("assistant").is_err());
        assert!(Role::try_from("system").is_err());
    }

    #[test]
    fn ids_are_distinct_within_the_same_millisecond() {
        let at = Local::now();
        let first = Message::new_at(Role::User, "a", at);
        let second = Message::new_at(Role::Model, "b", at);
        assert!(second.id() > first.id());
    }

    #[test]
    fn ids_increase_with_creation_order() {
        let ids: Vec<MessageId> = (0..50).map(|_| Message::user("x").id()).collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn display_time_uses_hours_and_minutes() {
        let at = Local
            .with_ymd_and_hms(2024, 5, 17, 9, 4, 33)
            .single()
            .expect("valid time");
        let message = Message::new_at(Role::User, "hi", at);
        assert_eq!(message.display_time(), "09:04");
    }

    #[test]
    fn serializes_role_as_api_string() {
        let message = Message::model("hello");
        let json = serde_json::to_value(&message).expect("serialize");
        assert_eq!(json["role"], "model");
        assert_eq!(json["text"], "hello");
    }
}
