//! Wire types for the Gemini `generateContent` endpoint.

use serde::{Deserialize, Serialize};

use crate::core::message::Message;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Part {
    pub text: String,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl From<&Message> for Content {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role().as_str().to_string(),
            parts: vec![Part {
                text: message.text().to_string(),
            }],
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SystemInstruction {
    pub parts: Vec<Part>,
}

impl SystemInstruction {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<SystemInstruction>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Candidate {
    pub content: Option<ResponseContent>,
}

#[derive(Deserialize, Debug, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, or `None` when the
    /// response carries no text at all.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let mut text = String::new();
        let mut found = false;
        for part in parts {
            if let Some(chunk) = &part.text {
                text.push_str(chunk);
                found = true;
            }
        }
        found.then_some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_in_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content::from(&Message::user("hello"))],
            system_instruction: Some(SystemInstruction::new("be brief")),
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "hello"}]}],
                "systemInstruction": {"parts": [{"text": "be brief"}]}
            })
        );
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let raw = r#"{"candidates":[
            {"content":{"role":"model","parts":[{"text":"hi "},{"text":"there"}]},"finishReason":"STOP"},
            {"content":{"parts":[{"text":"ignored"}]}}
        ]}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).expect("parse");
        assert_eq!(response.text().as_deref(), Some("hi there"));
    }

    #[test]
    fn response_without_text_yields_none() {
        let cases = [
            r#"{}"#,
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{"finishReason":"SAFETY"}]}"#,
            r#"{"candidates":[{"content":{"parts":[{"inlineData":{}}]}}]}"#,
        ];
        for raw in cases {
            let response: GenerateContentResponse = serde_json::from_str(raw).expect("parse");
            assert_eq!(response.text(), None, "case: {raw}");
        }
    }

    #[test]
    fn empty_text_part_is_still_text() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":""}]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).expect("parse");
        assert_eq!(response.text().as_deref(), Some(""));
    }
}
