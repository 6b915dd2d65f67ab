use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{Content, GenerateContentRequest, GenerateContentResponse, SystemInstruction};
use crate::utils::url::construct_api_url;

/// Why a request produced no usable response.
#[derive(Debug)]
pub enum DispatchError {
    /// The request never completed (DNS, TLS, connection reset, ...).
    Http(reqwest::Error),

    /// The API answered with a non-success status.
    Status {
        status: u16,
        /// One-line summary extracted from the error body.
        summary: String,
    },

    /// The body was not a valid `generateContent` response.
    Decode(serde_json::Error),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Http(source) => write!(f, "request failed: {source}"),
            DispatchError::Status { status, summary } => {
                write!(f, "API returned status {status}: {summary}")
            }
            DispatchError::Decode(source) => write!(f, "malformed response: {source}"),
        }
    }
}

impl StdError for DispatchError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            DispatchError::Http(source) => Some(source),
            DispatchError::Status { .. } => None,
            DispatchError::Decode(source) => Some(source),
        }
    }
}

impl From<reqwest::Error> for DispatchError {
    fn from(value: reqwest::Error) -> Self {
        DispatchError::Http(value)
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(value: serde_json::Error) -> Self {
        DispatchError::Decode(value)
    }
}

/// A remote model that answers a full conversation with a single reply.
///
/// `Ok(None)` means the call succeeded but the response carried no text.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn generate(
        &self,
        request: GenerateContentRequest,
    ) -> Result<Option<String>, DispatchError>;
}

/// HTTP client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        construct_api_url(
            &self.base_url,
            &format!("v1beta/models/{}:generateContent", self.model),
        )
    }
}

#[async_trait]
impl ChatBackend for GeminiBackend {
    async fn generate(
        &self,
        request: GenerateContentRequest,
    ) -> Result<Option<String>, DispatchError> {
        let url = self.endpoint();
        debug!(model = %self.model, contents = request.contents.len(), "Sending generateContent request");

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(DispatchError::Status {
                status: status.as_u16(),
                summary: summarize_api_error(&body),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        Ok(parsed.text())
    }
}

/// Pull a one-line message out of an API error body.
pub fn summarize_api_error(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let summary = serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|v| v.as_str())
                .or_else(|| value.get("error").and_then(|v| v.as_str()))
                .or_else(|| value.get("message").and_then(|v| v.as_str()))
                .map(str::to_owned)
        })
        .unwrap_or_else(|| trimmed.to_string());

    summary.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build the request body for a conversation snapshot.
pub fn build_request<'a, I>(history: I, system_instruction: &str) -> GenerateContentRequest
where
    I: IntoIterator<Item = &'a crate::core::message::Message>,
{
    GenerateContentRequest {
        contents: history.into_iter().map(Content::from).collect(),
        system_instruction: Some(SystemInstruction::new(system_instruction)),
    }
}

/// Result of one dispatched request, delivered back to the owner of the
/// conversation.
#[derive(Debug)]
pub enum RequestOutcome {
    Reply(Option<String>),
    Failed(DispatchError),
}

pub struct RequestParams {
    pub backend: Arc<dyn ChatBackend>,
    pub request: GenerateContentRequest,
    pub request_id: u64,
}

/// Runs requests on the tokio runtime and reports outcomes over a channel.
#[derive(Clone)]
pub struct ChatRequestService {
    tx: mpsc::UnboundedSender<(RequestOutcome, u64)>,
}

impl ChatRequestService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(RequestOutcome, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn_request(&self, params: RequestParams) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let RequestParams {
                backend,
                request,
                request_id,
            } = params;
            let outcome = run_request(backend.as_ref(), request).await;
            if tx.send((outcome, request_id)).is_err() {
                debug!(request_id, "Request finished after the chat loop closed");
            }
        });
    }
}

/// Await a single backend call and fold its result into an outcome.
pub async fn run_request(backend: &dyn ChatBackend, request: GenerateContentRequest) -> RequestOutcome {
    match backend.generate(request).await {
        Ok(text) => RequestOutcome::Reply(text),
        Err(err) => {
            warn!(error = %err, "Model request failed");
            RequestOutcome::Failed(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Message;
    use crate::utils::test_utils::ScriptedBackend;

    #[test]
    fn endpoint_includes_model_and_method() {
        let backend = GeminiBackend::new(
            reqwest::Client::new(),
            "https://generativelanguage.googleapis.com/",
            "key",
            "gemini-test",
        );
        assert_eq!(
            backend.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn summarize_prefers_nested_error_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.\n Please pass a valid key.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            summarize_api_error(body),
            "API key not valid. Please pass a valid key."
        );
    }

    #[test]
    fn summarize_handles_flat_and_plain_bodies() {
        assert_eq!(summarize_api_error(r#"{"error":"quota"}"#), "quota");
        assert_eq!(summarize_api_error(r#"{"message":"down"}"#), "down");
        assert_eq!(summarize_api_error("  bad   gateway "), "bad gateway");
        assert_eq!(summarize_api_error(""), "<empty body>");
    }

    #[test]
    fn build_request_keeps_history_order() {
        let history = [Message::user("a"), Message::model("b"), Message::user("c")];
        let request = build_request(history.iter(), "sys");
        let roles: Vec<&str> = request.contents.iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, ["user", "model", "user"]);
        assert_eq!(request.contents[2].parts[0].text, "c");
        assert_eq!(
            request.system_instruction,
            Some(SystemInstruction::new("sys"))
        );
    }

    #[test]
    fn status_error_display_includes_summary() {
        let err = DispatchError::Status {
            status: 503,
            summary: "overloaded".into(),
        };
        assert_eq!(err.to_string(), "API returned status 503: overloaded");
    }

    #[tokio::test]
    async fn spawned_request_reports_outcome_with_id() {
        let (service, mut rx) = ChatRequestService::new();
        let backend = ScriptedBackend::replying("hi there");
        service.spawn_request(RequestParams {
            backend: backend.clone(),
            request: build_request([Message::user("hello")].iter(), "sys"),
            request_id: 7,
        });

        let (outcome, id) = rx.recv().await.expect("outcome");
        assert_eq!(id, 7);
        assert!(matches!(outcome, RequestOutcome::Reply(Some(ref text)) if text == "hi there"));
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn failures_become_failed_outcomes() {
        let backend = ScriptedBackend::failing();
        let outcome = run_request(backend.as_ref(), build_request(std::iter::empty(), "sys")).await;
        assert!(matches!(outcome, RequestOutcome::Failed(_)));
    }
}
