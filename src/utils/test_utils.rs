use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::GenerateContentRequest;
use crate::core::app::{App, AppInitConfig};
use crate::core::chat_request::{ChatBackend, DispatchError};
use crate::ui::theme::Theme;

#[derive(Debug, Clone)]
enum Script {
    Reply(String),
    Empty,
    Fail,
}

/// Backend double that answers every request the same way and records what
/// it was sent.
pub struct ScriptedBackend {
    script: Script,
    requests: Mutex<Vec<GenerateContentRequest>>,
}

impl ScriptedBackend {
    fn with_script(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(text: impl Into<String>) -> Arc<Self> {
        Self::with_script(Script::Reply(text.into()))
    }

    /// Succeeds with a response that carries no text.
    pub fn empty() -> Arc<Self> {
        Self::with_script(Script::Empty)
    }

    pub fn failing() -> Arc<Self> {
        Self::with_script(Script::Fail)
    }

    pub fn requests(&self) -> Vec<GenerateContentRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn generate(
        &self,
        request: GenerateContentRequest,
    ) -> Result<Option<String>, DispatchError> {
        self.requests.lock().expect("requests lock").push(request);
        match &self.script {
            Script::Reply(text) => Ok(Some(text.clone())),
            Script::Empty => Ok(None),
            Script::Fail => Err(DispatchError::Status {
                status: 500,
                summary: "scripted failure".to_string(),
            }),
        }
    }
}

pub fn create_test_app_with(backend: Arc<ScriptedBackend>) -> App {
    App::new(AppInitConfig {
        backend,
        model: "test-model".to_string(),
        theme: Theme::dark_default(),
        markdown_enabled: true,
    })
}

pub fn create_test_app() -> App {
    create_test_app_with(ScriptedBackend::replying("Hi there!"))
}
