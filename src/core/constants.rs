//! Shared constants used across the application

/// Model used when neither the command line nor the config file names one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Root of the Gemini REST API. Endpoint paths are appended to this.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Directive sent with every request.
pub const SYSTEM_INSTRUCTION: &str = "You are a friendly, concise assistant. \
Always answer in the same language the user writes in, keep a warm and \
respectful tone, and format replies with Markdown when it improves readability.";

/// Reply appended in place of a model answer when the request fails.
pub const ERROR_REPLY: &str =
    "Sorry, something went wrong while contacting the model. Please try again.";

/// Reply appended when the API answers without any text payload.
pub const FALLBACK_REPLY: &str = "I couldn't come up with a response to that.";
