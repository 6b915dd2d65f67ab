pub mod app;
pub mod chat_request;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod message;
