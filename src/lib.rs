//! parley is a full-screen terminal chat client for the Gemini
//! `generateContent` API.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation, the request lifecycle, and configuration.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that drives user input and display updates.
//! - [`api`] defines the request and response payloads sent over the wire.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which initializes [`core::app`] and hands it
//! to [`ui::chat_loop`] for interactive sessions.

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
