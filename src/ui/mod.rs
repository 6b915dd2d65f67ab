//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: the event loop that turns terminal input into app actions
//!   and runs requests off the render path.
//! - [`renderer`] and [`transcript`]: frame layout and the conversation view.
//! - [`markdown`]: model replies to styled lines.
//! - [`theme`]: color and style policy.
//!
//! Ownership boundary: this layer presents and captures interaction state, while
//! [`crate::core`] owns domain logic and backend coordination.

pub mod chat_loop;
pub mod markdown;
pub mod renderer;
pub mod theme;
pub mod transcript;
