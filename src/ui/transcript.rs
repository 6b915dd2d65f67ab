//! Conversation state to display lines.
//!
//! Everything here is a pure function of its inputs so the renderer and the
//! tests see exactly the same lines.

use ratatui::text::{Line, Span};

use crate::core::conversation::Conversation;
use crate::core::message::{Message, Role};
use crate::ui::markdown::{render_markdown, render_plain};
use crate::ui::theme::Theme;

pub const WELCOME_TITLE: &str = "Welcome to parley";
pub const LOADING_LABEL: &str = "thinking";

/// Static panel shown while the conversation is empty.
pub fn welcome_lines(theme: &Theme, model: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(WELCOME_TITLE, theme.welcome_title_style)),
        Line::default(),
        Line::from(Span::styled(
            format!("Ask anything to start a conversation with {model}."),
            theme.welcome_text_style,
        )),
        Line::from(Span::styled(
            "Enter sends · Alt+Enter adds a line · Ctrl+L clears · Esc quits",
            theme.welcome_text_style,
        )),
    ]
}

/// Header with the role label and `HH:MM`, followed by the body.
pub fn message_lines(message: &Message, theme: &Theme, markdown_enabled: bool) -> Vec<Line<'static>> {
    let role = message.role();
    let mut lines = vec![Line::from(vec![
        Span::styled(role.label(), theme.prefix_style(role)),
        Span::raw(" "),
        Span::styled(message.display_time(), theme.timestamp_style),
    ])];

    let base = theme.text_style(role);
    let body = match role {
        Role::Model if markdown_enabled => render_markdown(message.text(), base, theme),
        _ => render_plain(message.text(), base),
    };
    lines.extend(body);
    lines
}

/// Transient line shown after the last message while a reply is awaited.
/// `frame` selects how many dots follow the label.
pub fn loading_line(theme: &Theme, frame: usize) -> Line<'static> {
    Line::from(vec![
        Span::styled(Role::Model.label(), theme.prefix_style(Role::Model)),
        Span::raw(" "),
        Span::styled(
            format!("{LOADING_LABEL}{}", ".".repeat(frame % 4)),
            theme.loading_indicator_style,
        ),
    ])
}

/// All messages in order, newest last, separated by blank lines. When
/// `loading_frame` is set the loading line is appended.
pub fn build_transcript_lines(
    conversation: &Conversation,
    theme: &Theme,
    markdown_enabled: bool,
    loading_frame: Option<usize>,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in conversation.iter() {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.extend(message_lines(message, theme, markdown_enabled));
    }
    if let Some(frame) = loading_frame {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(loading_line(theme, frame));
    }
    lines
}
