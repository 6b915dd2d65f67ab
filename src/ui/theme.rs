use ratatui::style::{Color, Modifier, Style};

use crate::core::message::Role;

/// Names accepted by [`Theme::from_name`] and the `theme` config key.
pub const BUILTIN_THEME_NAMES: [&str; 2] = ["dark", "light"];

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub model_prefix_style: Style,
    pub model_text_style: Style,
    pub timestamp_style: Style,

    // Markdown
    pub md_heading_style: Style,
    pub md_code_style: Style,
    pub md_code_block_style: Style,
    pub md_blockquote_style: Style,
    pub md_link_style: Style,
    pub md_list_marker_style: Style,
    pub md_rule_style: Style,

    // Chrome
    pub title_style: Style,
    pub welcome_title_style: Style,
    pub welcome_text_style: Style,
    pub loading_indicator_style: Style,
    pub input_border_style: Style,
    pub input_disabled_border_style: Style,
    pub input_title_style: Style,

    // Input area
    pub input_text_style: Style,
    pub input_cursor_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Black,
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            model_prefix_style: Style::default()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD),
            model_text_style: Style::default().fg(Color::White),
            timestamp_style: Style::default().fg(Color::DarkGray),

            md_heading_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
            md_code_style: Style::default().fg(Color::LightYellow),
            md_code_block_style: Style::default().fg(Color::LightGreen),
            md_blockquote_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            md_link_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),
            md_list_marker_style: Style::default().fg(Color::Yellow),
            md_rule_style: Style::default().fg(Color::DarkGray),

            title_style: Style::default().fg(Color::Gray),
            welcome_title_style: Style::default()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD),
            welcome_text_style: Style::default().fg(Color::Gray),
            loading_indicator_style: Style::default().fg(Color::LightMagenta),
            input_border_style: Style::default().fg(Color::Gray),
            input_disabled_border_style: Style::default().fg(Color::DarkGray),
            input_title_style: Style::default().fg(Color::Gray),

            input_text_style: Style::default().fg(Color::White),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::White,
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            model_prefix_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            model_text_style: Style::default().fg(Color::Black),
            timestamp_style: Style::default().fg(Color::Gray),

            md_heading_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            md_code_style: Style::default().fg(Color::Red),
            md_code_block_style: Style::default().fg(Color::Green),
            md_blockquote_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            md_link_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            md_list_marker_style: Style::default().fg(Color::Magenta),
            md_rule_style: Style::default().fg(Color::Gray),

            title_style: Style::default().fg(Color::DarkGray),
            welcome_title_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            welcome_text_style: Style::default().fg(Color::DarkGray),
            loading_indicator_style: Style::default().fg(Color::Magenta),
            input_border_style: Style::default().fg(Color::Black),
            input_disabled_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::DarkGray),

            input_text_style: Style::default().fg(Color::Black),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "dark" | "default" | "default-dark" => Self::dark_default(),
            "light" => Self::light(),
            // Fallback
            _ => Self::dark_default(),
        }
    }

    pub fn prefix_style(&self, role: Role) -> Style {
        match role {
            Role::User => self.user_prefix_style,
            Role::Model => self.model_prefix_style,
        }
    }

    pub fn text_style(&self, role: Role) -> Style {
        match role {
            Role::User => self.user_text_style,
            Role::Model => self.model_text_style,
        }
    }
}
