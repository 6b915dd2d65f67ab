use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::core::app::App;
use crate::ui::transcript::{build_transcript_lines, welcome_lines};
use crate::utils::scroll::ScrollCalculator;

const MAX_INPUT_LINES: u16 = 6;

pub const TITLE_IDLE: &str = "Type a message (Alt+Enter for new line, Ctrl+L to clear, Esc to quit)";
pub const TITLE_READY: &str = "Press Enter to send";
pub const TITLE_PENDING: &str = "Waiting for reply...";

pub fn ui(f: &mut Frame, app: &mut App) {
    let theme = app.ui.theme.clone();
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_color)),
        f.area(),
    );

    let input_lines = (app.ui.textarea().lines().len() as u16).clamp(1, MAX_INPUT_LINES);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(input_lines + 2), // +2 for borders
        ])
        .split(f.area());

    let title = format!(
        "parley v{} - {}",
        env!("CARGO_PKG_VERSION"),
        app.session.model
    );
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(title, theme.title_style))),
        chunks[0],
    );

    render_transcript(f, app, chunks[1]);
    render_composer(f, app, chunks[2]);
}

fn render_transcript(f: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.ui.theme;

    if app.conversation.is_empty() {
        let welcome = welcome_lines(theme, &app.session.model);
        let top_padding = area.height.saturating_sub(welcome.len() as u16) / 2;
        let panel = Rect {
            y: area.y + top_padding,
            height: area.height.saturating_sub(top_padding),
            ..area
        };
        app.ui.sync_viewport(0, area.height);
        f.render_widget(
            Paragraph::new(welcome)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            panel,
        );
        return;
    }

    let loading_frame = app
        .is_pending()
        .then(|| app.ui.loading_frame(Instant::now()));
    let lines = build_transcript_lines(
        &app.conversation,
        theme,
        app.ui.markdown_enabled,
        loading_frame,
    );
    let wrapped = ScrollCalculator::prewrap_lines(&lines, area.width);
    let offset = app.ui.sync_viewport(wrapped.len(), area.height);

    f.render_widget(Paragraph::new(wrapped).scroll((offset, 0)), area);
}

fn render_composer(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let disabled = app.input_disabled();

    let title = if app.is_pending() {
        TITLE_PENDING
    } else if disabled {
        TITLE_IDLE
    } else {
        TITLE_READY
    };
    let border_style = if disabled {
        theme.input_disabled_border_style
    } else {
        theme.input_border_style
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(title, theme.input_title_style));
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(app.ui.textarea(), inner);
}
