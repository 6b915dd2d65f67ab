use std::time::{Duration, Instant};

use ratatui::crossterm::event::KeyEvent;
use tui_textarea::{CursorMove, Input as TAInput, TextArea};

use crate::ui::theme::Theme;
use crate::utils::scroll::ScrollCalculator;

const LOADING_FRAME: Duration = Duration::from_millis(400);
const LOADING_FRAMES: usize = 4;

#[derive(Debug, Clone)]
pub struct UiState {
    textarea: TextArea<'static>,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub theme: Theme,
    pub markdown_enabled: bool,
    pub exit_requested: bool,
    pub pulse_start: Instant,
    /// Transcript viewport as of the last draw. Used for paging.
    pub transcript_height: u16,
    pub max_scroll: u16,
}

impl UiState {
    pub fn new(theme: Theme, markdown_enabled: bool) -> Self {
        let mut ui = Self {
            textarea: TextArea::default(),
            scroll_offset: 0,
            auto_scroll: true,
            theme,
            markdown_enabled,
            exit_requested: false,
            pulse_start: Instant::now(),
            transcript_height: 0,
            max_scroll: 0,
        };
        ui.configure_textarea();
        ui
    }

    pub(crate) fn configure_textarea(&mut self) {
        let textarea_style = self
            .theme
            .input_text_style
            .patch(ratatui::style::Style::default().bg(self.theme.background_color));
        self.textarea.set_style(textarea_style);
        self.textarea
            .set_cursor_style(self.theme.input_cursor_style);
        self.textarea
            .set_cursor_line_style(ratatui::style::Style::default());
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn set_input_text(&mut self, text: &str) {
        let lines: Vec<String> = if text.is_empty() {
            Vec::new()
        } else {
            text.split('\n').map(str::to_string).collect()
        };
        self.textarea = TextArea::from(lines);
        self.textarea.move_cursor(CursorMove::Bottom);
        self.textarea.move_cursor(CursorMove::End);
        self.configure_textarea();
    }

    pub fn clear_input(&mut self) {
        self.set_input_text("");
    }

    pub fn insert_text(&mut self, text: &str) {
        self.textarea.insert_str(text);
    }

    /// Forward an editing key (characters, arrows within the line,
    /// backspace, ...) to the composer.
    pub fn handle_input_key(&mut self, key: KeyEvent) {
        self.textarea.input(TAInput::from(key));
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.auto_scroll = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines).min(self.max_scroll);
        self.auto_scroll = self.scroll_offset >= self.max_scroll;
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.page_step());
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.page_step());
    }

    pub fn scroll_to_top(&mut self) {
        self.auto_scroll = false;
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.auto_scroll = true;
        self.scroll_offset = self.max_scroll;
    }

    fn page_step(&self) -> u16 {
        self.transcript_height.saturating_sub(1).max(1)
    }

    /// Record the transcript geometry for this frame and settle the offset:
    /// pinned to the bottom while auto-scrolling, otherwise clamped.
    pub fn sync_viewport(&mut self, total_lines: usize, height: u16) -> u16 {
        self.transcript_height = height;
        self.max_scroll = ScrollCalculator::max_scroll_offset(total_lines, height);
        if self.auto_scroll {
            self.scroll_offset = self.max_scroll;
        } else {
            self.scroll_offset = self.scroll_offset.min(self.max_scroll);
        }
        self.scroll_offset
    }

    pub fn begin_loading(&mut self) {
        self.pulse_start = Instant::now();
    }

    /// Number of dots to show in the loading indicator (0..=3).
    pub fn loading_frame(&self, now: Instant) -> usize {
        let elapsed = now.saturating_duration_since(self.pulse_start);
        (elapsed.as_millis() / LOADING_FRAME.as_millis()) as usize % LOADING_FRAMES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};

    fn ui() -> UiState {
        UiState::new(Theme::dark_default(), true)
    }

    #[test]
    fn typed_keys_reach_the_composer() {
        let mut ui = ui();
        for ch in "hi".chars() {
            ui.handle_input_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
        ui.insert_text("\nthere");
        assert_eq!(ui.input_text(), "hi\nthere");

        ui.clear_input();
        assert_eq!(ui.input_text(), "");
    }

    #[test]
    fn set_input_text_places_cursor_at_end() {
        let mut ui = ui();
        ui.set_input_text("one\ntwo");
        assert_eq!(ui.textarea().cursor(), (1, 3));
    }

    #[test]
    fn manual_scroll_disables_auto_scroll_until_bottom() {
        let mut ui = ui();
        assert_eq!(ui.sync_viewport(30, 10), 20);

        ui.scroll_up(5);
        assert!(!ui.auto_scroll);
        assert_eq!(ui.sync_viewport(40, 10), 15);

        ui.scroll_down(100);
        assert_eq!(ui.scroll_offset, 30);
        assert!(ui.auto_scroll);
    }

    #[test]
    fn paging_moves_by_viewport_height() {
        let mut ui = ui();
        ui.sync_viewport(100, 11);
        ui.page_up();
        assert_eq!(ui.scroll_offset, 79);
        ui.scroll_to_top();
        assert_eq!(ui.scroll_offset, 0);
        ui.page_down();
        assert_eq!(ui.scroll_offset, 10);
        assert!(!ui.auto_scroll);
        ui.scroll_to_bottom();
        assert_eq!(ui.scroll_offset, 89);
    }

    #[test]
    fn short_transcripts_never_scroll() {
        let mut ui = ui();
        assert_eq!(ui.sync_viewport(3, 10), 0);
        ui.scroll_down(5);
        assert_eq!(ui.scroll_offset, 0);
    }

    #[test]
    fn loading_frames_cycle() {
        let ui = ui();
        let start = ui.pulse_start;
        assert_eq!(ui.loading_frame(start), 0);
        assert_eq!(ui.loading_frame(start + LOADING_FRAME), 1);
        assert_eq!(ui.loading_frame(start + LOADING_FRAME * 4), 0);
    }
}
