//! Markdown to ratatui conversion for model replies.
//!
//! The renderer produces logical lines only. Width-aware wrapping happens
//! afterwards in [`crate::utils::scroll::ScrollCalculator`], so the same
//! output serves any pane width.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::ui::theme::Theme;

const CODE_BLOCK_INDENT: &str = "  ";
const QUOTE_PREFIX: &str = "│ ";
const RULE_WIDTH: usize = 24;

/// Render `content` as markdown, using `base` for unstyled text.
pub fn render_markdown(content: &str, base: Style, theme: &Theme) -> Vec<Line<'static>> {
    MarkdownRenderer::new(content, base, theme).render()
}

/// Render `content` verbatim, one line per source line.
pub fn render_plain(content: &str, base: Style) -> Vec<Line<'static>> {
    content
        .split('\n')
        .map(|line| Line::from(Span::styled(line.to_string(), base)))
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered(u64),
}

#[derive(Clone, Copy, Debug)]
struct ListState {
    kind: ListKind,
    marker_width: usize,
}

struct MarkdownRenderer<'a> {
    content: &'a str,
    theme: &'a Theme,
    lines: Vec<Line<'static>>,
    current_spans: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    list_stack: Vec<ListState>,
    pending_indent: Option<String>,
    quote_depth: usize,
    in_code_block: bool,
    code_buffer: String,
    link_stack: Vec<(String, String)>,
    table_cell_index: usize,
    at_block_gap: bool,
}

impl<'a> MarkdownRenderer<'a> {
    fn new(content: &'a str, base: Style, theme: &'a Theme) -> Self {
        Self {
            content,
            theme,
            lines: Vec::new(),
            current_spans: Vec::new(),
            style_stack: vec![base],
            list_stack: Vec::new(),
            pending_indent: None,
            quote_depth: 0,
            in_code_block: false,
            code_buffer: String::new(),
            link_stack: Vec::new(),
            table_cell_index: 0,
            at_block_gap: false,
        }
    }

    fn render(mut self) -> Vec<Line<'static>> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);

        for event in Parser::new_ext(self.content, options) {
            match event {
                Event::Start(tag) => self.start_tag(tag),
                Event::End(tag_end) => self.end_tag(tag_end),
                Event::Text(text) => {
                    if self.in_code_block {
                        self.code_buffer.push_str(&text);
                    } else {
                        if let Some((_, label)) = self.link_stack.last_mut() {
                            label.push_str(&text);
                        }
                        self.push_text(&text, self.current_style());
                    }
                }
                Event::Code(code) => {
                    let style = self.current_style().patch(self.theme.md_code_style);
                    self.push_text(&code, style);
                }
                Event::Html(html) => {
                    self.push_text(html.trim_end_matches('\n'), self.current_style());
                    if html.ends_with('\n') {
                        self.flush_line();
                    }
                }
                Event::InlineHtml(html) => self.push_text(&html, self.current_style()),
                Event::SoftBreak => self.push_text(" ", self.current_style()),
                Event::HardBreak => self.flush_line(),
                Event::Rule => {
                    self.start_block();
                    self.ensure_line_prefix();
                    self.current_spans.push(Span::styled(
                        "─".repeat(RULE_WIDTH),
                        self.theme.md_rule_style,
                    ));
                    self.flush_line();
                }
                Event::TaskListMarker(checked) => {
                    let marker = if checked { "[x] " } else { "[ ] " };
                    self.push_text(marker, self.theme.md_list_marker_style);
                }
                _ => {}
            }
        }

        self.flush_line();
        while self.lines.last().is_some_and(|line| line.spans.is_empty()) {
            self.lines.pop();
        }
        if self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.lines
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if self.list_stack.is_empty() {
                    self.start_block();
                } else if !self.current_line_is_marker_only() {
                    self.flush_line();
                }
            }
            Tag::Heading { .. } => {
                self.start_block();
                let style = self.current_style().patch(self.theme.md_heading_style);
                self.style_stack.push(style);
            }
            Tag::BlockQuote(_) => {
                self.start_block();
                self.quote_depth += 1;
                let style = self.current_style().patch(self.theme.md_blockquote_style);
                self.style_stack.push(style);
            }
            Tag::CodeBlock(_) => {
                if self.list_stack.is_empty() {
                    self.start_block();
                } else {
                    self.flush_line();
                }
                self.in_code_block = true;
                self.code_buffer.clear();
            }
            Tag::List(start) => {
                if self.list_stack.is_empty() {
                    self.start_block();
                } else {
                    self.flush_line();
                }
                let kind = match start {
                    Some(n) => ListKind::Ordered(n),
                    None => ListKind::Unordered,
                };
                self.list_stack.push(ListState {
                    kind,
                    marker_width: 2,
                });
            }
            Tag::Item => self.start_item(),
            Tag::Emphasis => self.push_modifier(Modifier::ITALIC),
            Tag::Strong => self.push_modifier(Modifier::BOLD),
            Tag::Strikethrough => self.push_modifier(Modifier::CROSSED_OUT),
            Tag::Link { dest_url, .. } => {
                let style = self.current_style().patch(self.theme.md_link_style);
                self.style_stack.push(style);
                self.link_stack.push((dest_url.to_string(), String::new()));
            }
            Tag::Table(_) | Tag::HtmlBlock => self.start_block(),
            Tag::TableHead | Tag::TableRow => {
                self.flush_line();
                self.table_cell_index = 0;
            }
            Tag::TableCell => {
                if self.table_cell_index > 0 {
                    self.push_text(" │ ", self.theme.md_rule_style);
                }
                self.table_cell_index += 1;
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag_end: TagEnd) {
        match tag_end {
            TagEnd::Paragraph => self.flush_line(),
            TagEnd::Heading(_) => {
                self.flush_line();
                self.style_stack.pop();
            }
            TagEnd::BlockQuote(_) => {
                self.flush_line();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.style_stack.pop();
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                let code = std::mem::take(&mut self.code_buffer);
                for line in code.trim_end_matches('\n').split('\n') {
                    self.ensure_line_prefix();
                    self.current_spans.push(Span::styled(
                        format!("{CODE_BLOCK_INDENT}{line}"),
                        self.theme.md_code_block_style,
                    ));
                    self.flush_line();
                }
            }
            TagEnd::List(_) => {
                self.flush_line();
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.pending_indent = None;
                }
            }
            TagEnd::Item => self.flush_line(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.style_stack.pop();
            }
            TagEnd::Link => {
                self.style_stack.pop();
                if let Some((dest, label)) = self.link_stack.pop() {
                    if !dest.is_empty() && dest != label {
                        self.push_text(&format!(" ({dest})"), self.current_style());
                    }
                }
            }
            TagEnd::TableHead | TagEnd::TableRow => self.flush_line(),
            _ => {}
        }
    }

    fn start_item(&mut self) {
        self.flush_line();
        self.pending_indent = None;

        let parent_indent: usize = self
            .list_stack
            .iter()
            .take(self.list_stack.len().saturating_sub(1))
            .map(|state| state.marker_width)
            .sum();

        let marker = match self.list_stack.last_mut() {
            Some(ListState {
                kind: ListKind::Ordered(next),
                ..
            }) => {
                let current = *next;
                *next += 1;
                format!("{current}. ")
            }
            _ => "- ".to_string(),
        };
        if let Some(state) = self.list_stack.last_mut() {
            state.marker_width = marker.width();
        }

        self.ensure_line_prefix();
        if parent_indent > 0 {
            self.current_spans.push(Span::raw(" ".repeat(parent_indent)));
        }
        self.current_spans
            .push(Span::styled(marker, self.theme.md_list_marker_style));
    }

    fn current_line_is_marker_only(&self) -> bool {
        self.current_spans
            .last()
            .is_some_and(|span| span.style == self.theme.md_list_marker_style)
    }

    fn current_style(&self) -> Style {
        self.style_stack.last().copied().unwrap_or_default()
    }

    fn push_modifier(&mut self, modifier: Modifier) {
        let style = self.current_style().add_modifier(modifier);
        self.style_stack.push(style);
    }

    fn push_text(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        self.ensure_line_prefix();
        self.current_spans.push(Span::styled(text.to_string(), style));
    }

    /// Quote bars and list continuation indent for a fresh line.
    fn ensure_line_prefix(&mut self) {
        if !self.current_spans.is_empty() {
            return;
        }
        if self.quote_depth > 0 {
            self.current_spans.push(Span::styled(
                QUOTE_PREFIX.repeat(self.quote_depth),
                self.theme.md_blockquote_style,
            ));
        }
        if let Some(indent) = self.pending_indent.take() {
            self.current_spans.push(Span::raw(indent));
        }
    }

    fn flush_line(&mut self) {
        if self.current_spans.is_empty() {
            return;
        }
        let spans = std::mem::take(&mut self.current_spans);
        self.lines.push(Line::from(spans));
        self.at_block_gap = false;
        if !self.list_stack.is_empty() {
            let width: usize = self.list_stack.iter().map(|state| state.marker_width).sum();
            self.pending_indent = Some(" ".repeat(width));
        }
    }

    /// Separate blocks by a single blank line, keeping the quote bars when
    /// the gap sits inside a blockquote.
    fn start_block(&mut self) {
        self.flush_line();
        if self.lines.is_empty() || self.at_block_gap {
            return;
        }
        let gap = if self.quote_depth > 0 {
            Line::from(Span::styled(
                QUOTE_PREFIX.repeat(self.quote_depth).trim_end().to_string(),
                self.theme.md_blockquote_style,
            ))
        } else {
            Line::default()
        };
        self.lines.push(gap);
        self.at_block_gap = true;
    }
}
