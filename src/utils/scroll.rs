use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

/// Scroll math and width-aware line wrapping for the transcript pane.
pub struct ScrollCalculator;

impl ScrollCalculator {
    /// Pre-wrap `lines` to `width` columns, breaking at spaces where possible
    /// and splitting words longer than a whole row. Styles are preserved.
    /// Rendering the result without ratatui's own wrapping keeps line counts
    /// identical to what is drawn.
    pub fn prewrap_lines(lines: &[Line<'_>], width: u16) -> Vec<Line<'static>> {
        let width = width as usize;
        let mut out = Vec::with_capacity(lines.len());
        for line in lines {
            if width == 0 || line.spans.is_empty() {
                out.push(to_owned_line(line));
                continue;
            }
            wrap_line(line, width, &mut out);
        }
        out
    }

    /// Largest offset that still keeps the pane filled.
    pub fn max_scroll_offset(total_lines: usize, available_height: u16) -> u16 {
        let total = total_lines.min(u16::MAX as usize) as u16;
        total.saturating_sub(available_height)
    }
}

fn to_owned_line(line: &Line<'_>) -> Line<'static> {
    let spans: Vec<Span<'static>> = line
        .spans
        .iter()
        .map(|s| Span::styled(s.content.to_string(), s.style))
        .collect();
    Line::from(spans).style(line.style)
}

/// Append `text` to `spans`, merging with the previous span when the style
/// matches.
fn push_run(spans: &mut Vec<Span<'static>>, style: Style, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = spans.last_mut() {
        if last.style == style {
            let mut merged = last.content.to_string();
            merged.push_str(text);
            *last = Span::styled(merged, style);
            return;
        }
    }
    spans.push(Span::styled(text.to_string(), style));
}

struct Token {
    segments: Vec<(String, Style)>,
    width: usize,
    is_space: bool,
}

fn tokenize(line: &Line<'_>) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    for span in &line.spans {
        let style = line.style.patch(span.style);
        for ch in span.content.chars() {
            let is_space = ch == ' ';
            let ch_width = ch.width().unwrap_or(0);
            match tokens.last_mut() {
                Some(token) if token.is_space == is_space => {
                    token.width += ch_width;
                    match token.segments.last_mut() {
                        Some((text, seg_style)) if *seg_style == style => text.push(ch),
                        _ => token.segments.push((ch.to_string(), style)),
                    }
                }
                _ => tokens.push(Token {
                    segments: vec![(ch.to_string(), style)],
                    width: ch_width,
                    is_space,
                }),
            }
        }
    }
    tokens
}

fn wrap_line(line: &Line<'_>, width: usize, out: &mut Vec<Line<'static>>) {
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0usize;

    for token in tokenize(line) {
        if token.is_space {
            // Spaces that would overflow are dropped at the wrap point.
            if current_width + token.width > width {
                if !current.is_empty() {
                    out.push(Line::from(std::mem::take(&mut current)));
                }
                current_width = 0;
                continue;
            }
            for (text, style) in &token.segments {
                push_run(&mut current, *style, text);
            }
            current_width += token.width;
            continue;
        }

        if current_width + token.width > width && current_width > 0 {
            trim_trailing_spaces(&mut current);
            out.push(Line::from(std::mem::take(&mut current)));
            current_width = 0;
        }

        if token.width <= width {
            for (text, style) in &token.segments {
                push_run(&mut current, *style, text);
            }
            current_width += token.width;
            continue;
        }

        // Word wider than a full row: hard-break it by character.
        for (text, style) in &token.segments {
            for ch in text.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if current_width + ch_width > width && current_width > 0 {
                    out.push(Line::from(std::mem::take(&mut current)));
                    current_width = 0;
                }
                let mut buf = [0u8; 4];
                push_run(&mut current, *style, ch.encode_utf8(&mut buf));
                current_width += ch_width;
            }
        }
    }

    out.push(Line::from(current));
}

fn trim_trailing_spaces(spans: &mut Vec<Span<'static>>) {
    while let Some(last) = spans.last_mut() {
        let trimmed = last.content.trim_end_matches(' ');
        if trimmed.is_empty() {
            spans.pop();
            continue;
        }
        if trimmed.len() != last.content.len() {
            let style = last.style;
            *last = Span::styled(trimmed.to_string(), style);
        }
        break;
    }
}
