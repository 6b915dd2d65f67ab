//! Input helpers shared by the composer and paste handling.

/// Normalise pasted or typed text so it cannot corrupt the terminal.
///
/// Tabs become four spaces, carriage returns become newlines, and every
/// other control character is dropped.
pub fn sanitize_text_input(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\t' => sanitized.push_str("    "),
            '\r' => sanitized.push('\n'),
            '\n' => sanitized.push(c),
            _ if !c.is_control() => sanitized.push(c),
            _ => {}
        }
    }

    sanitized
}

/// True when `text` has nothing worth sending.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_expands_tabs_and_drops_controls() {
        assert_eq!(sanitize_text_input("a\tb"), "a    b");
        assert_eq!(sanitize_text_input("line1\r\nline2"), "line1\n\nline2");
        assert_eq!(sanitize_text_input("bell\x07 esc\x1b[0m"), "bell esc[0m");
    }

    #[test]
    fn sanitize_keeps_unicode() {
        assert_eq!(sanitize_text_input("héllo 世界 🚀"), "héllo 世界 🚀");
    }

    #[test]
    fn blank_detection_covers_whitespace_variants() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(is_blank("\n\t \n"));
        assert!(!is_blank(" x "));
    }
}
