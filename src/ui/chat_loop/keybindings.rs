//! Terminal events to app actions.

use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use crate::core::app::AppAction;

const WHEEL_LINES: u16 = 3;

/// Translate one terminal event. Events with no binding yield no actions.
pub fn actions_for_event(event: Event) -> Vec<AppAction> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => actions_for_key(key),
        Event::Paste(text) => vec![AppAction::InsertIntoInput { text }],
        Event::Mouse(mouse) => actions_for_mouse(mouse),
        _ => Vec::new(),
    }
}

pub fn actions_for_key(key: KeyEvent) -> Vec<AppAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    let action = match key.code {
        KeyCode::Esc => AppAction::Quit,
        KeyCode::Char('c') if ctrl => AppAction::Quit,
        KeyCode::Char('l') if ctrl => AppAction::ClearConversation,
        KeyCode::Enter if alt || shift => AppAction::InsertIntoInput {
            text: "\n".to_string(),
        },
        KeyCode::Char('j') if ctrl => AppAction::InsertIntoInput {
            text: "\n".to_string(),
        },
        KeyCode::Enter => AppAction::SubmitDraft,
        KeyCode::Up => AppAction::ScrollUp { lines: 1 },
        KeyCode::Down => AppAction::ScrollDown { lines: 1 },
        KeyCode::PageUp => AppAction::PageUp,
        KeyCode::PageDown => AppAction::PageDown,
        KeyCode::Home if ctrl => AppAction::ScrollToTop,
        KeyCode::End if ctrl => AppAction::ScrollToBottom,
        _ => AppAction::EditInput { key },
    };
    vec![action]
}

fn actions_for_mouse(mouse: MouseEvent) -> Vec<AppAction> {
    match mouse.kind {
        MouseEventKind::ScrollUp => vec![AppAction::ScrollUp { lines: WHEEL_LINES }],
        MouseEventKind::ScrollDown => vec![AppAction::ScrollDown { lines: WHEEL_LINES }],
        _ => Vec::new(),
    }
}
