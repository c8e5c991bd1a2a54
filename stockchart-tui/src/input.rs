//! Keyboard input dispatch.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, MAX_SYMBOL_LEN};

/// Characters allowed in a ticker symbol (e.g. `BRK.B`, `^GSPC`, `BTC-USD`).
fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Esc => app.shutdown(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.shutdown(),
        KeyCode::Enter => app.submit(),
        KeyCode::Tab | KeyCode::Right => app.cycle_period(true),
        KeyCode::BackTab | KeyCode::Left => app.cycle_period(false),
        KeyCode::Backspace => {
            app.symbol_input.pop();
        }
        KeyCode::Char(c) if is_symbol_char(c) => {
            if app.symbol_input.chars().count() < MAX_SYMBOL_LEN {
                app.symbol_input.push(c.to_ascii_uppercase());
            }
        }
        _ => {}
    }
}
