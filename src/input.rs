//! Input Module - Key event conversion and routing
//!
//! Bridges crossterm's event system with the widget for terminal hosts.
//! The core never owns stdin: the host reads events and hands them here.
//!
//! # API
//!
//! - `convert_key_event` - Convert crossterm KeyEvent to a WidgetKey
//! - `route_key` - Apply a WidgetKey to a CardWidget
//! - `route_event` - Convert and route in one step
//!
//! # Example
//!
//! ```ignore
//! use cardflip::input::route_event;
//!
//! // Host event loop
//! if let Ok(crossterm::event::Event::Key(key)) = crossterm::event::read() {
//!     route_event(&widget, key);
//! }
//! ```

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::types::FieldType;
use crate::widget::CardWidget;

// =============================================================================
// WIDGET KEY ENUM
// =============================================================================

/// Widget-level meaning of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKey {
    /// Printable character for the focused field.
    Char(char),
    /// Remove the trailing character of the focused field.
    Backspace,
    /// Advance to the next field (Tab, Enter).
    Next,
    /// Return to the previous field (Shift+Tab).
    Previous,
    /// Finish editing (Escape).
    Finish,
    /// No meaning for the widget.
    None,
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert a crossterm KeyEvent to its widget meaning.
///
/// Releases and chorded characters (Ctrl/Alt) carry no meaning here -
/// those belong to the host.
pub fn convert_key_event(event: KeyEvent) -> WidgetKey {
    if event.kind == KeyEventKind::Release {
        return WidgetKey::None;
    }
    match event.code {
        KeyCode::Char(ch) => {
            if event
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
            {
                WidgetKey::None
            } else {
                WidgetKey::Char(ch)
            }
        }
        KeyCode::Backspace => WidgetKey::Backspace,
        KeyCode::Tab | KeyCode::Enter => WidgetKey::Next,
        KeyCode::BackTab => WidgetKey::Previous,
        KeyCode::Esc => WidgetKey::Finish,
        _ => WidgetKey::None,
    }
}

// =============================================================================
// ROUTING
// =============================================================================

/// Apply a key to the widget. Returns true if the key was consumed.
///
/// Characters append to the focused field through the normal edit path
/// (so limits and the date auto-separator apply); numeric fields take
/// digits only, matching a decimal-pad keyboard on touch hosts.
pub fn route_key(widget: &CardWidget, key: WidgetKey) -> bool {
    match key {
        WidgetKey::Char(ch) => {
            let field = widget.current_focus();
            if field == FieldType::None {
                return false;
            }
            if field.is_numeric() && !ch.is_ascii_digit() {
                return false;
            }
            let mut text = widget.display_text(field);
            text.push(ch);
            widget.on_edit(field, &text);
            true
        }
        WidgetKey::Backspace => {
            let field = widget.current_focus();
            if field == FieldType::None {
                return false;
            }
            let mut text = widget.display_text(field);
            if text.pop().is_none() {
                return false;
            }
            widget.on_edit(field, &text);
            true
        }
        WidgetKey::Next => {
            widget.next();
            true
        }
        WidgetKey::Previous => {
            widget.previous();
            true
        }
        WidgetKey::Finish => {
            widget.finish();
            true
        }
        WidgetKey::None => false,
    }
}

/// Convert and route in one step.
pub fn route_event(widget: &CardWidget, event: KeyEvent) -> bool {
    route_key(widget, convert_key_event(event))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    fn type_str(widget: &CardWidget, text: &str) {
        for ch in text.chars() {
            route_event(widget, key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn test_convert_characters() {
        assert_eq!(convert_key_event(key(KeyCode::Char('4'))), WidgetKey::Char('4'));
        assert_eq!(convert_key_event(key(KeyCode::Char('J'))), WidgetKey::Char('J'));
    }

    #[test]
    fn test_convert_navigation() {
        assert_eq!(convert_key_event(key(KeyCode::Tab)), WidgetKey::Next);
        assert_eq!(convert_key_event(key(KeyCode::Enter)), WidgetKey::Next);
        assert_eq!(convert_key_event(key(KeyCode::BackTab)), WidgetKey::Previous);
        assert_eq!(convert_key_event(key(KeyCode::Esc)), WidgetKey::Finish);
        assert_eq!(convert_key_event(key(KeyCode::Backspace)), WidgetKey::Backspace);
        assert_eq!(convert_key_event(key(KeyCode::Home)), WidgetKey::None);
    }

    #[test]
    fn test_convert_ignores_release_and_chords() {
        let mut event = key(KeyCode::Char('a'));
        event.kind = KeyEventKind::Release;
        assert_eq!(convert_key_event(event), WidgetKey::None);

        let mut event = key(KeyCode::Char('c'));
        event.modifiers = KeyModifiers::CONTROL;
        assert_eq!(convert_key_event(event), WidgetKey::None);

        let mut event = key(KeyCode::Char('x'));
        event.modifiers = KeyModifiers::ALT;
        assert_eq!(convert_key_event(event), WidgetKey::None);

        // Shift is fine (uppercase letters arrive as shifted chars).
        let mut event = key(KeyCode::Char('J'));
        event.modifiers = KeyModifiers::SHIFT;
        assert_eq!(convert_key_event(event), WidgetKey::Char('J'));
    }

    #[test]
    fn test_typing_digits_into_card_number() {
        let widget = CardWidget::default();
        type_str(&widget, "4111");

        assert_eq!(widget.value(FieldType::CardNumber), "4111");
        assert_eq!(widget.provider().unwrap().name(), "visa");
    }

    #[test]
    fn test_numeric_field_rejects_letters() {
        let widget = CardWidget::default();
        assert!(!route_event(&widget, key(KeyCode::Char('a'))));
        assert_eq!(widget.value(FieldType::CardNumber), "");
    }

    #[test]
    fn test_name_field_takes_any_character() {
        let widget = CardWidget::default();
        widget.on_tap(FieldType::CardholderName);
        type_str(&widget, "JOHN DOE");

        assert_eq!(widget.value(FieldType::CardholderName), "JOHN DOE");
    }

    #[test]
    fn test_backspace_trims() {
        let widget = CardWidget::default();
        type_str(&widget, "41");
        route_event(&widget, key(KeyCode::Backspace));

        assert_eq!(widget.value(FieldType::CardNumber), "4");

        // Empty field: nothing to trim.
        route_event(&widget, key(KeyCode::Backspace));
        assert!(!route_event(&widget, key(KeyCode::Backspace)));
    }

    #[test]
    fn test_backspace_steps_over_date_separator() {
        let widget = CardWidget::default();
        widget.on_tap(FieldType::ValidityDate);
        type_str(&widget, "112");
        assert_eq!(widget.display_text(FieldType::ValidityDate), "11/2");

        route_event(&widget, key(KeyCode::Backspace));
        assert_eq!(widget.value(FieldType::ValidityDate), "11");
    }

    #[test]
    fn test_tab_advances_and_validates() {
        let widget = CardWidget::default();
        route_event(&widget, key(KeyCode::Tab));
        assert_eq!(widget.current_focus(), FieldType::CardholderName);

        widget.on_tap(FieldType::ValidityDate);
        type_str(&widget, "11");
        route_event(&widget, key(KeyCode::Tab));

        // Leaving the date field blur-validates: "11" is incomplete.
        assert_eq!(widget.current_focus(), FieldType::Cvv);
        assert_eq!(widget.value(FieldType::ValidityDate), "");
    }

    #[test]
    fn test_escape_finishes() {
        let widget = CardWidget::default();
        route_event(&widget, key(KeyCode::Esc));
        assert_eq!(widget.current_focus(), FieldType::None);

        // Typing with nothing focused goes nowhere.
        assert!(!route_event(&widget, key(KeyCode::Char('4'))));
    }
}
