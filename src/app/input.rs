use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::domain::{FieldSchema, FieldType};

use super::keymap::{self, KeymapContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyAction {
    Submit,
    Quit,
    DismissFeedback,
    FieldStep(i32),
    OpenPopup,
    TogglePane,
    RowStep(i32),
    EditRecord,
    DeleteRecord,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum KeyCommand {
    Action(KeyAction),
    Edit(KeyEvent),
}

pub(crate) fn classify(context: KeymapContext, key: &KeyEvent) -> KeyCommand {
    match keymap::classify_key(context, key) {
        Some(action) => KeyCommand::Action(action),
        None => KeyCommand::Edit(*key),
    }
}

/// The value `field` would hold after `key`; `None` when the key does not
/// edit this kind of field.
pub(crate) fn edited_value(field: &FieldSchema, current: &str, key: &KeyEvent) -> Option<String> {
    if field.kind == FieldType::Dropdown {
        return match key.code {
            KeyCode::Left => Some(cycle_option(&field.options, current, -1)),
            KeyCode::Right => Some(cycle_option(&field.options, current, 1)),
            KeyCode::Backspace | KeyCode::Delete => Some(String::new()),
            _ => None,
        };
    }
    let mut buffer = current.to_string();
    match key.code {
        KeyCode::Left | KeyCode::Right if field.kind == FieldType::Number => {
            let delta = if key.code == KeyCode::Left { -1.0 } else { 1.0 };
            step_number(&mut buffer, delta);
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return None;
            }
            buffer.push(ch);
        }
        KeyCode::Backspace => {
            buffer.pop()?;
        }
        KeyCode::Delete => buffer.clear(),
        _ => return None,
    }
    Some(buffer)
}

/// Step through `options`, treating `""` as the slot before the first option.
pub(crate) fn cycle_option(options: &[String], current: &str, delta: i32) -> String {
    if options.is_empty() {
        return String::new();
    }
    let len = options.len() as i32 + 1;
    let position = options
        .iter()
        .position(|option| option == current)
        .map(|idx| idx as i32 + 1)
        .unwrap_or(0);
    let next = ((position + delta) % len + len) % len;
    if next == 0 {
        String::new()
    } else {
        options[(next - 1) as usize].clone()
    }
}

fn step_number(buffer: &mut String, delta: f64) {
    let current = buffer.trim().parse::<f64>().unwrap_or(0.0);
    let next = current + delta;
    *buffer = if next.fract() == 0.0 {
        format!("{next:.0}")
    } else {
        next.to_string()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn options() -> Vec<String> {
        vec!["Goa".to_string(), "Assam".to_string()]
    }

    #[test]
    fn typing_appends_and_backspace_pops() {
        let field = FieldSchema::new("city", FieldType::Text, "City");
        assert_eq!(
            edited_value(&field, "Pun", &press(KeyCode::Char('e'))).as_deref(),
            Some("Pune")
        );
        assert_eq!(
            edited_value(&field, "Pune", &press(KeyCode::Backspace)).as_deref(),
            Some("Pun")
        );
        assert_eq!(edited_value(&field, "", &press(KeyCode::Backspace)), None);
        assert_eq!(
            edited_value(&field, "Pune", &press(KeyCode::Delete)).as_deref(),
            Some("")
        );
    }

    #[test]
    fn control_chords_are_not_text() {
        let field = FieldSchema::new("city", FieldType::Text, "City");
        let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert_eq!(edited_value(&field, "", &ctrl_a), None);
    }

    #[test]
    fn number_fields_step_with_arrows() {
        let field = FieldSchema::new("age", FieldType::Number, "Age");
        assert_eq!(
            edited_value(&field, "", &press(KeyCode::Right)).as_deref(),
            Some("1")
        );
        assert_eq!(
            edited_value(&field, "30", &press(KeyCode::Left)).as_deref(),
            Some("29")
        );
        assert_eq!(
            edited_value(&field, "1.5", &press(KeyCode::Right)).as_deref(),
            Some("2.5")
        );
        let text = FieldSchema::new("city", FieldType::Text, "City");
        assert_eq!(edited_value(&text, "x", &press(KeyCode::Right)), None);
    }

    #[test]
    fn dropdown_cycles_through_unselected_slot() {
        let opts = options();
        assert_eq!(cycle_option(&opts, "", 1), "Goa");
        assert_eq!(cycle_option(&opts, "Goa", 1), "Assam");
        assert_eq!(cycle_option(&opts, "Assam", 1), "");
        assert_eq!(cycle_option(&opts, "", -1), "Assam");
        assert_eq!(cycle_option(&opts, "Unknown", 1), "Goa");
        assert_eq!(cycle_option(&[], "x", 1), "");
    }

    #[test]
    fn dropdown_ignores_typing() {
        let field = FieldSchema::new("state", FieldType::Dropdown, "State").with_options(options());
        assert_eq!(edited_value(&field, "", &press(KeyCode::Char('g'))), None);
        assert_eq!(
            edited_value(&field, "Goa", &press(KeyCode::Delete)).as_deref(),
            Some("")
        );
    }
}
