use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Direction, Intent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Intent(Intent),
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Intent(Intent::Turn(Direction::Up)),
            KeyCode::Down => KeyAction::Intent(Intent::Turn(Direction::Down)),
            KeyCode::Left => KeyAction::Intent(Intent::Turn(Direction::Left)),
            KeyCode::Right => KeyAction::Intent(Intent::Turn(Direction::Right)),

            // Start / restart
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('r') | KeyCode::Char('R') => {
                KeyAction::Intent(Intent::Start)
            }

            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            // Movement - WASD
            KeyCode::Char(c) => match direction_from_letter(c) {
                Some(direction) => KeyAction::Intent(Intent::Turn(direction)),
                None => KeyAction::None,
            },

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn direction_from_letter(c: char) -> Option<Direction> {
    match c.to_ascii_lowercase() {
        'w' => Some(Direction::Up),
        's' => Some(Direction::Down),
        'a' => Some(Direction::Left),
        'd' => Some(Direction::Right),
        _ => None,
    }
}

/// Map a platform-neutral key symbol to a direction.
///
/// Accepts single WASD letters in either case and arrow names such as
/// `ArrowUp` or `Left`. Anything else is ignored.
pub fn direction_from_symbol(symbol: &str) -> Option<Direction> {
    let mut chars = symbol.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return direction_from_letter(c);
    }

    let name = symbol.strip_prefix("Arrow").unwrap_or(symbol);
    match name.to_ascii_lowercase().as_str() {
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        _ => None,
    }
}
