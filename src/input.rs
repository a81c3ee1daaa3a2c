//! Shared input handling: key model, event types and held-key tracking.
//!
//! This module is game-agnostic. Each game implements its own input dispatch.

/// Keys the arcade reacts to, normalized from the browser's key names.
/// Letters are always lowercase; the space bar is `Char(' ')`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
    Backspace,
}

impl Key {
    /// Build a key from a DOM `KeyboardEvent.key` value.
    pub fn from_dom_name(name: &str) -> Option<Key> {
        let key = match name {
            "ArrowUp" => Key::Up,
            "ArrowDown" => Key::Down,
            "ArrowLeft" => Key::Left,
            "ArrowRight" => Key::Right,
            "Enter" => Key::Enter,
            "Escape" => Key::Esc,
            "Backspace" => Key::Backspace,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::from_char(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }

    pub fn from_char(c: char) -> Key {
        Key::Char(c.to_ascii_lowercase())
    }

    /// True for the up arrow or `w`.
    pub fn is_up(self) -> bool {
        matches!(self, Key::Up | Key::Char('w'))
    }

    pub fn is_down(self) -> bool {
        matches!(self, Key::Down | Key::Char('s'))
    }

    pub fn is_left(self) -> bool {
        matches!(self, Key::Left | Key::Char('a'))
    }

    pub fn is_right(self) -> bool {
        matches!(self, Key::Right | Key::Char('d'))
    }

    /// Enter or space.
    pub fn is_confirm(self) -> bool {
        matches!(self, Key::Enter | Key::Char(' '))
    }

    /// `1`..=`9` as a number.
    pub fn digit(self) -> Option<u32> {
        match self {
            Key::Char(c) => c.to_digit(10).filter(|d| *d > 0),
            _ => None,
        }
    }
}

/// All possible input events. Key-down repeats while the OS auto-repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
}

/// Keys currently held down, for games with continuous movement.
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    keys: Vec<Key>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track press/release from an event. Repeated key-downs are idempotent.
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown(key) => {
                if !self.keys.contains(&key) {
                    self.keys.push(key);
                }
            }
            InputEvent::KeyUp(key) => self.keys.retain(|k| *k != key),
        }
    }

    pub fn any(&self, pred: impl Fn(Key) -> bool) -> bool {
        self.keys.iter().any(|k| pred(*k))
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}
