use crate::error::{Result, VmError};
use crate::state::NUM_KEYS;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    KeyA,
    KeyB,
    KeyC,
    KeyD,
    KeyE,
    KeyF,
}

impl Key {
    const ALL: [Key; NUM_KEYS] = [
        Key::Key0,
        Key::Key1,
        Key::Key2,
        Key::Key3,
        Key::Key4,
        Key::Key5,
        Key::Key6,
        Key::Key7,
        Key::Key8,
        Key::Key9,
        Key::KeyA,
        Key::KeyB,
        Key::KeyC,
        Key::KeyD,
        Key::KeyE,
        Key::KeyF,
    ];

    pub fn from_index(index: usize) -> Result<Key> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(VmError::InvalidKey(index))
    }

    /// Key named by a register value; values above 0xF are masked.
    pub fn from_register(value: u8) -> Key {
        Self::ALL[usize::from(value & 0x0F)]
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Down/up state of the sixteen keys, written by the host and read by the
/// interpreter. Up-to-down transitions are latched for `Fx0A`.
#[derive(Debug, Clone, Default)]
pub struct Keypad {
    down: [bool; NUM_KEYS],
    last_press: Option<Key>,
}

impl Keypad {
    pub fn new() -> Self {
        Keypad::default()
    }

    pub fn set_key(&mut self, key: Key, down: bool) {
        let was_down = std::mem::replace(&mut self.down[key as usize], down);
        if down && !was_down {
            self.last_press = Some(key);
        }
    }

    pub fn press_key(&mut self, key: Key) {
        self.set_key(key, true);
    }

    pub fn release_key(&mut self, key: Key) {
        self.set_key(key, false);
    }

    pub fn release_all(&mut self) {
        self.down = [false; NUM_KEYS];
    }

    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.down[key as usize]
    }

    /// Most recent up-to-down transition since the last call, if any.
    pub fn take_press(&mut self) -> Option<Key> {
        self.last_press.take()
    }

    pub fn clear_press(&mut self) {
        self.last_press = None;
    }
}
