use rand::RngCore;

use crate::config::Quirks;
use crate::display::{DISPLAY_HEIGHT, DISPLAY_WIDTH, Framebuffer};
use crate::error::Result;
use crate::keypad::Keypad;
use crate::memory::Memory;
use crate::registers::{Register, RegisterBank};
use crate::stack::CallStack;
use crate::timers::Timers;

pub type Address = usize;

pub const MEM_SIZE: usize = 4096;
pub const FONT_ADDR: Address = 0x50;
pub const PROGRAM_START: Address = 0x200;
pub const NUM_REGISTERS: usize = 16;
pub const NUM_KEYS: usize = 16;
pub const STACK_CAPACITY: usize = 16;
/// I and PC carry twelve significant bits.
pub const ADDRESS_MASK: Address = 0x0FFF;

/// Everything an instruction may read or write.
pub struct Chip8State {
    pub memory: Memory,
    pub registers: RegisterBank,
    pub pc: Address,
    pub index: Address,
    pub stack: CallStack,
    pub timers: Timers,
    pub display: Framebuffer,
    pub keypad: Keypad,
    pub quirks: Quirks,
    pub rng: Box<dyn RngCore + Send>,
    /// Destination register of a pending `Fx0A`.
    pub key_wait: Option<Register>,
}

impl Chip8State {
    pub fn new(quirks: Quirks, rng: Box<dyn RngCore + Send>) -> Self {
        Chip8State {
            memory: Memory::new(),
            registers: RegisterBank::new(),
            pc: PROGRAM_START,
            index: 0,
            stack: CallStack::new(),
            timers: Timers::new(),
            display: Framebuffer::new(),
            keypad: Keypad::new(),
            quirks,
            rng,
            key_wait: None,
        }
    }

    /// Power-on state. Quirks and the random source survive.
    pub fn reset(&mut self) {
        self.memory = Memory::new();
        self.registers = RegisterBank::new();
        self.pc = PROGRAM_START;
        self.index = 0;
        self.stack.clear();
        self.timers = Timers::new();
        self.display.clear();
        self.keypad = Keypad::new();
        self.key_wait = None;
    }

    /// Draws the `rows`-byte sprite at I with its corner at (`x`, `y`),
    /// reporting whether any lit pixel was turned off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: u8) -> Result<bool> {
        let sprite = self.memory.read_slice(self.index, usize::from(rows))?;
        Ok(self.display.draw(
            usize::from(x) % DISPLAY_WIDTH,
            usize::from(y) % DISPLAY_HEIGHT,
            sprite,
        ))
    }
}
