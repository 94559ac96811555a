use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::config::Config;
use crate::display::Framebuffer;
use crate::error::Result;
use crate::instruction::{Instruction, decode};
use crate::keypad::Key;
use crate::memory::Memory;
use crate::state::{Address, Chip8State, NUM_REGISTERS};

/// What a successful [`Machine::step`] did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Executed(Instruction),
    /// An `Fx0A` is pending and no new key press has arrived yet. PC did not move.
    WaitingForKey,
}

/// Copy of the register file taken between steps.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RegisterSnapshot {
    pub v: [u8; NUM_REGISTERS],
    pub i: u16,
    pub pc: u16,
    pub sp: usize,
    pub delay: u8,
    pub sound: u8,
}

/// The interpreter. Owns all machine state; a host drives it by calling
/// [`step`](Machine::step) at the instruction rate and
/// [`tick_timers`](Machine::tick_timers) at 60 Hz.
pub struct Machine {
    state: Chip8State,
}

impl Machine {
    pub fn new(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, rng)
    }

    /// Uses `rng` for `Cxnn` instead of the generator described by `config.seed`.
    pub fn with_rng(config: Config, rng: impl RngCore + Send + 'static) -> Self {
        Machine {
            state: Chip8State::new(config.quirks, Box::new(rng)),
        }
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn load(&mut self, program: &[u8]) -> Result<()> {
        self.state.memory.load_program(program)
    }

    pub fn load_at(&mut self, program: &[u8], at: Address) -> Result<()> {
        self.state.memory.load(program, at)
    }

    /// Executes exactly one instruction. While an `Fx0A` is pending, each call
    /// only re-checks the keypad; the call that sees a new press completes the
    /// `Fx0A` and executes nothing else.
    ///
    /// On `UnsupportedOpcode` the PC has already moved past the word, so the
    /// caller may keep stepping. Any other error leaves the instruction
    /// unfinished.
    pub fn step(&mut self) -> Result<StepOutcome> {
        if let Some(reg) = self.state.key_wait {
            let Some(key) = self.state.keypad.take_press() else {
                return Ok(StepOutcome::WaitingForKey);
            };
            self.state.registers.write(reg, key.index());
            self.state.key_wait = None;
            return Ok(StepOutcome::Executed(Instruction::GetKey(reg)));
        }

        let instruction = self.fetch_instruction()?;
        instruction.execute(&mut self.state)?;
        Ok(StepOutcome::Executed(instruction))
    }

    fn fetch_instruction(&mut self) -> Result<Instruction> {
        let raw = self.state.memory.read_word(self.state.pc)?;

        // Move the program counter to next instruction
        self.state.pc += 2;

        decode(raw)
    }

    /// One 60 Hz tick of the delay and sound timers.
    pub fn tick_timers(&mut self) {
        self.state.timers.tick();
    }

    pub fn set_key(&mut self, index: usize, down: bool) -> Result<()> {
        let key = Key::from_index(index)?;
        self.state.keypad.set_key(key, down);
        Ok(())
    }

    pub fn release_all_keys(&mut self) {
        self.state.keypad.release_all();
    }

    pub fn framebuffer(&self) -> Framebuffer {
        self.state.display
    }

    pub fn registers(&self) -> RegisterSnapshot {
        RegisterSnapshot {
            v: self.state.registers.as_array(),
            i: self.state.index as u16,
            pc: self.state.pc as u16,
            sp: self.state.stack.depth(),
            delay: self.state.timers.delay,
            sound: self.state.timers.sound,
        }
    }

    pub fn memory(&self) -> &Memory {
        &self.state.memory
    }

    pub fn sound_active(&self) -> bool {
        self.state.timers.sound_active()
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.state.key_wait.is_some()
    }
}
