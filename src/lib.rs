//! A CHIP-8 interpreter core.
//!
//! [`Machine`] owns the 4 KiB memory, the register file, the call stack, the
//! 64x32 framebuffer, the timers and the keypad. The host loads a raw program
//! image, calls [`Machine::step`] at whatever instruction rate it likes, calls
//! [`Machine::tick_timers`] at 60 Hz, and reads snapshots between steps.
//!
//! ```
//! use chip8vm::{Config, Machine};
//!
//! let mut vm = Machine::new(Config::seeded(0));
//! vm.load(&[0x60, 0x2A]).unwrap(); // V0 = 0x2A
//! vm.step().unwrap();
//! assert_eq!(vm.registers().v[0], 0x2A);
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod instruction;
pub mod keypad;
pub mod machine;
pub mod memory;
pub mod registers;
pub mod stack;
pub mod state;
pub mod timers;

pub use config::{Config, Quirks};
pub use display::{DISPLAY_HEIGHT, DISPLAY_WIDTH, Framebuffer};
pub use error::{Result, VmError};
pub use instruction::{Instruction, Opcode, decode};
pub use keypad::Key;
pub use machine::{Machine, RegisterSnapshot, StepOutcome};
