use rand::Rng;

use crate::error::{Result, VmError};
use crate::keypad::Key;
use crate::memory::font_glyph_addr;
use crate::registers::Register;
use crate::state::{ADDRESS_MASK, Address, Chip8State};

/// Raw fields of an instruction word. Decoding never fails at this level.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Opcode {
    /// First nibble. Represents the operation code.
    pub op: u8,
    /// Second nibble. Used to look up one of the 16 registers.
    pub x: u8,
    /// Third nibble. Used to look up one of the 16 registers.
    pub y: u8,
    /// Fourth nibble. A 4-bit number.
    pub n: u8,
    /// The second byte (third and fourth nibbles). An 8-bit immediate number.
    pub nn: u8,
    /// The second, third, and fourth nibbles. A 12-bit immediate address.
    pub nnn: Address,
}

impl Opcode {
    pub fn new(raw: u16) -> Self {
        Opcode {
            op: (raw >> 12) as u8,
            x: ((raw >> 8) & 0x0F) as u8,
            y: ((raw >> 4) & 0x0F) as u8,
            n: (raw & 0x0F) as u8,
            nn: (raw & 0x00FF) as u8,
            nnn: usize::from(raw & 0x0FFF),
        }
    }

    fn vx(&self) -> Register {
        Register::from_nibble(self.x)
    }

    fn vy(&self) -> Register {
        Register::from_nibble(self.y)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    SubroutineReturn,
    /// 1nnn
    Jump(Address),
    /// 2nnn
    SubroutineCall(Address),
    /// 3xnn
    SkipEq(Register, u8),
    /// 4xnn
    SkipNeq(Register, u8),
    /// 5xy0
    SkipRegEq(Register, Register),
    /// 9xy0
    SkipRegNeq(Register, Register),
    /// 6xnn
    SetImmediate(Register, u8),
    /// 7xnn
    Add(Register, u8),
    /// 8xy0
    SetXToY(Register, Register),
    /// 8xy1
    BinaryOr(Register, Register),
    /// 8xy2
    BinaryAnd(Register, Register),
    /// 8xy3
    LogicalXor(Register, Register),
    /// 8xy4
    BinaryAdd(Register, Register),
    /// 8xy5
    SubtractYFromX(Register, Register),
    /// 8xy6
    RightShift(Register, Register),
    /// 8xy7
    SubtractXFromY(Register, Register),
    /// 8xyE
    LeftShift(Register, Register),
    /// Annn
    SetIndex(Address),
    /// Bnnn
    JumpWithOffset(Address),
    /// Cxnn
    Random(Register, u8),
    /// Dxyn
    Draw(Register, Register, u8),
    /// Ex9E
    SkipIfKeyPressed(Register),
    /// ExA1
    SkipIfKeyNotPressed(Register),
    /// Fx07
    SetVxFromTimer(Register),
    /// Fx0A
    GetKey(Register),
    /// Fx15
    SetDelayTimer(Register),
    /// Fx18
    SetSoundTimer(Register),
    /// Fx1E
    AddToIndex(Register),
    /// Fx29
    FontChar(Register),
    /// Fx33
    BinaryCodedDecimal(Register),
    /// Fx55
    Store(Register),
    /// Fx65
    Load(Register),
}

pub fn decode(raw: u16) -> Result<Instruction> {
    use Instruction::*;

    let d = Opcode::new(raw);
    let (vx, vy) = (d.vx(), d.vy());

    let instruction = match d.op {
        0x0 => match d.nnn {
            0x0E0 => ClearScreen,
            0x0EE => SubroutineReturn,
            _ => return Err(VmError::UnsupportedOpcode(raw)),
        },
        0x1 => Jump(d.nnn),
        0x2 => SubroutineCall(d.nnn),
        0x3 => SkipEq(vx, d.nn),
        0x4 => SkipNeq(vx, d.nn),
        0x5 if d.n == 0 => SkipRegEq(vx, vy),
        0x6 => SetImmediate(vx, d.nn),
        0x7 => Add(vx, d.nn),
        0x8 => match d.n {
            0x0 => SetXToY(vx, vy),
            0x1 => BinaryOr(vx, vy),
            0x2 => BinaryAnd(vx, vy),
            0x3 => LogicalXor(vx, vy),
            0x4 => BinaryAdd(vx, vy),
            0x5 => SubtractYFromX(vx, vy),
            0x6 => RightShift(vx, vy),
            0x7 => SubtractXFromY(vx, vy),
            0xE => LeftShift(vx, vy),
            _ => return Err(VmError::UnsupportedOpcode(raw)),
        },
        0x9 if d.n == 0 => SkipRegNeq(vx, vy),
        0xA => SetIndex(d.nnn),
        0xB => JumpWithOffset(d.nnn),
        0xC => Random(vx, d.nn),
        0xD => Draw(vx, vy, d.n),
        0xE => match d.nn {
            0x9E => SkipIfKeyPressed(vx),
            0xA1 => SkipIfKeyNotPressed(vx),
            _ => return Err(VmError::UnsupportedOpcode(raw)),
        },
        0xF => match d.nn {
            0x07 => SetVxFromTimer(vx),
            0x0A => GetKey(vx),
            0x15 => SetDelayTimer(vx),
            0x18 => SetSoundTimer(vx),
            0x1E => AddToIndex(vx),
            0x29 => FontChar(vx),
            0x33 => BinaryCodedDecimal(vx),
            0x55 => Store(vx),
            0x65 => Load(vx),
            _ => return Err(VmError::UnsupportedOpcode(raw)),
        },
        _ => return Err(VmError::UnsupportedOpcode(raw)),
    };
    Ok(instruction)
}

impl Instruction {
    /// Applies the instruction to `state`. PC must already point past the
    /// instruction; jumps overwrite it and skips add two more.
    pub fn execute(self, state: &mut Chip8State) -> Result<()> {
        use Instruction::*;

        let regs = &mut state.registers;
        match self {
            ClearScreen => state.display.clear(),
            SubroutineReturn => state.pc = state.stack.pop()?,
            Jump(addr) => state.pc = addr,
            SubroutineCall(addr) => {
                state.stack.push(state.pc)?;
                state.pc = addr;
            }
            SkipEq(x, nn) => {
                let hit = regs.read(x) == nn;
                skip_if(state, hit);
            }
            SkipNeq(x, nn) => {
                let hit = regs.read(x) != nn;
                skip_if(state, hit);
            }
            SkipRegEq(x, y) => {
                let hit = regs.read(x) == regs.read(y);
                skip_if(state, hit);
            }
            SkipRegNeq(x, y) => {
                let hit = regs.read(x) != regs.read(y);
                skip_if(state, hit);
            }
            SetImmediate(x, nn) => regs.write(x, nn),
            Add(x, nn) => {
                let sum = (u16::from(regs.read(x)) + u16::from(nn)) % 0x100;
                regs.write(x, sum as u8);
            }
            SetXToY(x, y) => regs.write(x, regs.read(y)),
            BinaryOr(x, y) => logic(state, x, y, |a, b| a | b),
            BinaryAnd(x, y) => logic(state, x, y, |a, b| a & b),
            LogicalXor(x, y) => logic(state, x, y, |a, b| a ^ b),
            BinaryAdd(x, y) => {
                let sum = u16::from(regs.read(x)) + u16::from(regs.read(y));
                regs.write(x, (sum % 0x100) as u8);
                regs.set_flag(sum > 0xFF);
            }
            SubtractYFromX(x, y) => {
                let (value_x, value_y) = (regs.read(x), regs.read(y));
                regs.write(x, value_x.wrapping_sub(value_y));
                regs.set_flag(value_x >= value_y);
            }
            SubtractXFromY(x, y) => {
                let (value_x, value_y) = (regs.read(x), regs.read(y));
                regs.write(x, value_y.wrapping_sub(value_x));
                regs.set_flag(value_y >= value_x);
            }
            RightShift(x, y) => {
                let value = shift_source(state, x, y);
                state.registers.write(x, value >> 1);
                state.registers.set_flag(value & 0x01 == 1);
            }
            LeftShift(x, y) => {
                let value = shift_source(state, x, y);
                state.registers.write(x, value << 1);
                state.registers.set_flag(value & 0x80 != 0);
            }
            SetIndex(addr) => state.index = addr,
            JumpWithOffset(addr) => {
                state.pc = addr + usize::from(regs.read(Register::V0));
            }
            Random(x, nn) => {
                let value = state.rng.random::<u8>() & nn;
                state.registers.write(x, value);
            }
            Draw(x, y, n) => {
                let (col, row) = (regs.read(x), regs.read(y));
                let collision = state.draw_sprite(col, row, n)?;
                state.registers.set_flag(collision);
            }
            SkipIfKeyPressed(x) => {
                let key = Key::from_register(regs.read(x));
                let hit = state.keypad.is_key_pressed(key);
                skip_if(state, hit);
            }
            SkipIfKeyNotPressed(x) => {
                let key = Key::from_register(regs.read(x));
                let hit = !state.keypad.is_key_pressed(key);
                skip_if(state, hit);
            }
            SetVxFromTimer(x) => regs.write(x, state.timers.delay),
            GetKey(x) => {
                // Only presses that begin after this point complete the wait.
                state.keypad.clear_press();
                state.key_wait = Some(x);
            }
            SetDelayTimer(x) => state.timers.delay = regs.read(x),
            SetSoundTimer(x) => state.timers.sound = regs.read(x),
            AddToIndex(x) => {
                let sum = state.index + usize::from(regs.read(x));
                state.index = sum & ADDRESS_MASK;
                state.registers.set_flag(sum > ADDRESS_MASK);
            }
            FontChar(x) => state.index = font_glyph_addr(regs.read(x)),
            BinaryCodedDecimal(x) => {
                let value = regs.read(x);
                let digits = [value / 100, (value / 10) % 10, value % 10];
                state.memory.write_slice(state.index, &digits)?;
            }
            Store(x) => {
                let values: Vec<u8> = x.up_to().map(|reg| regs.read(reg)).collect();
                state.memory.write_slice(state.index, &values)?;
                advance_index(state, values.len());
            }
            Load(x) => {
                let values = state.memory.read_slice(state.index, x as usize + 1)?;
                for (reg, &value) in x.up_to().zip(values) {
                    state.registers.write(reg, value);
                }
                advance_index(state, x as usize + 1);
            }
        }
        Ok(())
    }
}

fn skip_if(state: &mut Chip8State, condition: bool) {
    if condition {
        state.pc += 2;
    }
}

fn logic(state: &mut Chip8State, x: Register, y: Register, f: impl Fn(u8, u8) -> u8) {
    let result = f(state.registers.read(x), state.registers.read(y));
    state.registers.write(x, result);
    if state.quirks.logic_resets_flag {
        state.registers.set_flag(false);
    }
}

fn shift_source(state: &Chip8State, x: Register, y: Register) -> u8 {
    if state.quirks.shift_reads_vy {
        state.registers.read(y)
    } else {
        state.registers.read(x)
    }
}

fn advance_index(state: &mut Chip8State, count: usize) {
    if state.quirks.load_store_advances_index {
        state.index = (state.index + count) & ADDRESS_MASK;
    }
}
