use crate::error::{Result, VmError};
use crate::state::{Address, FONT_ADDR, MEM_SIZE, PROGRAM_START};

pub const FONT_HEIGHT: usize = 5;

#[rustfmt::skip]
pub const FONT: [u8; 16 * FONT_HEIGHT] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Address of the glyph for hexadecimal digit `digit` (only the low nibble counts).
pub fn font_glyph_addr(digit: u8) -> Address {
    FONT_ADDR + usize::from(digit & 0x0F) * FONT_HEIGHT
}

/// The 4 KiB address space. All access goes through the checked accessors
/// below; nothing outside this module indexes `data` directly.
#[derive(Clone)]
pub struct Memory {
    data: [u8; MEM_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut data = [0; MEM_SIZE];
        data[FONT_ADDR..FONT_ADDR + FONT.len()].copy_from_slice(&FONT);
        Memory { data }
    }

    pub fn read_byte(&self, addr: Address) -> Result<u8> {
        self.data
            .get(addr)
            .copied()
            .ok_or(VmError::out_of_range(addr))
    }

    pub fn write_byte(&mut self, addr: Address, value: u8) -> Result<()> {
        let slot = self
            .data
            .get_mut(addr)
            .ok_or(VmError::out_of_range(addr))?;
        *slot = value;
        Ok(())
    }

    /// Big-endian: high byte at `addr`, low byte at `addr + 1`.
    pub fn read_word(&self, addr: Address) -> Result<u16> {
        let high = self.read_byte(addr)?;
        let low = self.read_byte(addr + 1)?;
        Ok(u16::from_be_bytes([high, low]))
    }

    pub fn load(&mut self, program: &[u8], at: Address) -> Result<()> {
        let max = MEM_SIZE.saturating_sub(at);
        if program.len() > max {
            return Err(VmError::ProgramTooLarge {
                size: program.len(),
                max,
            });
        }
        if !program.is_empty() {
            self.data[at..at + program.len()].copy_from_slice(program);
        }
        Ok(())
    }

    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        self.load(program, PROGRAM_START)
    }

    /// `len` bytes starting at `addr`; fails on the first address past the end.
    pub fn read_slice(&self, addr: Address, len: usize) -> Result<&[u8]> {
        let range = Self::checked_range(addr, len)?;
        Ok(&self.data[range])
    }

    /// Writes all of `bytes` or nothing.
    pub fn write_slice(&mut self, addr: Address, bytes: &[u8]) -> Result<()> {
        let range = Self::checked_range(addr, bytes.len())?;
        self.data[range].copy_from_slice(bytes);
        Ok(())
    }

    fn checked_range(addr: Address, len: usize) -> Result<std::ops::Range<usize>> {
        let end = addr.saturating_add(len);
        if end > MEM_SIZE || addr > MEM_SIZE {
            return Err(VmError::out_of_range(addr.max(MEM_SIZE)));
        }
        Ok(addr..end)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
