use bitvec::prelude::*;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;
pub const ROW_BYTES: usize = DISPLAY_WIDTH / 8;

type Pixels = BitArr!(for DISPLAY_WIDTH * DISPLAY_HEIGHT, in u8, Msb0);

/// 64x32 monochrome grid, packed eight pixels per byte with the most
/// significant bit leftmost. Sprites wrap in both directions, so the screen
/// behaves as a torus.
#[derive(Debug, Clone, Copy)]
pub struct Framebuffer {
    pixels: Pixels,
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            pixels: BitArray::ZERO,
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(false);
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[Self::offset(x, y)]
    }

    /// XOR `sprite` onto the grid with its top-left corner at (`x`, `y`).
    /// Each byte is one 8-pixel row. Returns `true` if any lit pixel was
    /// turned off anywhere in the sprite.
    pub fn draw(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collision = false;

        for (row, &byte) in sprite.iter().enumerate() {
            for bit in 0..8 {
                if (byte >> (7 - bit)) & 1 == 0 {
                    continue;
                }
                let index = Self::offset(x + bit, y + row);
                let current_pixel = self.pixels[index];
                collision |= current_pixel;
                self.pixels.set(index, !current_pixel);
            }
        }
        collision
    }

    /// Packed bytes of row `y` (wrapped), leftmost pixels first.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = (y % DISPLAY_HEIGHT) * ROW_BYTES;
        &self.pixels.as_raw_slice()[start..start + ROW_BYTES]
    }

    /// All 256 packed bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw_slice()
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.count_ones()
    }

    fn offset(x: usize, y: usize) -> usize {
        (y % DISPLAY_HEIGHT) * DISPLAY_WIDTH + (x % DISPLAY_WIDTH)
    }
}

impl PartialEq for Framebuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Framebuffer {}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}
