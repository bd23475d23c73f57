// Monochrome 64x32 framebuffer, packed 8 pixels per byte, row-major.
//
// Bit 7 of each byte is the leftmost pixel of that byte.

use crate::color::Chip8Color;

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

/// Size of the packed framebuffer in bytes.
pub const DISPLAY_BYTES: usize = SCREEN_WIDTH * SCREEN_HEIGHT / 8;

const ROW_BYTES: usize = SCREEN_WIDTH / 8;

#[derive(Clone, Debug)]
pub struct Display {
    /// Packed pixels
    bits: [u8; DISPLAY_BYTES],
    /// Set whenever the framebuffer was written since the last `take_dirty`
    dirty: bool,
}

impl Default for Display {
    fn default() -> Self {
        Display::new()
    }
}

impl Display {
    pub fn new() -> Display {
        Display {
            bits: [0u8; DISPLAY_BYTES],
            dirty: false,
        }
    }

    pub fn clear(&mut self) {
        self.bits.iter_mut().for_each(|b| *b = 0);
        self.dirty = true;
    }

    /// XOR an 8-pixel wide sprite onto the framebuffer with its top-left
    /// corner at `(x, y)`. Both coordinates are taken modulo the screen size,
    /// and every row and column wraps around the screen edges.
    ///
    /// Returns true if any pixel went from set to clear.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let ox = x as usize % SCREEN_WIDTH;
        let oy = y as usize % SCREEN_HEIGHT;
        let shift = ox % 8;

        let mut collision = false;

        for (row, &data) in rows.iter().enumerate() {
            let line = ((oy + row) % SCREEN_HEIGHT) * ROW_BYTES;

            // The sprite byte straddles two framebuffer bytes unless it is
            // byte aligned; the right half wraps to column 0 at the edge.
            let left = line + ox / 8;
            collision |= self.xor_byte(left, data >> shift);

            if shift != 0 {
                let right = line + ((ox + 7) % SCREEN_WIDTH) / 8;
                collision |= self.xor_byte(right, data << (8 - shift));
            }
        }

        self.dirty = true;
        collision
    }

    // Pixels set in both the framebuffer and `value` are the ones turned off.
    fn xor_byte(&mut self, idx: usize, value: u8) -> bool {
        let old = self.bits[idx];
        self.bits[idx] = old ^ value;
        old & value != 0
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let idx = (y % SCREEN_HEIGHT) * SCREEN_WIDTH + (x % SCREEN_WIDTH);
        (self.bits[idx / 8] >> (7 - idx % 8)) & 1 == 1
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bits[..]
    }

    /// Returns whether the framebuffer changed since the last call, and resets the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Expand every bit into one color, row-major, for presentation.
    pub fn render(&self, out: &mut [Chip8Color], foreground: Chip8Color, background: Chip8Color) {
        assert_eq!(
            out.len(),
            SCREEN_WIDTH * SCREEN_HEIGHT,
            "Render target must hold one color per pixel"
        );

        for (i, pxl) in out.iter_mut().enumerate() {
            let on = (self.bits[i / 8] >> (7 - i % 8)) & 1 == 1;
            *pxl = if on { foreground } else { background };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_pixels(display: &Display) -> Vec<(usize, usize)> {
        let mut lit = Vec::new();
        for y in 0..SCREEN_HEIGHT {
            for x in 0..SCREEN_WIDTH {
                if display.pixel(x, y) {
                    lit.push((x, y));
                }
            }
        }
        lit
    }

    #[test]
    fn test_draw_aligned() {
        let mut display = Display::new();

        let collision = display.draw_sprite(8, 0, &[0xF0]);

        assert!(!collision);
        assert_eq!(display.bytes()[1], 0xF0);
        assert_eq!(lit_pixels(&display), vec![(8, 0), (9, 0), (10, 0), (11, 0)]);
    }

    #[test]
    fn test_draw_straddles_bytes() {
        let mut display = Display::new();

        display.draw_sprite(4, 1, &[0xFF]);

        assert_eq!(display.bytes()[8], 0x0F);
        assert_eq!(display.bytes()[9], 0xF0);
        assert_eq!(lit_pixels(&display).len(), 8);
    }

    #[test]
    fn test_draw_wraps_horizontally() {
        let mut display = Display::new();

        display.draw_sprite(60, 0, &[0xFF]);

        assert_eq!(
            lit_pixels(&display),
            vec![(0, 0), (1, 0), (2, 0), (3, 0), (60, 0), (61, 0), (62, 0), (63, 0)]
        );
    }

    #[test]
    fn test_draw_wraps_vertically() {
        let mut display = Display::new();

        display.draw_sprite(0, 31, &[0x80, 0x80, 0x80]);

        assert_eq!(lit_pixels(&display), vec![(0, 0), (0, 1), (0, 31)]);
    }

    #[test]
    fn test_draw_origin_taken_modulo_screen() {
        let mut display = Display::new();

        display.draw_sprite(64 + 3, 32 + 2, &[0x80]);

        assert_eq!(lit_pixels(&display), vec![(3, 2)]);
    }

    #[test]
    fn test_draw_twice_restores_and_collides() {
        let mut display = Display::new();
        display.draw_sprite(0, 0, &[0x80]);
        let before = display.bytes().to_vec();

        let first = display.draw_sprite(13, 7, &[0x3C, 0x42, 0x3C]);
        let second = display.draw_sprite(13, 7, &[0x3C, 0x42, 0x3C]);

        assert!(!first);
        assert!(second, "Erasing own pixels is a set-to-clear transition");
        assert_eq!(display.bytes(), &before[..]);
    }

    #[test]
    fn test_clear_to_set_is_not_collision() {
        let mut display = Display::new();
        display.draw_sprite(0, 0, &[0xF0]);

        let collision = display.draw_sprite(0, 0, &[0x0F]);

        assert!(!collision);
        assert_eq!(display.bytes()[0], 0xFF);
    }

    #[test]
    fn test_collision_in_wrapped_half() {
        let mut display = Display::new();
        display.draw_sprite(0, 5, &[0x80]);

        let collision = display.draw_sprite(61, 5, &[0x10]);

        assert!(collision);
        assert!(!display.pixel(0, 5));
    }

    #[test]
    fn test_dirty_flag() {
        let mut display = Display::new();
        assert!(!display.take_dirty());

        display.draw_sprite(0, 0, &[0x01]);
        assert!(display.take_dirty());
        assert!(!display.take_dirty());

        display.clear();
        assert!(display.take_dirty());
        assert!(display.bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_render() {
        let mut display = Display::new();
        display.draw_sprite(62, 31, &[0x40]);

        let on = Chip8Color::new(1, 2, 3);
        let off = Chip8Color::new(0, 0, 0);
        let mut out = vec![off; SCREEN_WIDTH * SCREEN_HEIGHT];
        display.render(&mut out, on, off);

        let lit: Vec<usize> = out
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == on)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(lit, vec![31 * SCREEN_WIDTH + 63]);
    }
}
