use std::str::FromStr;

use bytemuck::{Pod, Zeroable};
use thiserror::Error;

pub const DEFAULT_BACKGROUND_COLOR: Chip8Color = Chip8Color::new(0, 0, 0);
pub const DEFAULT_FOREGROUND_COLOR: Chip8Color = Chip8Color::new(255, 255, 255);

/// One presented pixel. The byte order matches a little-endian RGBX8888 texture,
/// so a slice of colors can be handed to the renderer with `bytemuck::cast_slice`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C, packed)]
pub struct Chip8Color {
    padding: u8,
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

impl Chip8Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Chip8Color {
        Chip8Color { r, g, b, padding: 0 }
    }
}

impl Default for Chip8Color {
    fn default() -> Self {
        DEFAULT_BACKGROUND_COLOR
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse hex color {0:?}, expected RRGGBB or 0xRRGGBB")]
pub struct ColorParseError(String);

impl FromStr for Chip8Color {
    type Err = ColorParseError;

    fn from_str(input: &str) -> Result<Chip8Color, ColorParseError> {
        let err = || ColorParseError(input.to_string());

        let s = input
            .strip_prefix("0x")
            .or_else(|| input.strip_prefix('#'))
            .unwrap_or(input);

        if s.len() != 6 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&s[range], 16).map_err(|_| err());

        Ok(Chip8Color::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!("0x10A0FF".parse::<Chip8Color>(), Ok(Chip8Color::new(0x10, 0xA0, 0xFF)));
        assert_eq!("33ff00".parse::<Chip8Color>(), Ok(Chip8Color::new(0x33, 0xFF, 0x00)));
        assert_eq!("#000001".parse::<Chip8Color>(), Ok(Chip8Color::new(0, 0, 1)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("0x10A0F".parse::<Chip8Color>().is_err());
        assert!("GG0000".parse::<Chip8Color>().is_err());
        assert!("".parse::<Chip8Color>().is_err());
        assert!("0x12345678".parse::<Chip8Color>().is_err());
    }

    #[test]
    fn test_texture_byte_order() {
        let pixels = [Chip8Color::new(0x11, 0x22, 0x33)];
        let bytes: &[u8] = bytemuck::cast_slice(&pixels[..]);
        assert_eq!(bytes, &[0x00, 0x33, 0x22, 0x11]);
        assert_eq!(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]), 0x11223300);
    }
}
