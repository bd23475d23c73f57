use sdl2::keyboard::Scancode;

/// Fixed mapping from the left side of a QWERTY keyboard to the hex keypad.
///
/// ```text
/// Keyboard    Keypad
/// 1 2 3 4     1 2 3 C
/// Q W E R     4 5 6 D
/// A S D F     7 8 9 E
/// Z X C V     A 0 B F
/// ```
pub fn keypad_key(scancode: Scancode) -> Option<u8> {
    let key = match scancode {
        Scancode::Num1 => 0x1,
        Scancode::Num2 => 0x2,
        Scancode::Num3 => 0x3,
        Scancode::Num4 => 0xC,
        Scancode::Q => 0x4,
        Scancode::W => 0x5,
        Scancode::E => 0x6,
        Scancode::R => 0xD,
        Scancode::A => 0x7,
        Scancode::S => 0x8,
        Scancode::D => 0x9,
        Scancode::F => 0xE,
        Scancode::Z => 0xA,
        Scancode::X => 0x0,
        Scancode::C => 0xB,
        Scancode::V => 0xF,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_mapped_once() {
        let scancodes = [
            Scancode::Num1, Scancode::Num2, Scancode::Num3, Scancode::Num4,
            Scancode::Q, Scancode::W, Scancode::E, Scancode::R,
            Scancode::A, Scancode::S, Scancode::D, Scancode::F,
            Scancode::Z, Scancode::X, Scancode::C, Scancode::V,
        ];

        let mut keys: Vec<u8> = scancodes.iter().filter_map(|sc| keypad_key(*sc)).collect();
        keys.sort();

        assert_eq!(keys, (0..16).collect::<Vec<u8>>());
    }

    #[test]
    fn test_unmapped_key() {
        assert_eq!(keypad_key(Scancode::Space), None);
        assert_eq!(keypad_key(Scancode::Escape), None);
    }
}
