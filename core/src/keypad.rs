/// Number of keys on the hex keypad (0x0-0xF).
pub const KEY_COUNT: usize = 16;

/// Level state of the 16 logical keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Keypad {
        Keypad::default()
    }

    pub fn press(&mut self, key: u8) {
        self.keys[(key & 0xF) as usize] = true;
    }

    pub fn release(&mut self, key: u8) {
        self.keys[(key & 0xF) as usize] = false;
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }
}

/// Key-wait gate engaged by `FX0A`.
///
/// While `Waiting`, no instruction is fetched. The next key press writes the
/// key code into `V[dest]` and returns the gate to `Running`; releases never
/// unblock it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyWait {
    #[default]
    Running,
    Waiting {
        dest: u8,
    },
}

impl KeyWait {
    pub fn is_waiting(&self) -> bool {
        matches!(self, KeyWait::Waiting { .. })
    }
}
