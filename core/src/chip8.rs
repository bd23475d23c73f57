// CHIP-8 virtual machine
//
// Useful links:
// * [Cowgod's Chip-8 Technical Reference](http://devernay.free.fr/hacks/chip8/C8TECH10.HTM)
// * [Guide to making a CHIP-8 emulator](https://tobiasvl.github.io/blog/write-a-chip-8-emulator/)
//
// Memory map:
// * 0x000..0x050 built-in hex font, glyph `d` at `5 * d`
// * 0x200..0x1000 program image
//
// Addresses are 12 bits wide. The index register and program counter are
// 16-bit and may hold larger values; they are masked to 12 bits whenever
// memory is dereferenced.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::display::Display;
use crate::keypad::{KeyWait, Keypad};

pub const MEMORY_SIZE: usize = 0x1000;
pub const PROGRAM_START: u16 = 0x200;
pub const STACK_SIZE: u8 = 12;

/// Largest program image that fits between `PROGRAM_START` and the end of memory.
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

const ADDR_MASK: u16 = 0x0FFF;
const FONT_GLYPH_SIZE: u16 = 5;

pub static DEFAULT_FONT: [u8; 80] = [
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

#[derive(Debug, Default)]
pub struct Chip8Builder {
    /// Program image
    rom: Vec<u8>,
    /// PRNG Seed
    rng_seed: Option<u64>,
}

pub struct Chip8 {
    /// General purpose registers, VF doubles as carry/borrow/collision output
    regs: [u8; 16],
    /// Index register
    index: u16,
    /// Program counter
    pc: u16,
    /// Call stack, used as a ring
    stack: [u16; STACK_SIZE as usize],
    /// Stack pointer, always in `0..STACK_SIZE`
    sp: u8,
    /// Delay Timer
    delay_timer: u8,
    /// Sound Timer
    sound_timer: u8,
    /// Key levels
    keypad: Keypad,
    /// FX0A gate
    key_wait: KeyWait,
    /// Memory
    memory: Vec<u8>,
    /// Display: 64x32 pixels 1 bit monochrome
    display: Display,
    /// PRNG Generator
    rng: StdRng,
}

impl Chip8Builder {
    pub fn new() -> Chip8Builder {
        Chip8Builder::default()
    }

    pub fn with_rom(mut self, rom: &[u8]) -> Self {
        self.rom = rom.to_vec();
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn build(&self) -> Chip8 {
        // Create memory
        let mut memory = vec![0u8; MEMORY_SIZE];

        // Copy font to memory
        memory[..DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT[..]);

        // Copy rom to memory, whatever does not fit is dropped
        let rom = if self.rom.len() > MAX_PROGRAM_SIZE {
            log::warn!(
                "Program image is {} bytes, only the first {} bytes fit in memory",
                self.rom.len(),
                MAX_PROGRAM_SIZE
            );
            &self.rom[..MAX_PROGRAM_SIZE]
        } else {
            &self.rom[..]
        };
        let start = PROGRAM_START as usize;
        memory[start..start + rom.len()].copy_from_slice(rom);

        // Pseudo random number generator
        let rng = match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Chip8 {
            regs: [0u8; 16],
            index: 0,
            pc: PROGRAM_START,
            stack: [0u16; STACK_SIZE as usize],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            keypad: Keypad::new(),
            key_wait: KeyWait::Running,
            memory,
            display: Display::new(),
            rng,
        }
    }
}

impl Chip8 {
    pub fn display(&self) -> &Display {
        &self.display
    }

    /// Whether the display changed since the last call.
    pub fn take_display_dirty(&mut self) -> bool {
        self.display.take_dirty()
    }

    pub fn regs(&self) -> &[u8; 16] {
        &self.regs
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn sp(&self) -> u8 {
        self.sp
    }

    pub fn stack(&self) -> &[u16] {
        &self.stack[..]
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory[..]
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.key_wait.is_waiting()
    }

    /// Execute up to `budget` instructions. Stops early when an instruction
    /// engages the key-wait gate. Returns the number of instructions executed.
    pub fn run(&mut self, budget: usize) -> usize {
        let mut executed = 0;
        while executed < budget && !self.is_waiting_for_key() {
            self.step();
            executed += 1;
        }
        executed
    }

    /// Fetch, decode and execute one instruction. Does nothing while waiting for a key.
    pub fn step(&mut self) {
        if self.is_waiting_for_key() {
            return;
        }

        // Instruction
        let addr = self.pc;
        let inst = [self.read_u8(addr), self.read_u8(addr.wrapping_add(1))];
        self.pc = self.pc.wrapping_add(2);

        // Instruction split into nibbles(4bits) 1-4
        let n1 = (0xf0 & inst[0]) >> 4;
        let n2 = 0x0f & inst[0];
        let n3 = (0xf0 & inst[1]) >> 4;
        let n4 = 0x0f & inst[1];

        let x = n2 as usize;
        let y = n3 as usize;
        let kk = inst[1];
        let nnn = u16::from_be_bytes(inst) & ADDR_MASK;

        match (n1, n2, n3, n4) {
            // 00E0: Clear screen
            (0x0, 0x0, 0xe, 0x0) => {
                self.display.clear();
            }
            // 00EE: Return from subroutine
            (0x0, 0x0, 0xe, 0xe) => {
                self.pc = self.stack[self.sp as usize];
                self.sp = (self.sp + STACK_SIZE - 1) % STACK_SIZE;
            }
            // 1NNN: Jump to memory location NNN
            (0x1, _, _, _) => {
                self.pc = nnn;
            }
            // 2NNN: Call subroutine at memory location NNN
            (0x2, _, _, _) => {
                self.sp = (self.sp + 1) % STACK_SIZE;
                self.stack[self.sp as usize] = self.pc;
                self.pc = nnn;
            }
            // 3XNN: Skip next instruction if VX == NN
            (0x3, _, _, _) => {
                if self.regs[x] == kk {
                    self.skip();
                }
            }
            // 4XNN: Skip next instruction if VX != NN
            (0x4, _, _, _) => {
                if self.regs[x] != kk {
                    self.skip();
                }
            }
            // 5XY_: Skip next instruction if VX == VY
            (0x5, _, _, _) => {
                if self.regs[x] == self.regs[y] {
                    self.skip();
                }
            }
            // 6XNN: Set register VX to the value NN.
            (0x6, _, _, _) => {
                self.regs[x] = kk;
            }
            // 7XNN: Add the value NN to VX, VF is untouched.
            (0x7, _, _, _) => {
                self.regs[x] = self.regs[x].wrapping_add(kk);
            }
            // 8XY0: Set register VX to the value of VY.
            (0x8, _, _, 0x0) => {
                self.regs[x] = self.regs[y];
            }
            // 8XY1: Binary OR register VX and register VY and store result in VX
            (0x8, _, _, 0x1) => {
                self.regs[x] |= self.regs[y];
            }
            // 8XY2: Binary AND register VX and register VY and store result in VX
            (0x8, _, _, 0x2) => {
                self.regs[x] &= self.regs[y];
            }
            // 8XY3: Binary XOR register VX and register VY and store result in VX
            (0x8, _, _, 0x3) => {
                self.regs[x] ^= self.regs[y];
            }
            // 8XY4: Add register VY to VX, VF = carry
            (0x8, _, _, 0x4) => {
                let (res, carry) = self.regs[x].overflowing_add(self.regs[y]);
                self.set_with_flag(x, res, carry);
            }
            // 8XY5: VX = VX - VY, VF = NOT borrow
            (0x8, _, _, 0x5) => {
                let (res, borrow) = self.regs[x].overflowing_sub(self.regs[y]);
                self.set_with_flag(x, res, !borrow);
            }
            // 8XY6: VX = VY >> 1, VF = bit shifted out
            (0x8, _, _, 0x6) => {
                let vy = self.regs[y];
                self.set_with_flag(x, vy >> 1, vy & 0x01 != 0);
            }
            // 8XY7: VX = VY - VX, VF = NOT borrow
            (0x8, _, _, 0x7) => {
                let (res, borrow) = self.regs[y].overflowing_sub(self.regs[x]);
                self.set_with_flag(x, res, !borrow);
            }
            // 8XYE: VX = VY << 1, VF = bit shifted out
            (0x8, _, _, 0xe) => {
                let vy = self.regs[y];
                self.set_with_flag(x, vy << 1, vy & 0x80 != 0);
            }
            // 9XY_: Skip next instruction if VX != VY
            (0x9, _, _, _) => {
                if self.regs[x] != self.regs[y] {
                    self.skip();
                }
            }
            // ANNN: Set index register I to the value NNN
            (0xa, _, _, _) => {
                self.index = nnn;
            }
            // BNNN: Jump to address NNN plus V0
            (0xb, _, _, _) => {
                self.pc = nnn + self.regs[0] as u16;
            }
            // CXNN: VX = random byte AND NN
            (0xc, _, _, _) => {
                self.regs[x] = self.random_byte() & kk;
            }
            // DXYN: Draw an N rows tall sprite from memory at I to the screen at (VX, VY),
            // VF = 1 if any pixel was turned off
            (0xd, _, _, _) => {
                let rows: Vec<u8> = (0..n4 as u16)
                    .map(|row| self.read_u8(self.index.wrapping_add(row)))
                    .collect();
                let collision = self.display.draw_sprite(self.regs[x], self.regs[y], &rows);
                self.regs[0xF] = collision as u8;
            }
            // EX9E: Skip next instruction if key VX is pressed
            (0xe, _, 0x9, 0xe) => {
                if self.keypad.is_pressed(self.regs[x]) {
                    self.skip();
                }
            }
            // EXA1: Skip next instruction if key VX is not pressed
            (0xe, _, 0xa, 0x1) => {
                if !self.keypad.is_pressed(self.regs[x]) {
                    self.skip();
                }
            }
            // FX07: VX = delay timer
            (0xf, _, 0x0, 0x7) => {
                self.regs[x] = self.delay_timer;
            }
            // FX0A: Block until a key is pressed, then store it in VX
            (0xf, _, 0x0, 0xa) => {
                log::debug!("Waiting for key press into V{:X}", x);
                self.key_wait = KeyWait::Waiting { dest: n2 };
            }
            // FX15: delay timer = VX
            (0xf, _, 0x1, 0x5) => {
                self.delay_timer = self.regs[x];
            }
            // FX18: sound timer = VX
            (0xf, _, 0x1, 0x8) => {
                self.sound_timer = self.regs[x];
            }
            // FX1E: I = I + VX, VF = 1 if the result leaves the 12-bit address space
            (0xf, _, 0x1, 0xe) => {
                let sum = self.index as u32 + self.regs[x] as u32;
                self.index = self.index.wrapping_add(self.regs[x] as u16);
                self.regs[0xF] = (sum > ADDR_MASK as u32) as u8;
            }
            // FX29: Point I at the font glyph for the low nibble of VX
            (0xf, _, 0x2, 0x9) => {
                self.index = (self.regs[x] & 0x0f) as u16 * FONT_GLYPH_SIZE;
            }
            // FX33: Store the decimal digits of VX at I, I+1 and I+2
            (0xf, _, 0x3, 0x3) => {
                let vx = self.regs[x];
                self.write_u8(self.index, vx / 100);
                self.write_u8(self.index.wrapping_add(1), (vx / 10) % 10);
                self.write_u8(self.index.wrapping_add(2), vx % 10);
            }
            // FX55: Store V0..=VX at I, incrementing I once per register
            (0xf, _, 0x5, 0x5) => {
                for reg in 0..=x {
                    self.write_u8(self.index, self.regs[reg]);
                    self.index = self.index.wrapping_add(1);
                }
            }
            // FX65: Load V0..=VX from I, incrementing I once per register
            (0xf, _, 0x6, 0x5) => {
                for reg in 0..=x {
                    self.regs[reg] = self.read_u8(self.index);
                    self.index = self.index.wrapping_add(1);
                }
            }
            _ => log::warn!(
                "Ignoring unknown instruction 0x{:02x}{:02x} at 0x{:03x}",
                inst[0],
                inst[1],
                addr & ADDR_MASK
            ),
        }
    }

    /// Advance both timers by `ticks` 60 Hz ticks, stopping at zero.
    /// Returns true when the sound timer reached zero from a positive value.
    pub fn tick_timers(&mut self, ticks: u32) -> bool {
        let ticks = ticks.min(u8::MAX as u32) as u8;

        self.delay_timer = self.delay_timer.saturating_sub(ticks);

        if self.sound_timer > 0 && ticks > 0 {
            self.sound_timer = self.sound_timer.saturating_sub(ticks);
            return self.sound_timer == 0;
        }

        false
    }

    /// Key press from the input source. Also satisfies a pending FX0A.
    pub fn key_down(&mut self, key: u8) {
        let key = key & 0x0f;
        self.keypad.press(key);

        if let KeyWait::Waiting { dest } = self.key_wait {
            log::debug!("Key {:X} released the key-wait gate into V{:X}", key, dest);
            self.regs[dest as usize] = key;
            self.key_wait = KeyWait::Running;
        }
    }

    /// Key release from the input source.
    pub fn key_up(&mut self, key: u8) {
        self.keypad.release(key);
    }

    fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    // Result is written before the flag, so VF holds the flag when X is F.
    fn set_with_flag(&mut self, x: usize, value: u8, flag: bool) {
        self.regs[x] = value;
        self.regs[0xF] = flag as u8;
    }

    // Uniform over 0..=255; `gen_range` rejection-samples, so there is no modulo bias.
    fn random_byte(&mut self) -> u8 {
        self.rng.gen_range(0..=u8::MAX)
    }

    fn read_u8(&self, addr: u16) -> u8 {
        self.memory[(addr & ADDR_MASK) as usize]
    }

    fn write_u8(&mut self, addr: u16, data: u8) {
        self.memory[(addr & ADDR_MASK) as usize] = data;
    }
}
