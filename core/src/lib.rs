//! CHIP-8 virtual machine core: machine state, instruction execution,
//! framebuffer, 60 Hz timer pacing and key input. Windowing, audio and
//! event polling live in the frontend.

mod chip8;
mod clock;
mod color;
mod display;
mod error;
mod keypad;
mod rom;

pub use chip8::{Chip8, Chip8Builder, DEFAULT_FONT, MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_START, STACK_SIZE};
pub use clock::{Clock, DEFAULT_INSTRUCTIONS_PER_TICK, FRAME, TIMER_HZ};
pub use color::{ColorParseError, Chip8Color, DEFAULT_BACKGROUND_COLOR, DEFAULT_FOREGROUND_COLOR};
pub use display::{Display, DISPLAY_BYTES, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use error::Chip8Error;
pub use keypad::{KeyWait, Keypad, KEY_COUNT};
pub use rom::read_program;
