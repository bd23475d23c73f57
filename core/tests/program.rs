use std::io::Write;

use chippy_core::{read_program, Chip8, Chip8Builder, Clock, PROGRAM_START};

fn boot(rom: &[u8]) -> Chip8 {
    Chip8Builder::new().with_rom(rom).with_rng_seed(7).build()
}

#[test]
fn test_clear_and_spin_forever() {
    // 0x200: clear screen, 0x202: jump to 0x200
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[0x00, 0xE0, 0x12, 0x00]).unwrap();
    let rom = read_program(file.path()).unwrap();
    let mut chip = boot(&rom);

    let clock = Clock::default();
    for ticks in 0..500 {
        chip.run(clock.budget(ticks % 4));
        chip.tick_timers(ticks % 4);

        assert!(chip.pc() == PROGRAM_START || chip.pc() == PROGRAM_START + 2);
    }

    assert_eq!(chip.regs(), &[0u8; 16]);
    assert_eq!(chip.sp(), 0);
    assert!(chip.stack().iter().all(|addr| *addr == 0));
    assert_eq!(chip.index(), 0);
    assert!(chip.display().bytes().iter().all(|b| *b == 0));
}

#[test]
fn test_countdown_with_delay_timer() {
    // V0 = 3; DT = V0; loop: V1 = DT; if V1 != 0 jump loop; V2 = 0xAA; spin
    let rom = [
        0x60, 0x03, // 0x200
        0xF0, 0x15, // 0x202
        0xF1, 0x07, // 0x204
        0x31, 0x00, // 0x206
        0x12, 0x04, // 0x208
        0x62, 0xAA, // 0x20A
        0x12, 0x0C, // 0x20C
    ];
    let mut chip = boot(&rom);

    chip.run(50);
    assert_eq!(chip.regs()[0x2], 0, "Loop must not exit before the timer expires");

    for _ in 0..3 {
        chip.tick_timers(1);
        chip.run(50);
    }

    assert_eq!(chip.delay_timer(), 0);
    assert_eq!(chip.regs()[0x2], 0xAA);
    assert_eq!(chip.pc(), 0x20C);
}

#[test]
fn test_key_wait_blocks_program() {
    // V0 = key; draw glyph for V0 at (0, 0); spin
    let rom = [
        0xF0, 0x0A, // 0x200
        0xF0, 0x29, // 0x202
        0xD1, 0x15, // 0x204
        0x12, 0x06, // 0x206
    ];
    let mut chip = boot(&rom);

    for _ in 0..10 {
        chip.run(10);
        chip.tick_timers(1);
        chip.key_up(0x7);
    }
    assert!(chip.is_waiting_for_key());
    assert_eq!(chip.pc(), 0x202);

    chip.key_down(0x7);
    chip.run(10);

    assert_eq!(chip.regs()[0x0], 0x7);
    assert_eq!(chip.index(), 0x7 * 5);
    // Glyph "7" starts with a full 4 pixel row
    assert!((0..4).all(|x| chip.display().pixel(x, 0)));
    assert!(!chip.display().pixel(4, 0));
}
