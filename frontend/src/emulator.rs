use anyhow::{anyhow, Result};
use chippy_core::{Chip8, Clock, FRAME};
use sdl2::event::Event;
use sdl2::keyboard::Scancode;

use crate::audio::Beeper;
use crate::input::keypad_key;
use crate::video::Video;

/// Owning control loop. Each iteration runs the instruction budget, drains
/// input, then advances timers and presents once per elapsed 60 Hz tick.
pub fn run(
    chip: &mut Chip8,
    sdl_context: &sdl2::Sdl,
    video: &mut Video,
    mut beeper: Option<Beeper>,
    instructions_per_tick: u32,
) -> Result<()> {
    let mut event_pump = sdl_context.event_pump().map_err(|e| anyhow!(e))?;

    let texture_creator = video.texture_creator();
    let mut texture = video.create_texture(&texture_creator)?;

    let mut clock = Clock::new(instructions_per_tick);
    let mut budget = 0;

    'running: loop {
        chip.run(budget);

        // Process events
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => break 'running,

                Event::KeyDown {
                    scancode: Some(sc),
                    repeat: false,
                    ..
                } => {
                    if let Some(key) = keypad_key(sc) {
                        chip.key_down(key);
                    }
                }

                Event::KeyUp {
                    scancode: Some(sc), ..
                } => {
                    if let Some(key) = keypad_key(sc) {
                        chip.key_up(key);
                    }
                }

                _ => {}
            }
        }

        let ticks = clock.poll();
        if ticks > 0 {
            if chip.tick_timers(ticks) {
                log::info!("BEEP!");
                if let Some(beeper) = beeper.as_mut() {
                    beeper.beep();
                }
            }

            let dirty = chip.take_display_dirty();
            video.present(&mut texture, chip.display(), dirty)?;
        }

        budget = clock.budget(ticks);

        if chip.is_waiting_for_key() || ticks == 0 {
            std::thread::sleep(FRAME);
        }
    }

    log::info!("Quit requested");
    Ok(())
}
