// Wall-clock pacing for the control loop.
//
// Timers and presentation run at a fixed 60 Hz. Instructions are executed
// in batches sized from the number of ticks that elapsed since the previous
// loop iteration.

use std::time::{Duration, Instant};

pub const TIMER_HZ: u32 = 60;
pub const DEFAULT_INSTRUCTIONS_PER_TICK: u32 = 10;

/// Length of one timer tick, also the idle delay of the control loop.
pub const FRAME: Duration = Duration::from_nanos(1_000_000_000 / TIMER_HZ as u64);

#[derive(Debug)]
pub struct Clock {
    /// Reference point for `poll`
    start: Instant,
    /// Ticks already handed out
    ticks_done: u64,
    /// Instructions executed per elapsed tick
    instructions_per_tick: u32,
}

impl Clock {
    pub fn new(instructions_per_tick: u32) -> Clock {
        assert!(instructions_per_tick > 0, "At least one instruction per tick is required");
        Clock {
            start: Instant::now(),
            ticks_done: 0,
            instructions_per_tick,
        }
    }

    /// Number of 60 Hz ticks that elapsed in real time since the last poll.
    pub fn poll(&mut self) -> u32 {
        self.advance(self.start.elapsed())
    }

    /// Number of ticks not yet reported, given the total time elapsed since
    /// the clock was started.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let total = elapsed.as_nanos() * TIMER_HZ as u128 / 1_000_000_000;
        let total = u64::try_from(total).unwrap_or(u64::MAX);

        let ticks = total.saturating_sub(self.ticks_done);
        self.ticks_done += ticks;
        u32::try_from(ticks).unwrap_or(u32::MAX)
    }

    /// Instruction budget for the next loop iteration. At least one tick's
    /// worth of instructions runs even if no tick elapsed.
    pub fn budget(&self, ticks: u32) -> usize {
        ticks.max(1) as usize * self.instructions_per_tick as usize
    }

    pub fn instructions_per_tick(&self) -> u32 {
        self.instructions_per_tick
    }
}

impl Default for Clock {
    fn default() -> Self {
        Clock::new(DEFAULT_INSTRUCTIONS_PER_TICK)
    }
}
