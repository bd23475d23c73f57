use anyhow::{anyhow, Result};
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

const SAMPLE_RATE: i32 = 44_100;
const TONE_HZ: f32 = 440.0;
const VOLUME: f32 = 0.25;
const BEEP_MS: u32 = 120;

/// Square wave that plays for `remaining` samples, then outputs silence.
pub struct SquareWave {
    phase_inc: f32,
    phase: f32,
    remaining: u32,
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            if self.remaining == 0 {
                *sample = 0.0;
                continue;
            }

            *sample = if self.phase < 0.5 { VOLUME } else { -VOLUME };
            self.phase = (self.phase + self.phase_inc) % 1.0;
            self.remaining -= 1;
        }
    }
}

/// Audio sink for the beep edge of the sound timer.
pub struct Beeper {
    device: AudioDevice<SquareWave>,
    beep_samples: u32,
}

impl Beeper {
    pub fn new(sdl_audio: &sdl2::AudioSubsystem) -> Result<Self> {
        let desired_spec = AudioSpecDesired {
            freq: Some(SAMPLE_RATE),
            channels: Some(1),
            samples: None,
        };

        let mut beep_samples = 0;
        let device = sdl_audio
            .open_playback(None, &desired_spec, |spec| {
                beep_samples = spec.freq as u32 * BEEP_MS / 1000;
                SquareWave {
                    phase_inc: TONE_HZ / spec.freq as f32,
                    phase: 0.0,
                    remaining: 0,
                }
            })
            .map_err(|e| anyhow!("Failed to open audio device: {e}"))?;

        device.resume();

        Ok(Self { device, beep_samples })
    }

    pub fn beep(&mut self) {
        self.device.lock().remaining = self.beep_samples;
    }
}
