use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use chippy_core::{
    read_program, Chip8Builder, Chip8Color, DEFAULT_BACKGROUND_COLOR, DEFAULT_FOREGROUND_COLOR,
    DEFAULT_INSTRUCTIONS_PER_TICK,
};
use clap::Parser;

mod audio;
mod emulator;
mod input;
mod video;

/// CHIP-8 Emulator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Filepath to Chip-8 ROM file that will be executed
    #[clap(index = 1)]
    rom: PathBuf,

    /// Background Color as HEX 0xAABBFF [default: 0x000000]
    #[clap(long)]
    background: Option<Chip8Color>,

    /// Foreground Color as HEX 0xAABBFF [default: 0xFFFFFF]
    #[clap(long)]
    foreground: Option<Chip8Color>,

    /// Display scaling factor
    #[clap(short, long, default_value_t = 8)]
    scale: u32,

    /// Instructions executed per 60 Hz tick
    #[clap(short, long, default_value_t = DEFAULT_INSTRUCTIONS_PER_TICK)]
    ipf: u32,

    /// PRNG seed
    #[clap(long)]
    seed: Option<u64>,

    /// Disable the beep
    #[clap(long)]
    mute: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.scale == 0 || args.scale > 100 {
        bail!("Display scaling factor must be between [1-100]");
    }

    if args.ipf == 0 || args.ipf > 100_000 {
        bail!("Instructions per tick must be between [1-100000]");
    }

    let rom = read_program(&args.rom)?;

    let mut builder = Chip8Builder::new().with_rom(&rom);
    if let Some(seed) = args.seed {
        builder = builder.with_rng_seed(seed);
    }
    let mut chip = builder.build();

    let sdl_context = sdl2::init().map_err(|e| anyhow!(e)).context("Failed to initialize SDL2")?;
    let sdl_video = sdl_context.video().map_err(|e| anyhow!(e))?;

    let title = args
        .rom
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "chippy".to_string());

    let mut video = video::Video::new(
        &sdl_video,
        &title,
        args.scale,
        args.foreground.unwrap_or(DEFAULT_FOREGROUND_COLOR),
        args.background.unwrap_or(DEFAULT_BACKGROUND_COLOR),
    )?;

    let beeper = if args.mute {
        None
    } else {
        match sdl_context.audio().map_err(|e| anyhow!(e)).and_then(|a| audio::Beeper::new(&a)) {
            Ok(beeper) => Some(beeper),
            Err(e) => {
                log::warn!("Audio unavailable, running without sound: {e:#}");
                None
            }
        }
    };

    log::info!("Running {} at {} instructions per tick", args.rom.display(), args.ipf);
    emulator::run(&mut chip, &sdl_context, &mut video, beeper, args.ipf)
}
