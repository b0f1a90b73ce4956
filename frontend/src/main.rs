//! Headless console runner. Boots the BIOS (plus an optional cartridge) and
//! drives frames at 60 Hz; the interactive debugger takes over on Ctrl+C,
//! breakpoints, or `--break`.

use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;

use vectron_core::core::engine::{AudioContext, EmuEvents, EngineClient, Input, RenderContext};
use vectron_core::sync::Standalone;
use vectron_machines::Console;

const FRAME_TIME: f64 = 1.0 / 60.0;

#[derive(Parser)]
#[command(name = "vectron", about = "Vector-display console emulator")]
struct Args {
    /// Cartridge ROM image
    cartridge: Option<PathBuf>,

    /// BIOS ROM image
    #[arg(long, default_value = "bios_rom.bin")]
    bios: PathBuf,

    /// RAM power-on seed; identical seeds give identical runs
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Break into the debugger before the first instruction
    #[arg(long = "break")]
    break_on_start: bool,

    /// Run frames back to back instead of pacing to 60 Hz
    #[arg(long)]
    no_throttle: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut console = Console::new();

    let bios = std::fs::read(&args.bios)
        .with_context(|| format!("loading BIOS from {}", args.bios.display()))?;
    console.load_bios(&bios)?;

    if let Some(path) = &args.cartridge {
        let rom = std::fs::read(path)
            .with_context(|| format!("loading cartridge from {}", path.display()))?;
        console.load_cartridge(&rom)?;
    }

    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    log::info!("ram seed {seed}");
    console.randomize_ram(seed);
    console.reset()?;

    if args.break_on_start {
        console.debugger_mut().break_into_debugger();
    }

    let input = Input::new();
    let events = EmuEvents::new();
    let mut render = RenderContext::default();
    let mut audio = AudioContext::default();
    let mut sync = Standalone;

    let mut frame: u64 = 0;
    loop {
        let frame_start = Instant::now();

        if !console.frame_update(FRAME_TIME, &input, &events, &mut render, &mut audio, &mut sync)? {
            break;
        }

        if !render.lines.is_empty() {
            log::debug!("frame {frame}: {} line segments", render.lines.len());
        }
        render.lines.clear();

        frame += 1;
        if let Some(max) = args.frames {
            if frame >= max {
                break;
            }
        }

        if !args.no_throttle {
            if let Some(remaining) =
                Duration::from_secs_f64(FRAME_TIME).checked_sub(frame_start.elapsed())
            {
                std::thread::sleep(remaining);
            }
        }
    }

    console.shutdown();
    Ok(())
}
