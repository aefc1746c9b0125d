use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use emuchip::{
    config::Config, screen::Screen, timer::TimerMode, Emulator, EmulatorError,
};

// Separately:
// CPU: --cycles-per-second, run in batches once per frame
// Display: 60 times per second
// Timer: every cycle, or 60 times per second with --timer-mode realtime

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("emuchip=info"))
        .init();

    let config = Config::parse();

    let mut emu = Emulator::init();
    emu.set_timer_mode(config.timer_mode);
    emu.load_rom_file(&config.rom)
        .with_context(|| format!("failed to load {}", config.rom.display()))?;

    let mut screen = Screen::new(config.scale).context("failed to open window")?;
    let cycles = config.cycles_per_frame();
    info!(
        "Running [cycles/frame: {}, timers: {:?}]",
        cycles, config.timer_mode
    );

    while screen.is_open() && emu.is_running() {
        match emu.run(cycles, &screen) {
            Ok(()) => {}
            Err(EmulatorError::PcOutOfRange { .. }) => {
                info!("Program ran off the end of memory");
                break;
            }
            Err(err) => return Err(err).context("emulation stopped"),
        }
        if config.timer_mode == TimerMode::Realtime {
            emu.tick_timers();
        }
        screen.set_beeping(emu.sound_active());

        if let Some(frame) = emu.take_frame() {
            screen.render(frame)?;
        } else {
            screen.update();
        }
    }
    Ok(())
}
