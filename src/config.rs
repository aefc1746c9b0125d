use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::timer::{TimerMode, TIMER_DEC_PER_SECOND};

/// One instruction per 60 Hz frame, like the interpreter this is modelled on.
pub const DEFAULT_CYCLES_PER_SECOND: u32 = 60;
pub const FRAME_RATE: u32 = TIMER_DEC_PER_SECOND;

/// Window pixels per CHIP-8 pixel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WindowScale {
    #[value(name = "1")]
    X1,
    #[value(name = "2")]
    X2,
    #[value(name = "4")]
    X4,
    #[default]
    #[value(name = "8")]
    X8,
    #[value(name = "16")]
    X16,
    #[value(name = "32")]
    X32,
}

/// CHIP-8 interpreter
///
/// Keypad is mapped to the left four columns of the keyboard (1234 / QWER /
/// ASDF / ZXCV). Escape quits.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Program image to run
    pub rom: PathBuf,

    /// Instructions executed per second
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_CYCLES_PER_SECOND,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub cycles_per_second: u32,

    /// Clock the delay and sound timers from instructions or from wall time
    #[arg(short, long, value_enum, default_value_t = TimerMode::PerCycle)]
    pub timer_mode: TimerMode,

    /// Window scale factor
    #[arg(short, long, value_enum, default_value_t = WindowScale::X8)]
    pub scale: WindowScale,
}

impl Config {
    /// Instructions to run between two 60 Hz frames, rounded, at least one.
    pub fn cycles_per_frame(&self) -> u32 {
        ((self.cycles_per_second + FRAME_RATE / 2) / FRAME_RATE).max(1)
    }
}
