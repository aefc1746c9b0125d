pub const TIMER_DEC_PER_SECOND: u32 = 60;

/// How the delay and sound timers are clocked.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TimerMode {
    /// Decrement once after every executed cycle.
    #[default]
    PerCycle,
    /// Leave the timers alone in `step`; the host ticks them at 60 Hz.
    Realtime,
}

#[derive(Debug, Default)]
pub struct Timer {
    pub count: u8,
}

impl Timer {
    pub fn new(init_count: u8) -> Self {
        Self { count: init_count }
    }

    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    /// Counts down by one, stopping at zero. Returns true if this tick reached zero.
    pub fn tick(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        self.count == 0
    }

    pub fn is_active(&self) -> bool {
        self.count > 0
    }
}
