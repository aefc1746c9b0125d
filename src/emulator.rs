use std::path::Path;

use log::{debug, error, info, trace, warn};
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

use crate::{
    decode::OpCodes,
    display::FrameBuffer,
    error::{EmulatorError, LoadError},
    keyboard::{KeySource, Keyboard},
    memory::{Memory, TypeAddr, FONT_BASE, FONT_SPRITE_LEN, MEMORY_SIZE},
    registers::{IndexRegister, ProgramCounter, Registers, Stack},
    timer::{Timer, TimerMode},
};

/// Where the cycle driver is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuState {
    Running,
    /// Suspended by `FX0A` until exactly one key is down; the key lands in this register.
    WaitingForKey(u8),
    /// Terminal.
    Halted,
}

/// What a single call to [`Emulator::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Executed(OpCodes),
    /// An unrecognised word was skipped over.
    Unknown(u16),
    Waiting,
    KeyReceived(u8),
    Halted,
}

/// How an instruction moves the program counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Next,
    Skip,
    Jump(TypeAddr),
}

impl Flow {
    fn skip_if(cond: bool) -> Self {
        if cond {
            Self::Skip
        } else {
            Self::Next
        }
    }
}

pub struct Emulator {
    pub regs: Registers,
    pub mem: Memory,
    pub pc: ProgramCounter,
    pub index: IndexRegister,
    pub stack: Stack,
    pub fb: FrameBuffer,
    pub keyboard: Keyboard,
    pub delay_timer: Timer,
    pub sound_timer: Timer,
    state: CpuState,
    timer_mode: TimerMode,
    rng: Box<dyn RngCore>,
    redraw: bool,
}

impl Emulator {
    pub fn init() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Build a machine whose `CXNN` draws from `rng`.
    pub fn with_rng(rng: impl RngCore + 'static) -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::new(),
            pc: ProgramCounter::default(),
            index: IndexRegister::default(),
            stack: Stack::new(),
            fb: FrameBuffer::new(),
            keyboard: Keyboard::new(),
            delay_timer: Timer::default(),
            sound_timer: Timer::default(),
            state: CpuState::Running,
            timer_mode: TimerMode::default(),
            rng: Box::new(rng),
            redraw: true,
        }
    }

    pub fn set_timer_mode(&mut self, mode: TimerMode) {
        self.timer_mode = mode;
    }

    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        self.mem.load_rom(rom)
    }

    pub fn load_rom_file(&mut self, path: &Path) -> Result<(), LoadError> {
        self.mem.load_rom_by_file(path)
    }

    pub fn state(&self) -> CpuState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state != CpuState::Halted
    }

    /// True while the sound timer is counting down.
    pub fn sound_active(&self) -> bool {
        self.sound_timer.is_active()
    }

    /// The framebuffer, if it changed since the last call.
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.redraw {
            self.redraw = false;
            Some(&self.fb)
        } else {
            None
        }
    }

    pub fn fetch_decode(&self) -> Result<OpCodes, EmulatorError> {
        let ins = self.mem.read_word(self.pc.0)?;
        Ok(OpCodes::decode_raw(ins))
    }

    /// Run one cycle: refresh the keypad from `keys`, then fetch, decode and
    /// execute one instruction (or keep waiting for a key).
    ///
    /// A fatal error halts the machine and is returned once; after that every
    /// call reports [`Step::Halted`].
    pub fn step(&mut self, keys: &impl KeySource) -> Result<Step, EmulatorError> {
        if self.state == CpuState::Halted {
            return Ok(Step::Halted);
        }
        self.keyboard.refresh(keys);
        self.cycle().map_err(|err| {
            error!("Halting [pc: {:#05x}]: {}", self.pc.0, err);
            self.state = CpuState::Halted;
            err
        })
    }

    fn cycle(&mut self) -> Result<Step, EmulatorError> {
        if let CpuState::WaitingForKey(vx) = self.state {
            let step = match self.keyboard.single_pressed() {
                Some(key) => {
                    debug!("Key received [key: {:X}, register: V{:X}]", key, vx);
                    self.regs.set_register(vx, key);
                    self.state = CpuState::Running;
                    Step::KeyReceived(key)
                }
                None => Step::Waiting,
            };
            self.cycle_timers();
            return Ok(step);
        }

        let pc = self.pc.0;
        if pc as usize + 1 >= MEMORY_SIZE {
            return Err(EmulatorError::PcOutOfRange { pc });
        }
        let ins = self.fetch_decode()?;
        trace!("{:03x}: {}", pc, ins);

        match self.execute_ins(ins)? {
            Flow::Next => self.pc.increment(),
            Flow::Skip => self.pc.skip(),
            Flow::Jump(addr) => self.pc.set_addr(addr),
        }
        self.cycle_timers();

        Ok(match ins {
            OpCodes::Unknown(code) => Step::Unknown(code),
            op => Step::Executed(op),
        })
    }

    pub fn execute_ins(&mut self, ins: OpCodes) -> Result<Flow, EmulatorError> {
        match ins {
            OpCodes::Sys(addr) => {
                debug!("Ignoring machine code call [addr: {:#05x}]", addr);
            }
            OpCodes::Jump(addr) => return Ok(Flow::Jump(addr)),
            OpCodes::SetRegister(vx, nn) => {
                self.regs.set_register(vx, nn);
            }
            OpCodes::AddToRegister(vx, nn) => {
                self.regs.add_to_register(vx, nn);
            }
            OpCodes::SetIndexRegister(addr) => self.index.set_addr(addr),
            OpCodes::ClearScreen => {
                self.fb.clear_buffer();
                self.redraw = true;
            }
            OpCodes::Display(reg_x, reg_y, height) => {
                let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
                // From I to I + N, one byte per row
                let sprite = self.mem.slice(self.index.addr(), height as usize)?;
                let vf = self.fb.paint(x, y, sprite);
                self.regs.set_flag(vf);
                self.redraw = true;
            }
            OpCodes::PushSubroutine(addr) => {
                // return to the instruction after this one
                self.stack.push(self.pc.next(), self.pc.0)?;
                return Ok(Flow::Jump(addr));
            }
            OpCodes::PopSubroutine => {
                let addr = self.stack.pop(self.pc.0)?;
                return Ok(Flow::Jump(addr));
            }
            OpCodes::CopyRegister(vx, vy) => {
                self.regs.set_register(vx, self.regs.get(vy));
            }
            OpCodes::Or(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) | self.regs.get(vy));
            }
            OpCodes::And(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) & self.regs.get(vy));
            }
            OpCodes::XOr(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) ^ self.regs.get(vy));
            }
            // flag is written last so it wins when x is F
            OpCodes::Add(vx, vy) => {
                let (sum, carry) = self.regs.get(vx).overflowing_add(self.regs.get(vy));
                self.regs.set_register(vx, sum);
                self.regs.set_flag(carry);
            }
            OpCodes::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_register(vx, x.wrapping_sub(y));
                self.regs.set_flag(x > y);
            }
            OpCodes::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_register(vx, y.wrapping_sub(x));
                self.regs.set_flag(y > x);
            }
            OpCodes::LeftShift(vx, _) => {
                let vx_value = self.regs.get(vx);
                self.regs.set_register(vx, vx_value << 1);
                self.regs.set_flag(vx_value & 0x80 != 0);
            }
            OpCodes::RightShift(vx, _) => {
                let vx_value = self.regs.get(vx);
                self.regs.set_register(vx, vx_value >> 1);
                self.regs.set_flag(vx_value & 0x01 != 0);
            }
            OpCodes::Random(vx, nn) => {
                let ransuu: u8 = self.rng.gen();
                self.regs.set_register(vx, nn & ransuu);
            }
            OpCodes::JumpWithOffset(addr) => {
                return Ok(Flow::Jump(addr + self.regs.get(0) as TypeAddr));
            }
            OpCodes::AddToIndex(vx) => {
                self.index.offset(self.regs.get(vx));
            }
            OpCodes::SkipEqualConstant(vx, nn) => {
                return Ok(Flow::skip_if(self.regs.get(vx) == nn));
            }
            OpCodes::SkipNotEqualConstant(vx, nn) => {
                return Ok(Flow::skip_if(self.regs.get(vx) != nn));
            }
            OpCodes::SkipEqualRegister(vx, vy) => {
                return Ok(Flow::skip_if(self.regs.get(vx) == self.regs.get(vy)));
            }
            OpCodes::SkipNotEqualRegister(vx, vy) => {
                return Ok(Flow::skip_if(self.regs.get(vx) != self.regs.get(vy)));
            }
            OpCodes::PointChar(vx) => {
                let digit = (self.regs.get(vx) & 0xF) as TypeAddr;
                self.index.set_addr(FONT_BASE + digit * FONT_SPRITE_LEN);
            }
            OpCodes::ToDecimal(vx) => {
                let value = self.regs.get(vx);
                let digits = [value / 100, value / 10 % 10, value % 10];
                self.mem
                    .slice_mut(self.index.addr(), digits.len())?
                    .copy_from_slice(&digits);
            }
            OpCodes::SkipIfPressed(vx) => {
                let pressed = self.keyboard.get_key_status_from_num(self.regs.get(vx));
                return Ok(Flow::skip_if(pressed));
            }
            OpCodes::SkipIfNotPressed(vx) => {
                let pressed = self.keyboard.get_key_status_from_num(self.regs.get(vx));
                return Ok(Flow::skip_if(!pressed));
            }
            OpCodes::CopyDelayToRegister(vx) => self.regs.set_register(vx, self.delay_timer.count),
            OpCodes::CopyRegisterToDelay(vx) => self.delay_timer.set(self.regs.get(vx)),
            OpCodes::CopyRegisterToSound(vx) => self.sound_timer.set(self.regs.get(vx)),
            OpCodes::GetKey(vx) => {
                debug!("Waiting for key [register: V{:X}]", vx);
                self.state = CpuState::WaitingForKey(vx);
            }
            OpCodes::LoadRegisterFromMemory(vx) => {
                let len = vx as usize + 1;
                let bytes = self.mem.slice(self.index.addr(), len)?;
                self.regs.range_mut(vx).copy_from_slice(bytes);
            }
            OpCodes::StoreRegisterToMemory(vx) => {
                let len = vx as usize + 1;
                self.mem
                    .slice_mut(self.index.addr(), len)?
                    .copy_from_slice(self.regs.range(vx));
            }
            OpCodes::Unknown(code) => {
                warn!("Unknown opcode [{:#06x}] at {:#05x}", code, self.pc.0);
            }
        }
        Ok(Flow::Next)
    }

    fn cycle_timers(&mut self) {
        if self.timer_mode == TimerMode::PerCycle {
            self.tick_timers();
        }
    }

    /// Count both timers down once. Called by the driver in per-cycle mode,
    /// or by the host at 60 Hz in realtime mode.
    pub fn tick_timers(&mut self) {
        self.delay_timer.tick();
        if self.sound_timer.tick() {
            debug!("Sound timer expired");
        }
    }

    /// Step until `cycles` have run or the machine halts.
    pub fn run(&mut self, cycles: u32, keys: &impl KeySource) -> Result<(), EmulatorError> {
        for _ in 0..cycles {
            if self.step(keys)? == Step::Halted {
                info!("Machine halted");
                break;
            }
        }
        Ok(())
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::init()
    }
}
