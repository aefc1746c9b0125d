// 16 8-bit data registers named V0 to VF
// I -> address register (12 bits)
//
// Delay timer & Sound timer: count down once per cycle (or at 60 Hz) until 0
// Sound timer is only surfaced as a flag, there is no audio output
//
// Display res: 64 width, 32 height
//
// 35 opcodes, each are 2 bytes (big-endian)
//      NNN: address
//      NN: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier

pub mod config;
pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod screen;
pub mod timer;

pub use decode::OpCodes;
pub use emulator::{CpuState, Emulator, Step};
pub use error::{EmulatorError, LoadError};
pub use keyboard::KeySource;
