use std::path::PathBuf;

use thiserror::Error;

use crate::memory::TypeAddr;

/// Failures while bringing a program into memory. These abort startup.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("rom is {size} bytes but only {max} fit above 0x200")]
    RomTooLarge { size: usize, max: usize },
    #[error("unable to read rom '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal runtime conditions. The cycle driver halts when it sees one.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmulatorError {
    #[error("call stack overflow at pc {pc:#05x}")]
    StackOverflow { pc: TypeAddr },
    #[error("return with empty call stack at pc {pc:#05x}")]
    StackUnderflow { pc: TypeAddr },
    #[error("program counter {pc:#05x} left addressable memory")]
    PcOutOfRange { pc: TypeAddr },
    #[error("memory access at {addr:#05x} is out of bounds")]
    MemoryOutOfBounds { addr: usize },
}
