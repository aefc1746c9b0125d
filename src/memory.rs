use std::{fs, path::Path};

use log::info;

use crate::error::{EmulatorError, LoadError};

pub type TypeAddr = u16; // in reality u12
type FontBytes = [u8; 5 * 16];

pub const MEMORY_SIZE: usize = 4096;
pub const ADDRESS_MASK: TypeAddr = 0x0FFF;
pub const PROGRAM_START: TypeAddr = 0x200;
pub const FONT_BASE: TypeAddr = 0x000;
pub const FONT_SPRITE_LEN: TypeAddr = 5;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Flat 4K address space.
///
/// ```text
/// 0x000 - 0x04F  hex digit sprites, 5 bytes each
/// 0x050 - 0x1FF  reserved for the interpreter
/// 0x200 - 0xFFF  program image and working memory
/// ```
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let start = FONT_BASE as usize;
        bytes[start..start + DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);
        Self { bytes }
    }

    pub fn get(&self, addr: usize) -> Result<u8, EmulatorError> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(EmulatorError::MemoryOutOfBounds { addr })
    }

    pub fn set(&mut self, addr: usize, val: u8) -> Result<(), EmulatorError> {
        let cell = self
            .bytes
            .get_mut(addr)
            .ok_or(EmulatorError::MemoryOutOfBounds { addr })?;
        *cell = val;
        Ok(())
    }

    /// Borrow `len` bytes starting at `addr`, failing if any of them fall off the end.
    pub fn slice(&self, addr: usize, len: usize) -> Result<&[u8], EmulatorError> {
        self.bytes
            .get(addr..addr + len)
            .ok_or(EmulatorError::MemoryOutOfBounds {
                addr: (addr + len).saturating_sub(1),
            })
    }

    pub fn slice_mut(&mut self, addr: usize, len: usize) -> Result<&mut [u8], EmulatorError> {
        self.bytes
            .get_mut(addr..addr + len)
            .ok_or(EmulatorError::MemoryOutOfBounds {
                addr: (addr + len).saturating_sub(1),
            })
    }

    // instructions are stored big-endian
    pub fn read_word(&self, addr: TypeAddr) -> Result<u16, EmulatorError> {
        let (l, r) = (self.get(addr as usize)?, self.get(addr as usize + 1)?);
        Ok(((l as u16) << 8) | r as u16)
    }

    // loads program instructions starting at address 0x200
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        if bytes.len() > MAX_ROM_SIZE {
            return Err(LoadError::RomTooLarge {
                size: bytes.len(),
                max: MAX_ROM_SIZE,
            });
        }
        let start_index = PROGRAM_START as usize;
        self.bytes[start_index..start_index + bytes.len()].copy_from_slice(bytes);
        info!("Loaded ROM [size: {}]", bytes.len());
        Ok(())
    }

    pub fn load_rom_by_file(&mut self, path: &Path) -> Result<(), LoadError> {
        let program = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_rom(&program)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_preloaded_at_base() {
        let mem = Memory::new();
        assert_eq!(mem.slice(0x000, 5).unwrap(), &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        // F is the last glyph, ending at 0x04F
        assert_eq!(mem.get(0x04F).unwrap(), 0x80);
        assert_eq!(mem.get(0x050).unwrap(), 0x00);
    }

    #[test]
    fn test_rom_lands_at_0x200() {
        let mut mem = Memory::new();
        mem.load_rom(&[0x60, 0x05, 0x70, 0x03]).unwrap();
        assert_eq!(mem.read_word(0x200).unwrap(), 0x6005);
        assert_eq!(mem.read_word(0x202).unwrap(), 0x7003);
    }

    #[test]
    fn test_largest_rom_fits() {
        let mut mem = Memory::new();
        let rom = vec![0xAB; MAX_ROM_SIZE];
        mem.load_rom(&rom).unwrap();
        assert_eq!(mem.get(MEMORY_SIZE - 1).unwrap(), 0xAB);
    }

    #[test]
    fn test_oversized_rom_rejected() {
        let mut mem = Memory::new();
        let rom = vec![0; MAX_ROM_SIZE + 1];
        match mem.load_rom(&rom) {
            Err(LoadError::RomTooLarge { size, max }) => {
                assert_eq!(size, 3585);
                assert_eq!(max, 3584);
            }
            other => panic!("expected RomTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut mem = Memory::new();
        let err = mem
            .load_rom_by_file(Path::new("/definitely/not/a/rom.ch8"))
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_out_of_range_access() {
        let mut mem = Memory::new();
        assert_eq!(
            mem.get(MEMORY_SIZE),
            Err(EmulatorError::MemoryOutOfBounds { addr: MEMORY_SIZE })
        );
        assert!(mem.set(MEMORY_SIZE, 1).is_err());
        assert!(mem.slice(0xFFE, 3).is_err());
        assert!(mem.read_word(0xFFF).is_err());
    }
}
