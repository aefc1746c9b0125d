use crate::error::EmulatorError;
use crate::memory::{TypeAddr, ADDRESS_MASK, PROGRAM_START};

pub const FLAG_REGISTER: u8 = 0xF;
pub const STACK_DEPTH: usize = 16;

pub struct Registers {
    registers: [u8; 16],
}

impl Registers {
    pub fn new() -> Self {
        Self { registers: [0; 16] }
    }

    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[(reg_num & 0xF) as usize] = value;
    }

    pub fn add_to_register(&mut self, reg_num: u8, value: u8) {
        let total = self.get(reg_num).wrapping_add(value);
        self.set_register(reg_num, total);
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[(reg_num & 0xF) as usize]
    }

    pub fn set_flag(&mut self, flag: bool) {
        self.set_register(FLAG_REGISTER, flag as u8);
    }

    /// V0..=Vx
    pub fn range(&self, last: u8) -> &[u8] {
        &self.registers[..=(last & 0xF) as usize]
    }

    pub fn range_mut(&mut self, last: u8) -> &mut [u8] {
        &mut self.registers[..=(last & 0xF) as usize]
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

// Special registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl ProgramCounter {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(2);
    }

    pub fn skip(&mut self) {
        self.0 = self.0.wrapping_add(4);
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }

    /// Address of the instruction after the current one.
    pub fn next(&self) -> TypeAddr {
        self.0.wrapping_add(2)
    }
}

impl Default for ProgramCounter {
    fn default() -> Self {
        Self(PROGRAM_START)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndexRegister(pub TypeAddr);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr & ADDRESS_MASK;
    }

    pub fn offset(&mut self, by: u8) {
        self.set_addr(self.0.wrapping_add(by as TypeAddr));
    }

    pub fn addr(&self) -> usize {
        (self.0 & ADDRESS_MASK) as usize
    }
}

/// Return addresses for nested subroutine calls. `sp` counts occupied slots.
pub struct Stack {
    addresses: [TypeAddr; STACK_DEPTH],
    sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: [0; STACK_DEPTH],
            sp: 0,
        }
    }

    /// `pc` is only used to report where the overflow happened.
    pub fn push(&mut self, addr: TypeAddr, pc: TypeAddr) -> Result<(), EmulatorError> {
        if self.sp == STACK_DEPTH {
            return Err(EmulatorError::StackOverflow { pc });
        }
        self.addresses[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self, pc: TypeAddr) -> Result<TypeAddr, EmulatorError> {
        if self.sp == 0 {
            return Err(EmulatorError::StackUnderflow { pc });
        }
        self.sp -= 1;
        Ok(self.addresses[self.sp])
    }

    pub fn depth(&self) -> usize {
        self.sp
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
