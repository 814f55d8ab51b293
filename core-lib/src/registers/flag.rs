use super::Register8;
use crate::error::CoreResult;
use crate::operand::{Readable, Writeable};
use std::fmt;

/// A single bit of an 8-bit register, readable and writeable as a `bool`.
///
/// Writes read-modify-write the whole register; sibling bits are preserved.
#[derive(Clone)]
pub struct Flag {
    reg: Register8,
    bit: u8,
}

impl Flag {
    pub fn new(reg: Register8, bit: u8) -> Self {
        debug_assert!(bit < 8, "flag bit {bit} out of range");
        Self { reg, bit: bit & 0x07 }
    }

    #[inline]
    const fn mask(&self) -> u8 {
        1 << self.bit
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.reg.get() & self.mask() != 0
    }

    #[inline]
    pub fn set(&self, value: bool) {
        let current = self.reg.get();
        if value {
            self.reg.set(current | self.mask());
        } else {
            self.reg.set(current & !self.mask());
        }
    }

    pub const fn bit(&self) -> u8 {
        self.bit
    }

    pub const fn register(&self) -> &Register8 {
        &self.reg
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Flag(bit {} = {})", self.bit, self.get())
    }
}

impl Readable for Flag {
    type Value = bool;

    fn read(&self) -> CoreResult<bool> {
        Ok(self.get())
    }
}

impl Writeable for Flag {
    type Value = bool;

    fn write(&self, value: bool) -> CoreResult<()> {
        self.set(value);
        Ok(())
    }
}
