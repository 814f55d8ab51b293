//! CPU register cells and the views built on top of them.
//!
//! A [`Register8`] is a shared handle: cloning it yields another handle to the
//! *same* cell, never a copy of its value. That is how an 8-bit register can
//! be reachable directly, as half of a [`Register16Computed`] pair, and
//! through [`Flag`] views all at once. A CPU owns the handles it builds at
//! construction; operands hold clones of them for the duration of an
//! instruction.
//!
//! Handles use `Rc<Cell<_>>`, so a register graph belongs to one thread.
//! Two emulated machines never share cells.

use crate::bits::{high_byte, low_byte, make16};
use crate::error::CoreResult;
use crate::operand::{OperandKind, OperandType, Readable, Writeable};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

mod flag;
pub use flag::Flag;

/// An 8-bit register: a CPU-built-in memory cell holding an 8-bit value.
#[derive(Clone, Default)]
pub struct Register8 {
    cell: Rc<Cell<u8>>,
}

impl Register8 {
    pub fn new(value: u8) -> Self {
        Self {
            cell: Rc::new(Cell::new(value)),
        }
    }

    #[inline]
    pub fn get(&self) -> u8 {
        self.cell.get()
    }

    #[inline]
    pub fn set(&self, value: u8) {
        self.cell.set(value);
    }

    /// True when both handles point at the same cell.
    pub fn same_cell(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl fmt::Debug for Register8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Register8({:#04X})", self.get())
    }
}

impl Readable for Register8 {
    type Value = u8;

    fn read(&self) -> CoreResult<u8> {
        Ok(self.get())
    }
}

impl Writeable for Register8 {
    type Value = u8;

    fn write(&self, value: u8) -> CoreResult<()> {
        self.set(value);
        Ok(())
    }
}

impl OperandType for Register8 {
    fn operand_kind(&self) -> OperandKind {
        OperandKind::Register8Like
    }
}

/// A true 16-bit register (SP, PC, IX, IY).
#[derive(Clone, Default)]
pub struct Register16 {
    cell: Rc<Cell<u16>>,
}

impl Register16 {
    pub fn new(value: u16) -> Self {
        Self {
            cell: Rc::new(Cell::new(value)),
        }
    }

    #[inline]
    pub fn get(&self) -> u16 {
        self.cell.get()
    }

    #[inline]
    pub fn set(&self, value: u16) {
        self.cell.set(value);
    }
}

impl fmt::Debug for Register16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Register16({:#06X})", self.get())
    }
}

impl Readable for Register16 {
    type Value = u16;

    fn read(&self) -> CoreResult<u16> {
        Ok(self.get())
    }
}

impl Writeable for Register16 {
    type Value = u16;

    fn write(&self, value: u16) -> CoreResult<()> {
        self.set(value);
        Ok(())
    }
}

impl OperandType for Register16 {
    fn operand_kind(&self) -> OperandKind {
        OperandKind::Register16Like
    }
}

/// A virtual 16-bit register made of two 8-bit registers (BC, DE, HL, AF).
///
/// Owns no storage. Reads pack `high` into the upper byte; writes split the
/// value back into the two halves. Nothing is cached.
#[derive(Clone)]
pub struct Register16Computed {
    high: Register8,
    low: Register8,
}

impl Register16Computed {
    pub const fn new(high: Register8, low: Register8) -> Self {
        Self { high, low }
    }

    #[inline]
    pub fn get(&self) -> u16 {
        make16(self.high.get(), self.low.get())
    }

    #[inline]
    pub fn set(&self, value: u16) {
        self.high.set(high_byte(value));
        self.low.set(low_byte(value));
    }

    pub const fn high(&self) -> &Register8 {
        &self.high
    }

    pub const fn low(&self) -> &Register8 {
        &self.low
    }
}

impl fmt::Debug for Register16Computed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Register16Computed({:#06X})", self.get())
    }
}

impl Readable for Register16Computed {
    type Value = u16;

    fn read(&self) -> CoreResult<u16> {
        Ok(self.get())
    }
}

impl Writeable for Register16Computed {
    type Value = u16;

    fn write(&self, value: u16) -> CoreResult<()> {
        self.set(value);
        Ok(())
    }
}

impl OperandType for Register16Computed {
    fn operand_kind(&self) -> OperandKind {
        OperandKind::Register16ComputedLike
    }
}

#[cfg(test)]
mod tests;
