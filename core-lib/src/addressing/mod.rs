//! Indirect operands: register-indirect pointers and base+offset pseudo-pointers.
//!
//! These hold a source operand and a borrowed bus. Their value is derived on
//! every access; nothing is stored, so they are built per instruction and
//! never outlive the registers and bus they borrow.

use crate::bus::{AddressSpace, DataBus};
use crate::error::CoreResult;
use crate::operand::{OperandKind, OperandType, Readable, Writeable};
use crate::registers::{Register16, Register16Computed};

/// Target address of a pseudo-pointer: `base` plus `offset` read as a signed byte.
#[inline]
pub const fn offset_address(base: u16, offset: u8) -> u16 {
    base.wrapping_add_signed(offset as i8 as i16)
}

/// A 16-bit value interpreted as the address of an 8-bit value on the bus.
#[derive(Debug)]
pub struct Pointer<'a, S> {
    source: S,
    bus: &'a DataBus,
}

impl<'a, S: Readable<Value = u16>> Pointer<'a, S> {
    pub const fn new(source: S, bus: &'a DataBus) -> Self {
        Self { source, bus }
    }

    /// Address the source currently holds.
    pub fn address(&self) -> CoreResult<u16> {
        self.source.read()
    }
}

impl<S: Readable<Value = u16>> Readable for Pointer<'_, S> {
    type Value = u8;

    fn read(&self) -> CoreResult<u8> {
        self.bus.read(self.source.read()?)
    }
}

impl<S: Readable<Value = u16>> Writeable for Pointer<'_, S> {
    type Value = u8;

    fn write(&self, value: u8) -> CoreResult<()> {
        self.bus.write(self.source.read()?, value)
    }
}

impl<S: Readable<Value = u16>> OperandType for Pointer<'_, S> {
    fn operand_kind(&self) -> OperandKind {
        OperandKind::Register16Indirect8Like
    }
}

/// An 8-bit offset added to a fixed base, pointing at an 8-bit value.
///
/// `LDH (n),A` style access on the LR35902 (`base` = `0xFF00`) and
/// `(IX+d)` on the Z80 both resolve through this.
#[derive(Debug)]
pub struct PseudoPointer8<'a, O> {
    base: u16,
    offset: O,
    bus: &'a DataBus,
}

impl<'a, O: Readable<Value = u8>> PseudoPointer8<'a, O> {
    pub const fn new(base: u16, offset: O, bus: &'a DataBus) -> Self {
        Self { base, offset, bus }
    }

    pub fn target_address(&self) -> CoreResult<u16> {
        Ok(offset_address(self.base, self.offset.read()?))
    }
}

impl<O: Readable<Value = u8>> Readable for PseudoPointer8<'_, O> {
    type Value = u8;

    fn read(&self) -> CoreResult<u8> {
        self.bus.read(self.target_address()?)
    }
}

impl<O: Readable<Value = u8>> Writeable for PseudoPointer8<'_, O> {
    type Value = u8;

    fn write(&self, value: u8) -> CoreResult<()> {
        self.bus.write(self.target_address()?, value)
    }
}

impl<O: Readable<Value = u8>> OperandType for PseudoPointer8<'_, O> {
    fn operand_kind(&self) -> OperandKind {
        OperandKind::Register16Indirect8Like
    }
}

/// Like [`PseudoPointer8`], but reads and writes a little-endian word.
#[derive(Debug)]
pub struct PseudoPointer16<'a, O> {
    base: u16,
    offset: O,
    bus: &'a DataBus,
}

impl<'a, O: Readable<Value = u8>> PseudoPointer16<'a, O> {
    pub const fn new(base: u16, offset: O, bus: &'a DataBus) -> Self {
        Self { base, offset, bus }
    }

    pub fn target_address(&self) -> CoreResult<u16> {
        Ok(offset_address(self.base, self.offset.read()?))
    }
}

impl<O: Readable<Value = u8>> Readable for PseudoPointer16<'_, O> {
    type Value = u16;

    fn read(&self) -> CoreResult<u16> {
        self.bus.read16(self.target_address()?)
    }
}

impl<O: Readable<Value = u8>> Writeable for PseudoPointer16<'_, O> {
    type Value = u16;

    fn write(&self, value: u16) -> CoreResult<()> {
        self.bus.write16(self.target_address()?, value)
    }
}

impl<O: Readable<Value = u8>> OperandType for PseudoPointer16<'_, O> {
    fn operand_kind(&self) -> OperandKind {
        OperandKind::Register16Indirect8Like
    }
}

/// 16-bit registers that can be dereferenced on a bus without spelling out a [`Pointer`].
pub trait CanActAsPointer {
    fn dereference_on(&self, bus: &DataBus) -> CoreResult<u8>;

    fn store_in_location(&self, bus: &DataBus, value: u8) -> CoreResult<()>;
}

impl CanActAsPointer for Register16 {
    fn dereference_on(&self, bus: &DataBus) -> CoreResult<u8> {
        Pointer::new(self, bus).read()
    }

    fn store_in_location(&self, bus: &DataBus, value: u8) -> CoreResult<()> {
        Pointer::new(self, bus).write(value)
    }
}

impl CanActAsPointer for Register16Computed {
    fn dereference_on(&self, bus: &DataBus) -> CoreResult<u8> {
        Pointer::new(self, bus).read()
    }

    fn store_in_location(&self, bus: &DataBus, value: u8) -> CoreResult<()> {
        Pointer::new(self, bus).write(value)
    }
}
