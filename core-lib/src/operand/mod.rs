//! Read and write capabilities shared by every storage location an
//! instruction can operate on.
//!
//! Instructions are generic over these traits, so the same logic runs on a
//! plain register, a register pair, a bus-backed pointer or a memory cell.
//! Reads and writes return [`CoreResult`] because bus-backed operands can hit
//! unmapped memory; register operands always succeed.

use crate::error::CoreResult;

/// Tag describing what kind of storage an operand is.
///
/// Used by disassembly and encoding layers; instruction logic never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandKind {
    Register8Like,
    Register16Like,
    Register16ComputedLike,
    Register16Indirect8Like,
    Memory8Like,
    Memory16Like,
}

/// Something that produces a value of a fixed width.
pub trait Readable {
    type Value: Copy;

    fn read(&self) -> CoreResult<Self::Value>;
}

/// Something that stores a value of a fixed width.
pub trait Writeable {
    type Value: Copy;

    fn write(&self, value: Self::Value) -> CoreResult<()>;
}

/// Readable and writeable at the same width `V`.
pub trait RegisterType<V>: Readable<Value = V> + Writeable<Value = V> {}

impl<V, T> RegisterType<V> for T where T: Readable<Value = V> + Writeable<Value = V> + ?Sized {}

/// Operands that report their [`OperandKind`].
pub trait OperandType {
    fn operand_kind(&self) -> OperandKind;
}

impl<T: Readable + ?Sized> Readable for &T {
    type Value = T::Value;

    fn read(&self) -> CoreResult<Self::Value> {
        (**self).read()
    }
}

impl<T: Writeable + ?Sized> Writeable for &T {
    type Value = T::Value;

    fn write(&self, value: Self::Value) -> CoreResult<()> {
        (**self).write(value)
    }
}

impl<T: OperandType + ?Sized> OperandType for &T {
    fn operand_kind(&self) -> OperandKind {
        (**self).operand_kind()
    }
}

/// A fixed 8-bit value decoded from the instruction stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Immediate8(pub u8);

impl Readable for Immediate8 {
    type Value = u8;

    fn read(&self) -> CoreResult<u8> {
        Ok(self.0)
    }
}

/// A fixed 16-bit value decoded from the instruction stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Immediate16(pub u16);

impl Readable for Immediate16 {
    type Value = u16;

    fn read(&self) -> CoreResult<u16> {
        Ok(self.0)
    }
}
