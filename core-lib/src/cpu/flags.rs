//! Flag layouts of both CPU variants and the per-instruction change set.

use bitflags::bitflags;

bitflags! {
    /// Z80 `F` register layout. Bits 3 and 5 are undocumented copies of the result.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct Z80Flags: u8 {
        const SIGN            = 0b1000_0000;
        const ZERO            = 0b0100_0000;
        const HALF_CARRY      = 0b0001_0000;
        const PARITY_OVERFLOW = 0b0000_0100;
        const SUBTRACT        = 0b0000_0010;
        const CARRY           = 0b0000_0001;
    }
}

bitflags! {
    /// LR35902 `F` register layout. The low nibble is unused.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct Lr35902Flags: u8 {
        const ZERO       = 0b1000_0000;
        const SUBTRACT   = 0b0100_0000;
        const HALF_CARRY = 0b0010_0000;
        const CARRY      = 0b0001_0000;
    }
}

/// Bit index of a single-bit mask.
pub(crate) const fn bit_index(mask: u8) -> u8 {
    mask.trailing_zeros() as u8
}

/// The flags one instruction writes.
///
/// `None` means the flag is unaffected and keeps its previous value; it is
/// not the same as clearing it. Sign and parity/overflow only exist on the
/// Z80 and are ignored by the LR35902.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlagChanges {
    pub zero: Option<bool>,
    pub subtract: Option<bool>,
    pub half_carry: Option<bool>,
    pub carry: Option<bool>,
    pub sign: Option<bool>,
    pub parity_overflow: Option<bool>,
}

impl FlagChanges {
    /// Nothing affected.
    pub const fn none() -> Self {
        Self {
            zero: None,
            subtract: None,
            half_carry: None,
            carry: None,
            sign: None,
            parity_overflow: None,
        }
    }

    #[must_use]
    pub const fn zero(mut self, value: bool) -> Self {
        self.zero = Some(value);
        self
    }

    #[must_use]
    pub const fn subtract(mut self, value: bool) -> Self {
        self.subtract = Some(value);
        self
    }

    #[must_use]
    pub const fn half_carry(mut self, value: bool) -> Self {
        self.half_carry = Some(value);
        self
    }

    #[must_use]
    pub const fn carry(mut self, value: bool) -> Self {
        self.carry = Some(value);
        self
    }

    #[must_use]
    pub const fn sign(mut self, value: bool) -> Self {
        self.sign = Some(value);
        self
    }

    #[must_use]
    pub const fn parity_overflow(mut self, value: bool) -> Self {
        self.parity_overflow = Some(value);
        self
    }
}
