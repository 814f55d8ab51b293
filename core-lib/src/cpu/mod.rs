//! CPU register files and the flag-update contexts instructions run against.
//!
//! Both variants share the 8080-style core: `A`, `F`, the `BC`/`DE`/`HL`
//! pairs, `SP`, `PC` and the zero, subtract, half-carry and carry flags.
//! [`Intel8080Like`] exposes that core so instruction logic can be written
//! once and specialised only where the variants disagree.

use crate::bus::DataBus;
use crate::registers::{Flag, Register16, Register16Computed, Register8};
use std::fmt;

mod flags;
mod lr35902;
mod z80;

pub use flags::{FlagChanges, Lr35902Flags, Z80Flags};
pub use lr35902::Lr35902;
pub use z80::Z80;

/// Which flag layout and instruction rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpuVariant {
    Z80,
    /// The Game Boy CPU (Sharp LR35902 / SM83).
    Lr35902,
}

impl fmt::Display for CpuVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Z80 => f.write_str("Z80"),
            Self::Lr35902 => f.write_str("LR35902"),
        }
    }
}

/// The state shared by the Z80 and the LR35902.
pub trait Intel8080Like {
    const VARIANT: CpuVariant;

    fn a(&self) -> &Register8;
    fn f(&self) -> &Register8;
    fn bc(&self) -> &Register16Computed;
    fn de(&self) -> &Register16Computed;
    fn hl(&self) -> &Register16Computed;
    fn sp(&self) -> &Register16;
    fn pc(&self) -> &Register16;

    fn zf(&self) -> &Flag;
    fn nf(&self) -> &Flag;
    fn hf(&self) -> &Flag;
    fn cf(&self) -> &Flag;

    fn bus(&self) -> &DataBus;

    /// Write every flag `changes` names and leave the others alone.
    fn apply_flags(&self, changes: FlagChanges) {
        apply_common_flags(self, changes);
    }
}

pub(crate) fn apply_common_flags<C: Intel8080Like + ?Sized>(cpu: &C, changes: FlagChanges) {
    if let Some(zero) = changes.zero {
        cpu.zf().set(zero);
    }
    if let Some(subtract) = changes.subtract {
        cpu.nf().set(subtract);
    }
    if let Some(half_carry) = changes.half_carry {
        cpu.hf().set(half_carry);
    }
    if let Some(carry) = changes.carry {
        cpu.cf().set(carry);
    }
}
