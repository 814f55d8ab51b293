//! Single-bit tests and updates, plus the flag-only instructions.

use super::{Cycles, FlagRules};
use crate::bits::{bit_is_high, clear_bit, set_bit};
use crate::cpu::{FlagChanges, Intel8080Like};
use crate::error::CoreResult;
use crate::operand::{Readable, RegisterType};

/// `BIT b,s`: Z is set if bit `b` of the operand is 0.
#[derive(Debug, Clone)]
pub struct Bit<T> {
    pub bit: u8,
    pub op: T,
    pub cycles: Cycles,
}

impl<T> Bit<T> {
    pub const fn new(bit: u8, op: T, cycles: Cycles) -> Self {
        debug_assert!(bit < 8);
        Self { bit, op, cycles }
    }
}

impl<T: Readable<Value = u8>> FlagRules for Bit<T> {
    const MNEMONIC: &'static str = "BIT";

    /// `(bit index, bit was set)`
    type Outcome = (u8, bool);

    fn execute<C: Intel8080Like>(&self, _cpu: &C) -> CoreResult<(u8, bool)> {
        let value = self.op.read()?;
        Ok((self.bit, bit_is_high(value, u32::from(self.bit))))
    }

    fn common_flags((_, set): (u8, bool)) -> FlagChanges {
        FlagChanges::none()
            .zero(!set)
            .subtract(false)
            .half_carry(true)
    }

    fn z80_flags((bit, set): (u8, bool), common: FlagChanges) -> FlagChanges {
        common.sign(bit == 7 && set).parity_overflow(!set)
    }

    fn cycles(&self) -> Cycles {
        self.cycles
    }
}

macro_rules! bit_update {
    ($(#[$meta:meta])* $name:ident, $mnemonic:literal, $update:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name<T> {
            pub bit: u8,
            pub op: T,
            pub cycles: Cycles,
        }

        impl<T> $name<T> {
            pub const fn new(bit: u8, op: T, cycles: Cycles) -> Self {
                debug_assert!(bit < 8);
                Self { bit, op, cycles }
            }
        }

        impl<T: RegisterType<u8>> FlagRules for $name<T> {
            const MNEMONIC: &'static str = $mnemonic;

            type Outcome = ();

            fn execute<C: Intel8080Like>(&self, _cpu: &C) -> CoreResult<()> {
                let value = self.op.read()?;
                self.op.write($update(value, self.bit))
            }

            fn common_flags((): ()) -> FlagChanges {
                FlagChanges::none()
            }

            fn cycles(&self) -> Cycles {
                self.cycles
            }
        }
    };
}

bit_update!(
    /// `SET b,s`. No flags.
    Set, "SET", set_bit
);

bit_update!(
    /// `RES b,s`. No flags.
    Res, "RES", clear_bit
);

/// `CPL`: complement the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cpl {
    pub cycles: Cycles,
}

impl FlagRules for Cpl {
    const MNEMONIC: &'static str = "CPL";

    type Outcome = ();

    fn execute<C: Intel8080Like>(&self, cpu: &C) -> CoreResult<()> {
        cpu.a().set(!cpu.a().get());
        Ok(())
    }

    fn common_flags((): ()) -> FlagChanges {
        FlagChanges::none().subtract(true).half_carry(true)
    }

    fn cycles(&self) -> Cycles {
        self.cycles
    }
}

/// `SCF`: set the carry flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scf {
    pub cycles: Cycles,
}

impl FlagRules for Scf {
    const MNEMONIC: &'static str = "SCF";

    type Outcome = ();

    fn execute<C: Intel8080Like>(&self, _cpu: &C) -> CoreResult<()> {
        Ok(())
    }

    fn common_flags((): ()) -> FlagChanges {
        FlagChanges::none()
            .subtract(false)
            .half_carry(false)
            .carry(true)
    }

    fn cycles(&self) -> Cycles {
        self.cycles
    }
}

/// `CCF`: complement the carry flag.
///
/// The Z80 copies the old carry into H; the LR35902 resets H.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ccf {
    pub cycles: Cycles,
}

impl FlagRules for Ccf {
    const MNEMONIC: &'static str = "CCF";

    /// Carry before the instruction.
    type Outcome = bool;

    fn execute<C: Intel8080Like>(&self, cpu: &C) -> CoreResult<bool> {
        Ok(cpu.cf().get())
    }

    fn common_flags(old_carry: bool) -> FlagChanges {
        FlagChanges::none().subtract(false).carry(!old_carry)
    }

    fn z80_flags(old_carry: bool, common: FlagChanges) -> FlagChanges {
        common.half_carry(old_carry)
    }

    fn lr35902_flags(_old_carry: bool, common: FlagChanges) -> FlagChanges {
        common.half_carry(false)
    }

    fn cycles(&self) -> Cycles {
        self.cycles
    }
}
