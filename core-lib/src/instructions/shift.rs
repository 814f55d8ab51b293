//! CB-prefixed shifts and rotates.

use super::{Cycles, FlagRules, Instruction};
use crate::bits::{
    arithmetic_shift_right, bit_is_high, is_negative, is_zero, logical_shift_right, parity,
    rotate_left, rotate_right, shift_left,
};
use crate::cpu::{FlagChanges, Intel8080Like, Lr35902, Z80};
use crate::error::CoreResult;
use crate::operand::RegisterType;
use tracing::instrument;

/// Z is set if the result is 0, H and N are reset, C is the bit shifted out.
fn shift_flags(result: u8, carry: bool) -> FlagChanges {
    FlagChanges::none()
        .zero(is_zero(result))
        .half_carry(false)
        .subtract(false)
        .carry(carry)
}

/// S is set if the result is negative, P/V is set if parity is even.
fn with_sign_and_parity(common: FlagChanges, result: u8) -> FlagChanges {
    common.sign(is_negative(result)).parity_overflow(parity(result))
}

macro_rules! shift_rotate {
    ($(#[$meta:meta])* $name:ident, $mnemonic:literal, |$value:ident, $carry_in:ident| $body:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name<T> {
            pub op: T,
            pub cycles: Cycles,
        }

        impl<T> $name<T> {
            pub const fn new(op: T, cycles: Cycles) -> Self {
                Self { op, cycles }
            }
        }

        impl<T: RegisterType<u8>> FlagRules for $name<T> {
            const MNEMONIC: &'static str = $mnemonic;

            type Outcome = (u8, bool);

            fn execute<C: Intel8080Like>(&self, cpu: &C) -> CoreResult<(u8, bool)> {
                let $value = self.op.read()?;
                let $carry_in = cpu.cf().get();
                let (new_value, carry_out): (u8, bool) = $body;
                self.op.write(new_value)?;
                Ok((new_value, carry_out))
            }

            fn common_flags((new_value, carry): (u8, bool)) -> FlagChanges {
                shift_flags(new_value, carry)
            }

            fn z80_flags((new_value, _): (u8, bool), common: FlagChanges) -> FlagChanges {
                with_sign_and_parity(common, new_value)
            }

            fn cycles(&self) -> Cycles {
                self.cycles
            }
        }
    };
}

shift_rotate!(
    /// Arithmetic left shift into carry.
    Sla, "SLA", |value, _carry_in| (shift_left(value), bit_is_high(value, 7))
);

shift_rotate!(
    /// Arithmetic right shift into carry; bit 7 is kept.
    Sra, "SRA", |value, _carry_in| (arithmetic_shift_right(value), bit_is_high(value, 0))
);

shift_rotate!(
    /// Logical right shift into carry; bit 7 becomes 0.
    Srl, "SRL", |value, _carry_in| (logical_shift_right(value), bit_is_high(value, 0))
);

shift_rotate!(
    /// Rotate left; bit 7 goes to both bit 0 and carry.
    Rlc, "RLC", |value, _carry_in| (rotate_left(value), bit_is_high(value, 7))
);

shift_rotate!(
    /// Rotate right; bit 0 goes to both bit 7 and carry.
    Rrc, "RRC", |value, _carry_in| (rotate_right(value), bit_is_high(value, 0))
);

shift_rotate!(
    /// Rotate left through carry.
    Rl, "RL", |value, carry_in| (shift_left(value) | u8::from(carry_in), bit_is_high(value, 7))
);

shift_rotate!(
    /// Rotate right through carry.
    Rr, "RR", |value, carry_in| {
        (logical_shift_right(value) | (u8::from(carry_in) << 7), bit_is_high(value, 0))
    }
);

/// Swap the nibbles. LR35902 only.
#[derive(Debug, Clone)]
pub struct Swap<T> {
    pub op: T,
    pub cycles: Cycles,
}

impl<T> Swap<T> {
    pub const fn new(op: T, cycles: Cycles) -> Self {
        Self { op, cycles }
    }
}

impl<T: RegisterType<u8>> Instruction<Lr35902> for Swap<T> {
    #[instrument(level = "trace", skip_all, fields(instruction = "SWAP"))]
    fn run_on(&self, cpu: &Lr35902) -> CoreResult<Cycles> {
        let value = self.op.read()?;
        let swapped = value.rotate_left(4);
        self.op.write(swapped)?;

        // Z is set if the result is 0; N, H and C are reset.
        cpu.apply_flags(shift_flags(swapped, false));
        Ok(self.cycles)
    }
}

/// Undocumented shift left that sets bit 0. Z80 only.
#[derive(Debug, Clone)]
pub struct Sll<T> {
    pub op: T,
    pub cycles: Cycles,
}

impl<T> Sll<T> {
    pub const fn new(op: T, cycles: Cycles) -> Self {
        Self { op, cycles }
    }
}

impl<T: RegisterType<u8>> Instruction<Z80> for Sll<T> {
    #[instrument(level = "trace", skip_all, fields(instruction = "SLL"))]
    fn run_on(&self, cpu: &Z80) -> CoreResult<Cycles> {
        let value = self.op.read()?;
        let shifted = shift_left(value) | 0x01;
        self.op.write(shifted)?;

        cpu.apply_flags(with_sign_and_parity(
            shift_flags(shifted, bit_is_high(value, 7)),
            shifted,
        ));
        Ok(self.cycles)
    }
}
