//! Instruction execution over resolved operands.
//!
//! Decoding happens elsewhere: a decoder builds one of these structs with its
//! operands already resolved (a register handle, a [`Pointer`], an immediate)
//! and the cycle count for that encoding, then runs it against a CPU.
//!
//! Every instruction follows the same protocol: read the operands, compute
//! with the [`bits`](crate::bits) predicates, write the result back through
//! the same operand, then update the flags it declares. Flags an instruction
//! does not name are left untouched.
//!
//! [`Pointer`]: crate::addressing::Pointer

use crate::cpu::{FlagChanges, Intel8080Like, Lr35902, Z80};
use crate::error::CoreResult;
use tracing::{instrument, trace};

mod alu;
mod bit;
mod load;
mod shift;

pub use alu::{
    Adc, Add, Add16, AddSp, AluOutcome, And, Cp, Dec, Dec16, Inc, Inc16, Or, Sbc, Sub, Xor,
};
pub use bit::{Bit, Ccf, Cpl, Res, Scf, Set};
pub use load::Ld;
pub use shift::{Rl, Rlc, Rr, Rrc, Sla, Sll, Sra, Srl, Swap};

/// Machine cycles reported by an instruction, as supplied by the decoder.
pub type Cycles = u32;

/// Something that can be executed on CPU variant `C`.
pub trait Instruction<C: Intel8080Like> {
    fn run_on(&self, cpu: &C) -> CoreResult<Cycles>;
}

/// The per-variant flag rules of an instruction that exists on both CPUs.
///
/// `execute` does the data work and returns whatever the flag rules need
/// (old and new values, carry-in). The flags are then built from
/// `common_flags` and extended by the variant hook.
pub trait FlagRules {
    const MNEMONIC: &'static str;

    type Outcome: Copy;

    fn execute<C: Intel8080Like>(&self, cpu: &C) -> CoreResult<Self::Outcome>;

    /// Zero, subtract, half-carry and carry as both variants compute them.
    fn common_flags(outcome: Self::Outcome) -> FlagChanges;

    /// Sign and parity/overflow on top of the common flags.
    fn z80_flags(_outcome: Self::Outcome, common: FlagChanges) -> FlagChanges {
        common
    }

    fn lr35902_flags(_outcome: Self::Outcome, common: FlagChanges) -> FlagChanges {
        common
    }

    fn cycles(&self) -> Cycles;
}

impl<T: FlagRules> Instruction<Z80> for T {
    #[instrument(level = "trace", skip_all, fields(instruction = T::MNEMONIC))]
    fn run_on(&self, cpu: &Z80) -> CoreResult<Cycles> {
        let outcome = self.execute(cpu)?;
        let changes = T::z80_flags(outcome, T::common_flags(outcome));
        trace!(?changes, "Z80 flags");
        cpu.apply_flags(changes);
        Ok(self.cycles())
    }
}

impl<T: FlagRules> Instruction<Lr35902> for T {
    #[instrument(level = "trace", skip_all, fields(instruction = T::MNEMONIC))]
    fn run_on(&self, cpu: &Lr35902) -> CoreResult<Cycles> {
        let outcome = self.execute(cpu)?;
        let changes = T::lr35902_flags(outcome, T::common_flags(outcome));
        trace!(?changes, "LR35902 flags");
        cpu.apply_flags(changes);
        Ok(self.cycles())
    }
}

#[cfg(test)]
mod tests;
