//! 8-bit and 16-bit arithmetic and logic.

use super::{Cycles, FlagRules, Instruction};
use crate::bits::{
    add_carry16, add_carry16_signed, add_carry8_with_carry, add_half_carry16,
    add_half_carry16_signed, add_half_carry8_with_carry, add_overflow, is_negative, is_zero,
    parity, sub_borrow8_with_borrow, sub_half_borrow8_with_borrow, sub_overflow,
};
use crate::cpu::{FlagChanges, Intel8080Like, Lr35902};
use crate::error::CoreResult;
use crate::operand::{Readable, RegisterType, Writeable};
use tracing::instrument;

/// Operand values an 8-bit ALU operation leaves behind for the flag rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluOutcome {
    pub op1: u8,
    pub op2: u8,
    /// Carry or borrow fed into the operation (0 or 1).
    pub carry_in: u8,
    pub result: u8,
}

fn add_flags(o: AluOutcome) -> FlagChanges {
    FlagChanges::none()
        .zero(is_zero(o.result))
        .subtract(false)
        .half_carry(add_half_carry8_with_carry(o.op1, o.op2, o.carry_in))
        .carry(add_carry8_with_carry(o.op1, o.op2, o.carry_in))
}

fn sub_flags(o: AluOutcome) -> FlagChanges {
    FlagChanges::none()
        .zero(is_zero(o.result))
        .subtract(true)
        .half_carry(sub_half_borrow8_with_borrow(o.op1, o.op2, o.carry_in))
        .carry(sub_borrow8_with_borrow(o.op1, o.op2, o.carry_in))
}

fn z80_add_flags(o: AluOutcome, common: FlagChanges) -> FlagChanges {
    common
        .sign(is_negative(o.result))
        .parity_overflow(add_overflow(o.op1, o.op2, o.result))
}

fn z80_sub_flags(o: AluOutcome, common: FlagChanges) -> FlagChanges {
    common
        .sign(is_negative(o.result))
        .parity_overflow(sub_overflow(o.op1, o.op2, o.result))
}

fn z80_logic_flags(o: AluOutcome, common: FlagChanges) -> FlagChanges {
    common
        .sign(is_negative(o.result))
        .parity_overflow(parity(o.result))
}

fn logic_flags(result: u8, half_carry: bool) -> FlagChanges {
    FlagChanges::none()
        .zero(is_zero(result))
        .subtract(false)
        .half_carry(half_carry)
        .carry(false)
}

/// `dst <- dst OP src`, where `OP` may consume the carry flag.
fn binary<C, D, S>(
    cpu: &C,
    dst: &D,
    src: &S,
    use_carry: bool,
    write_back: bool,
    op: impl FnOnce(u8, u8, u8) -> u8,
) -> CoreResult<AluOutcome>
where
    C: Intel8080Like,
    D: Readable<Value = u8> + Writeable<Value = u8>,
    S: Readable<Value = u8>,
{
    let op1 = dst.read()?;
    let op2 = src.read()?;
    let carry_in = if use_carry { u8::from(cpu.cf().get()) } else { 0 };
    let result = op(op1, op2, carry_in);
    if write_back {
        dst.write(result)?;
    }
    Ok(AluOutcome {
        op1,
        op2,
        carry_in,
        result,
    })
}

macro_rules! alu8 {
    (
        $(#[$meta:meta])* $name:ident, $mnemonic:literal,
        carry: $use_carry:literal, write: $write_back:literal,
        op: $op:expr, common: $common:expr, z80: $z80:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name<D, S> {
            pub dst: D,
            pub src: S,
            pub cycles: Cycles,
        }

        impl<D, S> $name<D, S> {
            pub const fn new(dst: D, src: S, cycles: Cycles) -> Self {
                Self { dst, src, cycles }
            }
        }

        impl<D: RegisterType<u8>, S: Readable<Value = u8>> FlagRules for $name<D, S> {
            const MNEMONIC: &'static str = $mnemonic;

            type Outcome = AluOutcome;

            fn execute<C: Intel8080Like>(&self, cpu: &C) -> CoreResult<AluOutcome> {
                binary(cpu, &self.dst, &self.src, $use_carry, $write_back, $op)
            }

            fn common_flags(outcome: AluOutcome) -> FlagChanges {
                ($common)(outcome)
            }

            fn z80_flags(outcome: AluOutcome, common: FlagChanges) -> FlagChanges {
                ($z80)(outcome, common)
            }

            fn cycles(&self) -> Cycles {
                self.cycles
            }
        }
    };
}

alu8!(
    /// `ADD A,s`
    Add, "ADD", carry: false, write: true,
    op: |a: u8, b: u8, _| a.wrapping_add(b),
    common: add_flags, z80: z80_add_flags
);

alu8!(
    /// `ADC A,s`: add with carry-in.
    Adc, "ADC", carry: true, write: true,
    op: |a: u8, b: u8, c: u8| a.wrapping_add(b).wrapping_add(c),
    common: add_flags, z80: z80_add_flags
);

alu8!(
    /// `SUB s`
    Sub, "SUB", carry: false, write: true,
    op: |a: u8, b: u8, _| a.wrapping_sub(b),
    common: sub_flags, z80: z80_sub_flags
);

alu8!(
    /// `SBC A,s`: subtract with borrow-in.
    Sbc, "SBC", carry: true, write: true,
    op: |a: u8, b: u8, c: u8| a.wrapping_sub(b).wrapping_sub(c),
    common: sub_flags, z80: z80_sub_flags
);

alu8!(
    /// `CP s`: subtract for flags only, the destination is not written.
    Cp, "CP", carry: false, write: false,
    op: |a: u8, b: u8, _| a.wrapping_sub(b),
    common: sub_flags, z80: z80_sub_flags
);

alu8!(
    /// `AND s`: H is set.
    And, "AND", carry: false, write: true,
    op: |a: u8, b: u8, _| a & b,
    common: |o: AluOutcome| logic_flags(o.result, true),
    z80: z80_logic_flags
);

alu8!(
    Or, "OR", carry: false, write: true,
    op: |a: u8, b: u8, _| a | b,
    common: |o: AluOutcome| logic_flags(o.result, false),
    z80: z80_logic_flags
);

alu8!(
    Xor, "XOR", carry: false, write: true,
    op: |a: u8, b: u8, _| a ^ b,
    common: |o: AluOutcome| logic_flags(o.result, false),
    z80: z80_logic_flags
);

/// `INC s`. Carry is unaffected.
#[derive(Debug, Clone)]
pub struct Inc<T> {
    pub op: T,
    pub cycles: Cycles,
}

impl<T> Inc<T> {
    pub const fn new(op: T, cycles: Cycles) -> Self {
        Self { op, cycles }
    }
}

impl<T: RegisterType<u8>> FlagRules for Inc<T> {
    const MNEMONIC: &'static str = "INC";

    type Outcome = (u8, u8);

    fn execute<C: Intel8080Like>(&self, _cpu: &C) -> CoreResult<(u8, u8)> {
        let old = self.op.read()?;
        let new = old.wrapping_add(1);
        self.op.write(new)?;
        Ok((old, new))
    }

    fn common_flags((old, new): (u8, u8)) -> FlagChanges {
        FlagChanges::none()
            .zero(is_zero(new))
            .subtract(false)
            .half_carry(add_half_carry8_with_carry(old, 1, 0))
    }

    fn z80_flags((old, new): (u8, u8), common: FlagChanges) -> FlagChanges {
        common
            .sign(is_negative(new))
            .parity_overflow(add_overflow(old, 1, new))
    }

    fn cycles(&self) -> Cycles {
        self.cycles
    }
}

/// `DEC s`. Carry is unaffected.
#[derive(Debug, Clone)]
pub struct Dec<T> {
    pub op: T,
    pub cycles: Cycles,
}

impl<T> Dec<T> {
    pub const fn new(op: T, cycles: Cycles) -> Self {
        Self { op, cycles }
    }
}

impl<T: RegisterType<u8>> FlagRules for Dec<T> {
    const MNEMONIC: &'static str = "DEC";

    type Outcome = (u8, u8);

    fn execute<C: Intel8080Like>(&self, _cpu: &C) -> CoreResult<(u8, u8)> {
        let old = self.op.read()?;
        let new = old.wrapping_sub(1);
        self.op.write(new)?;
        Ok((old, new))
    }

    fn common_flags((old, new): (u8, u8)) -> FlagChanges {
        FlagChanges::none()
            .zero(is_zero(new))
            .subtract(true)
            .half_carry(sub_half_borrow8_with_borrow(old, 1, 0))
    }

    fn z80_flags((old, new): (u8, u8), common: FlagChanges) -> FlagChanges {
        common
            .sign(is_negative(new))
            .parity_overflow(sub_overflow(old, 1, new))
    }

    fn cycles(&self) -> Cycles {
        self.cycles
    }
}

/// `ADD HL,rr`. Zero (and on the Z80 sign and parity) are unaffected.
#[derive(Debug, Clone)]
pub struct Add16<D, S> {
    pub dst: D,
    pub src: S,
    pub cycles: Cycles,
}

impl<D, S> Add16<D, S> {
    pub const fn new(dst: D, src: S, cycles: Cycles) -> Self {
        Self { dst, src, cycles }
    }
}

impl<D: RegisterType<u16>, S: Readable<Value = u16>> FlagRules for Add16<D, S> {
    const MNEMONIC: &'static str = "ADD";

    type Outcome = (u16, u16);

    fn execute<C: Intel8080Like>(&self, _cpu: &C) -> CoreResult<(u16, u16)> {
        let op1 = self.dst.read()?;
        let op2 = self.src.read()?;
        self.dst.write(op1.wrapping_add(op2))?;
        Ok((op1, op2))
    }

    fn common_flags((op1, op2): (u16, u16)) -> FlagChanges {
        FlagChanges::none()
            .subtract(false)
            .half_carry(add_half_carry16(op1, op2))
            .carry(add_carry16(op1, op2))
    }

    fn cycles(&self) -> Cycles {
        self.cycles
    }
}

macro_rules! step16 {
    ($(#[$meta:meta])* $name:ident, $mnemonic:literal, $step:ident) => {
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

        impl<T: RegisterType<u16>> FlagRules for $name<T> {
            const MNEMONIC: &'static str = $mnemonic;

            type Outcome = ();

            fn execute<C: Intel8080Like>(&self, _cpu: &C) -> CoreResult<()> {
                let value = self.op.read()?;
                self.op.write(value.$step(1))
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

step16!(
    /// `INC rr`. No flags.
    Inc16, "INC", wrapping_add
);

step16!(
    /// `DEC rr`. No flags.
    Dec16, "DEC", wrapping_sub
);

/// `ADD SP,e`: signed 8-bit offset added to SP. LR35902 only.
///
/// Half-carry and carry come from the low byte; Z and N are reset.
#[derive(Debug, Clone)]
pub struct AddSp<S> {
    pub offset: S,
    pub cycles: Cycles,
}

impl<S> AddSp<S> {
    pub const fn new(offset: S, cycles: Cycles) -> Self {
        Self { offset, cycles }
    }
}

impl<S: Readable<Value = u8>> Instruction<Lr35902> for AddSp<S> {
    #[instrument(level = "trace", skip_all, fields(instruction = "ADD SP"))]
    fn run_on(&self, cpu: &Lr35902) -> CoreResult<Cycles> {
        let sp = cpu.sp.get();
        let offset = self.offset.read()? as i8;
        cpu.sp.set(sp.wrapping_add_signed(i16::from(offset)));

        cpu.apply_flags(
            FlagChanges::none()
                .zero(false)
                .subtract(false)
                .half_carry(add_half_carry16_signed(sp, offset))
                .carry(add_carry16_signed(sp, offset)),
        );
        Ok(self.cycles)
    }
}
