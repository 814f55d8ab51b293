/// core-lib/src/instructions/tests.rs
use super::{
    Adc, Add, Add16, AddSp, And, Bit, Ccf, Cp, Cpl, Dec, Dec16, Inc, Inc16, Instruction, Ld, Or,
    Res, Rl, Rlc, Rr, Rrc, Sbc, Scf, Set, Sla, Sll, Sra, Srl, Sub, Swap, Xor,
};
use crate::addressing::{Pointer, PseudoPointer16, PseudoPointer8};
use crate::bus::DataBus;
use crate::cpu::{Intel8080Like, Lr35902, Lr35902Flags, Z80Flags, Z80};
use crate::error::{AccessKind, CoreError};
use crate::memory::{FlatMemory, Memory16};
use crate::operand::{Immediate16, Immediate8};
use crate::tracing_init;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use test_case::test_case;

fn ram_bus() -> DataBus {
    let mut bus = DataBus::new();
    bus.attach(FlatMemory::ram("ram", 0x0000, 0xFFFF).unwrap());
    bus
}

fn z80() -> Z80 {
    tracing_init::init();
    Z80::new(ram_bus())
}

fn gb() -> Lr35902 {
    tracing_init::init();
    Lr35902::new(ram_bus())
}

#[test]
fn test_sla_register_z80() {
    let cpu = z80();
    cpu.b.set(0x85);

    let cycles = Sla::new(&cpu.b, 8).run_on(&cpu).unwrap();

    assert_eq!(cycles, 8);
    assert_eq!(cpu.b.get(), 0x0A);
    // 0x0A has two bits set: even parity.
    assert_eq!(cpu.flags(), Z80Flags::CARRY | Z80Flags::PARITY_OVERFLOW);
}

#[test]
fn test_sla_register_lr35902() {
    let cpu = gb();
    cpu.b.set(0x85);

    Sla::new(&cpu.b, 8).run_on(&cpu).unwrap();

    assert_eq!(cpu.b.get(), 0x0A);
    assert_eq!(cpu.flags(), Lr35902Flags::CARRY);
}

#[test]
fn test_sla_through_hl_pointer() {
    let cpu = gb();
    cpu.hl.set(0xC000);
    cpu.bus().write(0xC000, 0x80).unwrap();

    let op = Pointer::new(&cpu.hl, cpu.bus());
    Sla::new(op, 16).run_on(&cpu).unwrap();

    assert_eq!(cpu.bus().read(0xC000).unwrap(), 0x00);
    assert!(cpu.zf.get());
    assert!(cpu.cf.get());
}

#[test_case(0x01, false, 0x00, true ; "sra keeps bit 7 clear")]
#[test_case(0x81, false, 0xC0, true ; "sra keeps bit 7 set")]
fn test_sra(value: u8, carry_in: bool, expected: u8, carry_out: bool) {
    let cpu = gb();
    cpu.a.set(value);
    cpu.cf.set(carry_in);
    Sra::new(&cpu.a, 8).run_on(&cpu).unwrap();
    assert_eq!(cpu.a.get(), expected);
    assert_eq!(cpu.cf.get(), carry_out);
}

#[test]
fn test_srl_clears_bit_7() {
    let cpu = gb();
    cpu.a.set(0x81);
    Srl::new(&cpu.a, 8).run_on(&cpu).unwrap();
    assert_eq!(cpu.a.get(), 0x40);
    assert!(cpu.cf.get());
}

#[test]
fn test_rotates_use_carry_only_when_through() {
    let cpu = gb();

    cpu.a.set(0x80);
    cpu.cf.set(false);
    Rlc::new(&cpu.a, 8).run_on(&cpu).unwrap();
    assert_eq!(cpu.a.get(), 0x01);
    assert!(cpu.cf.get());

    cpu.a.set(0x80);
    cpu.cf.set(false);
    Rl::new(&cpu.a, 8).run_on(&cpu).unwrap();
    assert_eq!(cpu.a.get(), 0x00);
    assert!(cpu.cf.get());
    assert!(cpu.zf.get());

    cpu.a.set(0x01);
    cpu.cf.set(true);
    Rr::new(&cpu.a, 8).run_on(&cpu).unwrap();
    assert_eq!(cpu.a.get(), 0x80);
    assert!(cpu.cf.get());

    cpu.a.set(0x01);
    cpu.cf.set(false);
    Rrc::new(&cpu.a, 8).run_on(&cpu).unwrap();
    assert_eq!(cpu.a.get(), 0x80);
    assert!(cpu.cf.get());
}

#[test]
fn test_swap_resets_carry() {
    let cpu = gb();
    cpu.c.set(0xF0);
    cpu.cf.set(true);
    Swap::new(&cpu.c, 8).run_on(&cpu).unwrap();
    assert_eq!(cpu.c.get(), 0x0F);
    assert_eq!(cpu.flags(), Lr35902Flags::empty());
}

#[test]
fn test_sll_sets_bit_0() {
    let cpu = z80();
    cpu.d.set(0x80);
    Sll::new(&cpu.d, 8).run_on(&cpu).unwrap();
    assert_eq!(cpu.d.get(), 0x01);
    assert_eq!(cpu.flags(), Z80Flags::CARRY);
}

#[test_case(0x0F, 0x01, 0x10, Lr35902Flags::HALF_CARRY ; "half carry")]
#[test_case(0xFF, 0x01, 0x00, Lr35902Flags::ZERO | Lr35902Flags::HALF_CARRY | Lr35902Flags::CARRY ; "wrap to zero")]
#[test_case(0x12, 0x34, 0x46, Lr35902Flags::empty() ; "no carry")]
fn test_add(a: u8, b: u8, result: u8, flags: Lr35902Flags) {
    let cpu = gb();
    cpu.a.set(a);
    cpu.b.set(b);
    Add::new(&cpu.a, &cpu.b, 4).run_on(&cpu).unwrap();
    assert_eq!(cpu.a.get(), result);
    assert_eq!(cpu.flags(), flags);
}

#[test]
fn test_add_signed_overflow_z80() {
    let cpu = z80();
    cpu.a.set(0x7F);
    Add::new(&cpu.a, Immediate8(0x01), 7).run_on(&cpu).unwrap();
    assert_eq!(cpu.a.get(), 0x80);
    assert_eq!(
        cpu.flags(),
        Z80Flags::SIGN | Z80Flags::HALF_CARRY | Z80Flags::PARITY_OVERFLOW
    );
}

#[test]
fn test_adc_consumes_carry() {
    let cpu = gb();
    cpu.a.set(0x0E);
    cpu.cf.set(true);
    Adc::new(&cpu.a, Immediate8(0x01), 8).run_on(&cpu).unwrap();
    assert_eq!(cpu.a.get(), 0x10);
    assert_eq!(cpu.flags(), Lr35902Flags::HALF_CARRY);
}

#[test]
fn test_sub_sets_subtract_and_half_borrow() {
    let cpu = gb();
    cpu.a.set(0x10);
    Sub::new(&cpu.a, Immediate8(0x01), 8).run_on(&cpu).unwrap();
    assert_eq!(cpu.a.get(), 0x0F);
    assert_eq!(
        cpu.flags(),
        Lr35902Flags::SUBTRACT | Lr35902Flags::HALF_CARRY
    );
}

#[test]
fn test_sbc_borrows_through_zero() {
    let cpu = z80();
    cpu.a.set(0x00);
    cpu.cf.set(true);
    Sbc::new(&cpu.a, Immediate8(0x00), 7).run_on(&cpu).unwrap();
    assert_eq!(cpu.a.get(), 0xFF);
    assert_eq!(
        cpu.flags(),
        Z80Flags::SIGN | Z80Flags::HALF_CARRY | Z80Flags::SUBTRACT | Z80Flags::CARRY
    );
}

#[test]
fn test_cp_leaves_accumulator() {
    let cpu = gb();
    cpu.a.set(0x42);
    Cp::new(&cpu.a, Immediate8(0x42), 8).run_on(&cpu).unwrap();
    assert_eq!(cpu.a.get(), 0x42);
    assert_eq!(cpu.flags(), Lr35902Flags::ZERO | Lr35902Flags::SUBTRACT);
}

#[test]
fn test_logic_flags() {
    let cpu = z80();
    cpu.a.set(0xF0);
    And::new(&cpu.a, Immediate8(0x30), 7).run_on(&cpu).unwrap();
    assert_eq!(cpu.a.get(), 0x30);
    assert_eq!(cpu.flags(), Z80Flags::HALF_CARRY | Z80Flags::PARITY_OVERFLOW);

    cpu.cf.set(true);
    Or::new(&cpu.a, Immediate8(0x01), 7).run_on(&cpu).unwrap();
    assert_eq!(cpu.a.get(), 0x31);
    assert_eq!(cpu.flags(), Z80Flags::empty());

    Xor::new(&cpu.a, &cpu.a, 4).run_on(&cpu).unwrap();
    assert_eq!(cpu.a.get(), 0x00);
    assert_eq!(cpu.flags(), Z80Flags::ZERO | Z80Flags::PARITY_OVERFLOW);
}

#[test]
fn test_inc_dec_leave_carry_alone() {
    let cpu = gb();
    cpu.cf.set(true);
    cpu.e.set(0x0F);

    Inc::new(&cpu.e, 4).run_on(&cpu).unwrap();
    assert_eq!(cpu.e.get(), 0x10);
    assert_eq!(cpu.flags(), Lr35902Flags::HALF_CARRY | Lr35902Flags::CARRY);

    Dec::new(&cpu.e, 4).run_on(&cpu).unwrap();
    assert_eq!(cpu.e.get(), 0x0F);
    assert_eq!(
        cpu.flags(),
        Lr35902Flags::SUBTRACT | Lr35902Flags::HALF_CARRY | Lr35902Flags::CARRY
    );
}

#[test]
fn test_inc_dec_overflow_z80() {
    let cpu = z80();
    cpu.h.set(0x7F);
    Inc::new(&cpu.h, 4).run_on(&cpu).unwrap();
    assert!(cpu.pvf.get());
    assert!(cpu.sf.get());

    Dec::new(&cpu.h, 4).run_on(&cpu).unwrap();
    assert_eq!(cpu.h.get(), 0x7F);
    assert!(cpu.pvf.get());
    assert!(!cpu.sf.get());
}

#[test]
fn test_add16_leaves_zero_alone() {
    let cpu = gb();
    cpu.zf.set(true);
    cpu.hl.set(0x0FFF);
    cpu.bc.set(0x0001);

    Add16::new(&cpu.hl, &cpu.bc, 8).run_on(&cpu).unwrap();

    assert_eq!(cpu.hl.get(), 0x1000);
    assert_eq!(cpu.flags(), Lr35902Flags::ZERO | Lr35902Flags::HALF_CARRY);
}

#[test]
fn test_add16_carry() {
    let cpu = z80();
    cpu.hl.set(0xFFFF);
    cpu.de.set(0x0001);
    Add16::new(&cpu.hl, &cpu.de, 11).run_on(&cpu).unwrap();
    assert_eq!(cpu.hl.get(), 0x0000);
    assert!(cpu.cf.get());
    assert!(!cpu.zf.get());
}

#[test]
fn test_inc16_dec16_wrap_without_flags() {
    let cpu = gb();
    cpu.sp.set(0xFFFF);
    cpu.set_flags(Lr35902Flags::all());

    Inc16::new(&cpu.sp, 8).run_on(&cpu).unwrap();
    assert_eq!(cpu.sp.get(), 0x0000);
    Dec16::new(&cpu.sp, 8).run_on(&cpu).unwrap();
    Dec16::new(&cpu.bc, 8).run_on(&cpu).unwrap();

    assert_eq!(cpu.sp.get(), 0xFFFF);
    assert_eq!(cpu.bc.get(), 0xFFFF);
    assert_eq!(cpu.flags(), Lr35902Flags::all());
}

#[test_case(0xFFF8, 0x08, 0x0000, true, true ; "positive offset carries out of low byte")]
#[test_case(0x0005, 0xFF, 0x0004, true, true ; "minus one")]
#[test_case(0x1000, 0x01, 0x1001, false, false ; "no carry")]
fn test_add_sp(sp: u16, offset: u8, expected: u16, half_carry: bool, carry: bool) {
    let cpu = gb();
    cpu.sp.set(sp);
    cpu.zf.set(true);
    cpu.nf.set(true);

    AddSp::new(Immediate8(offset), 16).run_on(&cpu).unwrap();

    assert_eq!(cpu.sp.get(), expected);
    assert!(!cpu.zf.get());
    assert!(!cpu.nf.get());
    assert_eq!(cpu.hf.get(), half_carry);
    assert_eq!(cpu.cf.get(), carry);
}

#[test]
fn test_bit_7_on_both_variants() {
    let z = z80();
    z.a.set(0x80);
    Bit::new(7, &z.a, 8).run_on(&z).unwrap();
    assert_eq!(z.flags(), Z80Flags::SIGN | Z80Flags::HALF_CARRY);

    let g = gb();
    g.a.set(0x7F);
    g.cf.set(true);
    Bit::new(7, &g.a, 8).run_on(&g).unwrap();
    assert_eq!(
        g.flags(),
        Lr35902Flags::ZERO | Lr35902Flags::HALF_CARRY | Lr35902Flags::CARRY
    );
}

#[test]
fn test_set_res_through_pseudo_pointer() {
    let cpu = gb();
    let op = PseudoPointer8::new(0xFF00, Immediate8(0x80), cpu.bus());

    Set::new(3, &op, 16).run_on(&cpu).unwrap();
    assert_eq!(cpu.bus().read(0xFF80).unwrap(), 0x08);

    Res::new(3, &op, 16).run_on(&cpu).unwrap();
    assert_eq!(cpu.bus().read(0xFF80).unwrap(), 0x00);
    assert_eq!(cpu.flags(), Lr35902Flags::empty());
}

#[test]
fn test_cpl_scf() {
    let cpu = gb();
    cpu.a.set(0x35);
    Cpl { cycles: 4 }.run_on(&cpu).unwrap();
    assert_eq!(cpu.a.get(), 0xCA);
    assert_eq!(
        cpu.flags(),
        Lr35902Flags::SUBTRACT | Lr35902Flags::HALF_CARRY
    );

    Scf { cycles: 4 }.run_on(&cpu).unwrap();
    assert_eq!(cpu.flags(), Lr35902Flags::CARRY);
}

#[test]
fn test_ccf_half_carry_differs_by_variant() {
    let z = z80();
    z.cf.set(true);
    Ccf { cycles: 4 }.run_on(&z).unwrap();
    assert!(!z.cf.get());
    assert!(z.hf.get());

    let g = gb();
    g.cf.set(true);
    g.hf.set(true);
    Ccf { cycles: 4 }.run_on(&g).unwrap();
    assert!(!g.cf.get());
    assert!(!g.hf.get());
}

#[test]
fn test_ld_between_widths_and_locations() {
    let cpu = z80();
    Ld::new(&cpu.a, Immediate8(0x42), 7).run_on(&cpu).unwrap();
    assert_eq!(cpu.a.get(), 0x42);

    Ld::new(&cpu.hl, Immediate16(0xC000), 10).run_on(&cpu).unwrap();
    Ld::new(Pointer::new(&cpu.hl, cpu.bus()), &cpu.a, 7)
        .run_on(&cpu)
        .unwrap();
    assert_eq!(cpu.bus().read(0xC000).unwrap(), 0x42);

    cpu.sp.set(0xBEEF);
    Ld::new(Memory16::new(cpu.bus(), 0xD000), &cpu.sp, 20)
        .run_on(&cpu)
        .unwrap();
    assert_eq!(cpu.bus().read(0xD000).unwrap(), 0xEF);
    assert_eq!(cpu.bus().read(0xD001).unwrap(), 0xBE);

    let word = PseudoPointer16::new(0xD000, Immediate8(0x00), cpu.bus());
    Ld::new(&cpu.bc, &word, 20).run_on(&cpu).unwrap();
    assert_eq!(cpu.bc.get(), 0xBEEF);
    assert_eq!(cpu.flags(), Z80Flags::empty());
}

#[test]
fn test_unmapped_operand_fails_without_touching_flags() {
    tracing_init::init();
    let mut bus = DataBus::new();
    bus.attach(FlatMemory::ram("wram", 0xC000, 0xDFFF).unwrap());
    let cpu = Lr35902::new(bus);
    cpu.hl.set(0xFEA0);
    cpu.set_flags(Lr35902Flags::CARRY);

    let err = Sla::new(Pointer::new(&cpu.hl, cpu.bus()), 16)
        .run_on(&cpu)
        .unwrap_err();

    assert_eq!(
        err,
        CoreError::UnmappedAddress {
            address: 0xFEA0,
            access: AccessKind::Read
        }
    );
    assert_eq!(cpu.flags(), Lr35902Flags::CARRY);
}

#[test]
fn test_rom_target_keeps_value_but_sets_flags() {
    tracing_init::init();
    let mut bus = DataBus::new();
    bus.attach(FlatMemory::rom("rom", vec![0x85; 0x100], 0x0000).unwrap());
    let cpu = Lr35902::new(bus);

    Sla::new(Pointer::new(Immediate16(0x0010), cpu.bus()), 16)
        .run_on(&cpu)
        .unwrap();

    assert_eq!(cpu.bus().read(0x0010).unwrap(), 0x85);
    assert!(cpu.cf.get());
}

proptest! {
    #[test]
    fn prop_sub_then_add_restores_accumulator(a in any::<u8>(), b in any::<u8>()) {
        let cpu = gb();
        cpu.a.set(a);
        Sub::new(&cpu.a, Immediate8(b), 8).run_on(&cpu).unwrap();
        Add::new(&cpu.a, Immediate8(b), 8).run_on(&cpu).unwrap();
        prop_assert_eq!(cpu.a.get(), a);
    }

    #[test]
    fn prop_z80_and_lr35902_agree_on_common_flags(value in any::<u8>(), carry in any::<bool>()) {
        let z = z80();
        let g = gb();
        for a in [z.a(), g.a()] {
            a.set(value);
        }
        z.cf.set(carry);
        g.cf.set(carry);

        Rl::new(&z.a, 8).run_on(&z).unwrap();
        Rl::new(&g.a, 8).run_on(&g).unwrap();

        prop_assert_eq!(z.a.get(), g.a.get());
        prop_assert_eq!(z.zf.get(), g.zf.get());
        prop_assert_eq!(z.nf.get(), g.nf.get());
        prop_assert_eq!(z.hf.get(), g.hf.get());
        prop_assert_eq!(z.cf.get(), g.cf.get());
    }
}
