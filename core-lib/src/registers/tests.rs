/// core-lib/src/registers/tests.rs
use super::{Flag, Register16, Register16Computed, Register8};
use crate::operand::{Readable, Writeable};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_register8_clone_shares_cell() {
    let b = Register8::new(0x12);
    let alias = b.clone();
    alias.write(0x34).unwrap();
    assert_eq!(b.get(), 0x34);
    assert!(b.same_cell(&alias));
    assert!(!b.same_cell(&Register8::new(0x34)));
}

#[test]
fn test_register16_read_write() {
    let sp = Register16::new(0xFFFE);
    assert_eq!(sp.read().unwrap(), 0xFFFE);
    sp.write(0xC000).unwrap();
    assert_eq!(sp.get(), 0xC000);
}

#[test]
fn test_computed_pair_is_same_storage() {
    let h = Register8::new(0x00);
    let l = Register8::new(0x00);
    let hl = Register16Computed::new(h.clone(), l.clone());

    h.set(0xC0);
    l.set(0x01);
    assert_eq!(hl.get(), 0xC001);

    hl.write(0x8000).unwrap();
    assert_eq!((h.get(), l.get()), (0x80, 0x00));
    assert!(hl.high().same_cell(&h));
    assert!(hl.low().same_cell(&l));
}

#[test]
fn test_flag_does_not_touch_siblings() {
    let f = Register8::new(0b1010_0000);
    let carry = Flag::new(f.clone(), 4);
    carry.write(true).unwrap();
    assert_eq!(f.get(), 0b1011_0000);
    carry.write(false).unwrap();
    assert_eq!(f.get(), 0b1010_0000);
    assert!(!carry.read().unwrap());
}

#[test]
fn test_flag_clear_is_repeatable() {
    let f = Register8::new(0xFF);
    let zero = Flag::new(f.clone(), 7);
    for _ in 0..3 {
        zero.set(false);
        assert!(!zero.get());
        zero.set(true);
        assert!(zero.get());
    }
    assert_eq!(f.get(), 0xFF);
}

proptest! {
    #[test]
    fn computed_read_packs_halves(h in any::<u8>(), l in any::<u8>()) {
        let pair = Register16Computed::new(Register8::new(h), Register8::new(l));
        prop_assert_eq!(pair.read().unwrap(), (u16::from(h) << 8) | u16::from(l));
    }

    #[test]
    fn computed_write_splits_halves(w in any::<u16>()) {
        let pair = Register16Computed::new(Register8::new(0), Register8::new(0));
        pair.write(w).unwrap();
        prop_assert_eq!(pair.high().get(), (w >> 8) as u8);
        prop_assert_eq!(pair.low().get(), (w & 0xFF) as u8);
    }

    #[test]
    fn flag_write_only_changes_its_bit(initial in any::<u8>(), bit in 0u8..8, value in any::<bool>()) {
        let reg = Register8::new(initial);
        let flag = Flag::new(reg.clone(), bit);
        flag.write(value).unwrap();
        prop_assert_eq!(flag.read().unwrap(), value);
        let mask = 1u8 << bit;
        prop_assert_eq!(reg.get() & !mask, initial & !mask);
    }
}
