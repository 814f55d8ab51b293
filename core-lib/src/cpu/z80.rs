use super::flags::{bit_index, FlagChanges, Z80Flags};
use super::{apply_common_flags, CpuVariant, Intel8080Like};
use crate::bus::DataBus;
use crate::registers::{Flag, Register16, Register16Computed, Register8};
use std::fmt;
use tracing::debug;

/// Zilog Z80 register file.
///
/// The pairs and flags are views over the 8-bit registers, built once here.
pub struct Z80 {
    pub a: Register8,
    pub f: Register8,
    pub b: Register8,
    pub c: Register8,
    pub d: Register8,
    pub e: Register8,
    pub h: Register8,
    pub l: Register8,
    /// Interrupt vector base.
    pub i: Register8,
    /// Memory refresh counter.
    pub r: Register8,

    pub af: Register16Computed,
    pub bc: Register16Computed,
    pub de: Register16Computed,
    pub hl: Register16Computed,

    pub ix: Register16,
    pub iy: Register16,
    pub sp: Register16,
    pub pc: Register16,

    pub sf: Flag,
    pub zf: Flag,
    pub hf: Flag,
    pub pvf: Flag,
    pub nf: Flag,
    pub cf: Flag,

    bus: DataBus,
}

impl Z80 {
    pub fn new(bus: DataBus) -> Self {
        debug!("Initializing Z80 on bus {:?}", bus);
        let [a, f, b, c, d, e, h, l, i, r] = std::array::from_fn(|_| Register8::default());
        let flag = |mask: Z80Flags| Flag::new(f.clone(), bit_index(mask.bits()));

        Self {
            af: Register16Computed::new(a.clone(), f.clone()),
            bc: Register16Computed::new(b.clone(), c.clone()),
            de: Register16Computed::new(d.clone(), e.clone()),
            hl: Register16Computed::new(h.clone(), l.clone()),
            ix: Register16::default(),
            iy: Register16::default(),
            sp: Register16::default(),
            pc: Register16::default(),
            sf: flag(Z80Flags::SIGN),
            zf: flag(Z80Flags::ZERO),
            hf: flag(Z80Flags::HALF_CARRY),
            pvf: flag(Z80Flags::PARITY_OVERFLOW),
            nf: flag(Z80Flags::SUBTRACT),
            cf: flag(Z80Flags::CARRY),
            a,
            f,
            b,
            c,
            d,
            e,
            h,
            l,
            i,
            r,
            bus,
        }
    }

    /// Current `F` register as typed flags.
    pub fn flags(&self) -> Z80Flags {
        Z80Flags::from_bits_retain(self.f.get())
    }

    pub fn set_flags(&self, flags: Z80Flags) {
        self.f.set(flags.bits());
    }

    pub fn bus_mut(&mut self) -> &mut DataBus {
        &mut self.bus
    }
}

impl Intel8080Like for Z80 {
    const VARIANT: CpuVariant = CpuVariant::Z80;

    fn a(&self) -> &Register8 {
        &self.a
    }

    fn f(&self) -> &Register8 {
        &self.f
    }

    fn bc(&self) -> &Register16Computed {
        &self.bc
    }

    fn de(&self) -> &Register16Computed {
        &self.de
    }

    fn hl(&self) -> &Register16Computed {
        &self.hl
    }

    fn sp(&self) -> &Register16 {
        &self.sp
    }

    fn pc(&self) -> &Register16 {
        &self.pc
    }

    fn zf(&self) -> &Flag {
        &self.zf
    }

    fn nf(&self) -> &Flag {
        &self.nf
    }

    fn hf(&self) -> &Flag {
        &self.hf
    }

    fn cf(&self) -> &Flag {
        &self.cf
    }

    fn bus(&self) -> &DataBus {
        &self.bus
    }

    fn apply_flags(&self, changes: FlagChanges) {
        apply_common_flags(self, changes);
        if let Some(sign) = changes.sign {
            self.sf.set(sign);
        }
        if let Some(parity_overflow) = changes.parity_overflow {
            self.pvf.set(parity_overflow);
        }
    }
}

impl fmt::Debug for Z80 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Z80")
            .field("af", &format_args!("{:#06X}", self.af.get()))
            .field("bc", &format_args!("{:#06X}", self.bc.get()))
            .field("de", &format_args!("{:#06X}", self.de.get()))
            .field("hl", &format_args!("{:#06X}", self.hl.get()))
            .field("ix", &format_args!("{:#06X}", self.ix.get()))
            .field("iy", &format_args!("{:#06X}", self.iy.get()))
            .field("sp", &format_args!("{:#06X}", self.sp.get()))
            .field("pc", &format_args!("{:#06X}", self.pc.get()))
            .field("flags", &self.flags())
            .finish_non_exhaustive()
    }
}
