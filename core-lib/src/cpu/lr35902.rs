use super::flags::{bit_index, FlagChanges, Lr35902Flags};
use super::{apply_common_flags, CpuVariant, Intel8080Like};
use crate::bus::DataBus;
use crate::registers::{Flag, Register16, Register16Computed, Register8};
use std::fmt;
use tracing::{debug, trace};

/// Game Boy CPU register file.
pub struct Lr35902 {
    pub a: Register8,
    pub f: Register8,
    pub b: Register8,
    pub c: Register8,
    pub d: Register8,
    pub e: Register8,
    pub h: Register8,
    pub l: Register8,

    pub af: Register16Computed,
    pub bc: Register16Computed,
    pub de: Register16Computed,
    pub hl: Register16Computed,

    pub sp: Register16,
    pub pc: Register16,

    pub zf: Flag,
    pub nf: Flag,
    pub hf: Flag,
    pub cf: Flag,

    bus: DataBus,
}

impl Lr35902 {
    pub fn new(bus: DataBus) -> Self {
        debug!("Initializing LR35902 on bus {:?}", bus);
        let [a, f, b, c, d, e, h, l] = std::array::from_fn(|_| Register8::default());
        let flag = |mask: Lr35902Flags| Flag::new(f.clone(), bit_index(mask.bits()));

        Self {
            af: Register16Computed::new(a.clone(), f.clone()),
            bc: Register16Computed::new(b.clone(), c.clone()),
            de: Register16Computed::new(d.clone(), e.clone()),
            hl: Register16Computed::new(h.clone(), l.clone()),
            sp: Register16::default(),
            pc: Register16::default(),
            zf: flag(Lr35902Flags::ZERO),
            nf: flag(Lr35902Flags::SUBTRACT),
            hf: flag(Lr35902Flags::HALF_CARRY),
            cf: flag(Lr35902Flags::CARRY),
            a,
            f,
            b,
            c,
            d,
            e,
            h,
            l,
            bus,
        }
    }

    /// Register values after the DMG boot ROM hands over to the cartridge.
    pub fn reset_post_boot(&self) {
        self.af.set(0x01B0);
        self.bc.set(0x0013);
        self.de.set(0x00D8);
        self.hl.set(0x014D);
        self.sp.set(0xFFFE);
        self.pc.set(0x0100);
    }

    pub fn flags(&self) -> Lr35902Flags {
        Lr35902Flags::from_bits_retain(self.f.get())
    }

    pub fn set_flags(&self, flags: Lr35902Flags) {
        self.f.set(flags.bits());
    }

    pub fn bus_mut(&mut self) -> &mut DataBus {
        &mut self.bus
    }
}

impl Intel8080Like for Lr35902 {
    const VARIANT: CpuVariant = CpuVariant::Lr35902;

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
        if changes.sign.is_some() || changes.parity_overflow.is_some() {
            trace!("LR35902 has no sign or parity flag; ignoring");
        }
        apply_common_flags(self, changes);
    }
}

impl fmt::Debug for Lr35902 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lr35902")
            .field("af", &format_args!("{:#06X}", self.af.get()))
            .field("bc", &format_args!("{:#06X}", self.bc.get()))
            .field("de", &format_args!("{:#06X}", self.de.get()))
            .field("hl", &format_args!("{:#06X}", self.hl.get()))
            .field("sp", &format_args!("{:#06X}", self.sp.get()))
            .field("pc", &format_args!("{:#06X}", self.pc.get()))
            .field("flags", &self.flags())
            .finish_non_exhaustive()
    }
}
