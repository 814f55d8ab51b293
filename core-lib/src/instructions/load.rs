use super::{Cycles, FlagRules};
use crate::cpu::{FlagChanges, Intel8080Like};
use crate::error::CoreResult;
use crate::operand::{Readable, Writeable};

/// `LD dst,src` at either width. No flags.
#[derive(Debug, Clone)]
pub struct Ld<D, S> {
    pub dst: D,
    pub src: S,
    pub cycles: Cycles,
}

impl<D, S> Ld<D, S> {
    pub const fn new(dst: D, src: S, cycles: Cycles) -> Self {
        Self { dst, src, cycles }
    }
}

impl<D, S> FlagRules for Ld<D, S>
where
    S: Readable,
    D: Writeable<Value = S::Value>,
{
    const MNEMONIC: &'static str = "LD";

    type Outcome = ();

    fn execute<C: Intel8080Like>(&self, _cpu: &C) -> CoreResult<()> {
        self.dst.write(self.src.read()?)
    }

    fn common_flags((): ()) -> FlagChanges {
        FlagChanges::none()
    }

    fn cycles(&self) -> Cycles {
        self.cycles
    }
}
