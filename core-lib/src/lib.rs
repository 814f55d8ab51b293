//! Operand, register, flag and bus core shared by Z80 and Game Boy (LR35902)
//! CPU emulation.
//!
//! Instructions are written once against the [`operand`] traits and run on
//! either [`cpu::Z80`] or [`cpu::Lr35902`]; memory accesses go through the
//! [`bus::DataBus`].

pub mod addressing;
pub mod bits;
pub mod bus;
pub mod config;
pub mod cpu;
pub mod error;
pub mod instructions;
pub mod memory;
pub mod operand;
pub mod registers;

// Re-export common types
pub use addressing::{CanActAsPointer, Pointer, PseudoPointer16, PseudoPointer8};
pub use bus::{AddressSpace, BusListener, DataBus};
pub use config::{Machine, MachineConfig, RegionConfig, RegionKind};
pub use cpu::{CpuVariant, FlagChanges, Intel8080Like, Lr35902, Lr35902Flags, Z80Flags, Z80};
pub use error::{AccessKind, CoreError, CoreResult};
pub use instructions::{Cycles, FlagRules, Instruction};
pub use memory::{FlatMemory, Memory16, Memory8};
pub use operand::{
    Immediate16, Immediate8, OperandKind, OperandType, Readable, RegisterType, Writeable,
};
pub use registers::{Flag, Register16, Register16Computed, Register8};
