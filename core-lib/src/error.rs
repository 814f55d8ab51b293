/// core-lib/src/error.rs
use std::fmt;
use thiserror::Error;

/// Direction of a memory access, carried by bus errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}

/// Errors surfaced by bus-backed operands, memory blocks and machine configuration.
///
/// None of these are retriable: each one points at a decode or configuration
/// bug upstream, and the driver decides whether to halt emulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("unmapped address {address:#06X} on {access}")]
    UnmappedAddress { address: u16, access: AccessKind },
    #[error("address {address:#06X} outside memory window {first:#06X}..={last:#06X}")]
    OutOfRange { address: u16, first: u16, last: u16 },
    #[error("invalid region `{name}`: {first:#06X}..={last:#06X}")]
    InvalidRegion { name: String, first: u32, last: u32 },
    #[error("bus listener at {address:#06X} re-entered during an access")]
    ListenerBusy { address: u16 },
}

pub type CoreResult<T> = Result<T, CoreError>;
