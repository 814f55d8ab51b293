//! Flat memory blocks and the 8/16-bit "memory at address X" operands.
//!
//! A [`FlatMemory`] owns a byte buffer placed at a starting address. It can be
//! mapped on the [`DataBus`](crate::bus::DataBus) as a listener or used on its
//! own through `RefCell<FlatMemory>`, which is an
//! [`AddressSpace`](crate::bus::AddressSpace).

use crate::bus::{AddressSpace, BusListener};
use crate::bits::{high_byte, low_byte, make16};
use crate::error::{CoreError, CoreResult};
use crate::operand::{OperandKind, OperandType, Readable, Writeable};
use tracing::warn;

/// A contiguous block of RAM or ROM.
#[derive(Debug, Clone)]
pub struct FlatMemory {
    name: String,
    data: Vec<u8>,
    /// Address of the first byte of `data`.
    start: u16,
    writable: bool,
}

impl FlatMemory {
    /// Wrap `data` so that its first byte sits at `start`.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidRegion`] if `data` is empty or runs past `0xFFFF`.
    pub fn new(name: impl Into<String>, data: Vec<u8>, start: u16) -> CoreResult<Self> {
        let name = name.into();
        let last = u32::from(start) + data.len() as u32;
        if data.is_empty() || last > 0x1_0000 {
            return Err(CoreError::InvalidRegion {
                name,
                first: u32::from(start),
                last: last.saturating_sub(1),
            });
        }
        Ok(Self {
            name,
            data,
            start,
            writable: true,
        })
    }

    /// Zero-filled RAM covering `first..=last`.
    pub fn ram(name: impl Into<String>, first: u16, last: u16) -> CoreResult<Self> {
        let name = name.into();
        if first > last {
            return Err(CoreError::InvalidRegion {
                name,
                first: u32::from(first),
                last: u32::from(last),
            });
        }
        Self::new(name, vec![0; usize::from(last - first) + 1], first)
    }

    /// Read-only block. Writes are dropped, as on cartridge ROM.
    pub fn rom(name: impl Into<String>, data: Vec<u8>, start: u16) -> CoreResult<Self> {
        let mut block = Self::new(name, data, start)?;
        block.writable = false;
        Ok(block)
    }

    pub const fn start(&self) -> u16 {
        self.start
    }

    /// Highest address held by this block.
    pub fn last(&self) -> u16 {
        // Length is validated in `new`, so this cannot overflow.
        self.start + (self.data.len() - 1) as u16
    }

    pub const fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    fn offset(&self, addr: u16) -> CoreResult<usize> {
        if addr < self.start || addr > self.last() {
            return Err(CoreError::OutOfRange {
                address: addr,
                first: self.start,
                last: self.last(),
            });
        }
        Ok(usize::from(addr - self.start))
    }

    pub fn read8(&self, addr: u16) -> CoreResult<u8> {
        Ok(self.data[self.offset(addr)?])
    }

    /// Reads two bytes, low byte first.
    pub fn read16(&self, addr: u16) -> CoreResult<u16> {
        let low = self.read8(addr)?;
        let high = self.read8(addr.wrapping_add(1))?;
        Ok(make16(high, low))
    }

    pub fn write8(&mut self, addr: u16, value: u8) -> CoreResult<()> {
        let offset = self.offset(addr)?;
        if self.writable {
            self.data[offset] = value;
        } else {
            warn!(
                "dropped write {:#04X} to read-only `{}` at {:#06X}",
                value, self.name, addr
            );
        }
        Ok(())
    }

    /// Writes two bytes, low byte first.
    pub fn write16(&mut self, addr: u16, value: u16) -> CoreResult<()> {
        self.write8(addr, low_byte(value))?;
        self.write8(addr.wrapping_add(1), high_byte(value))
    }

    /// Copy `bytes` in starting at `addr`, bypassing write protection.
    pub fn load(&mut self, addr: u16, bytes: &[u8]) -> CoreResult<()> {
        let offset = self.offset(addr)?;
        let end = offset + bytes.len();
        if end > self.data.len() {
            return Err(CoreError::OutOfRange {
                address: (u32::from(addr) + bytes.len() as u32 - 1) as u16,
                first: self.start,
                last: self.last(),
            });
        }
        self.data[offset..end].copy_from_slice(bytes);
        Ok(())
    }
}

impl BusListener for FlatMemory {
    fn name(&self) -> &str {
        &self.name
    }

    fn first_address(&self) -> u16 {
        self.start
    }

    fn last_address(&self) -> u16 {
        self.last()
    }

    fn read(&self, addr: u16) -> CoreResult<u8> {
        self.read8(addr)
    }

    fn write(&mut self, addr: u16, value: u8) -> CoreResult<()> {
        self.write8(addr, value)
    }
}

/// An 8-bit window into an address space.
#[derive(Debug)]
pub struct Memory8<'a, M: ?Sized> {
    pub addr: u16,
    memory: &'a M,
}

impl<'a, M: AddressSpace + ?Sized> Memory8<'a, M> {
    pub const fn new(memory: &'a M, addr: u16) -> Self {
        Self { addr, memory }
    }
}

impl<M: AddressSpace + ?Sized> Readable for Memory8<'_, M> {
    type Value = u8;

    fn read(&self) -> CoreResult<u8> {
        self.memory.read8(self.addr)
    }
}

impl<M: AddressSpace + ?Sized> Writeable for Memory8<'_, M> {
    type Value = u8;

    fn write(&self, value: u8) -> CoreResult<()> {
        self.memory.write8(self.addr, value)
    }
}

impl<M: AddressSpace + ?Sized> OperandType for Memory8<'_, M> {
    fn operand_kind(&self) -> OperandKind {
        OperandKind::Memory8Like
    }
}

/// A 16-bit window into an address space (low byte at `addr`).
#[derive(Debug)]
pub struct Memory16<'a, M: ?Sized> {
    pub addr: u16,
    memory: &'a M,
}

impl<'a, M: AddressSpace + ?Sized> Memory16<'a, M> {
    pub const fn new(memory: &'a M, addr: u16) -> Self {
        Self { addr, memory }
    }
}

impl<M: AddressSpace + ?Sized> Readable for Memory16<'_, M> {
    type Value = u16;

    fn read(&self) -> CoreResult<u16> {
        self.memory.read16(self.addr)
    }
}

impl<M: AddressSpace + ?Sized> Writeable for Memory16<'_, M> {
    type Value = u16;

    fn write(&self, value: u16) -> CoreResult<()> {
        self.memory.write16(self.addr, value)
    }
}

impl<M: AddressSpace + ?Sized> OperandType for Memory16<'_, M> {
    fn operand_kind(&self) -> OperandKind {
        OperandKind::Memory16Like
    }
}
