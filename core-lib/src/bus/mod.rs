//! Address routing between the CPU and whatever owns each address range.
//!
//! The [`DataBus`] keeps listeners in registration order and forwards every
//! byte access to the first listener whose inclusive range contains the
//! address. Unclaimed addresses fail with [`CoreError::UnmappedAddress`].

use crate::bits::{high_byte, low_byte, make16};
use crate::error::{AccessKind, CoreError, CoreResult};
use std::cell::RefCell;
use std::fmt;
use std::ops::RangeInclusive;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// A component that claims a contiguous address range on the bus.
pub trait BusListener {
    /// Human-readable name used in logs.
    fn name(&self) -> &str {
        "listener"
    }

    /// First owned address (inclusive).
    fn first_address(&self) -> u16;

    /// Last owned address (inclusive).
    fn last_address(&self) -> u16;

    fn address_range(&self) -> RangeInclusive<u16> {
        self.first_address()..=self.last_address()
    }

    fn read(&self, addr: u16) -> CoreResult<u8>;

    fn write(&mut self, addr: u16, value: u8) -> CoreResult<()>;
}

/// Byte-addressable memory, with 16-bit access composed from two byte accesses.
pub trait AddressSpace {
    fn read8(&self, addr: u16) -> CoreResult<u8>;

    fn write8(&self, addr: u16, value: u8) -> CoreResult<()>;

    /// Read a 16-bit value in little-endian format (low byte first).
    fn read16(&self, addr: u16) -> CoreResult<u16> {
        let low = self.read8(addr)?;
        let high = self.read8(addr.wrapping_add(1))?;
        Ok(make16(high, low))
    }

    /// Write a 16-bit value in little-endian format (low byte first).
    fn write16(&self, addr: u16, value: u16) -> CoreResult<()> {
        self.write8(addr, low_byte(value))?;
        self.write8(addr.wrapping_add(1), high_byte(value))
    }
}

/// A standalone listener behind a `RefCell` is itself an address space.
impl<L: BusListener + ?Sized> AddressSpace for RefCell<L> {
    fn read8(&self, addr: u16) -> CoreResult<u8> {
        let listener = self
            .try_borrow()
            .map_err(|_| CoreError::ListenerBusy { address: addr })?;
        listener.read(addr)
    }

    fn write8(&self, addr: u16, value: u8) -> CoreResult<()> {
        let mut listener = self
            .try_borrow_mut()
            .map_err(|_| CoreError::ListenerBusy { address: addr })?;
        listener.write(addr, value)
    }
}

pub type SharedListener = Rc<RefCell<dyn BusListener>>;

struct Mapping {
    range: RangeInclusive<u16>,
    name: String,
    listener: SharedListener,
}

/// The single routing authority for loads and stores by address.
#[derive(Default)]
pub struct DataBus {
    mappings: Vec<Mapping>,
}

impl DataBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Earlier registrations win on overlapping ranges.
    pub fn register(&mut self, listener: SharedListener) {
        let (range, name) = {
            let l = listener.borrow();
            (l.address_range(), l.name().to_owned())
        };
        if let Some(existing) = self
            .mappings
            .iter()
            .find(|m| m.range.start() <= range.end() && range.start() <= m.range.end())
        {
            debug!(
                "listener `{}` overlaps `{}`; `{}` keeps priority",
                name, existing.name, existing.name
            );
        }
        debug!(
            "mapped `{}` at {:#06X}..={:#06X}",
            name,
            range.start(),
            range.end()
        );
        self.mappings.push(Mapping {
            range,
            name,
            listener,
        });
    }

    /// Take ownership of `listener`, register it and hand back a shared handle.
    pub fn attach<L: BusListener + 'static>(&mut self, listener: L) -> Rc<RefCell<L>> {
        let shared = Rc::new(RefCell::new(listener));
        self.register(shared.clone());
        shared
    }

    /// Names and ranges in registration order.
    pub fn mapped_ranges(&self) -> impl Iterator<Item = (&str, RangeInclusive<u16>)> + '_ {
        self.mappings
            .iter()
            .map(|m| (m.name.as_str(), m.range.clone()))
    }

    pub fn is_mapped(&self, addr: u16) -> bool {
        self.mappings.iter().any(|m| m.range.contains(&addr))
    }

    fn route(&self, addr: u16, access: AccessKind) -> CoreResult<&Mapping> {
        self.mappings
            .iter()
            .find(|m| m.range.contains(&addr))
            .ok_or_else(|| {
                warn!("unmapped {} at {:#06X}", access, addr);
                CoreError::UnmappedAddress {
                    address: addr,
                    access,
                }
            })
    }

    pub fn read(&self, addr: u16) -> CoreResult<u8> {
        let mapping = self.route(addr, AccessKind::Read)?;
        let value = mapping
            .listener
            .try_borrow()
            .map_err(|_| CoreError::ListenerBusy { address: addr })?
            .read(addr)?;
        trace!("read {:#06X} -> {:#04X} ({})", addr, value, mapping.name);
        Ok(value)
    }

    pub fn write(&self, addr: u16, value: u8) -> CoreResult<()> {
        let mapping = self.route(addr, AccessKind::Write)?;
        trace!("write {:#06X} <- {:#04X} ({})", addr, value, mapping.name);
        mapping
            .listener
            .try_borrow_mut()
            .map_err(|_| CoreError::ListenerBusy { address: addr })?
            .write(addr, value)
    }
}

impl AddressSpace for DataBus {
    fn read8(&self, addr: u16) -> CoreResult<u8> {
        self.read(addr)
    }

    fn write8(&self, addr: u16, value: u8) -> CoreResult<()> {
        self.write(addr, value)
    }
}

impl fmt::Debug for DataBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for m in &self.mappings {
            list.entry(&format_args!(
                "{} {:#06X}..={:#06X}",
                m.name,
                m.range.start(),
                m.range.end()
            ));
        }
        list.finish()
    }
}
