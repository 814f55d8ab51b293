//! Machine description: which CPU, and which memory regions sit on its bus.
//!
//! A [`MachineConfig`] is plain data. [`MachineConfig::build_bus`] turns it
//! into a [`DataBus`] with one [`FlatMemory`] listener per region, registered
//! in declaration order.

use crate::bus::DataBus;
use crate::cpu::{CpuVariant, Intel8080Like, Lr35902, Z80};
use crate::error::{CoreError, CoreResult};
use crate::instructions::{Cycles, Instruction};
use crate::memory::FlatMemory;
use tracing::debug;

/// Size of the fixed (unbanked) Game Boy cartridge ROM window.
pub const GAME_BOY_ROM_SIZE: usize = 0x8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Ram,
    /// Read-only; bus writes are dropped.
    Rom,
}

/// One contiguous block on the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionConfig {
    pub name: String,
    pub first: u16,
    pub last: u16,
    pub kind: RegionKind,
    /// Initial bytes from `first` on. RAM may be shorter than the region and is
    /// zero-filled past the end; ROM must cover it exactly.
    pub contents: Option<Vec<u8>>,
}

impl RegionConfig {
    pub fn ram(name: impl Into<String>, first: u16, last: u16) -> Self {
        Self {
            name: name.into(),
            first,
            last,
            kind: RegionKind::Ram,
            contents: None,
        }
    }

    pub fn rom(name: impl Into<String>, first: u16, last: u16, contents: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            first,
            last,
            kind: RegionKind::Rom,
            contents: Some(contents),
        }
    }

    #[must_use]
    pub fn with_contents(mut self, contents: Vec<u8>) -> Self {
        self.contents = Some(contents);
        self
    }

    /// Number of bytes the region covers, or `None` if `first > last`.
    pub fn size(&self) -> Option<usize> {
        (self.first <= self.last).then(|| usize::from(self.last - self.first) + 1)
    }

    fn invalid(&self) -> CoreError {
        CoreError::InvalidRegion {
            name: self.name.clone(),
            first: u32::from(self.first),
            last: u32::from(self.last),
        }
    }

    fn build(&self) -> CoreResult<FlatMemory> {
        let size = self.size().ok_or_else(|| self.invalid())?;
        let mut data = self.contents.clone().unwrap_or_default();
        match self.kind {
            RegionKind::Ram if data.len() <= size => {
                data.resize(size, 0);
                FlatMemory::new(self.name.clone(), data, self.first)
            }
            RegionKind::Rom if data.len() == size => {
                FlatMemory::rom(self.name.clone(), data, self.first)
            }
            _ => Err(self.invalid()),
        }
    }
}

/// CPU variant plus the ordered region list of its bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineConfig {
    pub cpu: CpuVariant,
    pub regions: Vec<RegionConfig>,
}

impl MachineConfig {
    pub const fn new(cpu: CpuVariant) -> Self {
        Self {
            cpu,
            regions: Vec::new(),
        }
    }

    /// A Z80 with 64 KiB of flat RAM.
    pub fn flat_z80() -> Self {
        Self::new(CpuVariant::Z80).with_region(RegionConfig::ram("ram", 0x0000, 0xFFFF))
    }

    /// The DMG memory map without banking or echo RAM.
    ///
    /// `rom` is padded with zeros to 32 KiB. Anything longer is rejected by
    /// [`build_bus`](Self::build_bus).
    pub fn game_boy(mut rom: Vec<u8>) -> Self {
        if rom.len() < GAME_BOY_ROM_SIZE {
            rom.resize(GAME_BOY_ROM_SIZE, 0);
        }
        Self::new(CpuVariant::Lr35902)
            .with_region(RegionConfig::rom("rom", 0x0000, 0x7FFF, rom))
            .with_region(RegionConfig::ram("vram", 0x8000, 0x9FFF))
            .with_region(RegionConfig::ram("eram", 0xA000, 0xBFFF))
            .with_region(RegionConfig::ram("wram", 0xC000, 0xDFFF))
            .with_region(RegionConfig::ram("oam", 0xFE00, 0xFE9F))
            .with_region(RegionConfig::ram("io", 0xFF00, 0xFF7F))
            .with_region(RegionConfig::ram("hram", 0xFF80, 0xFFFE))
            .with_region(RegionConfig::ram("ie", 0xFFFF, 0xFFFF))
    }

    #[must_use]
    pub fn with_region(mut self, region: RegionConfig) -> Self {
        self.regions.push(region);
        self
    }

    /// Validate every region and map it, in order.
    ///
    /// # Errors
    /// [`CoreError::InvalidRegion`] for a reversed range or contents that do
    /// not fit the region.
    pub fn build_bus(&self) -> CoreResult<DataBus> {
        let mut bus = DataBus::new();
        for region in &self.regions {
            bus.attach(region.build()?);
        }
        debug!("built {} bus: {:?}", self.cpu, bus);
        Ok(bus)
    }

    /// Build the configured CPU on a fresh bus.
    pub fn build(&self) -> CoreResult<Machine> {
        let bus = self.build_bus()?;
        Ok(match self.cpu {
            CpuVariant::Z80 => Machine::Z80(Z80::new(bus)),
            CpuVariant::Lr35902 => Machine::Lr35902(Lr35902::new(bus)),
        })
    }
}

impl Z80 {
    pub fn from_config(config: &MachineConfig) -> CoreResult<Self> {
        if config.cpu != CpuVariant::Z80 {
            debug!("building Z80 from a {} config", config.cpu);
        }
        Ok(Self::new(config.build_bus()?))
    }
}

impl Lr35902 {
    pub fn from_config(config: &MachineConfig) -> CoreResult<Self> {
        if config.cpu != CpuVariant::Lr35902 {
            debug!("building LR35902 from a {} config", config.cpu);
        }
        Ok(Self::new(config.build_bus()?))
    }
}

/// A CPU picked at runtime from a [`MachineConfig`].
#[derive(Debug)]
pub enum Machine {
    Z80(Z80),
    Lr35902(Lr35902),
}

impl Machine {
    pub const fn variant(&self) -> CpuVariant {
        match self {
            Self::Z80(_) => CpuVariant::Z80,
            Self::Lr35902(_) => CpuVariant::Lr35902,
        }
    }

    /// Run an instruction that exists on both variants.
    pub fn execute<I>(&self, instruction: &I) -> CoreResult<Cycles>
    where
        I: Instruction<Z80> + Instruction<Lr35902>,
    {
        match self {
            Self::Z80(cpu) => <I as Instruction<Z80>>::run_on(instruction, cpu),
            Self::Lr35902(cpu) => <I as Instruction<Lr35902>>::run_on(instruction, cpu),
        }
    }

    pub fn bus(&self) -> &DataBus {
        match self {
            Self::Z80(cpu) => cpu.bus(),
            Self::Lr35902(cpu) => cpu.bus(),
        }
    }
}
