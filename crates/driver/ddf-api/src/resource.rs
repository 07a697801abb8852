//! Hardware resource descriptors handed out by the device manager.
//!
//! A driver never invents these values: they arrive in a [`HwResourceList`]
//! from the parent device and are passed around unmodified.

use alloc::vec::Vec;
use core::fmt;

/// A contiguous range of I/O register addresses (port or memory mapped).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct IoRange {
    base: u64,
    size: u64,
}

impl IoRange {
    /// Creates a new range covering `[base, base + size)`.
    #[must_use]
    pub const fn new(base: u64, size: u64) -> Self {
        Self { base, size }
    }

    /// Returns the first address of the range.
    #[must_use]
    pub const fn base(&self) -> u64 {
        self.base
    }

    /// Returns the number of addressable bytes in the range.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns the first address past the end of the range.
    ///
    /// Saturates instead of wrapping for ranges that touch the top of the
    /// address space.
    #[must_use]
    pub const fn end(&self) -> u64 {
        self.base.saturating_add(self.size)
    }

    /// Returns `true` if `addr` lies inside the range.
    #[must_use]
    pub const fn contains(&self, addr: u64) -> bool {
        addr >= self.base && addr < self.end()
    }
}

impl fmt::Debug for IoRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:#x},{:#x})", self.base, self.end())
    }
}

/// An interrupt request line assigned to a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IrqLine(u32);

impl IrqLine {
    /// Creates a new IRQ line descriptor.
    #[must_use]
    pub const fn new(irq: u32) -> Self {
        Self(irq)
    }

    /// Returns the IRQ number.
    #[must_use]
    pub const fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for IrqLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "irq {}", self.0)
    }
}

/// An ISA DMA channel assigned to a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DmaChannel(u32);

impl DmaChannel {
    /// Creates a new DMA channel descriptor.
    #[must_use]
    pub const fn new(channel: u32) -> Self {
        Self(channel)
    }

    /// Returns the channel number.
    #[must_use]
    pub const fn number(self) -> u32 {
        self.0
    }
}

/// The parsed hardware resource list of one device instance.
///
/// Order is significant: drivers that disambiguate resources by position rely
/// on the order the parent reported them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HwResourceList {
    /// Assigned IRQ numbers.
    pub irqs: Vec<u32>,
    /// Assigned DMA channel numbers.
    pub dma_channels: Vec<u32>,
    /// Assigned I/O register ranges.
    pub io_ranges: Vec<IoRange>,
}

impl HwResourceList {
    /// Creates an empty resource list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            irqs: Vec::new(),
            dma_channels: Vec::new(),
            io_ranges: Vec::new(),
        }
    }
}
