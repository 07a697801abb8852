//! Resource negotiation with the parent device.
//!
//! The parent (normally the ISA bus driver) knows which IRQ, DMA channels and
//! I/O ranges were assigned to the card. [`query_resources`] fetches the raw
//! list, [`DeviceResources::classify`] decides which range belongs to the DSP
//! and which to the MPU-401, and which DMA channel is the 8-bit and which the
//! 16-bit one.

use ddf_api::{
    DeviceHandle, DmaChannel, HwResourceList, IoRange, IrqLine, ParentSession, ResourceAuthority,
};

use crate::error::{Sb16Error, ShapeError};
use crate::regs::{DMA_CASCADE_CHANNEL, SB16_REGS_SIZE};

/// Resources assigned to an SB16, sorted into their roles.
///
/// Every field holds a value taken unmodified from the parent's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceResources {
    /// The card's interrupt line.
    pub irq: IrqLine,
    /// DSP / mixer register range.
    pub primary: IoRange,
    /// MPU-401 register range, if the parent reported one.
    pub secondary: Option<IoRange>,
    /// 8-bit DMA channel (0-3).
    pub dma8: Option<DmaChannel>,
    /// 16-bit DMA channel (5-7).
    pub dma16: Option<DmaChannel>,
}

impl DeviceResources {
    /// Sorts a raw resource list into roles.
    ///
    /// The list must hold exactly one IRQ, one or two I/O ranges and one or
    /// two DMA channels, checked in that order.
    ///
    /// DMA channels below 4 are 8-bit and channels above 4 are 16-bit; the
    /// first channel of each kind wins. Channel 4 itself matches neither and
    /// is dropped.
    ///
    /// With two ranges, the first is the register range if it is at least
    /// [`SB16_REGS_SIZE`] bytes long, otherwise the second one is.
    ///
    /// # Errors
    ///
    /// Returns the first [`ShapeError`] the list violates.
    pub fn classify(raw: &HwResourceList) -> Result<Self, ShapeError> {
        let &[irq] = raw.irqs.as_slice() else {
            return Err(ShapeError::IrqCount(raw.irqs.len()));
        };
        if !matches!(raw.io_ranges.len(), 1 | 2) {
            return Err(ShapeError::RangeCount(raw.io_ranges.len()));
        }
        if !matches!(raw.dma_channels.len(), 1 | 2) {
            return Err(ShapeError::DmaCount(raw.dma_channels.len()));
        }

        let dma8 = raw
            .dma_channels
            .iter()
            .copied()
            .find(|&ch| ch < DMA_CASCADE_CHANNEL)
            .map(DmaChannel::new);
        let dma16 = raw
            .dma_channels
            .iter()
            .copied()
            .find(|&ch| ch > DMA_CASCADE_CHANNEL)
            .map(DmaChannel::new);

        let (primary, secondary) = match *raw.io_ranges.as_slice() {
            [only] => (only, None),
            [first, second] if first.size() >= SB16_REGS_SIZE => (first, Some(second)),
            [first, second] => (second, Some(first)),
            _ => return Err(ShapeError::RangeCount(raw.io_ranges.len())),
        };

        Ok(Self {
            irq: IrqLine::new(irq),
            primary,
            secondary,
            dma8,
            dma16,
        })
    }
}

/// Fetches the raw resource list of `device` from its parent.
///
/// The session is closed before returning, whether or not the query
/// succeeded.
///
/// # Errors
///
/// [`Sb16Error::SessionUnavailable`] if no session could be opened,
/// [`Sb16Error::AuthorityError`] if the parent failed the query.
pub fn query_resources<A: ResourceAuthority>(
    authority: &A,
    device: DeviceHandle,
) -> Result<HwResourceList, Sb16Error> {
    let mut session = authority
        .connect(device)
        .ok_or(Sb16Error::SessionUnavailable)?;
    let res = session.hw_resources();
    drop(session);
    res.map_err(Sb16Error::AuthorityError)
}

/// Asks the parent of `device` to enable its interrupt line.
///
/// Uses a session of its own, closed before returning.
///
/// # Errors
///
/// [`Sb16Error::SessionUnavailable`] if no session could be opened,
/// [`Sb16Error::InterruptEnableFailed`] if the parent refused.
pub fn enable_interrupts<A: ResourceAuthority>(
    authority: &A,
    device: DeviceHandle,
) -> Result<(), Sb16Error> {
    let mut session = authority
        .connect(device)
        .ok_or(Sb16Error::SessionUnavailable)?;
    let enabled = session.enable_interrupt();
    drop(session);
    if enabled {
        Ok(())
    } else {
        Err(Sb16Error::InterruptEnableFailed)
    }
}
