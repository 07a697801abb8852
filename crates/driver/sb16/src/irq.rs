//! Interrupt top half and its registration.
//!
//! The SB16 raises one IRQ line for 8-bit DMA, 16-bit DMA and MPU-401
//! events. The top half selects the mixer's interrupt status register,
//! latches it into scratch slot [`STATUS_SLOT`] and acknowledges whichever
//! DMA source fired. The bottom half (see [`Sb16::handle_interrupt`]) decodes
//! the latched status.
//!
//! [`Sb16::handle_interrupt`]: crate::soft_state::Sb16::handle_interrupt

use alloc::vec;

use ddf_api::{DeviceHandle, InterruptDispatch, IrqCode, IrqCommand, IrqHandle, IrqLine};

use crate::error::Sb16Error;
use crate::regs::{MIXER_IRQ_STATUS_ADDRESS, MixerIrqStatus, offset};
use crate::resources::DeviceResources;

/// Scratch slot holding the mixer interrupt status.
pub const STATUS_SLOT: usize = 1;

/// Scratch slot receiving the (discarded) acknowledge reads.
pub const ACK_SLOT: usize = 2;

/// Number of commands in every SB16 interrupt program.
pub const IRQ_CODE_LEN: usize = 7;

/// Builds the interrupt program for a classified device.
///
/// The program has a fixed shape of [`IRQ_CODE_LEN`] commands and may only
/// touch the primary range. When a DMA channel of a kind is missing, its
/// acknowledge read is replaced by a re-read of the mixer data port, which
/// has no side effects, so the program always runs to the final `Accept`.
#[must_use]
pub fn build_irq_code(res: &DeviceResources) -> IrqCode {
    let base = res.primary.base();
    let no_ack = IrqCommand::PioRead8 { addr: base + offset::MIXER_DATA, dst: ACK_SLOT };
    let ack8 = if res.dma8.is_some() {
        IrqCommand::PioRead8 { addr: base + offset::DSP_READ_STATUS, dst: ACK_SLOT }
    } else {
        no_ack
    };
    let ack16 = if res.dma16.is_some() {
        IrqCommand::PioRead8 { addr: base + offset::DMA16_ACK, dst: ACK_SLOT }
    } else {
        no_ack
    };

    IrqCode::new(
        vec![res.primary],
        vec![
            IrqCommand::PioWrite8 {
                addr: base + offset::MIXER_ADDRESS,
                value: MIXER_IRQ_STATUS_ADDRESS,
            },
            IrqCommand::PioRead8 { addr: base + offset::MIXER_DATA, dst: STATUS_SLOT },
            IrqCommand::Predicate {
                src: STATUS_SLOT,
                mask: u32::from(MixerIrqStatus::DMA8.bits()),
                skip: 1,
            },
            ack8,
            IrqCommand::Predicate {
                src: STATUS_SLOT,
                mask: u32::from(MixerIrqStatus::DMA16.bits()),
                skip: 1,
            },
            ack16,
            IrqCommand::Accept,
        ],
    )
}

/// Tracks the interrupt registration of one device.
///
/// At most one line is bound at a time; [`unbind`](Self::unbind) is the only
/// way to release it.
#[derive(Debug, Default)]
pub struct InterruptBinder {
    bound: Option<(IrqLine, IrqHandle)>,
}

impl InterruptBinder {
    /// Creates a binder with nothing registered.
    #[must_use]
    pub const fn new() -> Self {
        Self { bound: None }
    }

    /// Returns the currently bound line, if any.
    #[must_use]
    pub fn bound(&self) -> Option<IrqLine> {
        self.bound.map(|(irq, _)| irq)
    }

    /// Registers `code` for `irq` on behalf of `device`.
    ///
    /// # Errors
    ///
    /// [`Sb16Error::HandlerRegistrationFailed`] carrying the dispatch layer's
    /// code. Binding twice without an intervening [`unbind`](Self::unbind)
    /// fails with [`DriverError::AlreadyExists`](ddf_api::DriverError::AlreadyExists)
    /// and leaves the existing registration alone.
    pub fn bind<D: InterruptDispatch>(
        &mut self,
        dispatch: &mut D,
        device: DeviceHandle,
        irq: IrqLine,
        code: &IrqCode,
    ) -> Result<IrqHandle, Sb16Error> {
        if let Some((current, _)) = self.bound {
            log::error!(target: "sb16", "{current} already bound, refusing to bind {irq}");
            return Err(Sb16Error::HandlerRegistrationFailed(
                ddf_api::DriverError::AlreadyExists,
            ));
        }
        let handle = dispatch
            .register(irq, device, code)
            .map_err(Sb16Error::HandlerRegistrationFailed)?;
        self.bound = Some((irq, handle));
        log::debug!(target: "sb16", "bound {irq} for device {}", device.0);
        Ok(handle)
    }

    /// Removes the registration of `irq`.
    ///
    /// Does nothing unless `irq` is the line this binder holds.
    pub fn unbind<D: InterruptDispatch>(&mut self, dispatch: &mut D, irq: IrqLine) {
        match self.bound {
            Some((current, _)) if current == irq => {
                dispatch.unregister(irq);
                self.bound = None;
                log::debug!(target: "sb16", "unbound {irq}");
            }
            _ => {}
        }
    }
}
