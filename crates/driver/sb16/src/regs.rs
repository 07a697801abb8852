//! Sound Blaster 16 register definitions.
//!
//! The register block is 16 bytes of byte-wide I/O ports starting at the
//! card's base address (usually 0x220). The MPU-401 MIDI interface lives in
//! a separate two-port range (usually 0x330).

use core::mem::{offset_of, size_of};

use bitflags::bitflags;

// ---------------------------------------------------------------------------
// Register block
// ---------------------------------------------------------------------------

/// SB16 register block layout. Only used for offsets and size.
#[repr(C)]
#[allow(dead_code)]
pub struct Sb16Regs {
    /// FM synthesizer address / status (left). 0x0
    fm_address_status: u8,
    /// FM synthesizer data (left). 0x1
    fm_data: u8,
    /// Advanced FM address / status (right). 0x2
    afm_address_status: u8,
    /// Advanced FM data (right). 0x3
    afm_data: u8,
    /// Mixer register index. 0x4
    mixer_address: u8,
    /// Mixer register data. 0x5
    mixer_data: u8,
    /// DSP reset. 0x6
    dsp_reset: u8,
    _reserved1: u8,
    /// FM address / status (both channels). 0x8
    fm_address_status2: u8,
    /// FM data (both channels). 0x9
    fm_data2: u8,
    /// DSP read data. 0xA
    dsp_data_read: u8,
    _reserved2: u8,
    /// DSP write data / command, write buffer status on read. 0xC
    dsp_write: u8,
    _reserved3: u8,
    /// DSP read buffer status; reading acknowledges 8-bit DMA interrupts. 0xE
    dsp_read_status: u8,
    /// Reading acknowledges 16-bit DMA interrupts. 0xF
    dma16_ack: u8,
}

/// Size of the SB16 register block in bytes.
///
/// A range at least this large is the main register range; anything smaller
/// is taken to be the MPU-401 range.
pub const SB16_REGS_SIZE: u64 = size_of::<Sb16Regs>() as u64;

/// Register offsets from the base of the register block.
pub mod offset {
    use super::{Sb16Regs, offset_of};

    /// Mixer register index.
    pub const MIXER_ADDRESS: u64 = offset_of!(Sb16Regs, mixer_address) as u64;
    /// Mixer register data.
    pub const MIXER_DATA: u64 = offset_of!(Sb16Regs, mixer_data) as u64;
    /// DSP read buffer status / 8-bit interrupt acknowledge.
    pub const DSP_READ_STATUS: u64 = offset_of!(Sb16Regs, dsp_read_status) as u64;
    /// 16-bit interrupt acknowledge.
    pub const DMA16_ACK: u64 = offset_of!(Sb16Regs, dma16_ack) as u64;
}

// ---------------------------------------------------------------------------
// Mixer
// ---------------------------------------------------------------------------

/// Mixer register holding the pending interrupt sources.
pub const MIXER_IRQ_STATUS_ADDRESS: u8 = 0x82;

bitflags! {
    /// Mixer interrupt status register (0x82) bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MixerIrqStatus: u8 {
        /// 8-bit DMA or SB-MIDI interrupt pending.
        const DMA8   = 1 << 0;
        /// 16-bit DMA interrupt pending.
        const DMA16  = 1 << 1;
        /// MPU-401 interrupt pending.
        const MPU401 = 1 << 2;
    }
}

// ---------------------------------------------------------------------------
// DMA
// ---------------------------------------------------------------------------

/// ISA DMA channels below this number belong to the 8-bit controller,
/// channels above it to the 16-bit controller. The channel itself is the
/// cascade channel.
pub const DMA_CASCADE_CHANNEL: u32 = 4;
