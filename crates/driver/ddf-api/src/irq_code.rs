//! Interrupt programs executed by the dispatch layer in interrupt context.
//!
//! A driver cannot run its own code when the interrupt fires. Instead it
//! describes the top half as an [`IrqCode`]: a short list of [`IrqCommand`]s
//! over a fixed scratch array, plus the register ranges the program may
//! touch. The dispatch layer runs the program, and if it accepts the
//! interrupt, forwards the scratch array to the driver's bottom half.
//!
//! [`IrqCode::run`] neither allocates nor blocks, so the same interpreter
//! serves the dispatch layer and test harnesses.

use alloc::vec::Vec;
use core::fmt;

use crate::resource::IoRange;

/// Number of scratch slots available to an interrupt program.
pub const IRQ_SCRATCH_SIZE: usize = 6;

/// A single interrupt program instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqCommand {
    /// Read one byte from `addr` into scratch slot `dst`.
    PioRead8 {
        /// Absolute register address.
        addr: u64,
        /// Destination scratch slot.
        dst: usize,
    },
    /// Write `value` to `addr`.
    PioWrite8 {
        /// Absolute register address.
        addr: u64,
        /// Byte to write.
        value: u8,
    },
    /// Skip the next `skip` commands unless `scratch[src] & mask` is non-zero.
    Predicate {
        /// Scratch slot to test.
        src: usize,
        /// Bits that must be set for execution to fall through.
        mask: u32,
        /// Number of commands to skip when no bit matches.
        skip: usize,
    },
    /// Claim the interrupt and notify the driver.
    Accept,
    /// Reject the interrupt (not ours).
    Decline,
}

/// Outcome of running an interrupt program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqVerdict {
    /// The interrupt belongs to the device; the bottom half must run.
    Accept,
    /// The interrupt is not claimed by this program.
    Decline,
}

/// Reasons an interrupt program is rejected at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqCodeError {
    /// The program has no commands.
    Empty,
    /// Command `index` accesses `addr`, which lies outside every declared range.
    AddressOutOfRange {
        /// Offending command index.
        index: usize,
        /// Offending address.
        addr: u64,
    },
    /// Command `index` names a scratch slot past [`IRQ_SCRATCH_SIZE`].
    ScratchOutOfRange {
        /// Offending command index.
        index: usize,
        /// Offending slot.
        slot: usize,
    },
    /// Predicate `index` skips past the end of the program.
    SkipOutOfRange {
        /// Offending command index.
        index: usize,
    },
}

impl fmt::Display for IrqCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("interrupt program is empty"),
            Self::AddressOutOfRange { index, addr } => {
                write!(f, "command {index} accesses {addr:#x} outside the allowed ranges")
            }
            Self::ScratchOutOfRange { index, slot } => {
                write!(f, "command {index} uses scratch slot {slot} out of range")
            }
            Self::SkipOutOfRange { index } => {
                write!(f, "predicate {index} skips past the end of the program")
            }
        }
    }
}

/// Port or memory-mapped register access used by [`IrqCode::run`].
pub trait PioAccess {
    /// Reads one byte from `addr`.
    fn read8(&mut self, addr: u64) -> u8;

    /// Writes one byte to `addr`.
    fn write8(&mut self, addr: u64, value: u8);
}

/// An interrupt program together with the register ranges it may access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrqCode {
    ranges: Vec<IoRange>,
    cmds: Vec<IrqCommand>,
}

impl IrqCode {
    /// Creates a program from its allowed ranges and commands.
    #[must_use]
    pub fn new(ranges: Vec<IoRange>, cmds: Vec<IrqCommand>) -> Self {
        Self { ranges, cmds }
    }

    /// Returns the ranges the program is allowed to access.
    #[must_use]
    pub fn ranges(&self) -> &[IoRange] {
        &self.ranges
    }

    /// Returns the program's commands in execution order.
    #[must_use]
    pub fn cmds(&self) -> &[IrqCommand] {
        &self.cmds
    }

    fn permits(&self, addr: u64) -> bool {
        self.ranges.iter().any(|range| range.contains(addr))
    }

    /// Checks every command against the declared ranges and scratch size.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, in command order.
    pub fn validate(&self) -> Result<(), IrqCodeError> {
        if self.cmds.is_empty() {
            return Err(IrqCodeError::Empty);
        }
        for (index, cmd) in self.cmds.iter().enumerate() {
            match *cmd {
                IrqCommand::PioRead8 { addr, dst } => {
                    if !self.permits(addr) {
                        return Err(IrqCodeError::AddressOutOfRange { index, addr });
                    }
                    if dst >= IRQ_SCRATCH_SIZE {
                        return Err(IrqCodeError::ScratchOutOfRange { index, slot: dst });
                    }
                }
                IrqCommand::PioWrite8 { addr, .. } => {
                    if !self.permits(addr) {
                        return Err(IrqCodeError::AddressOutOfRange { index, addr });
                    }
                }
                IrqCommand::Predicate { src, skip, .. } => {
                    if src >= IRQ_SCRATCH_SIZE {
                        return Err(IrqCodeError::ScratchOutOfRange { index, slot: src });
                    }
                    if index + skip >= self.cmds.len() {
                        return Err(IrqCodeError::SkipOutOfRange { index });
                    }
                }
                IrqCommand::Accept | IrqCommand::Decline => {}
            }
        }
        Ok(())
    }

    /// Runs the program against `pio`, recording reads into `scratch`.
    ///
    /// Any access outside the declared ranges or the scratch array declines
    /// the interrupt on the spot. Running off the end of the program also
    /// declines.
    pub fn run<P: PioAccess>(
        &self,
        pio: &mut P,
        scratch: &mut [u32; IRQ_SCRATCH_SIZE],
    ) -> IrqVerdict {
        let mut pc = 0;
        while let Some(cmd) = self.cmds.get(pc) {
            match *cmd {
                IrqCommand::PioRead8 { addr, dst } => {
                    if !self.permits(addr) {
                        return IrqVerdict::Decline;
                    }
                    let Some(slot) = scratch.get_mut(dst) else {
                        return IrqVerdict::Decline;
                    };
                    *slot = u32::from(pio.read8(addr));
                }
                IrqCommand::PioWrite8 { addr, value } => {
                    if !self.permits(addr) {
                        return IrqVerdict::Decline;
                    }
                    pio.write8(addr, value);
                }
                IrqCommand::Predicate { src, mask, skip } => {
                    let Some(&value) = scratch.get(src) else {
                        return IrqVerdict::Decline;
                    };
                    if value & mask == 0 {
                        pc += skip;
                    }
                }
                IrqCommand::Accept => return IrqVerdict::Accept,
                IrqCommand::Decline => return IrqVerdict::Decline,
            }
            pc += 1;
        }
        IrqVerdict::Decline
    }
}
