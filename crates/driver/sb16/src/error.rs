//! Driver error types.

use core::fmt;

use ddf_api::{DeviceHandle, DriverError};

/// Bring-up phases, in the order the sequencer attempts them.
///
/// A failure is reported together with the phase that was being entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Soft state allocated, nothing acquired.
    Init,
    /// Raw resource list received from the parent.
    ResourcesQueried,
    /// Resources assigned to their roles.
    ResourcesClassified,
    /// Interrupt program assembled.
    ProgramBuilt,
    /// Interrupt program registered with the dispatch layer.
    HandlerBound,
    /// Parent enabled the interrupt line.
    InterruptsEnabled,
    /// DSP (PCM) unit initialized.
    PrimaryReady,
    /// MPU-401 (MIDI) unit initialized and exposed.
    SecondaryReady,
    /// MPU-401 unit unavailable; continuing without it.
    SecondarySkipped,
    /// Device fully operational.
    Up,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Init => "init",
            Self::ResourcesQueried => "resource query",
            Self::ResourcesClassified => "resource classification",
            Self::ProgramBuilt => "interrupt program",
            Self::HandlerBound => "handler registration",
            Self::InterruptsEnabled => "interrupt enable",
            Self::PrimaryReady => "dsp init",
            Self::SecondaryReady | Self::SecondarySkipped => "mpu init",
            Self::Up => "function exposure",
        })
    }
}

/// Ways a parent's resource list can fail to describe an SB16.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeError {
    /// Exactly one IRQ is required; carries the count received.
    IrqCount(usize),
    /// One or two I/O ranges are required; carries the count received.
    RangeCount(usize),
    /// One or two DMA channels are required; carries the count received.
    DmaCount(usize),
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IrqCount(n) => write!(f, "expected 1 irq, got {n}"),
            Self::RangeCount(n) => write!(f, "expected 1 or 2 i/o ranges, got {n}"),
            Self::DmaCount(n) => write!(f, "expected 1 or 2 dma channels, got {n}"),
        }
    }
}

/// Errors produced by the SB16 driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sb16Error {
    /// No session to the parent device could be opened.
    SessionUnavailable,
    /// The parent failed the resource query.
    AuthorityError(DriverError),
    /// The resource list does not have the expected shape.
    ResourceShapeInvalid(ShapeError),
    /// The dispatch layer refused the interrupt program.
    HandlerRegistrationFailed(DriverError),
    /// The parent refused to enable the interrupt line.
    InterruptEnableFailed,
    /// The DSP unit failed to initialize.
    PrimaryUnitInitFailed(DriverError),
    /// The MPU-401 unit failed to initialize or could not be exposed.
    ///
    /// Never fatal; only logged.
    SecondaryUnitInitFailed(DriverError),
    /// The PCM function could not be exposed.
    FunctionExposeFailed(DriverError),
    /// The services were bundled for another device; carries that device.
    WrongDevice(DeviceHandle),
}

impl fmt::Display for Sb16Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionUnavailable => f.write_str("parent session unavailable"),
            Self::AuthorityError(e) => write!(f, "resource query failed: {e}"),
            Self::ResourceShapeInvalid(e) => write!(f, "invalid resources: {e}"),
            Self::HandlerRegistrationFailed(e) => {
                write!(f, "failed to register irq handler: {e}")
            }
            Self::InterruptEnableFailed => f.write_str("failed to enable interrupts"),
            Self::PrimaryUnitInitFailed(e) => write!(f, "failed to init dsp: {e}"),
            Self::SecondaryUnitInitFailed(e) => write!(f, "failed to init mpu: {e}"),
            Self::FunctionExposeFailed(e) => write!(f, "failed to expose pcm function: {e}"),
            Self::WrongDevice(dev) => write!(f, "services are for device {}", dev.0),
        }
    }
}

impl From<ShapeError> for Sb16Error {
    fn from(err: ShapeError) -> Self {
        Self::ResourceShapeInvalid(err)
    }
}

/// A fatal bring-up failure: the phase being entered and its cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BringUpError {
    /// Phase at which bring-up stopped.
    pub phase: Phase,
    /// Underlying cause.
    pub cause: Sb16Error,
}

impl BringUpError {
    /// Creates a new bring-up error.
    #[must_use]
    pub const fn new(phase: Phase, cause: Sb16Error) -> Self {
        Self { phase, cause }
    }
}

impl fmt::Display for BringUpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.phase, self.cause)
    }
}
