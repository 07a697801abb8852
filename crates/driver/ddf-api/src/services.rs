//! Service contracts a driver consumes from the device manager.
//!
//! The driver never talks to the device manager, the interrupt dispatcher or
//! the function registry directly. It is handed implementations of these
//! traits (bundled in a [`ProbeContext`](crate::probe_context::ProbeContext))
//! and only ever calls through them.

use crate::error::DriverError;
use crate::irq_code::{IRQ_SCRATCH_SIZE, IrqCode};
use crate::resource::{HwResourceList, IrqLine};

/// Opaque device-manager handle of a device instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceHandle(pub u64);

/// Opaque handle of a function a driver exposed to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FunctionHandle(pub u64);

/// Opaque handle returned by a successful interrupt registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IrqHandle(pub u64);

/// A session with the parent device's resource authority.
///
/// Dropping the session hangs up.
pub trait ParentSession {
    /// Requests the parsed hardware resource list of the device.
    ///
    /// # Errors
    ///
    /// Returns the authority's error code if the query fails.
    fn hw_resources(&mut self) -> Result<HwResourceList, DriverError>;

    /// Asks the parent to enable the device's interrupt line.
    ///
    /// Idempotent. Returns `false` if the parent refused.
    fn enable_interrupt(&mut self) -> bool;
}

/// The upstream authority that assigns hardware resources to devices.
pub trait ResourceAuthority {
    /// The session type produced by [`connect`](Self::connect).
    type Session: ParentSession;

    /// Opens a blocking session with the parent of `device`.
    ///
    /// Returns `None` if no session can be established.
    fn connect(&self, device: DeviceHandle) -> Option<Self::Session>;
}

/// The layer that executes interrupt programs and notifies drivers.
pub trait InterruptDispatch {
    /// Installs `code` as the top half of `irq` on behalf of `device`.
    ///
    /// From this point on the driver may receive [`IrqNotification`]s for
    /// `device`.
    ///
    /// # Errors
    ///
    /// Returns the dispatcher's error code, e.g. [`DriverError::InvalidArgument`]
    /// for a program that fails validation or [`DriverError::AlreadyExists`]
    /// for a line that is already claimed.
    fn register(
        &mut self,
        irq: IrqLine,
        device: DeviceHandle,
        code: &IrqCode,
    ) -> Result<IrqHandle, DriverError>;

    /// Removes the program installed for `irq`. Unknown lines are ignored.
    fn unregister(&mut self, irq: IrqLine);
}

/// Delivered to the driver after an interrupt program accepted an interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrqNotification {
    /// Device the program was registered for.
    pub device: DeviceHandle,
    /// Line that fired.
    pub irq: IrqLine,
    /// Scratch values left behind by the program.
    pub scratch: [u32; IRQ_SCRATCH_SIZE],
}

/// Registry through which drivers expose functions to consumers.
pub trait FunctionRegistry {
    /// Creates and binds an exposed function called `name` under `device`.
    ///
    /// # Errors
    ///
    /// Returns the registry's error code if the function cannot be created
    /// or bound.
    fn expose(&mut self, device: DeviceHandle, name: &str) -> Result<FunctionHandle, DriverError>;

    /// Adds an exposed function to a named category (e.g. `"audio-pcm"`).
    ///
    /// # Errors
    ///
    /// Returns the registry's error code.
    fn add_to_category(&mut self, function: FunctionHandle, category: &str)
        -> Result<(), DriverError>;

    /// Unbinds and destroys an exposed function. Unknown handles are ignored.
    fn unexpose(&mut self, function: FunctionHandle);
}
