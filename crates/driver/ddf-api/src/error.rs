//! Error codes returned by the device manager and its services.

use core::fmt;

/// Errors reported by upstream services to a driver.
///
/// Drivers treat these as opaque codes: they are carried verbatim inside the
/// driver's own error types and never reinterpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// The device (or function) is not known to the service.
    DeviceNotFound,
    /// The service ran out of memory or slots.
    OutOfMemory,
    /// An argument was rejected (e.g. an invalid interrupt program).
    InvalidArgument,
    /// The resource is already claimed.
    AlreadyExists,
    /// The requested operation is not supported.
    Unsupported,
    /// The service did not answer in time.
    Timeout,
    /// An I/O error occurred while talking to the hardware or the service.
    IoError,
    /// Initialization of a device unit failed.
    InitFailed,
    /// The service is not in a valid state for this operation.
    InvalidState,
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceNotFound => f.write_str("device not found"),
            Self::OutOfMemory => f.write_str("out of memory"),
            Self::InvalidArgument => f.write_str("invalid argument"),
            Self::AlreadyExists => f.write_str("resource already claimed"),
            Self::Unsupported => f.write_str("operation not supported"),
            Self::Timeout => f.write_str("service timed out"),
            Self::IoError => f.write_str("I/O error"),
            Self::InitFailed => f.write_str("initialization failed"),
            Self::InvalidState => f.write_str("invalid state"),
        }
    }
}
