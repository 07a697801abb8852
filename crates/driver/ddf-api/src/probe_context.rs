//! Probe context for driver initialization.
//!
//! The device manager constructs a [`ProbeContext`] with exactly the services
//! a driver needs for one device instance, then passes it to the driver's
//! add-device entry point.

use crate::services::{DeviceHandle, FunctionRegistry, InterruptDispatch, ResourceAuthority};

/// Services available to a driver while it adds or removes one device.
pub struct ProbeContext<'a, A, D, F> {
    /// The device being added.
    pub device: DeviceHandle,
    /// Parent resource authority.
    pub authority: &'a A,
    /// Interrupt dispatch layer.
    pub dispatch: &'a mut D,
    /// Exposed function registry.
    pub functions: &'a mut F,
}

impl<'a, A, D, F> ProbeContext<'a, A, D, F>
where
    A: ResourceAuthority,
    D: InterruptDispatch,
    F: FunctionRegistry,
{
    /// Bundles the services for `device`.
    pub fn new(device: DeviceHandle, authority: &'a A, dispatch: &'a mut D, functions: &'a mut F) -> Self {
        Self {
            device,
            authority,
            dispatch,
            functions,
        }
    }
}
