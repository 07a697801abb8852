//! Driver-side contract for device-manager mediated drivers.
//!
//! This crate defines what a driver may expect from its environment:
//!
//! - **Resources** -- [`HwResourceList`], [`IoRange`], [`IrqLine`], [`DmaChannel`]
//!   as reported by the parent device.
//! - **Interrupt programs** -- [`IrqCode`] built from [`IrqCommand`]s and run in
//!   interrupt context by the dispatch layer.
//! - **Services** -- [`ResourceAuthority`], [`InterruptDispatch`] and
//!   [`FunctionRegistry`], bundled per device in a [`ProbeContext`].
//! - **Identity** -- the [`Driver`] trait and [`DriverInfo`].

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod driver;
pub mod error;
pub mod irq_code;
pub mod probe_context;
pub mod resource;
pub mod services;

// Re-export all public types at the crate root for ergonomic imports.
pub use driver::{Driver, DriverInfo, DriverType};
pub use error::DriverError;
pub use irq_code::{IRQ_SCRATCH_SIZE, IrqCode, IrqCodeError, IrqCommand, IrqVerdict, PioAccess};
pub use probe_context::ProbeContext;
pub use resource::{DmaChannel, HwResourceList, IoRange, IrqLine};
pub use services::{
    DeviceHandle, FunctionHandle, FunctionRegistry, InterruptDispatch, IrqHandle, IrqNotification,
    ParentSession, ResourceAuthority,
};
