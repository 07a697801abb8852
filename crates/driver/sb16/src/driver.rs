//! Driver entry points.
//!
//! [`Sb16Driver`] owns the services handed over by the device manager and a
//! table of per-device soft states. The device manager calls
//! [`dev_add`](Sb16Driver::dev_add) for every SB16 it finds and routes
//! interrupt notifications through [`handle_interrupt`](Sb16Driver::handle_interrupt).

use alloc::collections::BTreeMap;

use ddf_api::{
    DeviceHandle, Driver, DriverError, DriverInfo, DriverType, FunctionRegistry, InterruptDispatch,
    IrqNotification, ProbeContext, ResourceAuthority,
};

use crate::NAME;
use crate::config::{ConfigError, Sb16Config};
use crate::error::{BringUpError, Phase, Sb16Error};
use crate::soft_state::Sb16;
use crate::unit::UnitInitializer;

/// The SB16 driver instance.
pub struct Sb16Driver<A, D, F, U: UnitInitializer> {
    config: Sb16Config,
    authority: A,
    dispatch: D,
    functions: F,
    units: U,
    devices: BTreeMap<DeviceHandle, Sb16<U::Primary, U::Secondary>>,
}

impl<A, D, F, U> Sb16Driver<A, D, F, U>
where
    A: ResourceAuthority,
    D: InterruptDispatch,
    F: FunctionRegistry,
    U: UnitInitializer,
{
    /// Creates the driver.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] if `config` does not validate.
    pub fn new(
        config: Sb16Config,
        authority: A,
        dispatch: D,
        functions: F,
        units: U,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            authority,
            dispatch,
            functions,
            units,
            devices: BTreeMap::new(),
        })
    }

    /// Adds a device: brings it up and keeps its soft state.
    ///
    /// # Errors
    ///
    /// Returns the [`BringUpError`] of a failed bring-up. Nothing is kept
    /// for the device in that case.
    ///
    /// A device that is already added is refused at [`Phase::Init`] with
    /// [`Sb16Error::HandlerRegistrationFailed`] carrying
    /// [`DriverError::AlreadyExists`]; its current state is left alone.
    pub fn dev_add(&mut self, device: DeviceHandle) -> Result<(), BringUpError> {
        log::info!(target: "sb16", "dev_add(device={})", device.0);
        if self.devices.contains_key(&device) {
            log::error!(target: "sb16", "device {} already added", device.0);
            return Err(BringUpError::new(
                Phase::Init,
                Sb16Error::HandlerRegistrationFailed(DriverError::AlreadyExists),
            ));
        }
        let mut sb = Sb16::new(device);
        let mut ctx = ProbeContext::new(
            device,
            &self.authority,
            &mut self.dispatch,
            &mut self.functions,
        );
        sb.bring_up(&mut ctx, &mut self.units, &self.config)?;
        self.devices.insert(device, sb);
        Ok(())
    }

    /// Removes a device added earlier, releasing all it holds.
    ///
    /// # Errors
    ///
    /// [`DriverError::DeviceNotFound`] if `device` is not managed by this
    /// driver.
    pub fn dev_remove(&mut self, device: DeviceHandle) -> Result<(), DriverError> {
        let mut sb = self
            .devices
            .remove(&device)
            .ok_or(DriverError::DeviceNotFound)?;
        let mut ctx = ProbeContext::new(
            device,
            &self.authority,
            &mut self.dispatch,
            &mut self.functions,
        );
        sb.teardown(&mut ctx);
        Ok(())
    }

    /// Routes an interrupt notification to its device's bottom half.
    ///
    /// Returns whether a unit handled it.
    pub fn handle_interrupt(&mut self, notification: &IrqNotification) -> bool {
        match self.devices.get_mut(&notification.device) {
            Some(sb) => sb.handle_interrupt(notification),
            None => {
                log::warn!(
                    target: "sb16",
                    "interrupt for unknown device {}",
                    notification.device.0
                );
                false
            }
        }
    }

    /// Returns the soft state of `device`.
    #[must_use]
    pub fn device(&self, device: DeviceHandle) -> Option<&Sb16<U::Primary, U::Secondary>> {
        self.devices.get(&device)
    }

    /// Returns the number of devices up.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &Sb16Config {
        &self.config
    }

    /// Returns the interrupt dispatch layer.
    #[must_use]
    pub fn dispatch(&self) -> &D {
        &self.dispatch
    }

    /// Returns the function registry.
    #[must_use]
    pub fn functions(&self) -> &F {
        &self.functions
    }

    /// Returns the unit initializer.
    #[must_use]
    pub fn units(&self) -> &U {
        &self.units
    }
}

impl<A, D, F, U: UnitInitializer> Driver for Sb16Driver<A, D, F, U> {
    fn info(&self) -> DriverInfo {
        DriverInfo {
            name: NAME,
            driver_type: DriverType::Audio,
            description: "Creative Labs Sound Blaster 16",
        }
    }
}
