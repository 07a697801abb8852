//! Mock interrupt dispatch layer.

use std::collections::BTreeMap;

use ddf_api::{
    DeviceHandle, DriverError, IRQ_SCRATCH_SIZE, InterruptDispatch, IrqCode, IrqHandle, IrqLine,
    IrqNotification, IrqVerdict,
};

use crate::ports::PortSpace;

/// Interrupt dispatcher that validates programs and runs them on demand.
///
/// Like a real dispatcher it refuses programs that fail
/// [`IrqCode::validate`] and lines that are already claimed.
#[derive(Debug, Default)]
pub struct MockDispatch {
    registered: BTreeMap<IrqLine, (DeviceHandle, IrqCode)>,
    fail: Option<DriverError>,
    register_calls: usize,
    unregister_calls: BTreeMap<IrqLine, usize>,
    next_handle: u64,
}

impl MockDispatch {
    /// Creates a dispatcher with no lines claimed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later registration fail with `err`.
    pub fn fail_register(&mut self, err: DriverError) {
        self.fail = Some(err);
    }

    /// Whether a program is installed for `irq`.
    #[must_use]
    pub fn is_registered(&self, irq: IrqLine) -> bool {
        self.registered.contains_key(&irq)
    }

    /// The program installed for `irq`.
    #[must_use]
    pub fn code(&self, irq: IrqLine) -> Option<&IrqCode> {
        self.registered.get(&irq).map(|(_, code)| code)
    }

    /// Number of registration attempts, successful or not.
    #[must_use]
    pub fn register_calls(&self) -> usize {
        self.register_calls
    }

    /// Number of times `irq` was unregistered.
    #[must_use]
    pub fn unregister_calls(&self, irq: IrqLine) -> usize {
        self.unregister_calls.get(&irq).copied().unwrap_or(0)
    }

    /// Raises `irq`: runs its program against `ports` and, if the program
    /// accepts, returns the notification the driver would receive.
    pub fn fire(&self, irq: IrqLine, ports: &mut PortSpace) -> Option<IrqNotification> {
        let (device, code) = self.registered.get(&irq)?;
        let mut scratch = [0; IRQ_SCRATCH_SIZE];
        match code.run(ports, &mut scratch) {
            IrqVerdict::Accept => Some(IrqNotification {
                device: *device,
                irq,
                scratch,
            }),
            IrqVerdict::Decline => None,
        }
    }
}

impl InterruptDispatch for MockDispatch {
    fn register(
        &mut self,
        irq: IrqLine,
        device: DeviceHandle,
        code: &IrqCode,
    ) -> Result<IrqHandle, DriverError> {
        self.register_calls += 1;
        if let Some(err) = self.fail {
            return Err(err);
        }
        if let Err(err) = code.validate() {
            log::debug!(target: "ddf-mock", "rejecting program for {irq}: {err}");
            return Err(DriverError::InvalidArgument);
        }
        if self.registered.contains_key(&irq) {
            return Err(DriverError::AlreadyExists);
        }
        self.registered.insert(irq, (device, code.clone()));
        self.next_handle += 1;
        Ok(IrqHandle(self.next_handle))
    }

    fn unregister(&mut self, irq: IrqLine) {
        *self.unregister_calls.entry(irq).or_insert(0) += 1;
        self.registered.remove(&irq);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddf_api::{IoRange, IrqCommand};

    fn accept_all() -> IrqCode {
        IrqCode::new(vec![IoRange::new(0x220, 16)], vec![IrqCommand::Accept])
    }

    #[test]
    fn register_rejects_duplicates_and_invalid_code() {
        let mut dispatch = MockDispatch::new();
        let irq = IrqLine::new(5);
        assert!(dispatch.register(irq, DeviceHandle(1), &accept_all()).is_ok());
        assert_eq!(
            dispatch.register(irq, DeviceHandle(2), &accept_all()),
            Err(DriverError::AlreadyExists)
        );
        assert_eq!(
            dispatch.register(IrqLine::new(7), DeviceHandle(1), &IrqCode::new(vec![], vec![])),
            Err(DriverError::InvalidArgument)
        );
        assert_eq!(dispatch.register_calls(), 3);
    }

    #[test]
    fn fire_runs_installed_program() {
        let mut dispatch = MockDispatch::new();
        let irq = IrqLine::new(5);
        let mut ports = PortSpace::new();
        assert_eq!(dispatch.fire(irq, &mut ports), None);

        dispatch.register(irq, DeviceHandle(3), &accept_all()).unwrap();
        let notification = dispatch.fire(irq, &mut ports).unwrap();
        assert_eq!(notification.device, DeviceHandle(3));
        assert_eq!(notification.irq, irq);

        dispatch.unregister(irq);
        assert_eq!(dispatch.fire(irq, &mut ports), None);
        assert_eq!(dispatch.unregister_calls(irq), 1);
    }
}
