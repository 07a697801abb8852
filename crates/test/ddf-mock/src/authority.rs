//! Mock parent resource authority.

use std::cell::RefCell;
use std::rc::Rc;

use ddf_api::{DeviceHandle, DriverError, HwResourceList, ParentSession, ResourceAuthority};

#[derive(Debug)]
struct State {
    resources: Result<HwResourceList, DriverError>,
    /// Remaining successful connects; `None` means unlimited.
    connect_budget: Option<usize>,
    refuse_enable: bool,
    connects: usize,
    open: usize,
    enable_requests: usize,
    devices: Vec<DeviceHandle>,
}

/// A parent device that hands out a fixed resource list.
///
/// Uses interior mutability because drivers only get `&` access to the
/// authority.
#[derive(Debug, Clone)]
pub struct MockAuthority {
    state: Rc<RefCell<State>>,
}

impl MockAuthority {
    fn with(resources: Result<HwResourceList, DriverError>, connect_budget: Option<usize>) -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                resources,
                connect_budget,
                refuse_enable: false,
                connects: 0,
                open: 0,
                enable_requests: 0,
                devices: Vec::new(),
            })),
        }
    }

    /// An authority that reports `resources` and enables interrupts.
    #[must_use]
    pub fn new(resources: HwResourceList) -> Self {
        Self::with(Ok(resources), None)
    }

    /// An authority whose resource query fails with `err`.
    #[must_use]
    pub fn failing(err: DriverError) -> Self {
        Self::with(Err(err), None)
    }

    /// An authority no session can be opened with.
    #[must_use]
    pub fn unreachable() -> Self {
        Self::with(Ok(HwResourceList::new()), Some(0))
    }

    /// Replaces the resource list reported from now on.
    pub fn set_resources(&self, resources: HwResourceList) {
        self.state.borrow_mut().resources = Ok(resources);
    }

    /// Lets only the next `n` connects succeed.
    pub fn limit_connects(&self, n: usize) {
        self.state.borrow_mut().connect_budget = Some(n);
    }

    /// Makes every later enable request fail.
    pub fn refuse_enable(&self) {
        self.state.borrow_mut().refuse_enable = true;
    }

    /// Number of connect attempts, successful or not.
    #[must_use]
    pub fn connects(&self) -> usize {
        self.state.borrow().connects
    }

    /// Number of sessions not yet hung up.
    #[must_use]
    pub fn open_sessions(&self) -> usize {
        self.state.borrow().open
    }

    /// Number of interrupt enable requests received.
    #[must_use]
    pub fn enable_requests(&self) -> usize {
        self.state.borrow().enable_requests
    }

    /// Devices that sessions were opened for, in order.
    #[must_use]
    pub fn devices(&self) -> Vec<DeviceHandle> {
        self.state.borrow().devices.clone()
    }
}

impl ResourceAuthority for MockAuthority {
    type Session = MockSession;

    fn connect(&self, device: DeviceHandle) -> Option<MockSession> {
        let mut state = self.state.borrow_mut();
        state.connects += 1;
        match &mut state.connect_budget {
            Some(0) => return None,
            Some(n) => *n -= 1,
            None => {}
        }
        state.open += 1;
        state.devices.push(device);
        Some(MockSession {
            state: Rc::clone(&self.state),
        })
    }
}

/// Session handed out by [`MockAuthority`]; hangs up on drop.
#[derive(Debug)]
pub struct MockSession {
    state: Rc<RefCell<State>>,
}

impl ParentSession for MockSession {
    fn hw_resources(&mut self) -> Result<HwResourceList, DriverError> {
        self.state.borrow().resources.clone()
    }

    fn enable_interrupt(&mut self) -> bool {
        let mut state = self.state.borrow_mut();
        state.enable_requests += 1;
        !state.refuse_enable
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.state.borrow_mut().open -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_are_counted() {
        let authority = MockAuthority::new(HwResourceList::new());
        let a = authority.connect(DeviceHandle(1)).unwrap();
        let b = authority.connect(DeviceHandle(2)).unwrap();
        assert_eq!(authority.open_sessions(), 2);
        drop(a);
        drop(b);
        assert_eq!(authority.open_sessions(), 0);
        assert_eq!(authority.devices(), vec![DeviceHandle(1), DeviceHandle(2)]);
    }

    #[test]
    fn connect_budget() {
        let authority = MockAuthority::new(HwResourceList::new());
        authority.limit_connects(1);
        assert!(authority.connect(DeviceHandle(1)).is_some());
        assert!(authority.connect(DeviceHandle(1)).is_none());
        assert_eq!(authority.connects(), 2);
        assert_eq!(authority.open_sessions(), 0);
    }
}
