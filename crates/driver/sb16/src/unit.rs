//! Functional units of the card.
//!
//! The DSP (PCM playback and capture) is the primary unit and must come up
//! for the device to be usable. The MPU-401 (MIDI) is secondary: the device
//! works without it. Both are implemented elsewhere; the driver core only
//! creates them through a [`UnitInitializer`] and forwards interrupts to them.

use ddf_api::DriverError;

use crate::resources::DeviceResources;

/// A unit that receives bottom-half interrupt events.
pub trait FunctionalUnit {
    /// Called from the bottom half when the unit's interrupt source fired.
    fn handle_interrupt(&mut self);
}

/// Creates the card's functional units.
pub trait UnitInitializer {
    /// The DSP unit.
    type Primary: FunctionalUnit;
    /// The MPU-401 unit.
    type Secondary: FunctionalUnit;

    /// Initializes the DSP on the primary range and DMA channels.
    ///
    /// # Errors
    ///
    /// Returns the error code of the failed initialization.
    fn init_primary(&mut self, res: &DeviceResources) -> Result<Self::Primary, DriverError>;

    /// Initializes the MPU-401 on the secondary range.
    ///
    /// Called even if no secondary range was assigned; the implementation
    /// decides whether it can work without one.
    ///
    /// # Errors
    ///
    /// Returns the error code of the failed initialization.
    fn init_secondary(&mut self, res: &DeviceResources) -> Result<Self::Secondary, DriverError>;
}

/// Identifies one of the card's units in logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// DSP (PCM).
    Primary,
    /// MPU-401 (MIDI).
    Secondary,
}
