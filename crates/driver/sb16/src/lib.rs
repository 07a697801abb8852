//! Creative Labs Sound Blaster 16 driver.
//!
//! Negotiates the card's hardware resources with its parent, installs the
//! interrupt top half and brings up the DSP (PCM) and MPU-401 (MIDI) units:
//!
//! - [`resources`] -- resource query and classification.
//! - [`irq`] -- interrupt program and its registration.
//! - [`soft_state`] -- per-device state and the bring-up sequence.
//! - [`driver`] -- device manager entry points.
//!
//! The units themselves are supplied through [`UnitInitializer`].

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod driver;
pub mod error;
pub mod irq;
pub mod regs;
pub mod resources;
pub mod soft_state;
pub mod unit;

/// Driver name as registered with the device manager.
pub const NAME: &str = "sb16";

pub use config::{ConfigError, Sb16Config};
pub use driver::Sb16Driver;
pub use error::{BringUpError, Phase, Sb16Error, ShapeError};
pub use irq::{InterruptBinder, build_irq_code};
pub use resources::DeviceResources;
pub use soft_state::{BringUpState, HandlerStatus, Sb16};
pub use unit::{FunctionalUnit, UnitInitializer, UnitKind};
