//! Driver configuration.
//!
//! Names under which the units are exposed, and whether the MPU-401 is
//! probed at all. Deserializable so the device manager can pass overrides
//! from its configuration file; missing keys keep their defaults.

use alloc::string::{String, ToString};
use core::fmt;

use serde::Deserialize;

/// Default name of the exposed PCM function.
pub const DEFAULT_PCM_FUNCTION: &str = "pcm";
/// Default category the PCM function is added to.
pub const DEFAULT_PCM_CATEGORY: &str = "audio-pcm";
/// Default name of the exposed MIDI function.
pub const DEFAULT_MIDI_FUNCTION: &str = "midi";

/// SB16 driver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Sb16Config {
    /// Name of the exposed PCM function.
    pub pcm_function: String,
    /// Category the PCM function is added to.
    pub pcm_category: String,
    /// Name of the exposed MIDI function.
    pub midi_function: String,
    /// Whether to initialize the MPU-401 at all.
    pub enable_midi: bool,
}

impl Default for Sb16Config {
    fn default() -> Self {
        Self {
            pcm_function: DEFAULT_PCM_FUNCTION.to_string(),
            pcm_category: DEFAULT_PCM_CATEGORY.to_string(),
            midi_function: DEFAULT_MIDI_FUNCTION.to_string(),
            enable_midi: true,
        }
    }
}

/// Configuration rejected by [`Sb16Config::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A function or category name is empty; carries the field name.
    EmptyName(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName(field) => write!(f, "{field} must not be empty"),
        }
    }
}

impl Sb16Config {
    /// Checks that every name is usable.
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptyName`] for the first empty name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("pcm-function", &self.pcm_function),
            ("pcm-category", &self.pcm_category),
            ("midi-function", &self.midi_function),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyName(field));
            }
        }
        Ok(())
    }
}
