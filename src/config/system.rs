//! System configuration - root configuration structure.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use super::servo::ServoConfig;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemConfig {
    /// Named servo configurations.
    #[serde(default)]
    pub servos: FnvIndexMap<String<32>, ServoConfig, 16>,
}

impl SystemConfig {
    /// Get a servo configuration by name.
    pub fn servo(&self, name: &str) -> Option<&ServoConfig> {
        self.servos
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// List all servo names.
    pub fn servo_names(&self) -> impl Iterator<Item = &str> {
        self.servos.keys().map(|s| s.as_str())
    }
}
