// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
//! Per-layer haptic feedback.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::actuator::{Action, ActuatorError};
use crate::config::ConfigError;
use crate::image::LayerName;

mod coordinator;
pub mod mock;

pub use coordinator::HapticCoordinator;

/// A single haptic actuator. Redundant calls (start while running, stop while
/// stopped) must be tolerated.
pub trait HapticActuator: Send + Sync {
    fn start(&self) -> Result<(), ActuatorError>;
    fn stop(&self) -> Result<(), ActuatorError>;
}

/// Creates the actuators, one for each layer of an opened image.
pub trait HapticDevice: fmt::Display + Send + Sync {
    fn actuator(&self, layer: LayerName) -> Arc<dyn HapticActuator>;
}

/// One haptic lifecycle call, in the order it was issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HapticCommand {
    pub layer: LayerName,
    pub action: Action,
}

/// Gets a haptic device with the given name.
pub fn get_device(name: &str) -> Result<Arc<dyn HapticDevice>, ConfigError> {
    if name.starts_with("mock") {
        return Ok(Arc::new(mock::Device::get(name)));
    }

    Err(ConfigError::Invalid(format!(
        "unknown haptic device '{}'",
        name
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_device() {
        let device = get_device("mock-haptics").expect("device");
        assert_eq!(device.to_string(), "mock-haptics (Mock)");
        assert!(get_device("vibrator").is_err());
    }
}
