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
use std::sync::Arc;

use tracing::{debug, warn};

use super::{HapticActuator, HapticCommand, HapticDevice};
use crate::actuator::Action;
use crate::image::LayerName;

struct LayerHaptic {
    layer: LayerName,
    actuator: Arc<dyn HapticActuator>,
    active: bool,
}

/// Owns one haptic actuator per layer and drives it from the layer's hit flag.
pub struct HapticCoordinator {
    layers: Vec<LayerHaptic>,
}

impl HapticCoordinator {
    /// Creates an actuator for each layer.
    pub fn new(device: &dyn HapticDevice, layers: &[LayerName]) -> Self {
        Self {
            layers: layers
                .iter()
                .map(|layer| LayerHaptic {
                    layer: *layer,
                    actuator: device.actuator(*layer),
                    active: false,
                })
                .collect(),
        }
    }

    /// Starts the layer's actuator if it was hit this frame and stops it
    /// otherwise. The call always goes through to the actuator. Returns the
    /// issued command, or None for a layer without an actuator.
    pub fn update(&mut self, layer: LayerName, hit: bool) -> Option<HapticCommand> {
        let Some(state) = self.layers.iter_mut().find(|state| state.layer == layer) else {
            debug!(layer = %layer, "No haptic actuator for layer");
            return None;
        };

        let action = if hit { Action::Start } else { Action::Stop };
        Self::issue(state, action);
        Some(HapticCommand { layer, action })
    }

    fn issue(state: &mut LayerHaptic, action: Action) {
        let result = match action {
            Action::Start => state.actuator.start(),
            Action::Stop => state.actuator.stop(),
        };
        match result {
            Ok(()) => {
                if state.active != (action == Action::Start) {
                    debug!(layer = %state.layer, %action, "Haptic state changed");
                }
                state.active = action == Action::Start;
            }
            Err(e) => warn!(layer = %state.layer, err = %e, "Error driving haptic actuator"),
        }
    }

    /// Stops every layer's actuator.
    pub fn stop_all(&mut self) -> Vec<HapticCommand> {
        self.layers
            .iter_mut()
            .map(|state| {
                Self::issue(state, Action::Stop);
                HapticCommand {
                    layer: state.layer,
                    action: Action::Stop,
                }
            })
            .collect()
    }

    pub fn is_active(&self, layer: LayerName) -> bool {
        self.layers
            .iter()
            .any(|state| state.layer == layer && state.active)
    }

    pub fn active_layers(&self) -> Vec<LayerName> {
        self.layers
            .iter()
            .filter(|state| state.active)
            .map(|state| state.layer)
            .collect()
    }
}

impl std::fmt::Debug for HapticCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HapticCoordinator")
            .field("layers", &self.layers.len())
            .field("active", &self.active_layers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haptic::mock::{Device, HapticCall};

    fn coordinator() -> (HapticCoordinator, Device) {
        let device = Device::get("mock-haptics");
        let coordinator = HapticCoordinator::new(&device, &[LayerName::Xray, LayerName::Optical]);
        (coordinator, device)
    }

    #[test]
    fn test_one_actuator_per_layer() {
        let (_coordinator, device) = coordinator();
        assert_eq!(device.actuator_count(), 2);
    }

    #[test]
    fn test_hit_starts_and_miss_stops() {
        let (mut coordinator, device) = coordinator();
        assert_eq!(
            coordinator.update(LayerName::Xray, true),
            Some(HapticCommand {
                layer: LayerName::Xray,
                action: Action::Start
            })
        );
        assert!(coordinator.is_active(LayerName::Xray));
        assert!(device.is_running(LayerName::Xray));
        assert!(!coordinator.is_active(LayerName::Optical));

        coordinator.update(LayerName::Xray, false);
        assert!(!coordinator.is_active(LayerName::Xray));
        assert!(!device.is_running(LayerName::Xray));
    }

    #[test]
    fn test_redundant_calls_go_through() {
        let (mut coordinator, device) = coordinator();
        coordinator.update(LayerName::Optical, true);
        coordinator.update(LayerName::Optical, true);
        coordinator.update(LayerName::Optical, false);
        coordinator.update(LayerName::Optical, false);

        assert_eq!(
            device.calls(),
            vec![
                HapticCall::Start(LayerName::Optical),
                HapticCall::Start(LayerName::Optical),
                HapticCall::Stop(LayerName::Optical),
                HapticCall::Stop(LayerName::Optical),
            ]
        );
        assert_eq!(device.transitions(LayerName::Optical), 2);
    }

    #[test]
    fn test_unknown_layer() {
        let (mut coordinator, device) = coordinator();
        assert_eq!(coordinator.update(LayerName::Radio, true), None);
        assert!(device.calls().is_empty());
    }

    #[test]
    fn test_failure_keeps_previous_state() {
        let (mut coordinator, device) = coordinator();
        device.fail_for(LayerName::Xray);
        coordinator.update(LayerName::Xray, true);
        assert!(!coordinator.is_active(LayerName::Xray));

        // Other layers are unaffected.
        coordinator.update(LayerName::Optical, true);
        assert!(coordinator.is_active(LayerName::Optical));
    }

    #[test]
    fn test_stop_all() {
        let (mut coordinator, device) = coordinator();
        coordinator.update(LayerName::Xray, true);
        coordinator.update(LayerName::Optical, true);
        let commands = coordinator.stop_all();
        assert_eq!(commands.len(), 2);
        assert!(coordinator.active_layers().is_empty());
        assert!(!device.is_running(LayerName::Xray));
        assert!(!device.is_running(LayerName::Optical));
    }
}
