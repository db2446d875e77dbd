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
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

use super::{HapticActuator, HapticDevice};
use crate::actuator::{Action, ActuatorError};
use crate::image::LayerName;

/// How many calls the mock remembers. Older calls are dropped first.
pub const MAX_RECORDED_CALLS: usize = 1024;

/// A call received by one of the mock actuators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum HapticCall {
    Start(LayerName),
    Stop(LayerName),
}

#[derive(Default)]
struct State {
    calls: VecDeque<HapticCall>,
    running: HashSet<LayerName>,
    transitions: HashMap<LayerName, usize>,
    failing: HashSet<LayerName>,
    actuators: usize,
}

/// A mock device. Doesn't vibrate anything, but records the most recent calls
/// its actuators receive.
#[derive(Clone)]
pub struct Device {
    name: String,
    state: Arc<Mutex<State>>,
}

impl Device {
    /// Gets the given mock device.
    pub fn get(name: &str) -> Device {
        Device {
            name: name.to_string(),
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Returns the recorded calls, oldest first.
    pub fn calls(&self) -> Vec<HapticCall> {
        self.state.lock().calls.iter().copied().collect()
    }

    pub fn take_calls(&self) -> Vec<HapticCall> {
        self.state.lock().calls.drain(..).collect()
    }

    pub fn is_running(&self, layer: LayerName) -> bool {
        self.state.lock().running.contains(&layer)
    }

    /// Number of times the layer's actuator actually changed state.
    pub fn transitions(&self, layer: LayerName) -> usize {
        self.state
            .lock()
            .transitions
            .get(&layer)
            .copied()
            .unwrap_or(0)
    }

    /// Number of actuators handed out.
    pub fn actuator_count(&self) -> usize {
        self.state.lock().actuators
    }

    /// Makes every call for the layer fail.
    pub fn fail_for(&self, layer: LayerName) {
        self.state.lock().failing.insert(layer);
    }
}

impl HapticDevice for Device {
    fn actuator(&self, layer: LayerName) -> Arc<dyn HapticActuator> {
        self.state.lock().actuators += 1;
        Arc::new(Actuator {
            device: self.name.clone(),
            layer,
            state: self.state.clone(),
        })
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name)
    }
}

struct Actuator {
    device: String,
    layer: LayerName,
    state: Arc<Mutex<State>>,
}

impl Actuator {
    fn call(&self, action: Action) -> Result<(), ActuatorError> {
        let mut state = self.state.lock();
        if state.calls.len() == MAX_RECORDED_CALLS {
            state.calls.pop_front();
        }
        state.calls.push_back(match action {
            Action::Start => HapticCall::Start(self.layer),
            Action::Stop => HapticCall::Stop(self.layer),
        });
        if state.failing.contains(&self.layer) {
            return Err(ActuatorError::Haptic {
                layer: self.layer,
                action,
                reason: "mock failure".to_string(),
            });
        }

        let changed = match action {
            Action::Start => state.running.insert(self.layer),
            Action::Stop => state.running.remove(&self.layer),
        };
        if changed {
            *state.transitions.entry(self.layer).or_insert(0) += 1;
            info!(device = self.device, layer = %self.layer, %action, "Haptic actuator changed.");
        }
        Ok(())
    }
}

impl HapticActuator for Actuator {
    fn start(&self) -> Result<(), ActuatorError> {
        self.call(Action::Start)
    }

    fn stop(&self) -> Result<(), ActuatorError> {
        self.call(Action::Stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_log_is_bounded() {
        let device = Device::get("mock-haptics");
        let actuator = device.actuator(LayerName::Optical);
        for _ in 0..=MAX_RECORDED_CALLS {
            actuator.start().expect("start");
            actuator.stop().expect("stop");
        }

        let calls = device.calls();
        assert_eq!(calls.len(), MAX_RECORDED_CALLS);
        assert_eq!(calls.last(), Some(&HapticCall::Stop(LayerName::Optical)));
        let transitions = device.transitions(LayerName::Optical);
        assert_eq!(transitions, 2 * MAX_RECORDED_CALLS + 2);
        assert!(!device.is_running(LayerName::Optical));

        assert_eq!(device.take_calls().len(), MAX_RECORDED_CALLS);
        assert!(device.calls().is_empty());
    }
}
