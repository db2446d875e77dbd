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
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fmt;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

use super::{NotePolicy, VoiceDevice, VoiceParams};
use crate::actuator::{Action, ActuatorError};
use crate::sonify::InstrumentId;

/// How many calls the mock remembers. Older calls are dropped first.
pub const MAX_RECORDED_CALLS: usize = 1024;

/// A call received by the mock device.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum VoiceCall {
    Start(InstrumentId, VoiceParams),
    Stop(InstrumentId),
}

/// A mock device. Doesn't actually synthesize anything, but keeps track of
/// which voices would be playing and the most recent calls it received.
pub struct Device {
    name: String,
    policy: NotePolicy,
    calls: Mutex<VecDeque<VoiceCall>>,
    playing: Mutex<BTreeMap<InstrumentId, VoiceParams>>,
    failing: Mutex<HashSet<InstrumentId>>,
}

impl Device {
    /// Gets the given mock device.
    pub fn get(name: &str, policy: NotePolicy) -> Device {
        Device {
            name: name.to_string(),
            policy,
            calls: Mutex::new(VecDeque::new()),
            playing: Mutex::new(BTreeMap::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// Returns the recorded calls, oldest first.
    pub fn calls(&self) -> Vec<VoiceCall> {
        self.calls.lock().iter().cloned().collect()
    }

    /// Returns and clears the recorded calls.
    pub fn take_calls(&self) -> Vec<VoiceCall> {
        self.calls.lock().drain(..).collect()
    }

    pub fn is_playing(&self, instrument: InstrumentId) -> bool {
        self.playing.lock().contains_key(&instrument)
    }

    pub fn playing_count(&self) -> usize {
        self.playing.lock().len()
    }

    /// Makes every call for the instrument fail until [`Device::recover`].
    pub fn fail_for(&self, instrument: InstrumentId) {
        self.failing.lock().insert(instrument);
    }

    pub fn recover(&self, instrument: InstrumentId) {
        self.failing.lock().remove(&instrument);
    }

    fn record(&self, call: VoiceCall) {
        let mut calls = self.calls.lock();
        if calls.len() == MAX_RECORDED_CALLS {
            calls.pop_front();
        }
        calls.push_back(call);
    }

    fn check(&self, instrument: InstrumentId, action: Action) -> Result<(), ActuatorError> {
        if self.failing.lock().contains(&instrument) {
            return Err(ActuatorError::Voice {
                instrument,
                action,
                reason: "mock failure".to_string(),
            });
        }
        Ok(())
    }
}

impl VoiceDevice for Device {
    fn start_voice(
        &self,
        instrument: InstrumentId,
        params: &VoiceParams,
    ) -> Result<(), ActuatorError> {
        self.record(VoiceCall::Start(instrument, *params));
        self.check(instrument, Action::Start)?;

        let started = self.playing.lock().insert(instrument, *params).is_none();
        if started {
            info!(
                device = self.name,
                instrument = %instrument,
                feature = ?params.feature_value,
                pan = params.pan,
                on_edge = params.on_edge,
                "Voice started."
            );
        }
        Ok(())
    }

    fn stop_voice(&self, instrument: InstrumentId) -> Result<(), ActuatorError> {
        self.record(VoiceCall::Stop(instrument));
        self.check(instrument, Action::Stop)?;

        if self.playing.lock().remove(&instrument).is_some() {
            info!(device = self.name, instrument = %instrument, "Voice stopped.");
        }
        Ok(())
    }

    fn is_same_note(&self, playing: &VoiceParams, candidate: &VoiceParams) -> bool {
        self.policy.is_same_note(playing, candidate)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name)
    }
}
