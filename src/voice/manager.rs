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
//! Reconciles the playing voices against each frame's candidates.
//!
//! Every frame produces an ordered command queue: all stops first, then a
//! start for every candidate. A voice is therefore always stopped before its
//! instrument is started again, so one instrument never has two voices.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::{VoiceCommand, VoiceDevice, VoiceParams};
use crate::sonify::{CandidateSet, InstrumentId};

/// Owns the voices that are currently playing, keyed by instrument.
pub struct VoiceManager {
    /// The parameters last successfully issued for each playing instrument.
    active: BTreeMap<InstrumentId, VoiceParams>,
    device: Arc<dyn VoiceDevice>,
}

impl VoiceManager {
    pub fn new(device: Arc<dyn VoiceDevice>) -> Self {
        Self {
            active: BTreeMap::new(),
            device,
        }
    }

    /// Computes the commands that take the playing voices to the candidates
    /// without issuing them.
    pub fn plan(&self, candidates: &CandidateSet) -> Vec<VoiceCommand> {
        let mut commands = Vec::with_capacity(self.active.len() + candidates.len());

        for (instrument, playing) in self.active.iter() {
            let keep = candidates
                .get(*instrument)
                .is_some_and(|candidate| self.device.is_same_note(playing, candidate));
            if !keep {
                commands.push(VoiceCommand::Stop {
                    instrument: *instrument,
                });
            }
        }

        let starts = candidates
            .iter()
            .map(|(instrument, params)| VoiceCommand::Start {
                instrument,
                params: *params,
            });
        commands.extend(starts);

        commands
    }

    /// Plans and issues the commands for this frame. Returns the issued commands.
    pub fn reconcile(&mut self, candidates: &CandidateSet) -> Vec<VoiceCommand> {
        let commands = self.plan(candidates);
        self.dispatch(&commands);
        commands
    }

    /// Issues the commands in order. Failures are logged and skipped. A voice
    /// whose stop failed is forgotten anyway; a voice whose start failed is not
    /// recorded, so the next frame starts it again.
    fn dispatch(&mut self, commands: &[VoiceCommand]) {
        for command in commands {
            match command {
                VoiceCommand::Stop { instrument } => {
                    self.active.remove(instrument);
                    if let Err(e) = self.device.stop_voice(*instrument) {
                        warn!(
                            device = %self.device,
                            instrument = %instrument,
                            err = %e,
                            "Error stopping voice"
                        );
                    }
                }
                VoiceCommand::Start { instrument, params } => {
                    match self.device.start_voice(*instrument, params) {
                        Ok(()) => {
                            self.active.insert(*instrument, *params);
                        }
                        Err(e) => warn!(
                            device = %self.device,
                            instrument = %instrument,
                            err = %e,
                            "Error starting voice"
                        ),
                    }
                }
            }
        }
        debug!(active = self.active.len(), "Voices reconciled");
    }

    /// Stops every playing voice.
    pub fn stop_all(&mut self) -> Vec<VoiceCommand> {
        let commands: Vec<VoiceCommand> = self
            .active
            .keys()
            .map(|instrument| VoiceCommand::Stop {
                instrument: *instrument,
            })
            .collect();
        self.dispatch(&commands);
        commands
    }

    /// Returns the current number of active voices.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self, instrument: InstrumentId) -> bool {
        self.active.contains_key(&instrument)
    }

    pub fn active_params(&self, instrument: InstrumentId) -> Option<&VoiceParams> {
        self.active.get(&instrument)
    }
}

impl std::fmt::Debug for VoiceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceManager")
            .field("active_voices", &self.active.len())
            .field("device", &self.device.to_string())
            .finish()
    }
}
