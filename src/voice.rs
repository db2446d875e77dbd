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
//! Instrument voices.
//!
//! This module provides:
//! - The device interface the engine drives voices through
//! - The note-equality policy that decides when a voice must restart
//! - The voice manager that reconciles playing voices every frame

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::actuator::ActuatorError;
use crate::config::ConfigError;
use crate::sonify::InstrumentId;

mod manager;
pub mod mock;
mod policy;

pub use manager::VoiceManager;
pub use policy::{NotePolicy, DEFAULT_NOTE_BUCKET_SIZE};

/// The parameters a voice is started or updated with.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VoiceParams {
    /// The averaged feature value of the pixels that chose this instrument.
    pub feature_value: Option<f32>,
    /// Distance of the sample from the cursor center, in pixels.
    pub distance: f32,
    /// Stereo pan in `[-1, 1]`.
    pub pan: f32,
    /// Whether the cursor straddles the boundary of the object.
    pub on_edge: bool,
}

/// One voice lifecycle call, in the order it was issued.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum VoiceCommand {
    Stop {
        instrument: InstrumentId,
    },
    Start {
        instrument: InstrumentId,
        params: VoiceParams,
    },
}

impl VoiceCommand {
    pub fn instrument(&self) -> InstrumentId {
        match self {
            VoiceCommand::Stop { instrument } | VoiceCommand::Start { instrument, .. } => {
                *instrument
            }
        }
    }
}

/// The audio side of the engine. Implementations synthesize the voices; the
/// engine only tells them which instruments play and with what parameters.
pub trait VoiceDevice: fmt::Display + Send + Sync {
    /// Starts the voice for the instrument, or updates it if it's already
    /// playing the same note.
    fn start_voice(&self, instrument: InstrumentId, params: &VoiceParams)
        -> Result<(), ActuatorError>;

    /// Stops the voice for the instrument.
    fn stop_voice(&self, instrument: InstrumentId) -> Result<(), ActuatorError>;

    /// Whether `candidate` can be played by the voice currently playing
    /// `playing` without restarting it.
    fn is_same_note(&self, playing: &VoiceParams, candidate: &VoiceParams) -> bool;
}

/// Gets a voice device with the given name.
pub fn get_device(name: &str, policy: NotePolicy) -> Result<Arc<dyn VoiceDevice>, ConfigError> {
    if name.starts_with("mock") {
        return Ok(Arc::new(mock::Device::get(name, policy)));
    }

    Err(ConfigError::Invalid(format!(
        "unknown voice device '{}'",
        name
    )))
}
