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
use std::fmt;

use serde::Serialize;

use crate::image::LayerName;
use crate::sonify::InstrumentId;

/// The lifecycle call that was issued to an actuator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Start,
    Stop,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Start => write!(f, "start"),
            Action::Stop => write!(f, "stop"),
        }
    }
}

/// A voice or haptic lifecycle call failed at the device boundary. These are
/// logged by the callers and never abort a frame.
#[derive(Debug, thiserror::Error)]
pub enum ActuatorError {
    #[error("voice {instrument} failed to {action}: {reason}")]
    Voice {
        instrument: InstrumentId,
        action: Action,
        reason: String,
    },

    #[error("haptic actuator for layer {layer} failed to {action}: {reason}")]
    Haptic {
        layer: LayerName,
        action: Action,
        reason: String,
    },
}
