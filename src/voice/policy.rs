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
use super::VoiceParams;

/// Default width of a feature value bucket. Features are on the 0-255 pixel
/// scale, so this yields sixteen distinct notes per instrument.
pub const DEFAULT_NOTE_BUCKET_SIZE: f32 = 16.0;

/// Decides whether two parameter sets represent the same note. Two sets are
/// the same note when their feature values quantize to the same bucket and
/// they agree on the edge flag. Distance and pan only update a playing voice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NotePolicy {
    bucket_size: f32,
}

impl NotePolicy {
    /// Creates a policy. A non-positive bucket size compares features exactly.
    pub fn new(bucket_size: f32) -> NotePolicy {
        NotePolicy { bucket_size }
    }

    pub fn bucket_size(&self) -> f32 {
        self.bucket_size
    }

    fn same_feature(&self, a: Option<f32>, b: Option<f32>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) if self.bucket_size > 0.0 => {
                (a / self.bucket_size).floor() == (b / self.bucket_size).floor()
            }
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    pub fn is_same_note(&self, playing: &VoiceParams, candidate: &VoiceParams) -> bool {
        playing.on_edge == candidate.on_edge
            && self.same_feature(playing.feature_value, candidate.feature_value)
    }
}

impl Default for NotePolicy {
    fn default() -> Self {
        NotePolicy::new(DEFAULT_NOTE_BUCKET_SIZE)
    }
}
