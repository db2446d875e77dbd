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
use std::path::Path;
use std::time::Duration;

use config::{Config, File};
use duration_string::DurationString;
use serde::Deserialize;

use super::error::ConfigError;
use crate::sonify::DEFAULT_EDGE_THRESHOLD;
use crate::voice::{NotePolicy, DEFAULT_NOTE_BUCKET_SIZE};

pub const DEFAULT_CURSOR_RADIUS: u32 = 10;
pub const DEFAULT_SCAN_STRETCH: u32 = 3;
pub const DEFAULT_SCAN_STEP: u32 = 1;
const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_millis(20);
const DEFAULT_VOICE_DEVICE: &str = "mock-voices";
const DEFAULT_HAPTIC_DEVICE: &str = "mock-haptics";

/// A YAML representation of the engine configuration. Every field is optional.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct EngineConfig {
    /// The cursor radius in pixels, restored whenever manual movement resumes.
    cursor_radius: Option<u32>,

    /// The factor scan mode stretches the cursor by, across the scan direction.
    scan_stretch: Option<u32>,

    /// The object pixel ratio below which the cursor is considered on an edge.
    edge_threshold: Option<f64>,

    /// The width of a feature bucket for note equality.
    note_bucket_size: Option<f32>,

    /// How many pixels a scan sweep advances per step.
    scan_step: Option<u32>,

    /// How long to wait between scan steps, e.g. "20ms".
    scan_interval: Option<String>,

    /// The voice device to drive.
    voice_device: Option<String>,

    /// The haptic device to drive.
    haptic_device: Option<String>,
}

impl EngineConfig {
    /// Parses an engine config from a YAML file.
    pub fn deserialize(path: &Path) -> Result<EngineConfig, ConfigError> {
        Ok(Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<EngineConfig>()?)
    }

    /// Returns the base cursor radius (default: 10).
    pub fn cursor_radius(&self) -> u32 {
        self.cursor_radius.unwrap_or(DEFAULT_CURSOR_RADIUS)
    }

    /// Returns the scan stretch multiplier (default: 3).
    pub fn scan_stretch(&self) -> u32 {
        self.scan_stretch.unwrap_or(DEFAULT_SCAN_STRETCH)
    }

    /// Returns the edge threshold (default: 0.5).
    pub fn edge_threshold(&self) -> f64 {
        self.edge_threshold.unwrap_or(DEFAULT_EDGE_THRESHOLD)
    }

    pub fn note_policy(&self) -> NotePolicy {
        NotePolicy::new(self.note_bucket_size.unwrap_or(DEFAULT_NOTE_BUCKET_SIZE))
    }

    /// Returns the scan step in pixels (default: 1).
    pub fn scan_step(&self) -> u32 {
        self.scan_step.unwrap_or(DEFAULT_SCAN_STEP)
    }

    /// Returns the delay between scan steps (default: 20ms).
    pub fn scan_interval(&self) -> Result<Duration, ConfigError> {
        let scan_interval = match &self.scan_interval {
            Some(scan_interval) => scan_interval,
            None => return Ok(DEFAULT_SCAN_INTERVAL),
        };
        let duration = DurationString::from_string(scan_interval.clone()).map_err(|e| {
            ConfigError::Invalid(format!("scan_interval '{}': {}", scan_interval, e))
        })?;
        Ok(duration.into())
    }

    pub fn voice_device(&self) -> &str {
        self.voice_device.as_deref().unwrap_or(DEFAULT_VOICE_DEVICE)
    }

    pub fn haptic_device(&self) -> &str {
        self.haptic_device
            .as_deref()
            .unwrap_or(DEFAULT_HAPTIC_DEVICE)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cursor_radius() == 0 {
            return Err(ConfigError::Invalid(
                "cursor_radius must be at least 1".to_string(),
            ));
        }
        if self.scan_stretch() == 0 {
            return Err(ConfigError::Invalid(
                "scan_stretch must be at least 1".to_string(),
            ));
        }
        if self.scan_step() == 0 {
            return Err(ConfigError::Invalid(
                "scan_step must be at least 1".to_string(),
            ));
        }
        let threshold = self.edge_threshold();
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "edge_threshold must be in (0, 1], got {}",
                threshold
            )));
        }
        let bucket_size = self.note_policy().bucket_size();
        if !bucket_size.is_finite() || bucket_size < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "note_bucket_size must be a non-negative number, got {}",
                bucket_size
            )));
        }
        if self.scan_interval()?.is_zero() {
            return Err(ConfigError::Invalid(
                "scan_interval must be longer than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
impl EngineConfig {
    /// Creates a config with the given cursor radius (test only).
    pub fn with_cursor_radius(cursor_radius: u32) -> Self {
        Self {
            cursor_radius: Some(cursor_radius),
            ..Default::default()
        }
    }
}
