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
//! The per-image sonification engine.
//!
//! An [`Engine`] owns everything one open image needs: its layers, the cursor
//! geometry, the scan state and the voices and haptics it is driving. Every
//! pointer move runs one frame of the pipeline and returns a [`FrameReport`].

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, EngineConfig};
use crate::haptic::{HapticCommand, HapticCoordinator, HapticDevice};
use crate::image::SonifiedImage;
use crate::sonify::{self, LayerSummary};
use crate::voice::{VoiceCommand, VoiceDevice, VoiceManager};

mod geometry;
mod overlay;
mod scan;

pub use geometry::{CursorGeometry, ScanDirection};
pub use overlay::{cursor_overlay, OverlayPixel};
pub use scan::{ScanMode, Sweep};

/// Where a pointer position came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerOrigin {
    /// The user moved the pointer.
    Manual,
    /// A scan sweep moved the pointer.
    Automatic,
}

/// What a single frame decided and issued.
#[derive(Clone, Debug, Serialize)]
pub struct FrameReport {
    pub pointer: (i32, i32),
    pub origin: PointerOrigin,
    pub radii: (u32, u32),
    pub pan: f32,
    /// Per-layer scan results. Empty while muted.
    pub layers: Vec<LayerSummary>,
    /// Voice commands in the order they were issued.
    pub voices: Vec<VoiceCommand>,
    /// Haptic commands in the order they were issued.
    pub haptics: Vec<HapticCommand>,
}

/// Everything issued while silencing the engine.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Silenced {
    pub voices: Vec<VoiceCommand>,
    pub haptics: Vec<HapticCommand>,
}

/// The engine for one open image.
pub struct Engine {
    image: SonifiedImage,
    geometry: CursorGeometry,
    mode: ScanMode,
    pointer: Option<(i32, i32)>,
    /// The rendered size of the image. None until a surface is attached.
    surface: Option<(u32, u32)>,
    muted: bool,
    scan_stretch: u32,
    scan_step: u32,
    edge_threshold: f64,
    voices: VoiceManager,
    haptics: HapticCoordinator,
}

impl Engine {
    /// Creates an engine for the image. One haptic actuator is created per
    /// sounding layer.
    pub fn new(
        image: SonifiedImage,
        config: &EngineConfig,
        voice_device: Arc<dyn VoiceDevice>,
        haptic_device: &dyn HapticDevice,
    ) -> Result<Engine, ConfigError> {
        config.validate()?;

        let haptics = HapticCoordinator::new(haptic_device, &image.layer_names());
        info!(
            layers = ?image.layer_names(),
            voice_device = %voice_device,
            haptic_device = %haptic_device,
            cursor_radius = config.cursor_radius(),
            "Engine created."
        );

        Ok(Engine {
            image,
            geometry: CursorGeometry::new(config.cursor_radius()),
            mode: ScanMode::Idle,
            pointer: None,
            surface: None,
            muted: false,
            scan_stretch: config.scan_stretch(),
            scan_step: config.scan_step(),
            edge_threshold: config.edge_threshold(),
            voices: VoiceManager::new(voice_device),
            haptics,
        })
    }

    /// Handles a pointer move. A manual move cancels any scan and restores the
    /// cursor geometry first. Returns None if no surface is attached.
    pub fn pointer_moved(&mut self, x: i32, y: i32, origin: PointerOrigin) -> Option<FrameReport> {
        if origin == PointerOrigin::Manual {
            if self.mode.is_scanning() {
                info!("Manual pointer move, cancelling scan.");
                self.mode = ScanMode::Idle;
            }
            self.geometry.revert();
        }
        self.frame(x, y, origin)
    }

    /// Starts a sweep from the top left corner. The cursor is stretched across
    /// the sweep direction once, no matter how often the sweep is restarted.
    /// Starting a scan unmutes the engine.
    pub fn start_scan(&mut self, direction: ScanDirection) -> Option<FrameReport> {
        if self.surface.is_none() {
            debug!(%direction, "No surface attached, ignoring scan.");
            return None;
        }

        if self.geometry.stretch(direction, self.scan_stretch) {
            debug!(%direction, radii = ?self.geometry.radii(), "Cursor stretched.");
        }
        self.muted = false;
        let sweep = Sweep::start(direction);
        self.mode = ScanMode::Scanning(sweep);
        info!(%direction, "Scan started.");

        let (x, y) = sweep.position();
        self.frame(x, y, PointerOrigin::Automatic)
    }

    /// Advances the sweep by one step and runs the frame there. When the sweep
    /// passes the far edge it finishes, restores the cursor and silences the
    /// engine. Returns None when not scanning or once finished.
    pub fn scan_step(&mut self) -> Option<FrameReport> {
        let ScanMode::Scanning(sweep) = self.mode else {
            return None;
        };
        let (width, height) = self.surface?;

        let radius = match sweep.direction() {
            ScanDirection::Horizontal => self.geometry.radius_v(),
            ScanDirection::Vertical => self.geometry.radius_h(),
        };
        let band = radius.saturating_mul(2);

        match sweep.advance(self.scan_step, band, width, height) {
            Some(next) => {
                self.mode = ScanMode::Scanning(next);
                let (x, y) = next.position();
                self.frame(x, y, PointerOrigin::Automatic)
            }
            None => {
                info!(direction = %sweep.direction(), "Scan finished.");
                self.cancel_scan();
                self.silence();
                None
            }
        }
    }

    /// Stops scanning and restores the cursor. Returns true if a scan was
    /// running.
    pub fn cancel_scan(&mut self) -> bool {
        if !self.mode.is_scanning() {
            return false;
        }
        self.mode = ScanMode::Idle;
        self.geometry.revert();
        debug!("Scan cancelled.");
        true
    }

    pub fn set_cursor_radius(&mut self, radius: u32) {
        self.geometry.set_base(radius);
        let base_radius = self.geometry.base_radius();
        debug!(base_radius, "Cursor radius changed.");
    }

    /// While muted, frames still move the pointer but issue nothing. Muting
    /// stops every voice and actuator.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        info!(muted, "Sound toggled.");
        if muted {
            self.silence();
        }
    }

    /// Attaches the surface the image is rendered on. Frames are no-ops until
    /// a surface with a non-zero size is attached.
    pub fn attach_surface(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            warn!(width, height, "Ignoring empty surface.");
            return;
        }
        self.surface = Some((width, height));
        debug!(width, height, "Surface attached.");
    }

    /// Detaches the surface, stopping any scan and silencing the engine.
    pub fn detach_surface(&mut self) {
        self.cancel_scan();
        self.silence();
        self.surface = None;
        debug!("Surface detached.");
    }

    /// The visual cursor at the current pointer position.
    pub fn overlay(&self) -> Vec<OverlayPixel> {
        match self.pointer {
            Some(center) => cursor_overlay(self.image.base(), center, &self.geometry),
            None => Vec::new(),
        }
    }

    pub fn description(&self) -> &str {
        self.image.description()
    }

    /// Stops every voice and every haptic actuator.
    pub fn silence(&mut self) -> Silenced {
        Silenced {
            voices: self.voices.stop_all(),
            haptics: self.haptics.stop_all(),
        }
    }

    pub fn image(&self) -> &SonifiedImage {
        &self.image
    }

    pub fn geometry(&self) -> &CursorGeometry {
        &self.geometry
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn is_scanning(&self) -> bool {
        self.mode.is_scanning()
    }

    pub fn pointer(&self) -> Option<(i32, i32)> {
        self.pointer
    }

    pub fn is_ready(&self) -> bool {
        self.surface.is_some()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn voices(&self) -> &VoiceManager {
        &self.voices
    }

    pub fn haptics(&self) -> &HapticCoordinator {
        &self.haptics
    }

    /// Runs the pipeline for one pointer position: scan every sounding layer,
    /// annotate edges, reconcile voices, then drive the haptics.
    fn frame(&mut self, x: i32, y: i32, origin: PointerOrigin) -> Option<FrameReport> {
        let Some((width, _)) = self.surface else {
            debug!(x, y, "No surface attached, skipping frame.");
            return None;
        };

        self.pointer = Some((x, y));
        let radii = self.geometry.radii();
        let pan = sonify::pan_ratio(x as f64, width as f64);
        let mut report = FrameReport {
            pointer: (x, y),
            origin,
            radii,
            pan,
            layers: Vec::new(),
            voices: Vec::new(),
            haptics: Vec::new(),
        };
        if self.muted {
            return Some(report);
        }

        let analysis = sonify::analyze(
            self.image.sounding_layers(),
            (x, y),
            radii,
            pan,
            self.edge_threshold,
        );
        report.voices = self.voices.reconcile(&analysis.candidates);
        report.haptics = analysis
            .layers
            .iter()
            .filter_map(|scan| self.haptics.update(scan.layer(), scan.haptic_hit()))
            .collect();
        report.layers = analysis.layers.iter().map(|scan| scan.summary()).collect();

        debug!(
            x,
            y,
            ?origin,
            pan,
            instruments = ?analysis.candidates.instruments(),
            active_voices = self.voices.active_count(),
            "Frame processed."
        );
        Some(report)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("layers", &self.image.layer_names())
            .field("geometry", &self.geometry)
            .field("mode", &self.mode)
            .field("pointer", &self.pointer)
            .field("surface", &self.surface)
            .field("muted", &self.muted)
            .field("voices", &self.voices)
            .field("haptics", &self.haptics)
            .finish()
    }
}
