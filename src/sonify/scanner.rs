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
use serde::Serialize;

use super::instrument::{InstrumentId, MAX_INSTRUMENT_ID};
use crate::image::{ImageLayer, LayerName};
use crate::voice::VoiceParams;

/// The voices a frame wants to play, keyed by instrument id. Backed by a fixed
/// table so inserting during the scan never allocates.
#[derive(Clone, Debug)]
pub struct CandidateSet {
    slots: Box<[Option<VoiceParams>]>,
    len: usize,
}

impl CandidateSet {
    pub fn new() -> CandidateSet {
        CandidateSet {
            slots: vec![None; MAX_INSTRUMENT_ID as usize + 1].into_boxed_slice(),
            len: 0,
        }
    }

    /// Records the parameters for the given instrument, replacing any earlier
    /// entry from the same frame. Background is ignored.
    #[inline]
    pub fn insert(&mut self, instrument: InstrumentId, params: VoiceParams) {
        if instrument.is_background() {
            return;
        }
        let Some(slot) = self.slots.get_mut(instrument.index()) else {
            return;
        };
        if slot.is_none() {
            self.len += 1;
        }
        *slot = Some(params);
    }

    pub fn get(&self, instrument: InstrumentId) -> Option<&VoiceParams> {
        self.slots.get(instrument.index()).and_then(Option::as_ref)
    }

    pub fn contains(&self, instrument: InstrumentId) -> bool {
        self.get(instrument).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates the candidates in ascending instrument order.
    pub fn iter(&self) -> impl Iterator<Item = (InstrumentId, &VoiceParams)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref()
                .map(|params| (InstrumentId::new(index as u8), params))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (InstrumentId, &mut VoiceParams)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            slot.as_mut()
                .map(|params| (InstrumentId::new(index as u8), params))
        })
    }

    pub fn instruments(&self) -> Vec<InstrumentId> {
        self.iter().map(|(instrument, _)| instrument).collect()
    }

    /// Copies every entry of `other` into this set. Entries from `other` win.
    pub fn merge(&mut self, other: &CandidateSet) {
        for (instrument, params) in other.iter() {
            self.insert(instrument, *params);
        }
    }
}

impl Default for CandidateSet {
    fn default() -> Self {
        CandidateSet::new()
    }
}

/// The result of scanning one layer around the cursor.
#[derive(Clone, Debug)]
pub struct LayerScan {
    layer: LayerName,
    candidates: CandidateSet,
    object_pixel_count: u32,
    on_edge: bool,
}

impl LayerScan {
    pub fn new(layer: LayerName) -> LayerScan {
        LayerScan {
            layer,
            candidates: CandidateSet::new(),
            object_pixel_count: 0,
            on_edge: false,
        }
    }

    pub fn layer(&self) -> LayerName {
        self.layer
    }

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    pub(crate) fn candidates_mut(&mut self) -> &mut CandidateSet {
        &mut self.candidates
    }

    /// Number of sampled pixels that were neither background nor bass.
    pub fn object_pixel_count(&self) -> u32 {
        self.object_pixel_count
    }

    /// True if this layer's haptic actuator should run for this frame.
    pub fn haptic_hit(&self) -> bool {
        self.object_pixel_count > 0
    }

    pub fn on_edge(&self) -> bool {
        self.on_edge
    }

    pub(crate) fn set_on_edge(&mut self, on_edge: bool) {
        self.on_edge = on_edge;
    }

    pub fn summary(&self) -> LayerSummary {
        LayerSummary {
            layer: self.layer,
            instruments: self.candidates.instruments(),
            object_pixels: self.object_pixel_count,
            on_edge: self.on_edge,
            haptic: self.haptic_hit(),
        }
    }
}

/// A serializable digest of a [`LayerScan`] for reports.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayerSummary {
    pub layer: LayerName,
    pub instruments: Vec<InstrumentId>,
    pub object_pixels: u32,
    pub on_edge: bool,
    pub haptic: bool,
}

/// Samples every offset `(i, j)` with `i` in `[-radius_h, radius_h)` and `j` in
/// `[-radius_v, radius_v)` around the center. The rectangle is sampled as is;
/// only the overlay is clipped to the ellipse.
pub fn scan_layer(
    layer: &ImageLayer,
    center_x: i32,
    center_y: i32,
    radius_h: u32,
    radius_v: u32,
    pan: f32,
) -> LayerScan {
    let mut scan = LayerScan::new(layer.name());
    let Some(classifier) = layer.classifier() else {
        return scan;
    };

    let radius_h = radius_h.min(i32::MAX as u32) as i32;
    let radius_v = radius_v.min(i32::MAX as u32) as i32;
    for i in -radius_h..radius_h {
        let x = center_x.saturating_add(i);
        for j in -radius_v..radius_v {
            let sample = classifier.classify(x, center_y.saturating_add(j));
            if sample.instrument.is_background() {
                continue;
            }
            if sample.instrument.is_object() {
                scan.object_pixel_count += 1;
            }
            let distance = ((i as f32).powi(2) + (j as f32).powi(2)).sqrt();
            scan.candidates.insert(
                sample.instrument,
                VoiceParams {
                    feature_value: sample.feature,
                    distance,
                    pan,
                    on_edge: false,
                },
            );
        }
    }

    scan
}

/// Scans every layer in order.
pub fn scan(
    layers: &[ImageLayer],
    center_x: i32,
    center_y: i32,
    radius_h: u32,
    radius_v: u32,
    pan: f32,
) -> Vec<LayerScan> {
    layers
        .iter()
        .map(|layer| scan_layer(layer, center_x, center_y, radius_h, radius_v, pan))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{FeatureMap, PixelSample};
    use crate::testutil::layer_from_map;

    fn params(feature: f32) -> VoiceParams {
        VoiceParams {
            feature_value: Some(feature),
            distance: 0.0,
            pan: 0.0,
            on_edge: false,
        }
    }

    #[test]
    fn test_candidate_set_last_write_wins() {
        let mut set = CandidateSet::new();
        set.insert(InstrumentId::new(5), params(1.0));
        set.insert(InstrumentId::new(5), params(2.0));
        set.insert(InstrumentId::new(3), params(3.0));
        set.insert(InstrumentId::BACKGROUND, params(4.0));

        assert_eq!(set.len(), 2);
        assert_eq!(
            set.get(InstrumentId::new(5)).and_then(|p| p.feature_value),
            Some(2.0)
        );
        assert_eq!(
            set.instruments(),
            vec![InstrumentId::new(3), InstrumentId::new(5)]
        );
    }

    #[test]
    fn test_candidate_set_merge() {
        let mut first = CandidateSet::new();
        first.insert(InstrumentId::new(5), params(1.0));
        first.insert(InstrumentId::new(6), params(1.0));
        let mut second = CandidateSet::new();
        second.insert(InstrumentId::new(6), params(9.0));

        first.merge(&second);
        assert_eq!(first.len(), 2);
        assert_eq!(
            first.get(InstrumentId::new(6)).and_then(|p| p.feature_value),
            Some(9.0)
        );
    }

    #[test]
    fn test_scan_uniform_background() {
        let layer = layer_from_map(LayerName::Optical, FeatureMap::new(50, 50));
        let scan = scan_layer(&layer, 25, 25, 5, 5, 0.0);
        assert!(scan.candidates().is_empty());
        assert_eq!(scan.object_pixel_count(), 0);
        assert!(!scan.haptic_hit());
    }

    #[test]
    fn test_scan_samples_half_open_rectangle() {
        let five = InstrumentId::new(5);
        let map = FeatureMap::from_fn(50, 50, |_, _| PixelSample::new(five, Some(10.0)));
        let layer = layer_from_map(LayerName::Optical, map);
        let scan = scan_layer(&layer, 25, 25, 3, 2, 0.5);
        // 6 columns by 4 rows.
        assert_eq!(scan.object_pixel_count(), 24);
        assert!(scan.haptic_hit());
        let params = scan.candidates().get(five).expect("candidate");
        assert_eq!(params.pan, 0.5);
        assert!(!params.on_edge);
        // The last sample written is offset (2, 1).
        assert!((params.distance - 5.0_f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_scan_bass_is_not_an_object() {
        let sample = PixelSample::new(InstrumentId::BASS, Some(1.0));
        let map = FeatureMap::from_fn(20, 20, |_, _| sample);
        let layer = layer_from_map(LayerName::Radio, map);
        let scan = scan_layer(&layer, 10, 10, 4, 4, 0.0);
        assert!(scan.candidates().contains(InstrumentId::BASS));
        assert_eq!(scan.object_pixel_count(), 0);
        assert!(!scan.haptic_hit());
    }

    #[test]
    fn test_scan_outside_image() {
        let layer = layer_from_map(
            LayerName::Ir,
            FeatureMap::from_fn(10, 10, |_, _| PixelSample::new(InstrumentId::new(9), None)),
        );
        let scan = scan_layer(&layer, -100, -100, 5, 5, 0.0);
        assert!(scan.candidates().is_empty());

        // Straddling the top left corner only picks up the in-bounds quadrant.
        let scan = scan_layer(&layer, 0, 0, 2, 2, 0.0);
        assert_eq!(scan.object_pixel_count(), 4);
    }

    #[test]
    fn test_scan_unbuilt_layer_is_silent() {
        let layer = ImageLayer::unbuilt(LayerName::Xray, "broken");
        let scan = scan_layer(&layer, 0, 0, 5, 5, 0.0);
        assert!(scan.candidates().is_empty());
        assert_eq!(scan.layer(), LayerName::Xray);
    }
}
