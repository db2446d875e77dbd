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
//! Turns the pixels around the cursor into a sound decision.
//!
//! This module provides:
//! - Instrument ids and their aggregation rules
//! - The cursor vicinity scanner
//! - Edge detection over the scanned neighborhood
//! - Stereo pan from the pointer position

mod edge;
mod instrument;
mod pan;
mod scanner;

pub use edge::{annotate, object_pixel_ratio, DEFAULT_EDGE_THRESHOLD};
pub use instrument::{InstrumentId, MAX_INSTRUMENT_ID};
pub use pan::pan_ratio;
pub use scanner::{scan, scan_layer, CandidateSet, LayerScan, LayerSummary};

use crate::image::ImageLayer;

/// Everything one frame decided: the per-layer scans after edge annotation and
/// the merged candidates that go to the voice manager.
#[derive(Debug)]
pub struct Analysis {
    pub layers: Vec<LayerScan>,
    pub candidates: CandidateSet,
}

/// Runs the scan and edge detection for every layer and merges the candidates
/// in layer order. A later layer overwrites an earlier layer's entry for the
/// same instrument, edge flag included.
pub fn analyze(
    layers: &[ImageLayer],
    center: (i32, i32),
    radii: (u32, u32),
    pan: f32,
    edge_threshold: f64,
) -> Analysis {
    let (radius_h, radius_v) = radii;
    let mut scans = scan(layers, center.0, center.1, radius_h, radius_v, pan);
    let mut candidates = CandidateSet::new();
    for layer_scan in scans.iter_mut() {
        annotate(layer_scan, radius_h, radius_v, edge_threshold);
        candidates.merge(layer_scan.candidates());
    }

    Analysis {
        layers: scans,
        candidates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{FeatureMap, LayerName, PixelSample};
    use crate::testutil::layer_from_map;

    #[test]
    fn test_later_layer_overwrites_candidates() {
        // Optical sees a sliver of instrument 5 (edge), x-ray is full of it.
        let mut sliver = FeatureMap::new(40, 40);
        sliver.set(20, 20, PixelSample::new(InstrumentId::new(5), Some(1.0)));
        let full = FeatureMap::from_fn(40, 40, |_, _| {
            PixelSample::new(InstrumentId::new(5), Some(2.0))
        });
        let layers = vec![
            layer_from_map(LayerName::Optical, sliver.clone()),
            layer_from_map(LayerName::Xray, full.clone()),
        ];

        let analysis = analyze(&layers, (20, 20), (5, 5), 0.25, DEFAULT_EDGE_THRESHOLD);
        assert!(analysis.layers[0].on_edge());
        assert!(!analysis.layers[1].on_edge());
        let params = analysis
            .candidates
            .get(InstrumentId::new(5))
            .expect("candidate");
        assert_eq!(params.feature_value, Some(2.0));
        assert!(!params.on_edge);
        assert_eq!(params.pan, 0.25);

        // Reversed, the edge flag from the sliver layer is what survives.
        let layers = vec![
            layer_from_map(LayerName::Xray, full),
            layer_from_map(LayerName::Optical, sliver),
        ];
        let analysis = analyze(&layers, (20, 20), (5, 5), 0.0, DEFAULT_EDGE_THRESHOLD);
        let params = analysis
            .candidates
            .get(InstrumentId::new(5))
            .expect("candidate");
        assert!(params.on_edge);
        assert_eq!(params.feature_value, Some(1.0));
    }
}
