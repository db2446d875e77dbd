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
use std::f64::consts::PI;

use tracing::debug;

use super::scanner::LayerScan;

/// Default fraction of the cursor area below which a neighborhood is an edge.
pub const DEFAULT_EDGE_THRESHOLD: f64 = 0.5;

/// The object pixel count divided by the area of the cursor ellipse. The scan
/// itself covers the full bounding rectangle, so this can exceed 1.
pub fn object_pixel_ratio(object_pixel_count: u32, radius_h: u32, radius_v: u32) -> f64 {
    let area = PI * radius_h as f64 * radius_v as f64;
    if area <= 0.0 {
        return 0.0;
    }
    object_pixel_count as f64 / area
}

/// Marks every candidate of the layer as being on an edge when the object
/// ratio is strictly between zero and the threshold. The xylophone is never
/// marked. Returns whether the layer is on an edge.
pub fn annotate(scan: &mut LayerScan, radius_h: u32, radius_v: u32, threshold: f64) -> bool {
    let ratio = object_pixel_ratio(scan.object_pixel_count(), radius_h, radius_v);
    let on_edge = ratio > 0.0 && ratio < threshold;
    scan.set_on_edge(on_edge);

    if on_edge {
        debug!(layer = %scan.layer(), ratio, "Cursor is on an edge");
        for (instrument, params) in scan.candidates_mut().iter_mut() {
            if instrument.marks_edges() {
                params.on_edge = true;
            }
        }
    }

    on_edge
}
