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

use super::geometry::CursorGeometry;
use crate::image::ImageLayer;

/// One pixel of the visual cursor for the host to paint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OverlayPixel {
    pub x: i32,
    pub y: i32,
    /// Whether the base layer classifies the pixel as part of an object.
    pub is_object: bool,
}

/// Computes the cursor overlay around `center`: every offset inside the
/// cursor ellipse that lands on the base layer.
pub fn cursor_overlay(
    base: &ImageLayer,
    center: (i32, i32),
    geometry: &CursorGeometry,
) -> Vec<OverlayPixel> {
    let (rh, rv) = (geometry.radius_h() as i32, geometry.radius_v() as i32);
    let mut pixels = Vec::new();
    for i in -rh..rh {
        for j in -rv..rv {
            if !geometry.is_within(i, j) {
                continue;
            }
            let (x, y) = (center.0.saturating_add(i), center.1.saturating_add(j));
            if !base.contains(x, y) {
                continue;
            }
            pixels.push(OverlayPixel {
                x,
                y,
                is_object: !base.classify(x, y).instrument.is_background(),
            });
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{FeatureMap, LayerName, PixelSample};
    use crate::sonify::InstrumentId;
    use crate::testutil::layer_from_map;

    fn pixel(x: i32, y: i32, is_object: bool) -> OverlayPixel {
        OverlayPixel { x, y, is_object }
    }

    #[test]
    fn test_clipped_to_base() {
        let mut map = FeatureMap::new(10, 10);
        map.set(1, 1, PixelSample::new(InstrumentId::new(5), None));
        let base = layer_from_map(LayerName::Composite, map);

        let pixels = cursor_overlay(&base, (0, 0), &CursorGeometry::new(2));
        assert_eq!(
            pixels,
            vec![
                pixel(0, 0, false),
                pixel(0, 1, false),
                pixel(1, 0, false),
                pixel(1, 1, true),
            ]
        );
    }

    #[test]
    fn test_filtered_to_ellipse() {
        let base = layer_from_map(LayerName::Composite, FeatureMap::new(40, 40));
        let pixels = cursor_overlay(&base, (20, 20), &CursorGeometry::new(3));
        assert!(!pixels.is_empty());
        assert!(pixels.iter().all(|p| {
            let (i, j) = ((p.x - 20) as f64, (p.y - 20) as f64);
            i * i / 9.0 + j * j / 9.0 <= 1.0
        }));
        // The rectangle corner is outside the ellipse.
        assert!(!pixels.iter().any(|p| p.x == 17 && p.y == 17));
    }

    #[test]
    fn test_unbuilt_base_draws_nothing() {
        let base = ImageLayer::unbuilt(LayerName::CompositeOnly, "");
        let pixels = cursor_overlay(&base, (0, 0), &CursorGeometry::new(5));
        assert!(pixels.is_empty());
    }
}
