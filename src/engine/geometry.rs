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
use serde::{Deserialize, Serialize};

/// The axis an automatic sweep moves along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ScanDirection {
    Horizontal,
    Vertical,
}

impl std::fmt::Display for ScanDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanDirection::Horizontal => write!(f, "horizontal"),
            ScanDirection::Vertical => write!(f, "vertical"),
        }
    }
}

/// The cursor neighborhood: an ellipse with independent horizontal and
/// vertical radii around a base radius.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorGeometry {
    base_radius: u32,
    radius_h: u32,
    radius_v: u32,
    /// The active stretch, if any, and its factor.
    stretch: Option<(ScanDirection, u32)>,
}

impl CursorGeometry {
    pub fn new(base_radius: u32) -> CursorGeometry {
        let base_radius = base_radius.max(1);
        CursorGeometry {
            base_radius,
            radius_h: base_radius,
            radius_v: base_radius,
            stretch: None,
        }
    }

    pub fn base_radius(&self) -> u32 {
        self.base_radius
    }

    pub fn radius_h(&self) -> u32 {
        self.radius_h
    }

    pub fn radius_v(&self) -> u32 {
        self.radius_v
    }

    /// Returns `(radius_h, radius_v)`.
    pub fn radii(&self) -> (u32, u32) {
        (self.radius_h, self.radius_v)
    }

    pub fn stretched(&self) -> Option<ScanDirection> {
        self.stretch.map(|(direction, _)| direction)
    }

    /// Changes the base radius. An active stretch is kept.
    pub fn set_base(&mut self, base_radius: u32) {
        self.base_radius = base_radius.max(1);
        let stretch = self.stretch.take();
        self.revert();
        if let Some((direction, factor)) = stretch {
            self.stretch(direction, factor);
        }
    }

    /// Multiplies the radius orthogonal to `direction` by `factor`. Stretching
    /// again in the same direction does nothing; stretching in the other
    /// direction replaces the previous stretch. Returns true if the geometry
    /// changed.
    pub fn stretch(&mut self, direction: ScanDirection, factor: u32) -> bool {
        match self.stretch {
            Some((current, _)) if current == direction => return false,
            Some(_) => self.revert(),
            None => {}
        }

        let factor = factor.max(1);
        match direction {
            ScanDirection::Horizontal => {
                self.radius_v = self.radius_v.saturating_mul(factor);
            }
            ScanDirection::Vertical => {
                self.radius_h = self.radius_h.saturating_mul(factor);
            }
        }
        self.stretch = Some((direction, factor));
        true
    }

    /// Restores both radii to the base radius.
    pub fn revert(&mut self) {
        self.radius_h = self.base_radius;
        self.radius_v = self.base_radius;
        self.stretch = None;
    }

    /// Whether the offset `(i, j)` from the center lies inside the ellipse.
    pub fn is_within(&self, i: i32, j: i32) -> bool {
        let (i, j) = (i as f64, j as f64);
        let (rh, rv) = (self.radius_h as f64, self.radius_v as f64);
        (i * i) / (rh * rh) + (j * j) / (rv * rv) <= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stretch_once() {
        let mut geometry = CursorGeometry::new(10);
        assert!(geometry.stretch(ScanDirection::Horizontal, 3));
        assert!(!geometry.stretch(ScanDirection::Horizontal, 3));
        assert_eq!(geometry.radii(), (10, 30));

        geometry.revert();
        assert_eq!(geometry.radii(), (10, 10));
        assert_eq!(geometry.stretched(), None);
    }

    #[test]
    fn test_switch_direction() {
        let mut geometry = CursorGeometry::new(4);
        geometry.stretch(ScanDirection::Horizontal, 3);
        assert!(geometry.stretch(ScanDirection::Vertical, 3));
        assert_eq!(geometry.radii(), (12, 4));
        assert_eq!(geometry.stretched(), Some(ScanDirection::Vertical));
    }

    #[test]
    fn test_set_base_keeps_stretch() {
        let mut geometry = CursorGeometry::new(10);
        geometry.stretch(ScanDirection::Vertical, 2);
        geometry.set_base(5);
        assert_eq!(geometry.radii(), (10, 5));

        geometry.set_base(0);
        assert_eq!(geometry.base_radius(), 1);
    }

    #[test]
    fn test_is_within() {
        let geometry = CursorGeometry::new(2);
        assert!(geometry.is_within(0, 0));
        assert!(geometry.is_within(-2, 0));
        assert!(geometry.is_within(1, 1));
        assert!(!geometry.is_within(-2, -1));
        assert!(!geometry.is_within(2, 2));
    }
}
