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
use super::geometry::ScanDirection;

/// Whether the pointer is driven by the user or by a sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScanMode {
    #[default]
    Idle,
    Scanning(Sweep),
}

impl ScanMode {
    pub fn is_scanning(&self) -> bool {
        matches!(self, ScanMode::Scanning(_))
    }

    pub fn direction(&self) -> Option<ScanDirection> {
        match self {
            ScanMode::Idle => None,
            ScanMode::Scanning(sweep) => Some(sweep.direction()),
        }
    }
}

/// The position of an automatic sweep. A horizontal sweep moves right along a
/// row band, then drops to the next band; a vertical sweep moves down a column
/// band, then shifts right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sweep {
    direction: ScanDirection,
    x: i32,
    y: i32,
}

impl Sweep {
    /// Starts a sweep at the top left corner.
    pub fn start(direction: ScanDirection) -> Sweep {
        Sweep {
            direction,
            x: 0,
            y: 0,
        }
    }

    pub fn direction(&self) -> ScanDirection {
        self.direction
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Moves `step` pixels along the sweep. At the end of a band, moves on to
    /// the next band `band` pixels away. Returns None once the sweep has
    /// passed the far edge of a `width` by `height` surface.
    pub fn advance(self, step: u32, band: u32, width: u32, height: u32) -> Option<Sweep> {
        let step = step.max(1) as i64;
        let band = band.max(1) as i64;
        let (width, height) = (width as i64, height as i64);
        let (mut along, mut across, along_len, across_len) = match self.direction {
            ScanDirection::Horizontal => (self.x as i64, self.y as i64, width, height),
            ScanDirection::Vertical => (self.y as i64, self.x as i64, height, width),
        };

        along += step;
        if along >= along_len {
            along = 0;
            across += band;
        }
        if across >= across_len {
            return None;
        }

        let (x, y) = match self.direction {
            ScanDirection::Horizontal => (along, across),
            ScanDirection::Vertical => (across, along),
        };
        Some(Sweep {
            direction: self.direction,
            x: i32::try_from(x).ok()?,
            y: i32::try_from(y).ok()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(
        direction: ScanDirection,
        step: u32,
        band: u32,
        w: u32,
        h: u32,
    ) -> Vec<(i32, i32)> {
        let mut sweep = Sweep::start(direction);
        let mut positions = vec![sweep.position()];
        while let Some(next) = sweep.advance(step, band, w, h) {
            positions.push(next.position());
            sweep = next;
        }
        positions
    }

    #[test]
    fn test_horizontal_sweep() {
        assert_eq!(
            positions(ScanDirection::Horizontal, 4, 6, 10, 10),
            vec![(0, 0), (4, 0), (8, 0), (0, 6), (4, 6), (8, 6)]
        );
    }

    #[test]
    fn test_vertical_sweep() {
        assert_eq!(
            positions(ScanDirection::Vertical, 5, 8, 12, 10),
            vec![(0, 0), (0, 5), (8, 0), (8, 5)]
        );
    }

    #[test]
    fn test_zero_step_still_advances() {
        let sweep = Sweep::start(ScanDirection::Horizontal);
        assert_eq!(
            sweep.advance(0, 0, 3, 1).map(|s| s.position()),
            Some((1, 0))
        );
    }

    #[test]
    fn test_mode() {
        assert!(!ScanMode::Idle.is_scanning());
        let mode = ScanMode::Scanning(Sweep::start(ScanDirection::Vertical));
        assert!(mode.is_scanning());
        assert_eq!(mode.direction(), Some(ScanDirection::Vertical));
    }
}
