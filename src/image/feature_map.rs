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
use std::sync::Arc;

use super::classifier::{Classifier, FeatureSource, LayerBuildError, PixelSample};

/// A dense, precomputed classification of every pixel of a layer.
#[derive(Clone, Debug)]
pub struct FeatureMap {
    width: u32,
    height: u32,
    cells: Vec<PixelSample>,
}

impl FeatureMap {
    /// Creates a map where every pixel is background.
    pub fn new(width: u32, height: u32) -> FeatureMap {
        FeatureMap {
            width,
            height,
            cells: vec![PixelSample::BACKGROUND; width as usize * height as usize],
        }
    }

    /// Creates a map by classifying every pixel with the given function.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> FeatureMap
    where
        F: FnMut(u32, u32) -> PixelSample,
    {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        FeatureMap {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Sets a single pixel. Out of bounds coordinates are ignored.
    pub fn set(&mut self, x: u32, y: u32, sample: PixelSample) {
        if let Some(index) = self.index(x, y) {
            self.cells[index] = sample;
        }
    }

    /// Fills the rectangle with its top left corner at `(x, y)`, clipped to the map.
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, sample: PixelSample) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for py in y..y_end {
            for px in x..x_end {
                self.set(px, py, sample);
            }
        }
    }

    /// Fills the ellipse centered at `(cx, cy)`, clipped to the map.
    pub fn fill_ellipse(&mut self, cx: u32, cy: u32, rx: u32, ry: u32, sample: PixelSample) {
        if rx == 0 || ry == 0 {
            self.set(cx, cy, sample);
            return;
        }
        let (rx2, ry2) = ((rx as f64).powi(2), (ry as f64).powi(2));
        let x_end = cx.saturating_add(rx).min(self.width.saturating_sub(1));
        let y_end = cy.saturating_add(ry).min(self.height.saturating_sub(1));
        for py in cy.saturating_sub(ry)..=y_end {
            for px in cx.saturating_sub(rx)..=x_end {
                let dx = px as f64 - cx as f64;
                let dy = py as f64 - cy as f64;
                if dx * dx / rx2 + dy * dy / ry2 <= 1.0 {
                    self.set(px, py, sample);
                }
            }
        }
    }
}

impl Classifier for FeatureMap {
    fn classify(&self, x: i32, y: i32) -> PixelSample {
        if x < 0 || y < 0 {
            return PixelSample::BACKGROUND;
        }
        match self.index(x as u32, y as u32) {
            Some(index) => self.cells[index],
            None => PixelSample::BACKGROUND,
        }
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl FeatureSource for FeatureMap {
    fn build(&self) -> Result<Arc<dyn Classifier>, LayerBuildError> {
        if self.width == 0 || self.height == 0 {
            return Err(LayerBuildError::Empty {
                width: self.width,
                height: self.height,
            });
        }
        Ok(Arc::new(self.clone()))
    }
}
