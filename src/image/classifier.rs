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

use crate::sonify::InstrumentId;

/// The classification of one coordinate on one layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelSample {
    pub instrument: InstrumentId,
    /// The averaged feature value the instrument's timbre is derived from.
    pub feature: Option<f32>,
}

impl PixelSample {
    pub const BACKGROUND: PixelSample = PixelSample {
        instrument: InstrumentId::BACKGROUND,
        feature: None,
    };

    pub fn new(instrument: InstrumentId, feature: Option<f32>) -> PixelSample {
        PixelSample {
            instrument,
            feature,
        }
    }
}

/// Maps pixel coordinates of a layer to instruments. Implementations must be
/// pure and must return [`PixelSample::BACKGROUND`] outside of the image.
pub trait Classifier: Send + Sync {
    fn classify(&self, x: i32, y: i32) -> PixelSample;

    /// The width and height of the classified image in pixels.
    fn dimensions(&self) -> (u32, u32);

    fn contains(&self, x: i32, y: i32) -> bool {
        let (width, height) = self.dimensions();
        x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height
    }
}

/// The largest number of pixels a layer may cover.
pub const MAX_LAYER_PIXELS: u64 = 1 << 25;

/// Builds a layer's classifier when the image is opened.
pub trait FeatureSource: Send + Sync {
    fn build(&self) -> Result<Arc<dyn Classifier>, LayerBuildError>;
}

/// A layer's feature source couldn't be turned into a classifier.
#[derive(Debug, thiserror::Error)]
pub enum LayerBuildError {
    #[error("layer has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("instrument id {0} is out of range")]
    InstrumentOutOfRange(u8),

    #[error("layer is too large ({width}x{height})")]
    TooLarge { width: u32, height: u32 },
}
