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
//! Shared fixtures for building layers, images and engines in tests.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::haptic;
use crate::image::{
    FeatureMap, FeatureSource, ImageDescriptor, ImageLayer, LayerDescriptor, LayerName,
    PixelSample, SonifiedImage,
};
use crate::sonify::InstrumentId;
use crate::voice::{self, VoiceDevice};

/// Builds a layer straight from a feature map.
pub fn layer_from_map(name: LayerName, map: FeatureMap) -> ImageLayer {
    ImageLayer::try_build(name, &map, "").expect("feature map should build")
}

/// A map with the rectangle `[x, x + width) x [y, y + height)` set to the
/// instrument and everything else background.
pub fn map_with_rect(
    size: (u32, u32),
    rect: (u32, u32, u32, u32),
    instrument: u8,
    feature: Option<f32>,
) -> FeatureMap {
    let mut map = FeatureMap::new(size.0, size.1);
    map.fill_rect(
        rect.0,
        rect.1,
        rect.2,
        rect.3,
        PixelSample::new(InstrumentId::new(instrument), feature),
    );
    map
}

/// An image with the given sub-layers. The base layer is the first sub-layer's
/// map, or an empty map of `size` if there are none.
pub fn image_with_layers(size: (u32, u32), layers: Vec<(&str, FeatureMap)>) -> SonifiedImage {
    let base: Arc<dyn FeatureSource> = match layers.first() {
        Some((_, map)) => Arc::new(map.clone()),
        None => Arc::new(FeatureMap::new(size.0, size.1)),
    };
    SonifiedImage::open(&ImageDescriptor {
        layers: layers
            .into_iter()
            .map(|(layer, map)| LayerDescriptor {
                layer: layer.to_string(),
                source: Arc::new(map),
            })
            .collect(),
        base,
        description: "test image".to_string(),
    })
}

/// An engine wired to mock devices the test can inspect.
pub struct TestEngine {
    pub engine: Engine,
    pub voices: Arc<voice::mock::Device>,
    pub haptics: haptic::mock::Device,
}

/// Creates an engine over the image with mock devices. The surface is attached
/// at the image's base size.
pub fn test_engine(image: SonifiedImage, config: &EngineConfig) -> TestEngine {
    let voices = voice::mock::Device::get("mock-voices", config.note_policy());
    let voices = Arc::new(voices);
    let haptics = haptic::mock::Device::get("mock-haptics");
    let device: Arc<dyn VoiceDevice> = voices.clone();
    let size = image.base().dimensions();

    let mut engine = Engine::new(image, config, device, &haptics).expect("engine should build");
    if let Some((width, height)) = size {
        engine.attach_surface(width, height);
    }
    TestEngine {
        engine,
        voices,
        haptics,
    }
}
