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
use std::path::Path;
use std::sync::Arc;

use config::{Config, File};
use serde::Deserialize;

use super::error::ConfigError;

use crate::image::{
    Classifier, FeatureMap, FeatureSource, ImageDescriptor, LayerBuildError, LayerDescriptor,
    PixelSample, MAX_LAYER_PIXELS,
};
use crate::sonify::InstrumentId;

/// A YAML description of a synthetic image: each layer is a list of shapes
/// painted over a background.
#[derive(Deserialize, Clone, Debug)]
pub struct Scene {
    /// Image width in pixels.
    width: u32,

    /// Image height in pixels.
    height: u32,

    /// Accessibility text for the image.
    #[serde(default)]
    description: String,

    /// Shapes of the composite base layer. When empty, the base layer is the
    /// union of every layer's shapes.
    #[serde(default)]
    base: Vec<Shape>,

    /// The sub-layers, in the order they're sounded.
    #[serde(default)]
    layers: Vec<SceneLayer>,
}

/// One layer of a scene.
#[derive(Deserialize, Clone, Debug)]
pub struct SceneLayer {
    /// The layer name. Unrecognized names are ignored when the image opens.
    layer: String,

    #[serde(default)]
    shapes: Vec<Shape>,
}

/// A filled shape that classifies its pixels as one instrument.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    Rect {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        instrument: u8,
        feature: Option<f32>,
    },
    Ellipse {
        x: u32,
        y: u32,
        rx: u32,
        ry: u32,
        instrument: u8,
        feature: Option<f32>,
    },
}

impl Shape {
    fn instrument(&self) -> u8 {
        match self {
            Shape::Rect { instrument, .. } | Shape::Ellipse { instrument, .. } => *instrument,
        }
    }

    fn feature(&self) -> Option<f32> {
        match self {
            Shape::Rect { feature, .. } | Shape::Ellipse { feature, .. } => *feature,
        }
    }

    fn paint(&self, map: &mut FeatureMap) -> Result<(), LayerBuildError> {
        let instrument = InstrumentId::checked(self.instrument())
            .ok_or(LayerBuildError::InstrumentOutOfRange(self.instrument()))?;
        let sample = PixelSample::new(instrument, self.feature());
        match *self {
            Shape::Rect {
                x,
                y,
                width,
                height,
                ..
            } => map.fill_rect(x, y, width, height, sample),
            Shape::Ellipse { x, y, rx, ry, .. } => map.fill_ellipse(x, y, rx, ry, sample),
        }
        Ok(())
    }
}

/// Rasterizes a list of shapes into a [`FeatureMap`] when the image opens.
/// Later shapes paint over earlier ones.
#[derive(Clone, Debug)]
pub struct ShapeSource {
    width: u32,
    height: u32,
    shapes: Vec<Shape>,
}

impl ShapeSource {
    pub fn new(width: u32, height: u32, shapes: Vec<Shape>) -> ShapeSource {
        ShapeSource {
            width,
            height,
            shapes,
        }
    }

    /// Paints the shapes over a background map. Fails if the map would be
    /// empty or larger than [`MAX_LAYER_PIXELS`].
    pub fn rasterize(&self) -> Result<FeatureMap, LayerBuildError> {
        if self.width == 0 || self.height == 0 {
            return Err(LayerBuildError::Empty {
                width: self.width,
                height: self.height,
            });
        }
        if self.width as u64 * self.height as u64 > MAX_LAYER_PIXELS {
            return Err(LayerBuildError::TooLarge {
                width: self.width,
                height: self.height,
            });
        }
        let mut map = FeatureMap::new(self.width, self.height);
        for shape in self.shapes.iter() {
            shape.paint(&mut map)?;
        }
        Ok(map)
    }
}

impl FeatureSource for ShapeSource {
    fn build(&self) -> Result<Arc<dyn Classifier>, LayerBuildError> {
        Ok(Arc::new(self.rasterize()?))
    }
}

impl Scene {
    /// Parses a scene from a YAML file.
    pub fn deserialize(path: &Path) -> Result<Scene, ConfigError> {
        Ok(Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<Scene>()?)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the layer names as written in the scene.
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|layer| layer.layer.as_str()).collect()
    }

    fn base_shapes(&self) -> Vec<Shape> {
        if !self.base.is_empty() {
            return self.base.clone();
        }
        self.layers
            .iter()
            .flat_map(|layer| layer.shapes.iter().cloned())
            .collect()
    }

    /// Converts the scene into the descriptor the engine opens images from.
    pub fn to_descriptor(&self) -> ImageDescriptor {
        ImageDescriptor {
            layers: self
                .layers
                .iter()
                .map(|layer| LayerDescriptor {
                    layer: layer.layer.clone(),
                    source: Arc::new(ShapeSource::new(
                        self.width,
                        self.height,
                        layer.shapes.clone(),
                    )),
                })
                .collect(),
            base: Arc::new(ShapeSource::new(
                self.width,
                self.height,
                self.base_shapes(),
            )),
            description: self.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use config::FileFormat;

    use super::*;
    use crate::image::{LayerName, SonifiedImage};

    const SCENE: &str = r#"
        width: 100
        height: 50
        description: Two moons over a plain
        layers:
          - layer: optical
            shapes:
              - shape: rect
                x: 0
                y: 40
                width: 100
                height: 10
                instrument: 1
              - shape: ellipse
                x: 20
                y: 20
                rx: 8
                ry: 8
                instrument: 5
                feature: 120
          - layer: xray
            shapes:
              - shape: ellipse
                x: 70
                y: 20
                rx: 5
                ry: 5
                instrument: 7
                feature: 30.5
          - layer: gamma
    "#;

    fn scene(yaml: &str) -> Scene {
        Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .expect("build")
            .try_deserialize()
            .expect("deserialize")
    }

    #[test]
    fn test_deserialize() {
        let scene = scene(SCENE);
        assert_eq!(scene.width(), 100);
        assert_eq!(scene.height(), 50);
        assert_eq!(scene.description(), "Two moons over a plain");
        assert_eq!(scene.layer_names(), vec!["optical", "xray", "gamma"]);
        assert_eq!(
            scene.layers[1].shapes,
            vec![Shape::Ellipse {
                x: 70,
                y: 20,
                rx: 5,
                ry: 5,
                instrument: 7,
                feature: Some(30.5),
            }]
        );
    }

    #[test]
    fn test_open_scene() {
        let image = SonifiedImage::open(&scene(SCENE).to_descriptor());
        let names = vec![LayerName::Optical, LayerName::Xray];
        assert_eq!(image.layer_names(), names);

        let optical = &image.sounding_layers()[0];
        assert_eq!(
            optical.classify(20, 20),
            PixelSample::new(InstrumentId::new(5), Some(120.0))
        );
        assert_eq!(optical.classify(50, 45).instrument, InstrumentId::BASS);
        assert_eq!(optical.classify(70, 20), PixelSample::BACKGROUND);

        // The composite base is the union of all layers.
        let base = image.base();
        assert_eq!(base.name(), LayerName::Composite);
        assert_eq!(base.classify(20, 20).instrument, InstrumentId::new(5));
        assert_eq!(base.classify(70, 20).instrument, InstrumentId::new(7));
        assert_eq!(base.dimensions(), Some((100, 50)));
    }

    #[test]
    fn test_bad_instrument_skips_layer() {
        let scene = scene(
            r#"
            width: 10
            height: 10
            layers:
              - layer: radio
                shapes:
                  - shape: rect
                    x: 0
                    y: 0
                    width: 2
                    height: 2
                    instrument: 200
            "#,
        );
        let source = ShapeSource::new(10, 10, scene.layers[0].shapes.clone());
        assert!(matches!(
            source.rasterize(),
            Err(LayerBuildError::InstrumentOutOfRange(200))
        ));

        // The radio layer and the base built from it both fail, so the image
        // falls back to a silent composite-only layer.
        let image = SonifiedImage::open(&scene.to_descriptor());
        assert_eq!(image.layer_names(), vec![LayerName::CompositeOnly]);
        assert!(!image.base().is_built());
    }

    #[test]
    fn test_oversized_scene_is_silent() {
        let scene = scene("width: 100000\nheight: 100000\nlayers:\n  - layer: optical\n");
        let source = ShapeSource::new(scene.width(), scene.height(), vec![]);
        let err = source.rasterize().err().expect("oversized scene");
        assert!(matches!(err, LayerBuildError::TooLarge { .. }));
        assert_eq!(err.to_string(), "layer is too large (100000x100000)");

        let image = SonifiedImage::open(&scene.to_descriptor());
        assert_eq!(image.layer_names(), vec![LayerName::CompositeOnly]);
        assert!(!image.base().is_built());
    }

    #[test]
    fn test_deserialize_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("scene.yml");
        let base = "  - {shape: rect, x: 1, y: 1, width: 1, height: 1, instrument: 9}";
        fs::write(&path, format!("width: 4\nheight: 3\nbase:\n{}\n", base))?;

        let scene = Scene::deserialize(&path)?;
        assert_eq!((scene.width(), scene.height()), (4, 3));
        assert!(scene.layer_names().is_empty());

        let image = SonifiedImage::open(&scene.to_descriptor());
        assert_eq!(image.base().name(), LayerName::CompositeOnly);
        assert_eq!(image.base().classify(1, 1).instrument, InstrumentId::new(9));
        Ok(())
    }
}
