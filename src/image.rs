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
//! Image layers and the classifiers that back them.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

mod classifier;
mod feature_map;

pub use classifier::{Classifier, FeatureSource, LayerBuildError, PixelSample, MAX_LAYER_PIXELS};
pub use feature_map::FeatureMap;

/// The layers the engine knows how to sound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerName {
    Xray,
    Optical,
    Ir,
    Radio,
    /// The whole image, used as the base layer when sub-layers exist.
    Composite,
    /// The whole image, used as the base layer and the only sounding layer when
    /// no sub-layer qualified.
    CompositeOnly,
}

impl LayerName {
    /// The layer names that may appear as sub-layers of an image.
    pub const SUB_LAYERS: [LayerName; 4] = [
        LayerName::Xray,
        LayerName::Optical,
        LayerName::Ir,
        LayerName::Radio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerName::Xray => "xray",
            LayerName::Optical => "optical",
            LayerName::Ir => "ir",
            LayerName::Radio => "radio",
            LayerName::Composite => "composite",
            LayerName::CompositeOnly => "composite-only",
        }
    }

    pub fn is_sub_layer(&self) -> bool {
        LayerName::SUB_LAYERS.contains(self)
    }
}

impl fmt::Display for LayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unrecognized layer name '{0}'")]
pub struct UnknownLayer(String);

impl FromStr for LayerName {
    type Err = UnknownLayer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "xray" => Ok(LayerName::Xray),
            "optical" => Ok(LayerName::Optical),
            "ir" => Ok(LayerName::Ir),
            "radio" => Ok(LayerName::Radio),
            "composite" => Ok(LayerName::Composite),
            "composite-only" => Ok(LayerName::CompositeOnly),
            _ => Err(UnknownLayer(s.to_string())),
        }
    }
}

/// A built layer. Immutable once the image is open.
#[derive(Clone)]
pub struct ImageLayer {
    name: LayerName,
    classifier: Option<Arc<dyn Classifier>>,
    description: String,
}

impl ImageLayer {
    /// Builds the layer from its feature source. A failed build yields a layer
    /// that classifies everything as background.
    pub fn build(name: LayerName, source: &dyn FeatureSource, description: &str) -> ImageLayer {
        match Self::try_build(name, source, description) {
            Ok(layer) => layer,
            Err(e) => {
                warn!(layer = %name, err = %e, "Layer failed to build, it will be silent");
                Self::unbuilt(name, description)
            }
        }
    }

    /// Builds the layer, returning the error if the feature source failed.
    pub fn try_build(
        name: LayerName,
        source: &dyn FeatureSource,
        description: &str,
    ) -> Result<ImageLayer, LayerBuildError> {
        let classifier = source.build()?;
        Ok(ImageLayer {
            name,
            classifier: Some(classifier),
            description: description.to_string(),
        })
    }

    /// A layer with no classifier.
    pub fn unbuilt(name: LayerName, description: &str) -> ImageLayer {
        ImageLayer {
            name,
            classifier: None,
            description: description.to_string(),
        }
    }

    pub fn name(&self) -> LayerName {
        self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn classifier(&self) -> Option<&dyn Classifier> {
        self.classifier.as_deref()
    }

    pub fn is_built(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn classify(&self, x: i32, y: i32) -> PixelSample {
        match &self.classifier {
            Some(classifier) => classifier.classify(x, y),
            None => PixelSample::BACKGROUND,
        }
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.classifier.as_ref().map(|c| c.dimensions())
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.classifier
            .as_ref()
            .is_some_and(|classifier| classifier.contains(x, y))
    }
}

impl fmt::Debug for ImageLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageLayer")
            .field("name", &self.name)
            .field("built", &self.is_built())
            .field("dimensions", &self.dimensions())
            .finish()
    }
}

/// One entry of the layer list handed over by the presentation layer.
#[derive(Clone)]
pub struct LayerDescriptor {
    pub layer: String,
    pub source: Arc<dyn FeatureSource>,
}

/// Everything needed to open an image.
#[derive(Clone)]
pub struct ImageDescriptor {
    pub layers: Vec<LayerDescriptor>,
    pub base: Arc<dyn FeatureSource>,
    /// Accessibility text for the whole image.
    pub description: String,
}

/// An opened image: the sounding layers plus the base layer.
#[derive(Clone, Debug)]
pub struct SonifiedImage {
    layers: Vec<ImageLayer>,
    base: ImageLayer,
    description: String,
}

impl SonifiedImage {
    /// Opens the image. Unrecognized and failed sub-layers are skipped. When no
    /// sub-layer survives, the base layer becomes `composite-only` and is the
    /// one that produces sound.
    pub fn open(descriptor: &ImageDescriptor) -> SonifiedImage {
        let description = descriptor.description.as_str();
        let mut layers: Vec<ImageLayer> = Vec::new();

        for entry in descriptor.layers.iter() {
            let name = match entry.layer.parse::<LayerName>() {
                Ok(name) if name.is_sub_layer() => name,
                _ => {
                    debug!(layer = %entry.layer, "Ignoring unrecognized layer");
                    continue;
                }
            };

            let layer = match ImageLayer::try_build(name, entry.source.as_ref(), description) {
                Ok(layer) => layer,
                Err(e) => {
                    warn!(layer = %name, err = %e, "Skipping layer that failed to build");
                    continue;
                }
            };

            // A repeated layer name replaces the earlier entry.
            match layers.iter_mut().find(|existing| existing.name == name) {
                Some(existing) => *existing = layer,
                None => layers.push(layer),
            }
        }

        let base = if layers.is_empty() {
            let base = ImageLayer::build(
                LayerName::CompositeOnly,
                descriptor.base.as_ref(),
                description,
            );
            layers.push(base.clone());
            base
        } else {
            ImageLayer::build(LayerName::Composite, descriptor.base.as_ref(), description)
        };

        info!(
            layers = ?layers.iter().map(|l| l.name()).collect::<Vec<_>>(),
            base = %base.name(),
            "Image opened"
        );

        SonifiedImage {
            layers,
            base,
            description: description.to_string(),
        }
    }

    /// The layers that produce sound and haptics.
    pub fn sounding_layers(&self) -> &[ImageLayer] {
        &self.layers
    }

    pub fn layer_names(&self) -> Vec<LayerName> {
        self.layers.iter().map(|layer| layer.name()).collect()
    }

    pub fn base(&self) -> &ImageLayer {
        &self.base
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
