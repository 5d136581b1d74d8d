use serde::{Deserialize, Serialize};

/// A collision layer. Every object belongs to exactly one of 32 layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layer(pub u8);

impl Layer {
    pub const DEFAULT: Layer = Layer(0);
    /// Objects the player may pick up and rescale.
    pub const TARGETABLE: Layer = Layer(1);
    /// The viewer's own body.
    pub const PLAYER: Layer = Layer(2);

    pub const COUNT: u8 = 32;
}

impl Default for Layer {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A set of layers used to filter ray queries.
///
/// Serialized as the list of layer numbers it contains, so configuration files
/// read as `targetable_mask: [1]` rather than a raw bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Layer>", into = "Vec<Layer>")]
pub struct LayerMask(u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Mask containing only `layer`. Layers past 31 yield an empty mask.
    pub const fn layer(layer: Layer) -> Self {
        if layer.0 < Layer::COUNT {
            Self(1 << layer.0)
        } else {
            Self::NONE
        }
    }

    pub fn contains(self, layer: Layer) -> bool {
        layer.0 < Layer::COUNT && self.0 & (1 << layer.0) != 0
    }

    pub const fn with(self, layer: Layer) -> Self {
        Self(self.0 | Self::layer(layer).0)
    }

    pub const fn without(self, layer: Layer) -> Self {
        Self(self.0 & !Self::layer(layer).0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Layers in ascending order.
    pub fn layers(self) -> impl Iterator<Item = Layer> {
        (0..Layer::COUNT)
            .map(Layer)
            .filter(move |l| self.contains(*l))
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl std::ops::BitOr for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<Vec<Layer>> for LayerMask {
    fn from(layers: Vec<Layer>) -> Self {
        layers.into_iter().fold(Self::NONE, Self::with)
    }
}

impl From<LayerMask> for Vec<Layer> {
    fn from(mask: LayerMask) -> Self {
        mask.layers().collect()
    }
}
