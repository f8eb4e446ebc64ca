use crate::coords::WorldPos;

/// Axis-aligned bounding volume in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: WorldPos,
    pub max: WorldPos,
}

impl BoundingBox {
    pub const fn new(min: WorldPos, max: WorldPos) -> Self {
        Self { min, max }
    }

    /// Box of an upright body standing on `base`: `width` wide on both
    /// horizontal axes, centered on `base`, extending `height` upwards.
    pub fn standing_at(base: WorldPos, width: f64, height: f64) -> Self {
        let half = width / 2.0;
        Self {
            min: WorldPos::new(base.x - half, base.y, base.z - half),
            max: WorldPos::new(base.x + half, base.y + height, base.z + half),
        }
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: WorldPos::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: WorldPos::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Largest horizontal reach of this box away from `origin`, over the
    /// four horizontal directions.
    pub fn horizontal_reach(&self, origin: WorldPos) -> f64 {
        (self.max.x - origin.x)
            .max(self.max.z - origin.z)
            .max(origin.x - self.min.x)
            .max(origin.z - self.min.z)
    }

    /// Height of the top face above `origin`. Extent below the origin is ignored.
    pub fn height_above(&self, origin: WorldPos) -> f64 {
        self.max.y - origin.y
    }

    /// Whether the two boxes overlap with positive volume.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }
}

/// Measured footprint of a spawnable entity.
///
/// Width and height are always known together.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hitbox {
    pub width: f64,
    pub height: f64,
}

impl Hitbox {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Build a hitbox only when both dimensions are known.
    pub fn from_parts(width: Option<f64>, height: Option<f64>) -> Option<Self> {
        match (width, height) {
            (Some(width), Some(height)) => Some(Self { width, height }),
            _ => None,
        }
    }
}
