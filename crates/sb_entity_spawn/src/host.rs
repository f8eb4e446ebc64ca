use sb_core::{BoundingBox, TagCompound, WorldPos};
use thiserror::Error;

/// Errors raised when an entity blob cannot be materialized.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpawnError {
    #[error("Entity data has no entity type")]
    MissingEntityType,

    #[error("Unknown entity type '{0}'")]
    UnknownEntityType(String),
}

/// World-instantiation service: materializes entity blobs in a world.
///
/// Spawning a blob also spawns every entity in its `Passengers` chain;
/// those are reported as the spawned entity's passengers.
pub trait EntityHost {
    type Handle: Copy + Eq + std::fmt::Debug;

    /// Spawn an instance that is only meant to be measured and destroyed.
    fn spawn_transient(&mut self, blob: &TagCompound, location: WorldPos) -> Result<Self::Handle, SpawnError>;

    /// Spawn an instance that stays in the world.
    fn spawn_persistent(&mut self, blob: &TagCompound, location: WorldPos) -> Result<Self::Handle, SpawnError>;

    fn bounding_box(&self, handle: Self::Handle) -> Option<BoundingBox>;

    /// Entities directly riding `handle`.
    fn passengers(&self, handle: Self::Handle) -> Vec<Self::Handle>;

    /// Remove `handle` from the world. Destroying a missing handle is a no-op.
    fn destroy(&mut self, handle: Self::Handle);

    /// Whether a body of the given footprint standing at `location` would
    /// overlap solid terrain.
    fn is_obstructed(&self, location: WorldPos, width: f64, height: f64) -> bool;

    /// Highest buildable y coordinate.
    fn max_height(&self) -> f64;
}
