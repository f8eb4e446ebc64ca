use bevy::prelude::*;
use sb_core::{BoundingBox, TagCompound, WorldPos};

use crate::dimensions::entity_dimensions;
use crate::host::{EntityHost, SpawnError};

/// Fraction of a vehicle's height at which its passengers are seated.
const SEAT_HEIGHT_FACTOR: f64 = 0.75;

/// Default highest buildable y coordinate.
pub const DEFAULT_MAX_HEIGHT: f64 = 320.0;

/// World-space position of a sandbox entity's feet.
#[derive(Component, Debug, Clone, Copy)]
pub struct Position(pub WorldPos);

/// Hitbox of a sandbox entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct Body {
    pub width: f64,
    pub height: f64,
}

/// Entity type key, e.g. `minecraft:zombie`.
#[derive(Component, Debug, Clone)]
pub struct EntityKind(pub String);

/// Marker for instances spawned only to be measured.
#[derive(Component)]
pub struct Transient;

/// Marker for instances that stay in the world.
#[derive(Component)]
pub struct Persistent;

/// Solid terrain volume.
#[derive(Component, Debug, Clone, Copy)]
pub struct Solid(pub BoundingBox);

/// In-memory world backed by a bevy ECS [`World`].
///
/// Entities are materialized from blobs with a vanilla hitbox table;
/// passenger chains become bevy parent/child hierarchies.
#[derive(Resource)]
pub struct SandboxWorld {
    world: World,
    max_height: f64,
}

impl Default for SandboxWorld {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEIGHT)
    }
}

impl SandboxWorld {
    pub fn new(max_height: f64) -> Self {
        Self {
            world: World::new(),
            max_height,
        }
    }

    /// Add a block of solid terrain.
    pub fn add_solid(&mut self, volume: BoundingBox) -> Entity {
        self.world.spawn(Solid(volume)).id()
    }

    /// Number of materialized entities, terrain excluded.
    pub fn live_entities(&self) -> usize {
        self.world
            .iter_entities()
            .filter(|e| e.contains::<EntityKind>())
            .count()
    }

    /// Number of entities spawned to stay in the world.
    pub fn persistent_entities(&self) -> usize {
        self.world
            .iter_entities()
            .filter(|e| e.contains::<Persistent>())
            .count()
    }

    pub fn kind(&self, handle: Entity) -> Option<&str> {
        self.world.get::<EntityKind>(handle).map(|k| k.0.as_str())
    }

    pub fn position(&self, handle: Entity) -> Option<WorldPos> {
        self.world.get::<Position>(handle).map(|p| p.0)
    }

    /// Check the whole passenger chain before anything is spawned, so a
    /// failed spawn leaves the world untouched.
    fn validate(blob: &TagCompound) -> Result<(), SpawnError> {
        let kind = blob.get_string("id").ok_or(SpawnError::MissingEntityType)?;
        if entity_dimensions(kind, blob).is_none() {
            return Err(SpawnError::UnknownEntityType(kind.to_string()));
        }
        for passenger in passenger_blobs(blob) {
            Self::validate(passenger)?;
        }
        Ok(())
    }

    fn spawn_tree(&mut self, blob: &TagCompound, location: WorldPos, persistent: bool) -> Result<Entity, SpawnError> {
        Self::validate(blob)?;
        Ok(self.spawn_validated(blob, location, persistent))
    }

    fn spawn_validated(&mut self, blob: &TagCompound, location: WorldPos, persistent: bool) -> Entity {
        let kind = blob.get_string("id").unwrap_or_default();
        let (width, height) = entity_dimensions(kind, blob).unwrap_or((0.0, 0.0));

        let mut entity = self.world.spawn((
            EntityKind(kind.to_string()),
            Position(location),
            Body { width, height },
        ));
        if persistent {
            entity.insert(Persistent);
        } else {
            entity.insert(Transient);
        }
        let id = entity.id();

        let seat = location.offset(0.0, height * SEAT_HEIGHT_FACTOR, 0.0);
        for passenger in passenger_blobs(blob) {
            let child = self.spawn_validated(passenger, seat, persistent);
            self.world.entity_mut(id).add_child(child);
        }
        id
    }
}

fn passenger_blobs(blob: &TagCompound) -> impl Iterator<Item = &TagCompound> {
    blob.get_list("Passengers")
        .unwrap_or_default()
        .iter()
        .filter_map(|t| t.as_compound())
}

impl EntityHost for SandboxWorld {
    type Handle = Entity;

    fn spawn_transient(&mut self, blob: &TagCompound, location: WorldPos) -> Result<Entity, SpawnError> {
        self.spawn_tree(blob, location, false)
    }

    fn spawn_persistent(&mut self, blob: &TagCompound, location: WorldPos) -> Result<Entity, SpawnError> {
        self.spawn_tree(blob, location, true)
    }

    fn bounding_box(&self, handle: Entity) -> Option<BoundingBox> {
        let position = self.world.get::<Position>(handle)?;
        let body = self.world.get::<Body>(handle)?;
        Some(BoundingBox::standing_at(position.0, body.width, body.height))
    }

    fn passengers(&self, handle: Entity) -> Vec<Entity> {
        self.world
            .get::<Children>(handle)
            .map(|children| children.iter().copied().collect())
            .unwrap_or_default()
    }

    fn destroy(&mut self, handle: Entity) {
        if self.world.entities().contains(handle) {
            self.world.entity_mut(handle).despawn_recursive();
        }
    }

    fn is_obstructed(&self, location: WorldPos, width: f64, height: f64) -> bool {
        let body = BoundingBox::standing_at(location, width, height);
        self.world
            .iter_entities()
            .filter_map(|e| e.get::<Solid>())
            .any(|solid| solid.0.intersects(&body))
    }

    fn max_height(&self) -> f64 {
        self.max_height
    }
}
