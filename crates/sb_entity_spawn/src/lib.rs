use bevy::prelude::*;

pub mod dimensions;
pub mod host;
pub mod probe;
pub mod sandbox;

pub use dimensions::entity_dimensions;
pub use host::{EntityHost, SpawnError};
pub use probe::{measure_geometry, ProbeError};
pub use sandbox::SandboxWorld;

/// Entity spawn plugin for Soulbook.
/// Provides the sandbox world used to materialize and measure entities.
pub struct SbEntitySpawnPlugin;

impl Plugin for SbEntitySpawnPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SandboxWorld>();
    }
}
