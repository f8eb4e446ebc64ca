use bevy::prelude::*;

pub mod item;
pub mod material;
pub mod render;

pub use item::{ItemFlags, ItemStack};
pub use material::{placeholder_material, Material};
pub use render::{ActiveRenderer, ItemRenderer, RenderError, SoulBookRenderer};

/// Item plugin for Soulbook.
/// Registers the collectible renderer used to turn entity blobs into items.
pub struct SbItemsPlugin;

impl Plugin for SbItemsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveRenderer>();
    }
}
