use bevy::prelude::*;

pub mod coords;
pub mod geometry;
pub mod tag;
pub mod text;

pub use coords::WorldPos;
pub use geometry::{BoundingBox, Hitbox};
pub use tag::{Tag, TagCompound, TagParseError};
pub use text::{hash_color, strip_formatting, Decorations, RichText, TextColor, TextSpan};

/// Core plugin for Soulbook: world geometry plus the entity blob and
/// rich-text codecs. Everything here is plain data, so it registers nothing.
pub struct SbCorePlugin;

impl Plugin for SbCorePlugin {
    fn build(&self, _app: &mut App) {}
}
