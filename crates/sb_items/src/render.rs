use bevy::prelude::*;
use sb_core::TagCompound;
use thiserror::Error;

use crate::item::ItemStack;
use crate::material::Material;

/// Errors raised while turning an entity blob into a collectible item.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Entity data has no entity type")]
    MissingEntityType,

    #[error("Invalid entity type '{0}'")]
    InvalidEntityType(String),

    #[error("Could not render entity: {0}")]
    Unrenderable(String),
}

/// Turns entity blobs into full collectible items.
///
/// Implementations must be deterministic for a given blob; callers cache
/// the result.
pub trait ItemRenderer: Send + Sync {
    fn render_collectible(&self, blob: &TagCompound) -> Result<ItemStack, RenderError>;

    /// Returns the name of this renderer for debugging.
    fn name(&self) -> &'static str {
        "ItemRenderer"
    }
}

/// Default renderer producing a written "book of souls" that carries the
/// complete entity data, so the entity can be re-summoned from the item.
pub struct SoulBookRenderer {
    pub author: String,
}

impl Default for SoulBookRenderer {
    fn default() -> Self {
        Self {
            author: "Soulbook".to_string(),
        }
    }
}

fn is_valid_key_part(part: &str, allow_slash: bool) -> bool {
    !part.is_empty()
        && part.chars().all(|c| {
            c.is_ascii_lowercase()
                || c.is_ascii_digit()
                || matches!(c, '_' | '-' | '.')
                || (allow_slash && c == '/')
        })
}

fn is_valid_key(key: &str) -> bool {
    match key.split_once(':') {
        Some((namespace, path)) => is_valid_key_part(namespace, false) && is_valid_key_part(path, true),
        None => is_valid_key_part(key, true),
    }
}

impl ItemRenderer for SoulBookRenderer {
    fn render_collectible(&self, blob: &TagCompound) -> Result<ItemStack, RenderError> {
        let entity_type = blob.get_string("id").ok_or(RenderError::MissingEntityType)?;
        if !is_valid_key(entity_type) {
            return Err(RenderError::InvalidEntityType(entity_type.to_string()));
        }

        let mut book = ItemStack::new(Material::WRITTEN_BOOK);
        book.author = Some(self.author.clone());
        book.entity_data = Some(blob.clone());
        Ok(book)
    }

    fn name(&self) -> &'static str {
        "SoulBookRenderer"
    }
}

/// Renderer shared by every system that displays catalog entries.
#[derive(Resource)]
pub struct ActiveRenderer(pub Box<dyn ItemRenderer>);

impl Default for ActiveRenderer {
    fn default() -> Self {
        Self(Box::new(SoulBookRenderer::default()))
    }
}
