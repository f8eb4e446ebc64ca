//! Catalog entries: one captured entity template with its history metadata.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use sb_core::{Hitbox, RichText, TagCompound, TagParseError, TextColor, WorldPos};
use sb_entity_spawn::{measure_geometry, EntityHost, ProbeError, SpawnError};
use sb_items::{ItemRenderer, ItemStack};
use thiserror::Error;

use crate::render::{render_items, RenderedItems};
use crate::time_format::now_epoch;

/// Actor recorded when geometry is refreshed without a person involved.
pub const AUTO_UPDATE_ACTOR: &str = "AutoUpdate";

/// Errors raised while constructing a [`TemplateEntry`].
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("Entity has no name once formatting is removed")]
    Validation,

    #[error("Invalid entity data: {0}")]
    Blob(#[from] TagParseError),

    #[error("Failed to measure entity: {0}")]
    Probe(#[from] ProbeError),
}

/// An immutable entity template.
///
/// Everything except the rendered items is fixed at construction; updates
/// produce a new entry. The rendered items are computed on first access
/// and reused afterwards.
#[derive(Debug)]
pub struct TemplateEntry {
    blob: TagCompound,
    label: String,
    display_name: RichText,
    entity_type: String,
    modified_at: i64,
    modified_by: String,
    locations: BTreeSet<String>,
    lore: Option<String>,
    geometry: Option<Hitbox>,
    rendered: OnceLock<RenderedItems>,
}

impl TemplateEntry {
    /// Rebuild an entry from stored history.
    pub fn from_history(
        blob: TagCompound,
        modified_at: i64,
        modified_by: impl Into<String>,
        locations: BTreeSet<String>,
        lore: Option<String>,
        geometry: Option<Hitbox>,
    ) -> Result<Self, EntryError> {
        let display_name = RichText::parse(blob.get_string("CustomName").unwrap_or_default());
        let label = display_name.plain();
        if label.is_empty() {
            return Err(EntryError::Validation);
        }
        let entity_type = blob.get_string("id").unwrap_or_default().to_string();

        Ok(Self {
            blob,
            label,
            display_name,
            entity_type,
            modified_at,
            modified_by: modified_by.into(),
            locations,
            lore,
            geometry,
            rendered: OnceLock::new(),
        })
    }

    /// Create an entry for an entity captured by `actor` standing at `position`.
    ///
    /// Geometry is measured right away at the host's build limit above the
    /// actor, clear of anything built in the world.
    pub fn capture<H: EntityHost>(
        actor: &str,
        blob: TagCompound,
        host: &mut H,
        position: WorldPos,
    ) -> Result<Self, EntryError> {
        let mut entry = Self::from_history(blob, now_epoch(), actor, BTreeSet::new(), None, None)?;
        let origin = position.with_y(host.max_height());
        entry.geometry = Some(measure_geometry(host, &entry.blob, origin)?);
        Ok(entry)
    }

    /// Copy of this entry with freshly measured geometry, attributed to `actor`.
    pub fn with_recomputed_geometry<H: EntityHost>(
        &self,
        host: &mut H,
        origin: WorldPos,
        actor: &str,
    ) -> Result<Self, EntryError> {
        let geometry = measure_geometry(host, &self.blob, origin)?;
        Ok(Self {
            blob: self.blob.clone(),
            label: self.label.clone(),
            display_name: self.display_name.clone(),
            entity_type: self.entity_type.clone(),
            modified_at: now_epoch(),
            modified_by: actor.to_string(),
            locations: self.locations.clone(),
            lore: self.lore.clone(),
            geometry: Some(geometry),
            rendered: OnceLock::new(),
        })
    }

    pub fn requires_derived_geometry(&self) -> bool {
        self.geometry.is_none()
    }

    pub fn blob(&self) -> &TagCompound {
        &self.blob
    }

    /// Lookup key: the display name without formatting.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn display_name(&self) -> &RichText {
        &self.display_name
    }

    /// Namespaced entity type, empty when the blob has none.
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Epoch seconds of the last modification.
    pub fn modified_at(&self) -> i64 {
        self.modified_at
    }

    pub fn modified_by(&self) -> &str {
        &self.modified_by
    }

    pub fn locations(&self) -> &BTreeSet<String> {
        &self.locations
    }

    pub fn lore(&self) -> Option<&str> {
        self.lore.as_deref()
    }

    pub fn geometry(&self) -> Option<Hitbox> {
        self.geometry
    }

    pub fn width(&self) -> Option<f64> {
        self.geometry.map(|g| g.width)
    }

    pub fn height(&self) -> Option<f64> {
        self.geometry.map(|g| g.height)
    }

    pub fn tags(&self) -> Vec<&str> {
        self.blob.string_list("Tags")
    }

    pub fn health(&self) -> Option<f64> {
        self.blob.get_number("Health")
    }

    pub fn is_boss(&self) -> bool {
        self.tags().contains(&"Boss")
    }

    pub fn is_elite(&self) -> bool {
        self.tags().contains(&"Elite")
    }

    /// Plain name recolored by classification, italics suppressed.
    pub fn rendered_display_name(&self) -> RichText {
        let color = if self.is_boss() {
            TextColor::Red
        } else if self.is_elite() {
            TextColor::Gold
        } else {
            TextColor::White
        };
        RichText::colored(self.label.as_str(), color)
    }

    /// Collectible and placeholder items, rendered once and cached.
    pub fn representations(&self, renderer: &dyn ItemRenderer) -> &RenderedItems {
        self.rendered.get_or_init(|| render_items(self, renderer, now_epoch()))
    }

    pub fn collectible_representation(&self, renderer: &dyn ItemRenderer) -> &ItemStack {
        &self.representations(renderer).collectible
    }

    pub fn placeholder_representation(&self, renderer: &dyn ItemRenderer) -> &ItemStack {
        &self.representations(renderer).placeholder
    }

    /// Spawn a lasting instance of this template.
    pub fn summon<H: EntityHost>(&self, host: &mut H, location: WorldPos) -> Result<H::Handle, SpawnError> {
        host.spawn_persistent(&self.blob, location)
    }
}
