use bevy::prelude::*;

pub mod catalog;
pub mod config;
pub mod entry;
pub mod group;
pub mod record;
pub mod render;
pub mod time_format;
pub mod wrap;

pub use catalog::{Catalog, CatalogError, ReloadReport};
pub use config::{ConfigError, LibraryConfig};
pub use entry::{EntryError, TemplateEntry, AUTO_UPDATE_ACTOR};
pub use group::{GroupModel, WeightedMember};
pub use record::TemplateRecord;
pub use render::RenderedItems;
pub use time_format::{absolute_date, now_epoch, relative_delta};
pub use wrap::wrap_list;

/// Library plugin for Soulbook.
/// Owns the template catalog and its configuration.
pub struct SbLibraryPlugin;

impl Plugin for SbLibraryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LibraryConfig>()
            .init_resource::<Catalog>();
    }
}
