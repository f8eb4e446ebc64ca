use bevy::prelude::*;
use sb_library::{Catalog, LibraryConfig};

pub mod catalog_io;

pub use catalog_io::{load_catalog, save_catalog, CatalogIoError};

/// Startup systems that fill the catalog run in this set.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogLoadSet;

/// Persistence plugin for Soulbook.
/// Loads the catalog from its RON backing store at startup.
pub struct SbPersistencePlugin;

impl Plugin for SbPersistencePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_catalog_on_startup.in_set(CatalogLoadSet));
    }
}

fn load_catalog_on_startup(config: Res<LibraryConfig>, mut catalog: ResMut<Catalog>) {
    let path = config.database_path();
    match load_catalog(&path, &mut catalog) {
        Ok(report) => info!(
            "Loaded {} entries from {} ({} duplicates skipped)",
            report.loaded,
            path.display(),
            report.duplicates.len()
        ),
        Err(err) => error!("Catalog left empty: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_library::SbLibraryPlugin;
    use tempfile::tempdir;

    #[test]
    fn startup_loads_configured_file() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("souls_database.ron"),
            r#"[(blob: "{id:\"minecraft:zombie\",CustomName:\"Walker\"}", modified_on: 0)]"#,
        )
        .unwrap();

        let mut app = App::new();
        app.add_plugins((SbLibraryPlugin, SbPersistencePlugin));
        app.insert_resource(LibraryConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        });
        app.update();

        let catalog = app.world().resource::<Catalog>();
        assert_eq!(catalog.labels(), vec!["Walker"]);
    }

    #[test]
    fn missing_file_leaves_catalog_empty() {
        let dir = tempdir().unwrap();
        let mut app = App::new();
        app.add_plugins((SbLibraryPlugin, SbPersistencePlugin));
        app.insert_resource(LibraryConfig {
            data_dir: dir.path().join("nowhere"),
            ..Default::default()
        });
        app.update();

        assert!(app.world().resource::<Catalog>().is_empty());
    }
}
