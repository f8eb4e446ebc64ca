use std::path::Path;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use sb_core::WorldPos;
use sb_entity_spawn::{EntityHost, SandboxWorld};
use sb_items::ActiveRenderer;
use sb_library::{Catalog, LibraryConfig};
use sb_persistence::{save_catalog, CatalogLoadSet};

const CONFIG_FILE: &str = "soulbook.ron";

fn main() {
    let config = match LibraryConfig::load_or_default(Path::new(CONFIG_FILE)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Ignoring {}: {}", CONFIG_FILE, err);
            LibraryConfig::default()
        }
    };

    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_once()))
        .add_plugins(LogPlugin {
            filter: config.log_filter.clone(),
            ..default()
        })
        // Plugins
        .add_plugins((
            sb_core::SbCorePlugin,
            sb_items::SbItemsPlugin,
            sb_entity_spawn::SbEntitySpawnPlugin,
            sb_library::SbLibraryPlugin,
            sb_persistence::SbPersistencePlugin,
        ))
        .insert_resource(config)
        // Startup - refresh stale geometry, then report
        .add_systems(
            Startup,
            (refresh_geometry, report_catalog).chain().after(CatalogLoadSet),
        )
        .run();
}

/// Measure every entry whose geometry is unknown and persist the results.
fn refresh_geometry(
    config: Res<LibraryConfig>,
    mut catalog: ResMut<Catalog>,
    mut sandbox: ResMut<SandboxWorld>,
) {
    if !config.refresh_geometry {
        return;
    }
    let stale: Vec<_> = catalog.entries_requiring_geometry().cloned().collect();
    if stale.is_empty() {
        return;
    }

    let origin = WorldPos::new(0.0, sandbox.max_height(), 0.0);
    let mut refreshed = 0;
    for entry in stale {
        match entry.with_recomputed_geometry(&mut *sandbox, origin, &config.auto_update_actor) {
            Ok(updated) => {
                catalog.replace(updated);
                refreshed += 1;
            }
            Err(err) => warn!("Could not measure '{}': {}", entry.label(), err),
        }
    }
    if refreshed == 0 {
        return;
    }

    info!("Measured geometry for {} entries", refreshed);
    if let Err(err) = save_catalog(&config.database_path(), &catalog) {
        error!("Failed to save catalog: {}", err);
    }
}

fn report_catalog(config: Res<LibraryConfig>, catalog: Res<Catalog>, renderer: Res<ActiveRenderer>) {
    info!(
        "Catalog ready: {} entries, {} locations, {} awaiting geometry",
        catalog.len(),
        catalog.locations().len(),
        catalog.entries_requiring_geometry().count()
    );

    if config.render_on_load {
        let failed = catalog
            .entries()
            .filter(|e| e.representations(&*renderer.0).is_failed())
            .count();
        info!("Rendered {} entries with {} ({} failed)", catalog.len(), renderer.0.name(), failed);
    }
}
