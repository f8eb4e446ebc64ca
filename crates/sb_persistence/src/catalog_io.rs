use std::fs;
use std::path::{Path, PathBuf};

use sb_library::{Catalog, CatalogError, ReloadReport};
use thiserror::Error;

/// Errors raised while reading or writing the backing store.
#[derive(Debug, Error)]
pub enum CatalogIoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Catalog file {} does not exist", .0.display())]
    Missing(PathBuf),

    #[error("Catalog file {} is empty", .0.display())]
    Empty(PathBuf),
}

/// Reload `catalog` from the RON file at `path`.
///
/// On any error the catalog keeps its previous contents.
pub fn load_catalog(path: &Path, catalog: &mut Catalog) -> Result<ReloadReport, CatalogIoError> {
    if !path.exists() {
        return Err(CatalogIoError::Missing(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Err(CatalogIoError::Empty(path.to_path_buf()));
    }
    Ok(catalog.reload(&contents)?)
}

/// Save every entry of `catalog` to `path`, replacing the file.
///
/// The data is written to a sibling temporary file first and renamed over
/// `path`, so readers never see a partially written store.
pub fn save_catalog(path: &Path, catalog: &Catalog) -> Result<(), CatalogIoError> {
    let ron_string = catalog.save()?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let staging = path.with_extension("ron.tmp");
    fs::write(&staging, ron_string)?;
    fs::rename(&staging, path)?;
    Ok(())
}
