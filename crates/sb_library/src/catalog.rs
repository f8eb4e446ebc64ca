//! The label-keyed template catalog and its location index.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use bevy::log::{debug, error, info};
use bevy::prelude::*;
use ron::ser::PrettyConfig;
use thiserror::Error;

use crate::entry::{EntryError, TemplateEntry};
use crate::record::TemplateRecord;

/// Errors raised while loading or saving the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Failed to serialize catalog: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Catalog record {index} is invalid: {source}")]
    Entry {
        index: usize,
        #[source]
        source: EntryError,
    },
}

/// Outcome of a successful reload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReloadReport {
    pub loaded: usize,
    /// Labels skipped because an earlier record already used them.
    pub duplicates: Vec<String>,
}

/// Orders case-insensitively; labels differing only by case stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct LabelKey {
    folded: String,
    label: String,
}

impl LabelKey {
    fn new(label: &str) -> Self {
        Self {
            folded: label.to_lowercase(),
            label: label.to_string(),
        }
    }
}

/// All known templates, keyed by label.
///
/// Entries are shared and immutable. The only writes are a whole reload
/// and replacing a single entry with an updated copy.
#[derive(Resource, Debug, Default)]
pub struct Catalog {
    entries: BTreeMap<LabelKey, Arc<TemplateEntry>>,
    by_location: HashMap<String, Vec<Arc<TemplateEntry>>>,
}

impl Catalog {
    /// Build a catalog from already constructed entries, skipping duplicate labels.
    pub fn from_entries(entries: impl IntoIterator<Item = TemplateEntry>) -> (Self, ReloadReport) {
        let mut catalog = Self::default();
        let mut report = ReloadReport::default();

        for entry in entries {
            let key = LabelKey::new(entry.label());
            if catalog.entries.contains_key(&key) {
                error!("Refused to load duplicate catalog entry '{}'", entry.label());
                report.duplicates.push(entry.label().to_string());
                continue;
            }
            debug!("  {}", entry.label());
            catalog.entries.insert(key, Arc::new(entry));
        }

        catalog.rebuild_location_index();
        report.loaded = catalog.entries.len();
        (catalog, report)
    }

    /// Replace the whole catalog with the records in `source`.
    ///
    /// Any malformed record aborts the reload and leaves the current
    /// contents untouched. Duplicate labels are skipped and reported.
    pub fn reload(&mut self, source: &str) -> Result<ReloadReport, CatalogError> {
        info!("Parsing template catalog...");
        let records: Vec<TemplateRecord> = ron::from_str(source)?;

        let entries = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                TemplateEntry::try_from(record).map_err(|source| CatalogError::Entry { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (fresh, report) = Self::from_entries(entries);
        *self = fresh;
        info!(
            "Loaded {} catalog entries across {} locations",
            report.loaded,
            self.by_location.len()
        );
        Ok(report)
    }

    /// Serialize every entry, in label order, to the backing store format.
    pub fn save(&self) -> Result<String, CatalogError> {
        let records: Vec<TemplateRecord> = self.entries.values().map(|e| TemplateRecord::from(&**e)).collect();
        Ok(ron::ser::to_string_pretty(&records, PrettyConfig::new())?)
    }

    /// Swap in an updated copy of an existing entry.
    ///
    /// Returns the previous entry, or `None` (leaving the catalog unchanged)
    /// when no entry has that label.
    pub fn replace(&mut self, entry: TemplateEntry) -> Option<Arc<TemplateEntry>> {
        let key = LabelKey::new(entry.label());
        let slot = self.entries.get_mut(&key)?;
        let previous = std::mem::replace(slot, Arc::new(entry));
        self.rebuild_location_index();
        Some(previous)
    }

    fn rebuild_location_index(&mut self) {
        self.by_location.clear();
        for entry in self.entries.values() {
            for location in entry.locations() {
                self.by_location
                    .entry(location.clone())
                    .or_default()
                    .push(Arc::clone(entry));
            }
        }
    }

    /// Exact label match.
    pub fn get(&self, label: &str) -> Option<&Arc<TemplateEntry>> {
        self.entries.get(&LabelKey::new(label))
    }

    /// Entry at `index` in case-insensitive label order.
    pub fn get_by_index(&self, index: usize) -> Option<&Arc<TemplateEntry>> {
        self.entries.values().nth(index)
    }

    /// Entries tagged with `location`, empty for unknown tags.
    pub fn by_location(&self, location: &str) -> &[Arc<TemplateEntry>] {
        self.by_location.get(location).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.values().map(|e| e.label()).collect()
    }

    /// Every location tag in use, sorted.
    pub fn locations(&self) -> Vec<&str> {
        let mut locations: Vec<&str> = self.by_location.keys().map(String::as_str).collect();
        locations.sort_unstable();
        locations
    }

    pub fn entries(&self) -> impl Iterator<Item = &Arc<TemplateEntry>> {
        self.entries.values()
    }

    pub fn entries_requiring_geometry(&self) -> impl Iterator<Item = &Arc<TemplateEntry>> {
        self.entries().filter(|e| e.requires_derived_geometry())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
