use serde::{Deserialize, Serialize};

use sb_core::{Hitbox, TagCompound};

use crate::entry::{EntryError, TemplateEntry};

/// One element of the backing store array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    /// Entity data in its canonical text form.
    pub blob: String,
    pub modified_on: i64,
    #[serde(default)]
    pub modified_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lore: Option<String>,
}

impl From<&TemplateEntry> for TemplateRecord {
    fn from(entry: &TemplateEntry) -> Self {
        Self {
            blob: entry.blob().to_string(),
            modified_on: entry.modified_at(),
            modified_by: entry.modified_by().to_string(),
            width: entry.width(),
            height: entry.height(),
            locations: entry.locations().iter().cloned().collect(),
            lore: entry.lore().map(str::to_string),
        }
    }
}

impl TryFrom<TemplateRecord> for TemplateEntry {
    type Error = EntryError;

    /// A record with only one of width and height loads without geometry.
    fn try_from(record: TemplateRecord) -> Result<Self, Self::Error> {
        let blob = TagCompound::parse(&record.blob)?;
        TemplateEntry::from_history(
            blob,
            record.modified_on,
            record.modified_by,
            record.locations.into_iter().collect(),
            record.lore,
            Hitbox::from_parts(record.width, record.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_default() {
        let record: TemplateRecord =
            ron::from_str(r#"(blob: "{id:\"minecraft:zombie\",CustomName:\"Z\"}", modified_on: 12)"#).unwrap();
        assert_eq!(record.modified_by, "");
        assert_eq!(record.width, None);
        assert!(record.locations.is_empty());

        let entry = TemplateEntry::try_from(record).unwrap();
        assert_eq!(entry.label(), "Z");
        assert!(entry.requires_derived_geometry());
    }

    #[test]
    fn half_geometry_is_dropped() {
        let record = TemplateRecord {
            blob: r#"{id:"minecraft:zombie",CustomName:"Z"}"#.into(),
            modified_on: 0,
            modified_by: String::new(),
            width: Some(0.6),
            height: None,
            locations: vec![],
            lore: None,
        };
        let entry = TemplateEntry::try_from(record).unwrap();
        assert_eq!(entry.geometry(), None);
        assert_eq!(TemplateRecord::from(&entry).width, None);
    }

    #[test]
    fn save_omits_unknown_fields() {
        let record = TemplateRecord {
            blob: "{}".into(),
            modified_on: 3,
            modified_by: String::new(),
            width: None,
            height: None,
            locations: vec![],
            lore: None,
        };
        let text = ron::to_string(&record).unwrap();
        assert!(text.contains("modified_by"));
        assert!(!text.contains("width"));
        assert!(!text.contains("locations"));
        assert!(!text.contains("lore"));
    }

    #[test]
    fn bad_blob_is_reported() {
        let record = TemplateRecord {
            blob: "{id:".into(),
            modified_on: 0,
            modified_by: String::new(),
            width: None,
            height: None,
            locations: vec![],
            lore: None,
        };
        assert!(matches!(TemplateEntry::try_from(record), Err(EntryError::Blob(_))));
    }

    #[test]
    fn entry_round_trips_through_record() {
        let record = TemplateRecord {
            blob: r#"{id:"minecraft:zombie",CustomName:"§cKing",Tags:["Boss"]}"#.into(),
            modified_on: 1_700_000_000,
            modified_by: "builder".into(),
            width: Some(0.3),
            height: Some(1.95),
            locations: vec!["crypt".into(), "arena".into()],
            lore: Some("Rules the dead.".into()),
        };
        let entry = TemplateEntry::try_from(record.clone()).unwrap();
        let back = TemplateRecord::from(&entry);

        assert_eq!(back.blob, record.blob);
        assert_eq!(back.locations, vec!["arena".to_string(), "crypt".to_string()]);
        assert_eq!(back.width, record.width);
        assert_eq!(back.lore, record.lore);
    }
}
