use bevy::log::warn;
use sb_core::{RichText, TextColor};
use sb_items::{placeholder_material, ItemFlags, ItemRenderer, ItemStack, Material};

use crate::entry::TemplateEntry;
use crate::time_format::{absolute_date, relative_delta};
use crate::wrap::wrap_list;

pub const TAG_WRAP_WIDTH: usize = 50;
pub const LOCATION_WRAP_WIDTH: usize = 45;
const LIST_PREFIX: &str = "  ";

/// The two display items derived from one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedItems {
    /// Full item carrying the entity data.
    pub collectible: ItemStack,
    /// Lightweight stand-in for browsing menus.
    pub placeholder: ItemStack,
}

impl RenderedItems {
    /// Both items replaced by one barrier naming the broken entry.
    fn failed(name: &str) -> Self {
        let mut item = ItemStack::new(Material::BARRIER);
        item.set_display_name(RichText::plain_text(format!("FAILED TO LOAD: {}", name)));
        Self {
            collectible: item.clone(),
            placeholder: item,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.placeholder.material == Material::BARRIER && self.collectible.material == Material::BARRIER
    }
}

/// Render `entry` as of `now` (epoch seconds).
///
/// A renderer failure is logged and degrades to [`RenderedItems::failed`];
/// it is never returned to the caller.
pub(crate) fn render_items(entry: &TemplateEntry, renderer: &dyn ItemRenderer, now: i64) -> RenderedItems {
    let mut collectible = match renderer.render_collectible(entry.blob()) {
        Ok(item) => item,
        Err(err) => {
            warn!("{} failed to render '{}': {}", renderer.name(), entry.label(), err);
            return RenderedItems::failed(entry.label());
        }
    };
    let mut placeholder = placeholder_material(entry.entity_type())
        .map(ItemStack::new)
        .unwrap_or_else(|| collectible.clone());

    let name = entry.rendered_display_name();
    let description = description_lines(entry);
    for item in [&mut collectible, &mut placeholder] {
        item.set_flags(ItemFlags::HIDE_ADDITIONAL);
        item.set_display_name(name.clone());
        for line in &description {
            item.append_description_line(line.clone());
        }
    }

    if !entry.modified_by().is_empty() {
        let modified = TextColor::Aqua.prefix();
        placeholder.append_description_line(format!(
            "{}Modified {} by {}",
            modified,
            relative_delta(entry.modified_at(), now),
            entry.modified_by()
        ));
        let date = absolute_date(entry.modified_at()).unwrap_or_else(|| entry.modified_at().to_string());
        collectible.append_description_line(format!("{}Modified {} by {}", modified, date, entry.modified_by()));
    }

    RenderedItems { collectible, placeholder }
}

/// Description lines shared by both items.
fn description_lines(entry: &TemplateEntry) -> Vec<String> {
    let white = TextColor::White.prefix();
    let kind = entry.entity_type();
    let mut lines = vec![format!("{}Type: {}", white, kind.strip_prefix("minecraft:").unwrap_or(kind))];

    if let Some(health) = entry.health() {
        lines.push(format!("{}Health: {:?}", white, health));
    }

    let tags = entry.tags();
    if !tags.is_empty() {
        lines.push(format!("{}Tags:", white));
        lines.extend(wrap_list(LIST_PREFIX, TAG_WRAP_WIDTH, &tags));
    }

    if !entry.locations().is_empty() {
        let locations: Vec<&str> = entry.locations().iter().map(String::as_str).collect();
        lines.push(format!("{}Locations:", white));
        lines.extend(wrap_list(LIST_PREFIX, LOCATION_WRAP_WIDTH, &locations));
    }

    if let Some(lore) = entry.lore().filter(|l| !l.is_empty()) {
        lines.push(format!("{}Lore:", white));
        lines.push(lore.to_string());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use sb_core::{strip_formatting, TagCompound};
    use sb_items::{RenderError, SoulBookRenderer};

    const NOW: i64 = 1_700_090_000;

    struct CountingRenderer {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingRenderer {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    impl ItemRenderer for CountingRenderer {
        fn render_collectible(&self, blob: &TagCompound) -> Result<ItemStack, RenderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RenderError::Unrenderable("corrupt".into()));
            }
            SoulBookRenderer::default().render_collectible(blob)
        }
    }

    fn entry(blob: &str, modified_by: &str, locations: &[&str], lore: Option<&str>) -> TemplateEntry {
        TemplateEntry::from_history(
            TagCompound::parse(blob).unwrap(),
            1_700_000_000,
            modified_by,
            locations.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            lore.map(str::to_string),
            None,
        )
        .unwrap()
    }

    fn plain_lore(item: &ItemStack) -> Vec<String> {
        item.lore.iter().map(|l| strip_formatting(l)).collect()
    }

    #[test]
    fn description_follows_fixed_order() {
        let e = entry(
            r#"{id:"minecraft:zombie",CustomName:"§cGrave Keeper",Health:40.0d,Tags:["Boss","Undead"]}"#,
            "builder",
            &["crypt"],
            Some("Guards the crypt."),
        );
        let items = render_items(&e, &SoulBookRenderer::default(), NOW);

        let expected_shared = [
            "Type: zombie",
            "Health: 40.0",
            "Tags:",
            "  Boss Undead",
            "Locations:",
            "  crypt",
            "Lore:",
            "Guards the crypt.",
        ];
        let placeholder = plain_lore(&items.placeholder);
        let collectible = plain_lore(&items.collectible);
        assert_eq!(&placeholder[..8], &expected_shared);
        assert_eq!(&collectible[..8], &expected_shared);
        assert_eq!(placeholder[8], "Modified 1d 1h ago by builder");
        assert_eq!(collectible[8], "Modified 2023-11-14 by builder");
        assert_eq!(items.placeholder.lore[0], "§fType: zombie");
        assert!(items.placeholder.lore[8].starts_with("§b"));
    }

    #[test]
    fn ancient_timestamp_still_renders() {
        let e = TemplateEntry::from_history(
            TagCompound::parse(r#"{id:"minecraft:zombie",CustomName:"Fossil"}"#).unwrap(),
            i64::MIN,
            "x",
            BTreeSet::new(),
            None,
            None,
        )
        .unwrap();
        let items = render_items(&e, &SoulBookRenderer::default(), NOW);

        let placeholder = plain_lore(&items.placeholder);
        assert!(placeholder[1].ends_with("months ago by x"));
        assert_eq!(plain_lore(&items.collectible)[1], format!("Modified {} by x", i64::MIN));
    }

    #[test]
    fn items_share_name_and_flags() {
        let e = entry(r#"{id:"minecraft:zombie",CustomName:"Walker",Tags:["Elite"]}"#, "", &[], None);
        let items = render_items(&e, &SoulBookRenderer::default(), NOW);

        assert_eq!(items.placeholder.material, Material::new("zombie_head"));
        assert_eq!(items.collectible.material, Material::WRITTEN_BOOK);
        assert_eq!(items.collectible.entity_data.as_ref(), Some(e.blob()));
        for item in [&items.placeholder, &items.collectible] {
            assert_eq!(item.flags, ItemFlags::HIDE_ADDITIONAL);
            assert_eq!(item.display_name.as_ref(), Some(&RichText::colored("Walker", TextColor::Gold)));
            assert_eq!(plain_lore(item), vec!["Type: zombie", "Tags:", "  Elite"]);
        }
    }

    #[test]
    fn unlisted_types_clone_collectible() {
        let e = entry(r#"{id:"custom:lich",CustomName:"Lich"}"#, "", &[], Some(""));
        let items = render_items(&e, &SoulBookRenderer::default(), NOW);

        assert_eq!(items.placeholder, items.collectible);
        assert_eq!(plain_lore(&items.placeholder), vec!["Type: custom:lich"]);
    }

    #[test]
    fn failure_degrades_both_items() {
        let renderer = CountingRenderer::new(true);
        let e = entry(r#"{id:"minecraft:zombie",CustomName:"§4Broken"}"#, "builder", &[], None);

        let first = e.representations(&renderer).clone();
        assert!(first.is_failed());
        assert_eq!(first.collectible, first.placeholder);
        assert_eq!(first.placeholder.plain_name(), "FAILED TO LOAD: Broken");

        assert_eq!(e.collectible_representation(&renderer), &first.collectible);
        assert_eq!(e.placeholder_representation(&renderer), &first.placeholder);
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn success_is_cached() {
        let renderer = CountingRenderer::new(false);
        let e = entry(r#"{id:"minecraft:skeleton",CustomName:"Archer"}"#, "builder", &[], None);

        let first = e.placeholder_representation(&renderer).clone();
        let again = e.placeholder_representation(&renderer);
        assert_eq!(&first, again);
        assert!(!e.representations(&renderer).is_failed());
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
    }
}
