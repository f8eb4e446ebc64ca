use bitflags::bitflags;
use sb_core::{RichText, TagCompound};

use crate::material::Material;

bitflags! {
    /// Tooltip sections hidden from the player.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ItemFlags: u8 {
        const HIDE_ENCHANTS = 0b0000_0001;
        const HIDE_ATTRIBUTES = 0b0000_0010;
        const HIDE_UNBREAKABLE = 0b0000_0100;
        const HIDE_DESTROYS = 0b0000_1000;
        const HIDE_PLACED_ON = 0b0001_0000;
        /// Hides book authorship, potion effects and similar extra lines.
        const HIDE_ADDITIONAL = 0b0010_0000;
    }
}

/// A displayable inventory item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStack {
    pub material: Material,
    pub amount: u8,
    pub display_name: Option<RichText>,
    /// Description lines in legacy formatting-code form.
    pub lore: Vec<String>,
    pub flags: ItemFlags,
    /// Author line of written books.
    pub author: Option<String>,
    /// Entity data carried by collectible items.
    pub entity_data: Option<TagCompound>,
}

impl ItemStack {
    pub fn new(material: Material) -> Self {
        Self {
            material,
            amount: 1,
            display_name: None,
            lore: Vec::new(),
            flags: ItemFlags::empty(),
            author: None,
            entity_data: None,
        }
    }

    pub fn set_display_name(&mut self, name: RichText) {
        self.display_name = Some(name);
    }

    pub fn append_description_line(&mut self, line: impl Into<String>) {
        self.lore.push(line.into());
    }

    /// Replace all hide flags.
    pub fn set_flags(&mut self, flags: ItemFlags) {
        self.flags = flags;
    }

    /// Plain display name, or the material key when unnamed.
    pub fn plain_name(&self) -> String {
        match &self.display_name {
            Some(name) => name.plain(),
            None => self.material.key().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_is_single_and_bare() {
        let item = ItemStack::new(Material::BARRIER);
        assert_eq!(item.amount, 1);
        assert!(item.lore.is_empty());
        assert!(item.flags.is_empty());
        assert_eq!(item.plain_name(), "barrier");
    }

    #[test]
    fn description_lines_append_in_order() {
        let mut item = ItemStack::new(Material::new("bone"));
        item.set_display_name(RichText::plain_text("Fang"));
        item.append_description_line("first");
        item.append_description_line(String::from("second"));
        assert_eq!(item.lore, vec!["first", "second"]);
        assert_eq!(item.plain_name(), "Fang");
    }

    #[test]
    fn set_flags_replaces_previous_flags() {
        let mut item = ItemStack::new(Material::WRITTEN_BOOK);
        item.set_flags(ItemFlags::HIDE_ATTRIBUTES | ItemFlags::HIDE_ENCHANTS);
        item.set_flags(ItemFlags::HIDE_ADDITIONAL);
        assert_eq!(item.flags.bits(), 32);
    }
}
