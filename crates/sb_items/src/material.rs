/// Item material identified by its key in the `minecraft` namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Material(&'static str);

impl Material {
    pub const BARRIER: Material = Material("barrier");
    pub const WRITTEN_BOOK: Material = Material("written_book");

    pub const fn new(key: &'static str) -> Self {
        Self(key)
    }

    /// Key without namespace, e.g. `"zombie_head"`.
    pub fn key(&self) -> &'static str {
        self.0
    }
}

/// Cheap stand-in item for an entity type, shown in browsing menus.
///
/// Accepts keys with or without the `minecraft:` namespace. Returns `None`
/// for types without a dedicated placeholder.
pub fn placeholder_material(entity_type: &str) -> Option<Material> {
    let key = entity_type.strip_prefix("minecraft:").unwrap_or(entity_type);
    let material = match key {
        "armor_stand" => "armor_stand",
        "blaze" => "blaze_powder",
        "bee" => "honeycomb",
        "cat" => "string",
        "cave_spider" => "fermented_spider_eye",
        "chicken" => "chicken",
        "cod" => "cod",
        "cow" => "beef",
        "creeper" => "creeper_head",
        "dolphin" => "cod",
        "drowned" => "trident",
        "elder_guardian" => "sponge",
        "enderman" => "ender_pearl",
        "endermite" => "ender_eye",
        "end_crystal" => "end_crystal",
        "evoker" => "totem_of_undying",
        "evoker_fangs" => "dead_fire_coral_fan",
        "fox" => "sweet_berries",
        "ghast" => "ghast_tear",
        "giant" => "ancient_debris",
        "guardian" => "prismarine_shard",
        "hoglin" => "warped_fungus",
        "zoglin" => "crimson_fungus",
        "horse" => "saddle",
        "husk" => "rotten_flesh",
        "illusioner" => "bow",
        "iron_golem" => "iron_block",
        "magma_cube" => "magma_cream",
        "mooshroom" => "red_mushroom",
        "ocelot" => "cooked_chicken",
        "pillager" => "crossbow",
        "pig" => "porkchop",
        "phantom" => "phantom_membrane",
        "polar_bear" => "snow",
        "zombified_piglin" => "gold_nugget",
        "piglin" => "golden_boots",
        "piglin_brute" => "golden_axe",
        "pufferfish" => "pufferfish",
        "rabbit" => "rabbit_foot",
        "ravager" => "shield",
        "salmon" => "salmon",
        "shulker" => "shulker_box",
        "silverfish" => "mossy_stone_bricks",
        "skeleton" => "skeleton_skull",
        "skeleton_horse" => "iron_horse_armor",
        "slime" => "slime_ball",
        "snow_golem" => "carved_pumpkin",
        "spider" => "spider_eye",
        "stray" => "bow",
        "strider" => "warped_fungus_on_a_stick",
        "squid" => "ink_sac",
        "tropical_fish" => "tropical_fish",
        "turtle" => "turtle_helmet",
        "vex" => "iron_sword",
        "vindicator" => "stone_axe",
        "villager" => "emerald",
        "witch" => "poisonous_potato",
        "wither" => "nether_star",
        "wither_skeleton" => "wither_skeleton_skull",
        "wolf" => "bone",
        "zombie" => "zombie_head",
        "zombie_villager" => "bell",
        "zombie_horse" => "leather",
        _ => return None,
    };
    Some(Material(material))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_is_optional() {
        assert_eq!(placeholder_material("minecraft:zombie"), Some(Material::new("zombie_head")));
        assert_eq!(placeholder_material("zombie"), Some(Material::new("zombie_head")));
    }

    #[test]
    fn unlisted_types_have_no_placeholder() {
        assert_eq!(placeholder_material("minecraft:allay"), None);
        assert_eq!(placeholder_material("custom:zombie"), None);
    }
}
