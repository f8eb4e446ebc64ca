use sb_core::TagCompound;

/// Vanilla hitbox `(width, height)` per entity type.
const DIMENSIONS: &[(&str, f64, f64)] = &[
    ("armor_stand", 0.5, 1.975),
    ("bat", 0.5, 0.9),
    ("bee", 0.7, 0.6),
    ("blaze", 0.6, 1.8),
    ("boat", 1.375, 0.5625),
    ("cat", 0.6, 0.7),
    ("cave_spider", 0.7, 0.5),
    ("chicken", 0.4, 0.7),
    ("cod", 0.5, 0.3),
    ("cow", 0.9, 1.4),
    ("creeper", 0.6, 1.7),
    ("dolphin", 0.9, 0.6),
    ("drowned", 0.6, 1.95),
    ("elder_guardian", 1.9975, 1.9975),
    ("end_crystal", 2.0, 2.0),
    ("enderman", 0.6, 2.9),
    ("endermite", 0.4, 0.3),
    ("evoker", 0.6, 1.95),
    ("evoker_fangs", 0.5, 0.8),
    ("falling_block", 0.98, 0.98),
    ("fox", 0.6, 0.7),
    ("ghast", 4.0, 4.0),
    ("giant", 3.6, 12.0),
    ("guardian", 0.85, 0.85),
    ("hoglin", 1.3964844, 1.4),
    ("horse", 1.3964844, 1.6),
    ("husk", 0.6, 1.95),
    ("illusioner", 0.6, 1.95),
    ("iron_golem", 1.4, 2.7),
    ("minecart", 0.98, 0.7),
    ("mooshroom", 0.9, 1.4),
    ("ocelot", 0.6, 0.7),
    ("phantom", 0.9, 0.5),
    ("pig", 0.9, 0.9),
    ("piglin", 0.6, 1.95),
    ("piglin_brute", 0.6, 1.95),
    ("pillager", 0.6, 1.95),
    ("polar_bear", 1.4, 1.4),
    ("pufferfish", 0.7, 0.7),
    ("rabbit", 0.4, 0.5),
    ("ravager", 1.95, 2.2),
    ("salmon", 0.7, 0.4),
    ("sheep", 0.9, 1.3),
    ("shulker", 1.0, 1.0),
    ("silverfish", 0.4, 0.3),
    ("skeleton", 0.6, 1.99),
    ("skeleton_horse", 1.3964844, 1.6),
    ("snow_golem", 0.7, 1.9),
    ("spider", 1.4, 0.9),
    ("squid", 0.8, 0.8),
    ("stray", 0.6, 1.99),
    ("strider", 0.9, 1.7),
    ("tropical_fish", 0.5, 0.4),
    ("turtle", 1.2, 0.4),
    ("vex", 0.4, 0.8),
    ("villager", 0.6, 1.95),
    ("vindicator", 0.6, 1.95),
    ("witch", 0.6, 1.95),
    ("wither", 0.9, 3.5),
    ("wither_skeleton", 0.7, 2.4),
    ("wolf", 0.6, 0.85),
    ("zoglin", 1.3964844, 1.4),
    ("zombie", 0.6, 1.95),
    ("zombie_horse", 1.3964844, 1.6),
    ("zombie_villager", 0.6, 1.95),
    ("zombified_piglin", 0.6, 1.95),
];

/// Hitbox `(width, height)` of the entity described by `blob`, or `None`
/// when its type is unknown.
///
/// Size-dependent types (`slime`, `magma_cube`) scale with `Size`, babies
/// are half size, small armor stands are half size and markers have no
/// extent at all.
pub fn entity_dimensions(entity_type: &str, blob: &TagCompound) -> Option<(f64, f64)> {
    let key = entity_type.strip_prefix("minecraft:").unwrap_or(entity_type);
    let flag = |name: &str| blob.get_number(name).is_some_and(|v| v != 0.0);

    if key == "slime" || key == "magma_cube" {
        let size = blob.get_number("Size").unwrap_or(0.0).max(0.0) + 1.0;
        return Some((0.52 * size, 0.52 * size));
    }

    let &(_, width, height) = DIMENSIONS.iter().find(|(k, _, _)| *k == key)?;
    if key == "armor_stand" && flag("Marker") {
        return Some((0.0, 0.0));
    }
    if flag("IsBaby") || (key == "armor_stand" && flag("Small")) {
        return Some((width * 0.5, height * 0.5));
    }
    Some((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_resolve_with_or_without_namespace() {
        let blob = TagCompound::new();
        assert_eq!(entity_dimensions("minecraft:zombie", &blob), Some((0.6, 1.95)));
        assert_eq!(entity_dimensions("spider", &blob), Some((1.4, 0.9)));
        assert_eq!(entity_dimensions("minecraft:unicorn", &blob), None);
    }

    #[test]
    fn slimes_scale_with_size() {
        let blob = TagCompound::parse("{Size:3}").unwrap();
        let (w, h) = entity_dimensions("minecraft:slime", &blob).unwrap();
        assert!((w - 2.08).abs() < 1e-9);
        assert_eq!(w, h);
    }

    #[test]
    fn babies_and_markers_shrink() {
        let baby = TagCompound::parse("{IsBaby:1b}").unwrap();
        assert_eq!(entity_dimensions("zombie", &baby), Some((0.3, 0.975)));
        let marker = TagCompound::parse("{Marker:1b,Small:1b}").unwrap();
        assert_eq!(entity_dimensions("armor_stand", &marker), Some((0.0, 0.0)));
    }
}
