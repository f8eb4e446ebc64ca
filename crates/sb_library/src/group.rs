//! Spawn groups: single templates and weighted compositions of them.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use bevy::log::warn;
use rand::Rng;
use sb_core::{BoundingBox, WorldPos};
use sb_entity_spawn::EntityHost;

use crate::entry::TemplateEntry;

/// A member of a composite group with its weight or repeat count.
#[derive(Debug, Clone)]
pub struct WeightedMember {
    pub group: GroupModel,
    pub weight: u32,
}

impl WeightedMember {
    pub fn new(group: GroupModel, weight: u32) -> Self {
        Self { group, weight }
    }
}

/// Something that can be realized into a multiset of catalog entries.
#[derive(Debug, Clone)]
pub enum GroupModel {
    /// Exactly one entry.
    Leaf(Arc<TemplateEntry>),
    /// One member, picked with probability proportional to its weight.
    Pool { label: String, members: Vec<WeightedMember> },
    /// Every member, each realized `weight` times.
    Party { label: String, members: Vec<WeightedMember> },
}

impl GroupModel {
    pub fn label(&self) -> &str {
        match self {
            GroupModel::Leaf(entry) => entry.label(),
            GroupModel::Pool { label, .. } | GroupModel::Party { label, .. } => label.as_str(),
        }
    }

    /// This group's label and every label reachable below it.
    pub fn possible_labels(&self) -> BTreeSet<String> {
        let mut labels = BTreeSet::new();
        self.collect_labels(&mut labels);
        labels
    }

    fn collect_labels(&self, labels: &mut BTreeSet<String>) {
        labels.insert(self.label().to_string());
        for member in self.members() {
            member.group.collect_labels(labels);
        }
    }

    fn members(&self) -> &[WeightedMember] {
        match self {
            GroupModel::Leaf(_) => &[],
            GroupModel::Pool { members, .. } | GroupModel::Party { members, .. } => members.as_slice(),
        }
    }

    /// Every distinct entry this group can produce.
    pub fn possible_entries(&self) -> Vec<Arc<TemplateEntry>> {
        let mut entries = BTreeMap::new();
        self.collect_entries(&mut entries);
        entries.into_values().collect()
    }

    fn collect_entries(&self, entries: &mut BTreeMap<String, Arc<TemplateEntry>>) {
        match self {
            GroupModel::Leaf(entry) => {
                entries
                    .entry(entry.label().to_string())
                    .or_insert_with(|| Arc::clone(entry));
            }
            _ => {
                for member in self.members() {
                    member.group.collect_entries(entries);
                }
            }
        }
    }

    /// One random outcome: entry label to the number of times it was picked.
    pub fn random_realization<R: Rng + ?Sized>(&self, rng: &mut R) -> BTreeMap<String, u32> {
        let mut counts = BTreeMap::new();
        self.realize_into(rng, &mut counts);
        counts
    }

    fn realize_into<R: Rng + ?Sized>(&self, rng: &mut R, counts: &mut BTreeMap<String, u32>) {
        match self {
            GroupModel::Leaf(entry) => {
                *counts.entry(entry.label().to_string()).or_insert(0) += 1;
            }
            GroupModel::Pool { members, .. } => {
                let total = total_weight(members);
                if total == 0 {
                    return;
                }
                let mut roll = rng.gen_range(0..total);
                for member in members {
                    let weight = u64::from(member.weight);
                    if roll < weight {
                        member.group.realize_into(rng, counts);
                        return;
                    }
                    roll -= weight;
                }
            }
            GroupModel::Party { members, .. } => {
                for member in members {
                    for _ in 0..member.weight {
                        member.group.realize_into(rng, counts);
                    }
                }
            }
        }
    }

    /// Mean number of times each entry is picked per realization.
    pub fn expected_distribution(&self) -> BTreeMap<String, f64> {
        let mut distribution = BTreeMap::new();
        self.accumulate_expectation(1.0, &mut distribution);
        distribution
    }

    fn accumulate_expectation(&self, scale: f64, distribution: &mut BTreeMap<String, f64>) {
        match self {
            GroupModel::Leaf(entry) => {
                *distribution.entry(entry.label().to_string()).or_insert(0.0) += scale;
            }
            GroupModel::Pool { members, .. } => {
                let total = total_weight(members);
                if total == 0 {
                    return;
                }
                for member in members.iter().filter(|m| m.weight > 0) {
                    let share = f64::from(member.weight) / total as f64;
                    member.group.accumulate_expectation(scale * share, distribution);
                }
            }
            GroupModel::Party { members, .. } => {
                for member in members.iter().filter(|m| m.weight > 0) {
                    member
                        .group
                        .accumulate_expectation(scale * f64::from(member.weight), distribution);
                }
            }
        }
    }

    /// Realize this group and spawn each picked entry inside `bounds`.
    ///
    /// Entries without known geometry are skipped, as are positions where
    /// the entry's body would be obstructed. Spawn failures are logged.
    pub fn summon_group<R, H>(&self, rng: &mut R, host: &mut H, bounds: &BoundingBox) -> Vec<H::Handle>
    where
        R: Rng + ?Sized,
        H: EntityHost,
    {
        let mut spawned = Vec::new();
        if let GroupModel::Leaf(entry) = self {
            spawned.extend(summon_leaf(entry, rng, host, bounds));
            return spawned;
        }

        let entries: BTreeMap<String, Arc<TemplateEntry>> = self
            .possible_entries()
            .into_iter()
            .map(|e| (e.label().to_string(), e))
            .collect();
        for (label, count) in self.random_realization(rng) {
            let Some(entry) = entries.get(&label) else { continue };
            for _ in 0..count {
                spawned.extend(summon_leaf(entry, rng, host, bounds));
            }
        }
        spawned
    }
}

/// Sum of member weights, wide enough that it cannot overflow.
fn total_weight(members: &[WeightedMember]) -> u64 {
    members.iter().map(|m| u64::from(m.weight)).sum()
}

fn summon_leaf<R, H>(entry: &TemplateEntry, rng: &mut R, host: &mut H, bounds: &BoundingBox) -> Option<H::Handle>
where
    R: Rng + ?Sized,
    H: EntityHost,
{
    let hitbox = entry.geometry()?;
    let point = WorldPos::new(
        bounds.min.x + rng.gen::<f64>() * (bounds.max.x - bounds.min.x),
        bounds.min.y + rng.gen::<f64>() * (bounds.max.y - bounds.min.y),
        bounds.min.z + rng.gen::<f64>() * (bounds.max.z - bounds.min.z),
    );
    if host.is_obstructed(point, hitbox.width, hitbox.height) {
        return None;
    }
    match entry.summon(host, point) {
        Ok(handle) => Some(handle),
        Err(err) => {
            warn!("Failed to summon '{}': {}", entry.label(), err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use sb_core::{Hitbox, TagCompound};
    use sb_entity_spawn::SandboxWorld;

    fn leaf(name: &str, geometry: Option<Hitbox>) -> GroupModel {
        let blob = TagCompound::parse(&format!(r#"{{id:"minecraft:zombie",CustomName:"{}"}}"#, name)).unwrap();
        GroupModel::Leaf(Arc::new(
            TemplateEntry::from_history(blob, 0, "", BTreeSet::new(), None, geometry).unwrap(),
        ))
    }

    fn pool(label: &str, members: Vec<(GroupModel, u32)>) -> GroupModel {
        GroupModel::Pool {
            label: label.to_string(),
            members: members.into_iter().map(|(g, w)| WeightedMember::new(g, w)).collect(),
        }
    }

    fn party(label: &str, members: Vec<(GroupModel, u32)>) -> GroupModel {
        GroupModel::Party {
            label: label.to_string(),
            members: members.into_iter().map(|(g, w)| WeightedMember::new(g, w)).collect(),
        }
    }

    fn expected_total(group: &GroupModel) -> f64 {
        match group {
            GroupModel::Leaf(_) => 1.0,
            GroupModel::Pool { members, .. } => {
                let total = total_weight(members);
                if total == 0 {
                    return 0.0;
                }
                members
                    .iter()
                    .map(|m| f64::from(m.weight) / total as f64 * expected_total(&m.group))
                    .sum()
            }
            GroupModel::Party { members, .. } => members
                .iter()
                .map(|m| f64::from(m.weight) * expected_total(&m.group))
                .sum(),
        }
    }

    #[test]
    fn leaf_realizes_itself() {
        let walker = leaf("Walker", None);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        assert_eq!(walker.possible_labels(), BTreeSet::from(["Walker".to_string()]));
        assert_eq!(walker.random_realization(&mut rng), BTreeMap::from([("Walker".to_string(), 1)]));
        assert_eq!(walker.expected_distribution(), BTreeMap::from([("Walker".to_string(), 1.0)]));
    }

    #[test]
    fn composite_labels_are_transitive() {
        let group = party(
            "Crypt Patrol",
            vec![(leaf("Walker", None), 2), (pool("Ranged", vec![(leaf("Archer", None), 1)]), 1)],
        );
        let labels: Vec<String> = group.possible_labels().into_iter().collect();
        assert_eq!(labels, vec!["Archer", "Crypt Patrol", "Ranged", "Walker"]);
        assert_eq!(group.possible_entries().len(), 2);
    }

    #[test]
    fn expected_distribution_sums_to_expected_picks() {
        let ranged = pool("Ranged", vec![(leaf("Archer", None), 3), (leaf("Mage", None), 1)]);
        let group = party("Patrol", vec![(leaf("Walker", None), 2), (ranged, 3)]);

        let distribution = group.expected_distribution();
        assert!((distribution["Walker"] - 2.0).abs() < 1e-9);
        assert!((distribution["Archer"] - 2.25).abs() < 1e-9);
        assert!((distribution["Mage"] - 0.75).abs() < 1e-9);

        let sum: f64 = distribution.values().sum();
        assert!((sum - expected_total(&group)).abs() < 1e-9);
        assert!((sum - 5.0).abs() < 1e-9);
    }

    #[test]
    fn pool_respects_weights() {
        let group = pool("Ranged", vec![(leaf("Archer", None), 3), (leaf("Mage", None), 1), (leaf("Never", None), 0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut archers = 0u32;
        let trials = 4000;
        for _ in 0..trials {
            let outcome = group.random_realization(&mut rng);
            assert_eq!(outcome.values().sum::<u32>(), 1);
            assert!(!outcome.contains_key("Never"));
            archers += outcome.get("Archer").copied().unwrap_or(0);
        }
        let ratio = f64::from(archers) / f64::from(trials);
        assert!((ratio - 0.75).abs() < 0.05, "archer ratio {}", ratio);
    }

    #[test]
    fn huge_weights_do_not_overflow() {
        let group = pool("Skewed", vec![(leaf("Common", None), u32::MAX), (leaf("Rare", None), 1)]);

        let distribution = group.expected_distribution();
        let sum: f64 = distribution.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(distribution["Common"] > distribution["Rare"]);
        assert!(distribution["Rare"] > 0.0);

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..100 {
            assert_eq!(group.random_realization(&mut rng).values().sum::<u32>(), 1);
        }
    }

    #[test]
    fn empty_pool_realizes_nothing() {
        let group = pool("Nothing", vec![(leaf("Never", None), 0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(group.random_realization(&mut rng).is_empty());
        assert!(group.expected_distribution().is_empty());
    }

    #[test]
    fn leaf_without_geometry_summons_nothing() {
        let mut host = SandboxWorld::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let bounds = BoundingBox::new(WorldPos::new(0.0, 64.0, 0.0), WorldPos::new(10.0, 64.0, 10.0));

        assert!(leaf("Walker", None).summon_group(&mut rng, &mut host, &bounds).is_empty());
        assert_eq!(host.live_entities(), 0);
    }

    #[test]
    fn summon_places_inside_bounds() {
        let mut host = SandboxWorld::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let bounds = BoundingBox::new(WorldPos::new(0.0, 64.0, 0.0), WorldPos::new(10.0, 64.0, 10.0));
        let group = party("Pair", vec![(leaf("Walker", Some(Hitbox::new(0.3, 1.95))), 2)]);

        let handles = group.summon_group(&mut rng, &mut host, &bounds);
        assert_eq!(handles.len(), 2);
        for handle in handles {
            let at = host.position(handle).unwrap();
            assert!((0.0..=10.0).contains(&at.x) && (0.0..=10.0).contains(&at.z));
            assert_eq!(at.y, 64.0);
        }
    }

    #[test]
    fn obstructed_points_are_skipped() {
        let mut host = SandboxWorld::default();
        host.add_solid(BoundingBox::new(WorldPos::new(-5.0, 60.0, -5.0), WorldPos::new(15.0, 70.0, 15.0)));
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let bounds = BoundingBox::new(WorldPos::new(0.0, 64.0, 0.0), WorldPos::new(10.0, 64.0, 10.0));

        let walker = leaf("Walker", Some(Hitbox::new(0.3, 1.95)));
        assert!(walker.summon_group(&mut rng, &mut host, &bounds).is_empty());
        assert_eq!(host.persistent_entities(), 0);
    }
}
