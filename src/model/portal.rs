use std::collections::BTreeMap;

use smallvec::SmallVec;

/// A freespace jump between two vertices of the same trajectory.
///
/// `distance` is an equal-time-distance upper bound on the Fréchet
/// distance between the sub-polyline `[source..destination]` of the
/// underlying original and the single segment `source -> destination`, so
/// a solver that can afford the bound may skip the rows in between.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Portal {
    pub source: usize,
    pub destination: usize,
    pub distance: f64,
}

/// Portals sharing a source vertex, sorted by destination.
pub type PortalBucket = SmallVec<[Portal; 4]>;

/// Freespace jumps of one trajectory, keyed by source vertex.
pub type ShortcutMap = BTreeMap<usize, PortalBucket>;

/// Merges recorded portals into a shortcut map.
///
/// Portals spanning a single segment carry no information and are
/// dropped; duplicates (same source and destination) are kept once.
/// Buckets are left unsorted; call [`sort_buckets`] once all
/// simplifications have been merged.
pub fn merge_portals(map: &mut ShortcutMap, portals: &[Portal]) {
    for portal in portals {
        if portal.destination - portal.source == 1 {
            continue;
        }
        let bucket = map.entry(portal.source).or_default();
        if bucket.iter().any(|p| p.destination == portal.destination) {
            continue;
        }
        bucket.push(*portal);
    }
}

/// Sorts every bucket by destination ascending. These are many sorts but
/// on small sets.
pub fn sort_buckets(map: &mut ShortcutMap) {
    for bucket in map.values_mut() {
        bucket.sort_unstable_by(|a, b| a.destination.cmp(&b.destination));
    }
}
