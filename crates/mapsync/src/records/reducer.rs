use std::collections::btree_map;
use std::collections::{BTreeMap, HashMap};

use super::types::{MapCenter, MapId, MapRecord};

/// Most recent map per location, keyed by map id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalMapTable {
    by_id: BTreeMap<MapId, MapCenter>,
    by_marker_id: HashMap<String, MapId>,
}

impl CanonicalMapTable {
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Looks up a map by the string form of its id, as used for marker ids.
    pub fn get(&self, marker_id: &str) -> Option<MapCenter> {
        self.by_marker_id
            .get(marker_id)
            .and_then(|id| self.by_id.get(id))
            .copied()
    }

    pub fn contains(&self, marker_id: &str) -> bool {
        self.by_marker_id.contains_key(marker_id)
    }

    /// Entries in ascending numeric id order.
    pub fn iter(&self) -> btree_map::Iter<'_, MapId, MapCenter> {
        self.by_id.iter()
    }

    fn insert(&mut self, id: MapId, center: MapCenter) {
        self.by_marker_id.insert(id.to_string(), id);
        self.by_id.insert(id, center);
    }
}

impl FromIterator<(MapId, MapCenter)> for CanonicalMapTable {
    fn from_iter<I: IntoIterator<Item = (MapId, MapCenter)>>(iter: I) -> Self {
        let mut table = CanonicalMapTable::default();
        for (id, center) in iter {
            table.insert(id, center);
        }
        table
    }
}

/// Collapses records that share a center to the highest id at that center.
pub fn reduce_to_canonical<'a, I>(records: I) -> CanonicalMapTable
where
    I: IntoIterator<Item = &'a MapRecord>,
{
    let mut highest_at = BTreeMap::<MapCenter, MapId>::new();
    for record in records {
        highest_at
            .entry(record.center)
            .and_modify(|id| *id = (*id).max(record.id))
            .or_insert(record.id);
    }
    highest_at
        .into_iter()
        .map(|(center, id)| (id, center))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, x: i64, z: i64) -> MapRecord {
        MapRecord {
            id: MapId(id),
            world: "overworld".to_string(),
            scale: 0,
            center: MapCenter { x, z },
        }
    }

    #[test]
    fn newest_map_wins_each_location() {
        let records = vec![record(7, 0, 0), record(12, 0, 0)];
        let table = reduce_to_canonical(&records);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("12"), Some(MapCenter { x: 0, z: 0 }));
        assert!(!table.contains("7"));
    }

    #[test]
    fn one_entry_per_distinct_center_regardless_of_order() {
        let records = vec![
            record(3, 128, 128),
            record(9, -128, 0),
            record(1, 128, 128),
            record(4, -128, 0),
            record(20, 0, 1024),
            record(15, 128, 128),
        ];
        let mut reversed = records.clone();
        reversed.reverse();

        let forward = reduce_to_canonical(&records);
        let backward = reduce_to_canonical(&reversed);
        assert_eq!(forward, backward);

        let entries = forward
            .iter()
            .map(|(id, center)| (id.0, center.x, center.z))
            .collect::<Vec<_>>();
        assert_eq!(entries, vec![(9, -128, 0), (15, 128, 128), (20, 0, 1024)]);
    }

    #[test]
    fn lookup_uses_canonical_decimal_form() {
        let table = reduce_to_canonical(&[record(5, 100, -200)]);
        assert_eq!(table.get("5"), Some(MapCenter { x: 100, z: -200 }));
        assert_eq!(table.get("05"), None);
        assert!(!table.contains("five"));
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let table = reduce_to_canonical(&Vec::<MapRecord>::new());
        assert!(table.is_empty());
    }
}
