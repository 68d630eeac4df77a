//! Record Deduplicator.
//!
//! Collapses a sequence of patch fragments into one resolved record per key,
//! in a single stable pass over document order:
//!
//! - a tombstone (`delete` field) removes the key's slot, if any;
//! - a fragment for a key that already has a slot is shallow-merged onto it;
//! - a fragment for an unseen key opens a new slot at the end.
//!
//! A slot keeps the position of the fragment that opened it. A key deleted
//! and later reintroduced opens a fresh slot at the reintroduction point and
//! carries nothing over from before the delete.

use std::collections::HashMap;

use tracing::debug;

use crate::record::{Record, is_tombstone, record_key, shallow_merge};

/// Sections whose records are deduplicated before construction.
pub const DEDUPLICATED_SECTIONS: [&str; 7] = [
    "items",
    "armors",
    "ufopaedia",
    "manufacture",
    "units",
    "alienDeployments",
    "research",
];

/// Resolve `records` into one record per key, in first-insertion order.
///
/// Records that carry no key and no `delete` marker cannot be addressed and
/// are dropped.
pub fn deduplicate(records: Vec<Record>) -> Vec<Record> {
    let mut slots: Vec<Option<Record>> = Vec::with_capacity(records.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let key = record_key(&record);

        if is_tombstone(&record) {
            match key {
                Some(key) => {
                    if let Some(slot) = index.remove(&key) {
                        slots[slot] = None;
                        debug!(key, "tombstone removed record");
                    }
                }
                None => debug!("tombstone without an identifier ignored"),
            }
            continue;
        }

        let Some(key) = key else {
            debug!("record without a key field dropped");
            continue;
        };

        match index.get(&key) {
            Some(&slot) => {
                if let Some(existing) = slots[slot].as_mut() {
                    shallow_merge(existing, record);
                }
            }
            None => {
                index.insert(key, slots.len());
                slots.push(Some(record));
            }
        }
    }

    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::record;
    use serde_json::json;

    fn keys(records: &[Record]) -> Vec<String> {
        records.iter().filter_map(record_key).collect()
    }

    #[test]
    fn distinct_keys_kept_in_order() {
        let out = deduplicate(vec![
            record(json!({"type": "A"})),
            record(json!({"type": "B"})),
            record(json!({"type": "C"})),
        ]);
        assert_eq!(keys(&out), vec!["A", "B", "C"]);
    }

    #[test]
    fn patch_merges_into_first_position() {
        let out = deduplicate(vec![
            record(json!({"type": "A", "power": 10, "weight": 2})),
            record(json!({"type": "B"})),
            record(json!({"type": "A", "power": 15})),
        ]);
        assert_eq!(keys(&out), vec!["A", "B"]);
        assert_eq!(out[0]["power"], json!(15));
        assert_eq!(out[0]["weight"], json!(2));
    }

    #[test]
    fn tombstone_removes_record() {
        let out = deduplicate(vec![
            record(json!({"type": "A"})),
            record(json!({"type": "B"})),
            record(json!({"delete": "A"})),
        ]);
        assert_eq!(keys(&out), vec!["B"]);
    }

    #[test]
    fn tombstone_for_unknown_key_is_noop() {
        let out = deduplicate(vec![
            record(json!({"delete": "GHOST"})),
            record(json!({"type": "A"})),
        ]);
        assert_eq!(keys(&out), vec!["A"]);
    }

    #[test]
    fn reinsert_after_delete_opens_new_slot_without_old_fields() {
        let out = deduplicate(vec![
            record(json!({"type": "A", "power": 10, "weight": 2})),
            record(json!({"type": "B"})),
            record(json!({"delete": "A"})),
            record(json!({"type": "A", "power": 99})),
        ]);
        assert_eq!(keys(&out), vec!["B", "A"]);
        assert_eq!(out[1], record(json!({"type": "A", "power": 99})));
    }

    #[test]
    fn tombstone_with_type_field_uses_type() {
        let out = deduplicate(vec![
            record(json!({"type": "A"})),
            record(json!({"type": "A", "delete": true})),
        ]);
        assert!(out.is_empty());
    }

    #[test]
    fn keyless_record_dropped() {
        let out = deduplicate(vec![
            record(json!({"power": 5})),
            record(json!({"type": "A"})),
        ]);
        assert_eq!(keys(&out), vec!["A"]);
    }

    #[test]
    fn research_keyed_by_name() {
        let out = deduplicate(vec![
            record(json!({"name": "STR_LASERS", "cost": 100})),
            record(json!({"name": "STR_LASERS", "cost": 200})),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["cost"], json!(200));
    }
}
