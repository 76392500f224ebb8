use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::ListingRecord;
use crate::error::{Result, ScrapeError};

/// Result of merging one record into the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Stored under `key`, which may carry a numeric suffix
    Inserted { key: String },
    /// An identical record already lives under `key`
    Duplicate { key: String },
}

impl MergeOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, MergeOutcome::Inserted { .. })
    }

    pub fn key(&self) -> &str {
        match self {
            MergeOutcome::Inserted { key } | MergeOutcome::Duplicate { key } => key,
        }
    }
}

/// Records keyed by address. Grows monotonically: entries are never replaced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordStore {
    records: BTreeMap<String, ListingRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a store from a JSON object of `address -> record`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Merges `record` under `key`.
    ///
    /// A vacant key is filled directly. An identical record under the key is a
    /// duplicate and leaves the store untouched. A different record moves on to
    /// `key1`, `key2`, ... up to `max_suffix`, stopping at the first vacant or
    /// identical slot.
    pub fn merge(
        &mut self,
        key: &str,
        record: ListingRecord,
        max_suffix: u32,
    ) -> Result<MergeOutcome> {
        for suffix in 0..=max_suffix {
            let candidate = if suffix == 0 {
                key.to_string()
            } else {
                format!("{key}{suffix}")
            };

            match self.records.entry(candidate) {
                Entry::Vacant(slot) => {
                    let key = slot.key().clone();
                    slot.insert(record);
                    debug!("Stored property under {}", key);
                    return Ok(MergeOutcome::Inserted { key });
                }
                Entry::Occupied(slot) if *slot.get() == record => {
                    info!("Duplicate property: {}", slot.key());
                    return Ok(MergeOutcome::Duplicate {
                        key: slot.key().clone(),
                    });
                }
                Entry::Occupied(_) => {}
            }
        }

        Err(ScrapeError::KeyCollisionLimit {
            key: key.to_string(),
            limit: max_suffix,
        })
    }

    pub fn get(&self, key: &str) -> Option<&ListingRecord> {
        self.records.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.records.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ListingRecord)> {
        self.records.iter()
    }
}

impl FromIterator<(String, ListingRecord)> for RecordStore {
    fn from_iter<I: IntoIterator<Item = (String, ListingRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListingKind;
    use pretty_assertions::assert_eq;

    fn sold(price: &str) -> ListingRecord {
        ListingRecord::new(ListingKind::Sold).with("final_price", price)
    }

    #[test]
    fn new_key_is_inserted_unchanged() {
        let mut store = RecordStore::new();
        let outcome = store.merge("Götgatan 12", sold("1 kr"), 10).unwrap();
        assert_eq!(
            outcome,
            MergeOutcome::Inserted {
                key: "Götgatan 12".into()
            }
        );
        assert_eq!(store.get("Götgatan 12"), Some(&sold("1 kr")));
    }

    #[test]
    fn identical_record_is_duplicate() {
        let mut store = RecordStore::new();
        store.merge("Götgatan 12", sold("1 kr"), 10).unwrap();
        let before = store.clone();
        let outcome = store.merge("Götgatan 12", sold("1 kr"), 10).unwrap();
        assert!(!outcome.is_inserted());
        assert_eq!(store, before);
    }

    #[test]
    fn differing_records_get_increasing_suffixes() {
        let mut store = RecordStore::new();
        store.merge("Ringvägen 3", sold("1 kr"), 10).unwrap();
        let second = store.merge("Ringvägen 3", sold("2 kr"), 10).unwrap();
        let third = store.merge("Ringvägen 3", sold("3 kr"), 10).unwrap();
        assert_eq!(second.key(), "Ringvägen 31");
        assert_eq!(third.key(), "Ringvägen 32");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn duplicate_of_suffixed_record_is_detected() {
        let mut store = RecordStore::new();
        store.merge("Ringvägen 3", sold("1 kr"), 10).unwrap();
        store.merge("Ringvägen 3", sold("2 kr"), 10).unwrap();
        let again = store.merge("Ringvägen 3", sold("2 kr"), 10).unwrap();
        assert_eq!(
            again,
            MergeOutcome::Duplicate {
                key: "Ringvägen 31".into()
            }
        );
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn suffix_ceiling_is_an_error() {
        let mut store = RecordStore::new();
        store.merge("Hornsgatan 1", sold("a"), 1).unwrap();
        store.merge("Hornsgatan 1", sold("b"), 1).unwrap();
        let err = store.merge("Hornsgatan 1", sold("c"), 1).unwrap_err();
        assert!(matches!(err, ScrapeError::KeyCollisionLimit { limit: 1, .. }));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn store_round_trips_through_json() {
        let mut store = RecordStore::new();
        store.merge("Folkungagatan 101", sold("3 495 000 kr"), 10).unwrap();
        let json = store.to_json_pretty().unwrap();
        assert!(json.contains("\"Folkungagatan 101\""));
        assert_eq!(RecordStore::from_json(&json).unwrap(), store);
    }
}
