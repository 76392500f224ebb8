pub mod store;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use store::{MergeOutcome, RecordStore};

/// Field holding the page type of a record
pub const TYPE_FIELD: &str = "type";

/// Kind of page a record was scraped from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ListingKind {
    #[serde(rename = "sold")]
    Sold,
    #[serde(rename = "listing")]
    Listing,
    #[serde(rename = "nybyggnad")]
    NewConstruction,
}

impl ListingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingKind::Sold => "sold",
            ListingKind::Listing => "listing",
            ListingKind::NewConstruction => "nybyggnad",
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema-less listing data: field name to string, number or null.
///
/// Every record carries a `type` field. The remaining fields depend on the
/// page type and on whatever attribute rows the listing page exposed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingRecord(BTreeMap<String, Value>);

impl ListingRecord {
    pub fn new(kind: ListingKind) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(TYPE_FIELD.to_string(), Value::from(kind.as_str()));
        Self(fields)
    }

    pub fn kind(&self) -> Option<ListingKind> {
        match self.0.get(TYPE_FIELD)?.as_str()? {
            "sold" => Some(ListingKind::Sold),
            "listing" => Some(ListingKind::Listing),
            "nybyggnad" => Some(ListingKind::NewConstruction),
            _ => None,
        }
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// Inserts the value, or null when it is missing.
    pub fn insert_opt<V: Into<Value>>(&mut self, field: impl Into<String>, value: Option<V>) {
        self.0
            .insert(field.into(), value.map_or(Value::Null, Into::into));
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Merges label/value rows verbatim. Rows never replace a field that is
    /// already set, so the fixed fields of a page type always win.
    pub fn merge_attributes<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (label, value) in rows {
            if self.0.contains_key(&label) {
                tracing::debug!(
                    "Attribute row '{}' collides with an existing field, skipped",
                    label
                );
                continue;
            }
            self.0.insert(label, Value::from(value));
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}
